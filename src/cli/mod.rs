//! CLI workflow orchestration
//!
//! Flag parsing lives in the binary; this module holds the workflow it drives.

pub mod orchestration;

pub use orchestration::{run_release_workflow, ReleaseWorkflowArgs, WorkflowOutcome, WorkflowResult};
