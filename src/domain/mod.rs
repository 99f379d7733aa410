//! Domain logic - pure release rules independent of git and I/O

pub mod changelog;
pub mod pull_request;
pub mod version;

pub use changelog::{Changelog, ChangelogEntry};
pub use pull_request::{Author, Label, PullRequest, PullRequestKind};
pub use version::{Version, VersionBump};
