//! Git operations abstraction layer
//!
//! The release workflow talks to version control only through the
//! [Repository] trait. Two implementations exist:
//!
//! - [repository::Git2Repository]: a real repository opened with the `git2` crate
//! - [mock::MockRepository]: an in-memory stand-in for tests
//!
//! # Usage
//!
//! ```rust
//! # use collectd_releaser::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> collectd_releaser::Result<()> {
//! if let Some(tag) = repo.latest_release_tag("collectd-6.0")? {
//!     let merged = repo.merged_pull_requests_since(&tag, "collectd-6.0")?;
//!     println!("{} pull request(s) since {}", merged.len(), tag);
//! }
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;

/// Version control operations needed to cut a release
pub trait Repository {
    /// Most recent release tag reachable from the branch head.
    ///
    /// Only tags that parse as release tags are considered. When several
    /// release tags point at the same commit, one without a suffix wins.
    ///
    /// # Returns
    /// * `Ok(Some(tag))` - The closest release tag in the branch history
    /// * `Ok(None)` - If no release tag is reachable
    /// * `Err` - If the branch doesn't exist or a git error occurs
    fn latest_release_tag(&self, branch: &str) -> Result<Option<String>>;

    /// Pull request numbers merged into `branch` since `tag`, newest first.
    ///
    /// A merge is a commit with more than one parent whose summary contains
    /// `Merge pull request #<n>`. Duplicate numbers are dropped.
    fn merged_pull_requests_since(&self, tag: &str, branch: &str) -> Result<Vec<u64>>;

    /// Contents of `path` at the branch head, `None` if the file doesn't exist
    fn read_file(&self, branch: &str, path: &str) -> Result<Option<Vec<u8>>>;

    /// Commit `content` as `path` on top of the branch head and advance the branch.
    ///
    /// If the branch is checked out, the index and working tree follow the
    /// new commit; uncommitted changes there make this fail instead.
    ///
    /// # Returns
    /// * `Ok(String)` - The id of the new commit
    fn commit_file(&self, branch: &str, path: &str, content: &[u8], message: &str)
        -> Result<String>;

    /// Create an annotated tag on the branch head
    fn create_tag(&self, name: &str, branch: &str, message: &str) -> Result<()>;

    /// Push the branch and the tag to a remote
    fn push(&self, remote: &str, branch: &str, tag: &str) -> Result<()>;
}
