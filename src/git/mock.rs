use crate::error::{ReleaseError, Result};
use crate::git::Repository;
use std::cell::RefCell;
use std::collections::HashMap;

/// A commit written through [Repository::commit_file]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCommit {
    pub branch: String,
    pub path: String,
    pub content: Vec<u8>,
    pub message: String,
}

/// A tag written through [Repository::create_tag]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedTag {
    pub name: String,
    pub branch: String,
    pub message: String,
}

/// Mock repository for testing without actual git operations
#[derive(Default)]
pub struct MockRepository {
    branches: Vec<String>,
    release_tags: HashMap<String, String>,
    merges: HashMap<String, Vec<u64>>,
    files: RefCell<HashMap<(String, String), Vec<u8>>>,
    commits: RefCell<Vec<RecordedCommit>>,
    tags: RefCell<Vec<RecordedTag>>,
    pushes: RefCell<Vec<(String, String, String)>>,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a branch whose latest release tag is `tag`
    pub fn add_branch(&mut self, branch: impl Into<String>, tag: Option<&str>) {
        let branch = branch.into();
        if let Some(tag) = tag {
            self.release_tags.insert(branch.clone(), tag.to_string());
        }
        self.branches.push(branch);
    }

    /// Set the pull requests merged since `tag`
    pub fn set_merges(&mut self, tag: impl Into<String>, numbers: Vec<u64>) {
        self.merges.insert(tag.into(), numbers);
    }

    /// Seed a file at a branch head
    pub fn add_file(&mut self, branch: &str, path: &str, content: impl Into<Vec<u8>>) {
        self.files
            .borrow_mut()
            .insert((branch.to_string(), path.to_string()), content.into());
    }

    pub fn commits(&self) -> Vec<RecordedCommit> {
        self.commits.borrow().clone()
    }

    pub fn tags(&self) -> Vec<RecordedTag> {
        self.tags.borrow().clone()
    }

    /// Recorded pushes as `(remote, branch, tag)`
    pub fn pushes(&self) -> Vec<(String, String, String)> {
        self.pushes.borrow().clone()
    }

    fn ensure_branch(&self, branch: &str) -> Result<()> {
        if self.branches.iter().any(|b| b == branch) {
            Ok(())
        } else {
            Err(ReleaseError::branch(format!(
                "Cannot find branch '{}'",
                branch
            )))
        }
    }
}

impl Repository for MockRepository {
    fn latest_release_tag(&self, branch: &str) -> Result<Option<String>> {
        self.ensure_branch(branch)?;
        Ok(self.release_tags.get(branch).cloned())
    }

    fn merged_pull_requests_since(&self, tag: &str, branch: &str) -> Result<Vec<u64>> {
        self.ensure_branch(branch)?;
        Ok(self.merges.get(tag).cloned().unwrap_or_default())
    }

    fn read_file(&self, branch: &str, path: &str) -> Result<Option<Vec<u8>>> {
        self.ensure_branch(branch)?;
        Ok(self
            .files
            .borrow()
            .get(&(branch.to_string(), path.to_string()))
            .cloned())
    }

    fn commit_file(
        &self,
        branch: &str,
        path: &str,
        content: &[u8],
        message: &str,
    ) -> Result<String> {
        self.ensure_branch(branch)?;
        self.files
            .borrow_mut()
            .insert((branch.to_string(), path.to_string()), content.to_vec());

        let mut commits = self.commits.borrow_mut();
        commits.push(RecordedCommit {
            branch: branch.to_string(),
            path: path.to_string(),
            content: content.to_vec(),
            message: message.to_string(),
        });
        Ok(format!("{:040x}", commits.len()))
    }

    fn create_tag(&self, name: &str, branch: &str, message: &str) -> Result<()> {
        self.ensure_branch(branch)?;
        let mut tags = self.tags.borrow_mut();
        if tags.iter().any(|t| t.name == name) {
            return Err(ReleaseError::tag(format!("Tag '{}' already exists", name)));
        }
        tags.push(RecordedTag {
            name: name.to_string(),
            branch: branch.to_string(),
            message: message.to_string(),
        });
        Ok(())
    }

    fn push(&self, remote: &str, branch: &str, tag: &str) -> Result<()> {
        self.ensure_branch(branch)?;
        self.pushes
            .borrow_mut()
            .push((remote.to_string(), branch.to_string(), tag.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_repository_release_tag() {
        let mut repo = MockRepository::new();
        repo.add_branch("collectd-6.0", Some("collectd-6.0.0"));
        repo.add_branch("main", None);

        assert_eq!(
            repo.latest_release_tag("collectd-6.0").unwrap(),
            Some("collectd-6.0.0".to_string())
        );
        assert_eq!(repo.latest_release_tag("main").unwrap(), None);
        assert!(repo.latest_release_tag("missing").is_err());
    }

    #[test]
    fn test_mock_repository_merges() {
        let mut repo = MockRepository::new();
        repo.add_branch("collectd-6.0", Some("collectd-6.0.0"));
        repo.set_merges("collectd-6.0.0", vec![3, 2, 1]);

        assert_eq!(
            repo.merged_pull_requests_since("collectd-6.0.0", "collectd-6.0")
                .unwrap(),
            vec![3, 2, 1]
        );
        assert!(repo
            .merged_pull_requests_since("collectd-6.0.1", "collectd-6.0")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_mock_repository_commit_updates_file() {
        let mut repo = MockRepository::new();
        repo.add_branch("main", None);
        repo.add_file("main", "ChangeLog", "old\n");

        let id = repo
            .commit_file("main", "ChangeLog", b"new\nold\n", "Update")
            .unwrap();
        assert_eq!(id.len(), 40);
        assert_eq!(
            repo.read_file("main", "ChangeLog").unwrap(),
            Some(b"new\nold\n".to_vec())
        );
        assert_eq!(repo.commits().len(), 1);
        assert_eq!(repo.commits()[0].message, "Update");
    }

    #[test]
    fn test_mock_repository_duplicate_tag() {
        let mut repo = MockRepository::new();
        repo.add_branch("main", None);

        repo.create_tag("collectd-6.0.1", "main", "notes").unwrap();
        assert!(repo.create_tag("collectd-6.0.1", "main", "notes").is_err());
        assert_eq!(repo.tags().len(), 1);
    }

    #[test]
    fn test_mock_repository_default() {
        let repo = MockRepository::default();
        assert!(repo.commits().is_empty());
        assert!(repo.pushes().is_empty());
    }
}
