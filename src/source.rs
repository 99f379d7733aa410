//! Pull request records consumed by the release workflow.
//!
//! Records come from an export such as
//! `gh pr list --state merged --limit 1000 --json number,title,body,author,labels`.

use crate::domain::PullRequest;
use crate::error::Result;
use log::debug;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Lookup of merged pull request records by number
pub trait PullRequestSource {
    /// The record for `number`, or `None` if the source doesn't know it
    fn pull_request(&self, number: u64) -> Result<Option<PullRequest>>;
}

/// Pull requests loaded from a JSON array
#[derive(Debug, Clone, Default)]
pub struct JsonPullRequestSource {
    records: HashMap<u64, PullRequest>,
}

impl JsonPullRequestSource {
    /// Load records from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let source = Self::from_json(&json)?;
        debug!(
            "Loaded {} pull request record(s) from {}",
            source.len(),
            path.display()
        );
        Ok(source)
    }

    /// Parse records from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let records: Vec<PullRequest> = serde_json::from_str(json)?;
        Ok(records.into_iter().collect())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<PullRequest> for JsonPullRequestSource {
    fn from_iter<I: IntoIterator<Item = PullRequest>>(iter: I) -> Self {
        JsonPullRequestSource {
            records: iter.into_iter().map(|pr| (pr.number, pr)).collect(),
        }
    }
}

impl PullRequestSource for JsonPullRequestSource {
    fn pull_request(&self, number: u64) -> Result<Option<PullRequest>> {
        Ok(self.records.get(&number).cloned())
    }
}

impl PullRequestSource for [PullRequest] {
    fn pull_request(&self, number: u64) -> Result<Option<PullRequest>> {
        Ok(self.iter().find(|pr| pr.number == number).cloned())
    }
}

impl PullRequestSource for Vec<PullRequest> {
    fn pull_request(&self, number: u64) -> Result<Option<PullRequest>> {
        self.as_slice().pull_request(number)
    }
}
