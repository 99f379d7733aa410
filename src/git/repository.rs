use crate::domain::Version;
use crate::error::{ReleaseError, Result};
use git2::build::CheckoutBuilder;
use git2::{BranchType, Commit, ErrorCode, Oid, Repository as Git2Repo, StatusOptions, Tree};
use log::{debug, info, warn};
use regex::Regex;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::path::Path;

const MERGE_PATTERN: &str = r"Merge pull request #([0-9]+)";

const FILE_MODE_BLOB: i32 = 0o100644;
const FILE_MODE_TREE: i32 = 0o040000;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;
        debug!("Opened git repository at {}", repo.path().display());

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    fn branch_head(&self, branch_name: &str) -> Result<Commit<'_>> {
        let branch = self
            .repo
            .find_branch(branch_name, BranchType::Local)
            .map_err(|e| {
                ReleaseError::branch(format!("Cannot find branch '{}': {}", branch_name, e))
            })?;

        branch.into_reference().peel_to_commit().map_err(|e| {
            ReleaseError::branch(format!("Branch '{}' has no target: {}", branch_name, e))
        })
    }

    fn tag_target(&self, tag_name: &str) -> Result<Oid> {
        let reference = self
            .repo
            .find_reference(&format!("refs/tags/{}", tag_name))
            .map_err(|e| ReleaseError::tag(format!("Cannot find tag '{}': {}", tag_name, e)))?;

        let commit = reference
            .peel_to_commit()
            .map_err(|e| ReleaseError::tag(format!("Cannot peel tag '{}': {}", tag_name, e)))?;

        Ok(commit.id())
    }

    /// True when HEAD is attached to `branch` in a non-bare repository
    fn is_checked_out(&self, branch: &str) -> bool {
        if self.repo.is_bare() {
            return false;
        }
        let reference = format!("refs/heads/{}", branch);
        self.repo
            .head()
            .ok()
            .and_then(|head| head.name().map(|name| name == reference))
            .unwrap_or(false)
    }

    /// Refuse to touch a checked-out branch with uncommitted changes.
    fn ensure_clean_worktree(&self, branch: &str) -> Result<()> {
        let mut options = StatusOptions::new();
        options.include_untracked(false).include_ignored(false);

        let statuses = self.repo.statuses(Some(&mut options))?;
        if statuses.is_empty() {
            return Ok(());
        }

        let paths: Vec<String> = statuses
            .iter()
            .filter_map(|entry| entry.path().map(str::to_string))
            .collect();
        Err(ReleaseError::branch(format!(
            "Branch '{}' is checked out with uncommitted changes: {}",
            branch,
            paths.join(", ")
        )))
    }

    /// Write a tree equal to `base` except that `components` names `blob`.
    ///
    /// Intermediate directories are created as needed.
    fn write_tree_with_blob(
        &self,
        base: Option<&Tree<'_>>,
        components: &[&str],
        blob: Oid,
    ) -> Result<Oid> {
        let mut builder = self.repo.treebuilder(base)?;

        match components {
            [] => return Err(ReleaseError::config("Empty file path")),
            [name] => {
                builder.insert(*name, blob, FILE_MODE_BLOB)?;
            }
            [dir, rest @ ..] => {
                let subtree = match base.and_then(|tree| tree.get_name(dir)) {
                    Some(entry) => Some(self.repo.find_tree(entry.id()).map_err(|e| {
                        ReleaseError::config(format!("'{}' is not a directory: {}", dir, e))
                    })?),
                    None => None,
                };
                let oid = self.write_tree_with_blob(subtree.as_ref(), rest, blob)?;
                builder.insert(*dir, oid, FILE_MODE_TREE)?;
            }
        }

        Ok(builder.write()?)
    }
}

/// Credentials lookup shared by all network operations.
///
/// Tries the usual SSH keys, then the SSH agent, then libgit2 defaults.
fn remote_callbacks<'a>() -> git2::RemoteCallbacks<'a> {
    let mut callbacks = git2::RemoteCallbacks::new();
    callbacks.credentials(|_url, username_from_url, allowed_types| {
        let username = username_from_url.unwrap_or("git");

        if allowed_types.contains(git2::CredentialType::SSH_KEY) {
            if let Some(home) = dirs::home_dir() {
                for key in ["id_ed25519", "id_rsa", "id_ecdsa"] {
                    let path = home.join(".ssh").join(key);
                    if path.exists() {
                        if let Ok(cred) = git2::Cred::ssh_key(username, None, &path, None) {
                            return Ok(cred);
                        }
                    }
                }
            }

            if let Ok(cred) = git2::Cred::ssh_key_from_agent(username) {
                return Ok(cred);
            }
        }

        git2::Cred::default()
    });

    callbacks.push_update_reference(|refname, status| match status {
        Some(status) => {
            warn!("Could not update reference {}: {}", refname, status);
            Err(git2::Error::from_str(&format!(
                "Push failed for {}: {}",
                refname, status
            )))
        }
        None => Ok(()),
    });

    callbacks
}

impl super::Repository for Git2Repository {
    fn latest_release_tag(&self, branch: &str) -> Result<Option<String>> {
        let head = self.branch_head(branch)?;

        // A commit carrying both a final release and a pre-release tag
        // resolves to the final release.
        let mut release_tags: HashMap<Oid, (Version, String)> = HashMap::new();
        for tag_name in self.repo.tag_names(None)?.iter().flatten() {
            let Ok(version) = Version::parse_tag(tag_name) else {
                continue;
            };
            let oid = match self.tag_target(tag_name) {
                Ok(oid) => oid,
                Err(e) => {
                    warn!("Skipping tag '{}': {}", tag_name, e);
                    continue;
                }
            };

            match release_tags.entry(oid) {
                Entry::Vacant(slot) => {
                    slot.insert((version, tag_name.to_string()));
                }
                Entry::Occupied(mut slot) => {
                    warn!(
                        "Release tags '{}' and '{}' point at the same commit {}",
                        slot.get().1,
                        tag_name,
                        oid
                    );
                    if !slot.get().0.suffix().is_empty() && version.suffix().is_empty() {
                        slot.insert((version, tag_name.to_string()));
                    }
                }
            }
        }
        debug!("Found {} release tag(s)", release_tags.len());

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(git2::Sort::TOPOLOGICAL | git2::Sort::TIME)?;
        revwalk.push(head.id())?;

        for oid in revwalk {
            if let Some((_, tag_name)) = release_tags.get(&oid?) {
                return Ok(Some(tag_name.clone()));
            }
        }

        Ok(None)
    }

    fn merged_pull_requests_since(&self, tag: &str, branch: &str) -> Result<Vec<u64>> {
        let head = self.branch_head(branch)?;
        let since = self.tag_target(tag)?;
        let merge_re =
            Regex::new(MERGE_PATTERN).map_err(|e| ReleaseError::config(e.to_string()))?;

        info!("Listing merges in {}..{}", tag, branch);
        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(git2::Sort::TOPOLOGICAL | git2::Sort::TIME)?;
        revwalk.push(head.id())?;
        revwalk.hide(since)?;

        let mut seen = HashSet::new();
        let mut numbers = Vec::new();
        for oid in revwalk {
            let commit = self.repo.find_commit(oid?)?;
            if commit.parent_count() < 2 {
                continue;
            }

            let number = commit
                .summary()
                .and_then(|summary| merge_re.captures(summary))
                .and_then(|captures| captures.get(1))
                .and_then(|m| m.as_str().parse::<u64>().ok())
                .filter(|n| *n > 0);

            match number {
                Some(n) if seen.insert(n) => {
                    debug!("Merge {} brought in #{}", commit.id(), n);
                    numbers.push(n);
                }
                Some(_) => {}
                None => debug!("Merge {} is not a pull request merge", commit.id()),
            }
        }

        Ok(numbers)
    }

    fn read_file(&self, branch: &str, path: &str) -> Result<Option<Vec<u8>>> {
        let tree = self.branch_head(branch)?.tree()?;

        let entry = match tree.get_path(Path::new(path)) {
            Ok(entry) => entry,
            Err(e) if e.code() == ErrorCode::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let blob = entry.to_object(&self.repo)?.peel_to_blob()?;
        Ok(Some(blob.content().to_vec()))
    }

    fn commit_file(
        &self,
        branch: &str,
        path: &str,
        content: &[u8],
        message: &str,
    ) -> Result<String> {
        let parent = self.branch_head(branch)?;
        let checked_out = self.is_checked_out(branch);
        if checked_out {
            self.ensure_clean_worktree(branch)?;
        }
        let components: Vec<&str> = path.split('/').filter(|c| !c.is_empty()).collect();

        let blob = self.repo.blob(content)?;
        let tree_id = self.write_tree_with_blob(Some(&parent.tree()?), &components, blob)?;
        let tree = self.repo.find_tree(tree_id)?;

        let signature = self.repo.signature()?;
        let reference = format!("refs/heads/{}", branch);
        let oid = self.repo.commit(
            Some(reference.as_str()),
            &signature,
            &signature,
            message,
            &tree,
            &[&parent],
        )?;
        info!("Created commit {} on {}", oid, branch);

        if checked_out {
            self.repo
                .checkout_head(Some(CheckoutBuilder::new().force()))
                .map_err(|e| {
                    ReleaseError::branch(format!(
                        "Committed {} but could not update the working tree of '{}': {}",
                        oid, branch, e
                    ))
                })?;
            debug!("Checked out {} into the working tree", oid);
        }

        Ok(oid.to_string())
    }

    fn create_tag(&self, name: &str, branch: &str, message: &str) -> Result<()> {
        let head = self.branch_head(branch)?;
        let signature = self.repo.signature()?;

        self.repo
            .tag(name, head.as_object(), &signature, message, false)
            .map_err(|e| ReleaseError::tag(format!("Cannot create tag '{}': {}", name, e)))?;
        info!("Created tag {} at {}", name, head.id());

        Ok(())
    }

    fn push(&self, remote: &str, branch: &str, tag: &str) -> Result<()> {
        let mut remote_handle = self
            .repo
            .find_remote(remote)
            .map_err(|e| ReleaseError::remote(format!("Cannot find remote '{}': {}", remote, e)))?;

        let refspecs = [
            format!("refs/heads/{0}:refs/heads/{0}", branch),
            format!("refs/tags/{0}:refs/tags/{0}", tag),
        ];

        let mut push_options = git2::PushOptions::new();
        push_options.remote_callbacks(remote_callbacks());

        remote_handle
            .push(&refspecs, Some(&mut push_options))
            .map_err(|e| match e.class() {
                git2::ErrorClass::Net => {
                    ReleaseError::remote(format!("Network error during push: {}", e))
                }
                _ => ReleaseError::remote(format!("Push to '{}' failed: {}", remote, e)),
            })?;
        info!("Pushed {} and {} to {}", branch, tag, remote);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::Repository;

    #[test]
    fn test_open_outside_repository_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        // A fresh temp dir may still sit inside a repository on some machines.
        if Git2Repo::discover(dir.path()).is_err() {
            assert!(Git2Repository::open(dir.path()).is_err());
        }
    }

    #[test]
    fn test_missing_branch_is_branch_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let repo = Git2Repository::from_git2(Git2Repo::init(dir.path()).unwrap());

        let err = repo.latest_release_tag("collectd-6.0").unwrap_err();
        assert!(matches!(err, ReleaseError::Branch(_)));
    }
}
