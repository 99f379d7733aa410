use std::fmt;

/// Non-fatal situations met while cutting a release.
/// These are reported to the user but never abort the run.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// No pull requests were merged since the previous release
    NoMergedPullRequests { since_tag: String },
    /// Pull requests were merged, but none is labeled Feature or Fix
    NothingToRelease { since_tag: String, merged: usize },
    /// Merged pull requests whose description has no `ChangeLog: ` line
    MissingChangelogLine { numbers: Vec<u64> },
    /// The ChangeLog file does not exist yet and will be created
    ChangelogFileMissing { path: String },
    /// The previous tag was given explicitly and differs from the detected one
    PreviousTagOverride { tag: String, detected: Option<String> },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::NoMergedPullRequests { since_tag } => {
                write!(f, "No pull requests merged since '{}'", since_tag)
            }
            BoundaryWarning::NothingToRelease { since_tag, merged } => write!(
                f,
                "{} pull request(s) merged since '{}', but none is labeled Feature or Fix",
                merged, since_tag
            ),
            BoundaryWarning::MissingChangelogLine { numbers } => {
                let list: Vec<String> = numbers.iter().map(|n| format!("#{}", n)).collect();
                write!(
                    f,
                    "No 'ChangeLog: ' line in pull request(s) {}",
                    list.join(", ")
                )
            }
            BoundaryWarning::ChangelogFileMissing { path } => {
                write!(f, "File '{}' does not exist and will be created", path)
            }
            BoundaryWarning::PreviousTagOverride { tag, detected } => match detected {
                Some(detected) => write!(
                    f,
                    "Using previous tag '{}' instead of detected '{}'",
                    tag, detected
                ),
                None => write!(
                    f,
                    "Using previous tag '{}'; no release tag found on the branch",
                    tag
                ),
            },
        }
    }
}
