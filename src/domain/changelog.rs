//! Changelog assembly from `ChangeLog: ` lines in pull request descriptions.

use crate::domain::pull_request::PullRequest;
use crate::domain::version::Version;
use chrono::NaiveDate;
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;

const MARKER_PATTERN: &str = r"(?m)^ChangeLog: (.*)";

/// Label that moves an entry to the front of the changelog
pub const CORE_LABEL: &str = "core";

const TEXT_WIDTH: usize = 80;

/// Column reached after the `\t*` / `\t ` line prefix (tab counted as eight)
const WRAP_INDENT: usize = 9;

/// One changelog line contributed by a pull request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogEntry {
    pub text: String,
    pub author: String,
    pub pr_number: u64,
    pub is_core: bool,
}

impl ChangelogEntry {
    /// Extract the entry from the first `ChangeLog: ` line of the body.
    ///
    /// Returns `None` when the description has no such line.
    pub fn from_pull_request(pr: &PullRequest) -> Option<Self> {
        let captures = Regex::new(MARKER_PATTERN)
            .ok()
            .and_then(|re| re.captures(pr.body()))?;

        let mut text = captures.get(1)?.as_str().trim().to_string();
        if !text.ends_with('.') {
            text.push('.');
        }

        Some(ChangelogEntry {
            text,
            author: pr.author_login().to_string(),
            pr_number: pr.number,
            is_core: pr.has_label(CORE_LABEL),
        })
    }

    /// Changelog order: core entries first by PR number, then the rest by text.
    pub fn changelog_order(&self, other: &Self) -> Ordering {
        other.is_core.cmp(&self.is_core).then_with(|| {
            if self.is_core {
                self.pr_number.cmp(&other.pr_number)
            } else {
                self.text.cmp(&other.text)
            }
        })
    }

    /// Render for the ChangeLog file, wrapped at 80 columns
    pub fn file_format(&self) -> String {
        let rendered = self.to_string();
        let (mut buffer, _) = rendered.split(' ').fold(
            (String::from("\t*"), WRAP_INDENT),
            |(mut buffer, column), word| {
                let column = if column + 1 + word.len() > TEXT_WIDTH {
                    buffer.push_str("\n\t ");
                    WRAP_INDENT
                } else {
                    column
                };
                buffer.push(' ');
                buffer.push_str(word);
                (buffer, column + 1 + word.len())
            },
        );
        buffer.push('\n');
        buffer
    }
}

impl fmt::Display for ChangelogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} Thanks to @{}. #{}",
            self.text, self.author, self.pr_number
        )
    }
}

/// Changelog for one release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Changelog {
    date: NaiveDate,
    version: Version,
    entries: Vec<ChangelogEntry>,
}

impl Changelog {
    /// Collect and order the entries of all pull requests that carry a
    /// changelog line.
    pub fn new(date: NaiveDate, version: Version, prs: &[PullRequest]) -> Self {
        let mut entries: Vec<ChangelogEntry> = prs
            .iter()
            .filter_map(ChangelogEntry::from_pull_request)
            .collect();
        entries.sort_by(ChangelogEntry::changelog_order);

        Changelog {
            date,
            version,
            entries,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    pub fn entries(&self) -> &[ChangelogEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Short form used as release announcement
    pub fn markdown(&self) -> String {
        self.entries
            .iter()
            .map(|entry| format!("*   {}\n", entry))
            .collect()
    }

    /// Long form prepended to the ChangeLog file
    pub fn file_format(&self) -> String {
        let mut out = format!(
            "{}, Version {}\n",
            self.date.format("%Y-%m-%d"),
            self.version
        );
        for entry in &self.entries {
            out.push_str(&entry.file_format());
        }
        out
    }
}

impl fmt::Display for Changelog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.markdown())
    }
}
