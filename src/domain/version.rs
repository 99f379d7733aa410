use crate::domain::pull_request::{PullRequest, PullRequestKind};
use crate::error::{ReleaseError, Result};
use regex::Regex;
use std::fmt;
use std::str::FromStr;

/// Prefix every release tag carries
pub const TAG_PREFIX: &str = "collectd-";

/// The only major version this release train accepts
pub const EPOCH: u64 = 6;

const TAG_PATTERN: &str = r"^collectd-(6)\.([0-9]+)\.([0-9]+)(.*)$";

/// Release version: `6.<minor>.<patch><suffix>`
///
/// Values are immutable; [`Version::next`] derives a new one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
    major: u64,
    minor: u64,
    patch: u64,
    suffix: String,
}

/// Version component to advance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionBump {
    Minor,
    Patch,
}

impl VersionBump {
    /// Bump target for the highest-ranked pull request, if any qualifies
    pub fn for_kind(kind: PullRequestKind) -> Option<Self> {
        match kind {
            PullRequestKind::Feature => Some(VersionBump::Minor),
            PullRequestKind::Fix => Some(VersionBump::Patch),
            PullRequestKind::Maintenance => None,
        }
    }
}

impl Version {
    /// Create a version in the current epoch
    pub fn new(minor: u64, patch: u64) -> Self {
        Version {
            major: EPOCH,
            minor,
            patch,
            suffix: String::new(),
        }
    }

    /// Attach a free-form suffix such as `.rc0`
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Parse a release tag such as `collectd-6.0.1` or `collectd-6.0.0.rc0`.
    ///
    /// Wrong prefix, wrong epoch and missing components are all rejected.
    pub fn parse_tag(tag: &str) -> Result<Self> {
        let captures = Regex::new(TAG_PATTERN)
            .ok()
            .and_then(|re| re.captures(tag))
            .ok_or_else(|| ReleaseError::tag_parse(tag))?;

        let component = |index: usize| -> Result<u64> {
            captures
                .get(index)
                .and_then(|m| m.as_str().parse::<u64>().ok())
                .ok_or_else(|| ReleaseError::tag_parse(tag))
        };

        Ok(Version {
            major: component(1)?,
            minor: component(2)?,
            patch: component(3)?,
            suffix: captures
                .get(4)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default(),
        })
    }

    pub fn major(&self) -> u64 {
        self.major
    }

    pub fn minor(&self) -> u64 {
        self.minor
    }

    pub fn patch(&self) -> u64 {
        self.patch
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Tag name for this version
    pub fn tag(&self) -> String {
        format!("{}{}", TAG_PREFIX, self)
    }

    /// Compute the version that follows this one given the merged pull requests.
    ///
    /// A `Feature` bumps minor, a `Fix` bumps patch. Patch is not reset on a
    /// minor bump. While a suffix is present only the suffix counter moves,
    /// but some pull request must still qualify. A component already at
    /// `u64::MAX` cannot be advanced and yields [`ReleaseError::VersionOverflow`].
    pub fn next(&self, prs: &[PullRequest]) -> Result<Version> {
        let bump = VersionBump::for_kind(PullRequestKind::max_of(prs))
            .ok_or(ReleaseError::NoQualifyingChange)?;

        if !self.suffix.is_empty() {
            return Ok(self.next_suffix());
        }

        self.bump(bump)
    }

    fn bump(&self, bump: VersionBump) -> Result<Version> {
        let mut next = self.clone();
        let component = match bump {
            VersionBump::Minor => &mut next.minor,
            VersionBump::Patch => &mut next.patch,
        };
        *component = component
            .checked_add(1)
            .ok_or_else(|| ReleaseError::VersionOverflow(self.tag()))?;
        Ok(next)
    }

    fn next_suffix(&self) -> Version {
        Version {
            suffix: next_suffix(&self.suffix),
            ..self.clone()
        }
    }
}

/// Advance the first decimal counter in a suffix, or append `0` if there is none.
fn next_suffix(suffix: &str) -> String {
    let Some(start) = suffix.find(|c: char| c.is_ascii_digit()) else {
        return format!("{}0", suffix);
    };

    let (prefix, rest) = suffix.split_at(start);
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let (digits, remainder) = rest.split_at(end);

    format!("{}{}{}", prefix, increment_decimal(digits), remainder)
}

/// Add one to an arbitrarily long run of ASCII digits, dropping leading zeros.
fn increment_decimal(digits: &str) -> String {
    let mut out: Vec<char> = digits.trim_start_matches('0').chars().collect();

    let mut carry = true;
    for digit in out.iter_mut().rev() {
        if *digit == '9' {
            *digit = '0';
        } else {
            *digit = char::from(*digit as u8 + 1);
            carry = false;
            break;
        }
    }
    if carry {
        out.insert(0, '1');
    }

    out.into_iter().collect()
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}{}",
            self.major, self.minor, self.patch, self.suffix
        )
    }
}

impl FromStr for Version {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        Version::parse_tag(s)
    }
}
