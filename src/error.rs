use thiserror::Error;

/// Unified error type for releaser operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version parsing error: unable to parse tag '{0}'")]
    TagParse(String),

    #[error("Nothing to release: no features or fixes in list of pull requests")]
    NoQualifyingChange,

    #[error("Version overflow: no release can follow '{0}'")]
    VersionOverflow(String),

    #[error("Pull request error: {0}")]
    PullRequest(String),

    #[error("Branch error: {0}")]
    Branch(String),

    #[error("Tag error: {0}")]
    Tag(String),

    #[error("Remote operation failed: {0}")]
    Remote(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Convenience type alias for Results in the releaser
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }

    /// Create a tag parsing error naming the offending tag
    pub fn tag_parse(tag: impl Into<String>) -> Self {
        ReleaseError::TagParse(tag.into())
    }

    /// Create a pull request error with context
    pub fn pull_request(msg: impl Into<String>) -> Self {
        ReleaseError::PullRequest(msg.into())
    }

    /// Create a branch error with context
    pub fn branch(msg: impl Into<String>) -> Self {
        ReleaseError::Branch(msg.into())
    }

    /// Create a tag error with context
    pub fn tag(msg: impl Into<String>) -> Self {
        ReleaseError::Tag(msg.into())
    }

    /// Create a remote error with context
    pub fn remote(msg: impl Into<String>) -> Self {
        ReleaseError::Remote(msg.into())
    }

    /// True when the error only signals that there is nothing to release.
    ///
    /// Callers exit cleanly in that case instead of reporting a failure.
    pub fn is_nothing_to_release(&self) -> bool {
        matches!(self, ReleaseError::NoQualifyingChange)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ReleaseError::config("test config issue");
        assert_eq!(err.to_string(), "Configuration error: test config issue");
    }

    #[test]
    fn test_tag_parse_names_tag() {
        let err = ReleaseError::tag_parse("foo-6.0.0");
        assert_eq!(
            err.to_string(),
            "Version parsing error: unable to parse tag 'foo-6.0.0'"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ReleaseError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ReleaseError = json_err.into();
        assert!(err.to_string().starts_with("JSON error"));
    }

    #[test]
    fn test_nothing_to_release() {
        assert!(ReleaseError::NoQualifyingChange.is_nothing_to_release());
        assert!(!ReleaseError::tag_parse("x").is_nothing_to_release());
        assert!(!ReleaseError::config("x").is_nothing_to_release());
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error_pairs = vec![
            (ReleaseError::config("x"), "Configuration error"),
            (ReleaseError::tag_parse("x"), "Version parsing error"),
            (ReleaseError::pull_request("x"), "Pull request error"),
            (ReleaseError::branch("x"), "Branch error"),
            (ReleaseError::tag("x"), "Tag error"),
            (ReleaseError::remote("x"), "Remote operation failed"),
            (ReleaseError::NoQualifyingChange, "Nothing to release"),
            (
                ReleaseError::VersionOverflow("collectd-6.0.0".to_string()),
                "Version overflow",
            ),
        ];

        for (err, expected_prefix) in error_pairs {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error message should start with '{}', but got '{}'",
                expected_prefix,
                msg
            );
        }
    }

    #[test]
    fn test_error_special_characters_in_messages() {
        let special_chars = vec![
            "collectd-6.0\n",
            "collectd-6.0.0\trc",
            "tag with 'quotes'",
            "tag with \"double quotes\"",
        ];

        for tag in special_chars {
            let err = ReleaseError::tag_parse(tag);
            assert!(err.to_string().contains("unable to parse tag"));
        }
    }
}
