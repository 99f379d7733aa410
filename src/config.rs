use crate::error::Result;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "releaser.toml";

/// Represents the complete configuration for the releaser.
///
/// Every section is optional; missing values fall back to the collectd defaults.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub repository: RepositoryConfig,

    #[serde(default)]
    pub changelog: ChangelogConfig,

    #[serde(default)]
    pub pull_requests: PullRequestsConfig,
}

fn default_repository_path() -> PathBuf {
    PathBuf::from(".")
}

fn default_branch() -> String {
    "collectd-6.0".to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}

/// Where releases are cut from and pushed to.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RepositoryConfig {
    #[serde(default = "default_repository_path")]
    pub path: PathBuf,

    #[serde(default = "default_branch")]
    pub branch: String,

    #[serde(default = "default_remote")]
    pub remote: String,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        RepositoryConfig {
            path: default_repository_path(),
            branch: default_branch(),
            remote: default_remote(),
        }
    }
}

fn default_changelog_path() -> String {
    "ChangeLog".to_string()
}

/// Location of the ChangeLog file inside the repository
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ChangelogConfig {
    #[serde(default = "default_changelog_path")]
    pub path: String,
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        ChangelogConfig {
            path: default_changelog_path(),
        }
    }
}

fn default_pull_requests_path() -> PathBuf {
    PathBuf::from("pull_requests.json")
}

/// Location of the exported pull request records
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PullRequestsConfig {
    #[serde(default = "default_pull_requests_path")]
    pub path: PathBuf,
}

impl Default for PullRequestsConfig {
    fn default() -> Self {
        PullRequestsConfig {
            path: default_pull_requests_path(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `releaser.toml` in current directory
/// 3. `.releaser.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let path = if let Some(path) = config_path {
        PathBuf::from(path)
    } else if Path::new(CONFIG_FILE_NAME).exists() {
        PathBuf::from(CONFIG_FILE_NAME)
    } else {
        match dirs::config_dir().map(|dir| dir.join(format!(".{}", CONFIG_FILE_NAME))) {
            Some(path) if path.exists() => path,
            _ => {
                debug!("No configuration file found, using defaults");
                return Ok(Config::default());
            }
        }
    };

    debug!("Loading configuration from {}", path.display());
    let config_str = fs::read_to_string(&path)?;
    parse_config(&config_str)
}

/// Parse configuration from TOML text
pub fn parse_config(config_str: &str) -> Result<Config> {
    Ok(toml::from_str(config_str)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.repository.branch, "collectd-6.0");
        assert_eq!(config.repository.remote, "origin");
        assert_eq!(config.repository.path, PathBuf::from("."));
        assert_eq!(config.changelog.path, "ChangeLog");
        assert_eq!(
            config.pull_requests.path,
            PathBuf::from("pull_requests.json")
        );
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        assert_eq!(parse_config("").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_section() {
        let config = parse_config("[repository]\nbranch = \"collectd-6.1\"\n").unwrap();
        assert_eq!(config.repository.branch, "collectd-6.1");
        assert_eq!(config.repository.remote, "origin");
        assert_eq!(config.changelog, ChangelogConfig::default());
    }

    #[test]
    fn test_invalid_toml() {
        let err = parse_config("[repository\nbranch = 1").unwrap_err();
        assert!(err.to_string().starts_with("TOML error"));
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = load_config(Some("/nonexistent/releaser.toml")).unwrap_err();
        assert!(err.to_string().contains("I/O error"));
    }
}
