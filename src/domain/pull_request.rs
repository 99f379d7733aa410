use serde::{Deserialize, Serialize};

/// Login of the user who opened a pull request
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Author {
    #[serde(default)]
    pub login: String,
}

/// A label attached to a pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
}

/// Merged pull request record as exported from the hosting service.
///
/// Accepts both the `gh pr list --json number,title,body,author,labels` shape
/// and the REST shape, where the opening user lives under `user`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    pub number: u64,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub body: Option<String>,

    #[serde(default, alias = "user")]
    pub author: Author,

    #[serde(default)]
    pub labels: Vec<Label>,
}

impl PullRequest {
    /// Create a pull request record
    pub fn new(number: u64, author: impl Into<String>, body: impl Into<String>) -> Self {
        PullRequest {
            number,
            title: String::new(),
            body: Some(body.into()),
            author: Author {
                login: author.into(),
            },
            labels: Vec::new(),
        }
    }

    /// Add labels, builder style
    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels
            .extend(labels.into_iter().map(|name| Label { name: name.into() }));
        self
    }

    /// Body text, empty when the description was left blank
    pub fn body(&self) -> &str {
        self.body.as_deref().unwrap_or("")
    }

    pub fn author_login(&self) -> &str {
        &self.author.login
    }

    /// Exact, case-sensitive label lookup
    pub fn has_label(&self, name: &str) -> bool {
        self.labels.iter().any(|label| label.name == name)
    }

    /// Classify the pull request by its labels.
    ///
    /// A `Feature` label wins over everything else, then `Fix`; anything
    /// else is maintenance.
    pub fn kind(&self) -> PullRequestKind {
        let mut is_fix = false;
        for label in &self.labels {
            match label.name.as_str() {
                "Feature" => return PullRequestKind::Feature,
                "Fix" => is_fix = true,
                _ => {}
            }
        }

        if is_fix {
            PullRequestKind::Fix
        } else {
            PullRequestKind::Maintenance
        }
    }
}

/// Release-relevance rank of a pull request, ordered
/// `Maintenance < Fix < Feature`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum PullRequestKind {
    #[default]
    Maintenance,
    Fix,
    Feature,
}

impl PullRequestKind {
    /// Highest rank across a set of pull requests; `Maintenance` when empty
    pub fn max_of(prs: &[PullRequest]) -> Self {
        prs.iter().map(PullRequest::kind).max().unwrap_or_default()
    }
}

impl std::fmt::Display for PullRequestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PullRequestKind::Maintenance => "Maintenance",
            PullRequestKind::Fix => "Fix",
            PullRequestKind::Feature => "Feature",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labeled(labels: &[&str]) -> PullRequest {
        PullRequest::new(1, "octo", "").with_labels(labels.iter().copied())
    }

    #[test]
    fn test_kind_feature_wins() {
        assert_eq!(labeled(&["Fix", "Feature"]).kind(), PullRequestKind::Feature);
        assert_eq!(labeled(&["Feature", "Fix"]).kind(), PullRequestKind::Feature);
    }

    #[test]
    fn test_kind_fix() {
        assert_eq!(labeled(&["core", "Fix"]).kind(), PullRequestKind::Fix);
    }

    #[test]
    fn test_kind_maintenance() {
        assert_eq!(labeled(&[]).kind(), PullRequestKind::Maintenance);
        assert_eq!(labeled(&["Maintenance"]).kind(), PullRequestKind::Maintenance);
        // Label names are matched exactly.
        assert_eq!(labeled(&["feature", "fix"]).kind(), PullRequestKind::Maintenance);
    }

    #[test]
    fn test_kind_ordering() {
        assert!(PullRequestKind::Maintenance < PullRequestKind::Fix);
        assert!(PullRequestKind::Fix < PullRequestKind::Feature);
    }

    #[test]
    fn test_max_of() {
        assert_eq!(PullRequestKind::max_of(&[]), PullRequestKind::Maintenance);
        let prs = vec![labeled(&["Maintenance"]), labeled(&["Fix"]), labeled(&[])];
        assert_eq!(PullRequestKind::max_of(&prs), PullRequestKind::Fix);
    }

    #[test]
    fn test_has_label_is_exact() {
        let pr = labeled(&["core-plugins", "Core"]);
        assert!(!pr.has_label("core"));
        assert!(labeled(&["core"]).has_label("core"));
    }

    #[test]
    fn test_deserialize_gh_cli_shape() {
        let json = r#"{
            "number": 4236,
            "title": "Add compatibility mode switch",
            "body": "ChangeLog: Build system: X",
            "author": {"login": "octo", "name": "Florian"},
            "labels": [{"id": "LA_1", "name": "core", "color": "fff"}, {"name": "Feature"}]
        }"#;
        let pr: PullRequest = serde_json::from_str(json).unwrap();
        assert_eq!(pr.number, 4236);
        assert_eq!(pr.author_login(), "octo");
        assert_eq!(pr.body(), "ChangeLog: Build system: X");
        assert!(pr.has_label("core"));
        assert_eq!(pr.kind(), PullRequestKind::Feature);
    }

    #[test]
    fn test_deserialize_rest_shape_with_null_body() {
        let json = r#"{"number": 7, "body": null, "user": {"login": "hubot"}, "labels": []}"#;
        let pr: PullRequest = serde_json::from_str(json).unwrap();
        assert_eq!(pr.author_login(), "hubot");
        assert_eq!(pr.body(), "");
        assert_eq!(pr.title, "");
    }
}
