use collectd_releaser::boundary::BoundaryWarning;
use collectd_releaser::ui;

// ============================================================================
// BoundaryWarning Display Tests
// ============================================================================

#[test]
fn test_boundary_warning_no_merged_pull_requests_display() {
    let warning = BoundaryWarning::NoMergedPullRequests {
        since_tag: "collectd-6.0.0".to_string(),
    };

    let display_msg = warning.to_string();
    assert!(
        display_msg.contains("No pull requests merged"),
        "Message should mention missing merges, got: {}",
        display_msg
    );
    assert!(
        display_msg.contains("collectd-6.0.0"),
        "Message should contain the tag, got: {}",
        display_msg
    );
}

#[test]
fn test_boundary_warning_nothing_to_release_display() {
    let warning = BoundaryWarning::NothingToRelease {
        since_tag: "collectd-6.0.1".to_string(),
        merged: 3,
    };

    let display_msg = warning.to_string();
    assert!(display_msg.starts_with("3 pull request(s)"), "got: {}", display_msg);
    assert!(display_msg.contains("Feature or Fix"), "got: {}", display_msg);
}

#[test]
fn test_boundary_warning_missing_changelog_line_lists_numbers() {
    let warning = BoundaryWarning::MissingChangelogLine {
        numbers: vec![4240, 4251],
    };

    assert_eq!(
        warning.to_string(),
        "No 'ChangeLog: ' line in pull request(s) #4240, #4251"
    );
}

#[test]
fn test_boundary_warning_changelog_file_missing_display() {
    let warning = BoundaryWarning::ChangelogFileMissing {
        path: "ChangeLog".to_string(),
    };

    assert_eq!(
        warning.to_string(),
        "File 'ChangeLog' does not exist and will be created"
    );
}

#[test]
fn test_boundary_warning_previous_tag_override_display() {
    let detected = BoundaryWarning::PreviousTagOverride {
        tag: "collectd-6.0.0".to_string(),
        detected: Some("collectd-6.0.1".to_string()),
    };
    assert_eq!(
        detected.to_string(),
        "Using previous tag 'collectd-6.0.0' instead of detected 'collectd-6.0.1'"
    );

    let undetected = BoundaryWarning::PreviousTagOverride {
        tag: "collectd-6.0.0".to_string(),
        detected: None,
    };
    assert!(undetected.to_string().contains("no release tag found"));
}

// ============================================================================
// Display Function Tests
// ============================================================================

#[test]
fn test_display_boundary_warnings_do_not_panic() {
    let warnings = vec![
        BoundaryWarning::NoMergedPullRequests {
            since_tag: "collectd-6.0.0".to_string(),
        },
        BoundaryWarning::MissingChangelogLine { numbers: vec![] },
        BoundaryWarning::ChangelogFileMissing {
            path: "ChangeLog".to_string(),
        },
    ];

    for warning in &warnings {
        ui::display_boundary_warning(warning);
    }
}

#[test]
fn test_display_dry_run_plan_does_not_panic() {
    ui::display_dry_run_plan(
        "ChangeLog",
        "2024-01-26, Version 6.1.0\n\t* Build system: X. Thanks to @octo. #4236\n",
        "collectd-6.1.0",
        Some("origin"),
    );
    ui::display_dry_run_plan("ChangeLog", "", "collectd-6.1.0", None);
}
