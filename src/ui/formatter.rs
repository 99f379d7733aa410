//! Pure formatting functions for UI output.
//!
//! This module contains all display/formatting logic separated from user interaction.

use crate::boundary::BoundaryWarning;
use crate::domain::PullRequest;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("\x1b[31mERROR:\x1b[0m {}", message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("\x1b[32m✓\x1b[0m {}", message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("\x1b[33m→\x1b[0m {}", message);
}

/// Display a boundary warning to the user.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("\x1b[33m⚠ WARNING:\x1b[0m {}", warning);
}

/// One line per merged pull request: number, kind and title.
pub fn format_pull_request_line(pr: &PullRequest) -> String {
    let title = if pr.title.chars().count() > 60 {
        let short: String = pr.title.chars().take(60).collect();
        format!("{}…", short)
    } else {
        pr.title.clone()
    };
    format!("#{} [{}] {}", pr.number, pr.kind(), title)
}

/// Display the pull requests merged since the previous release.
///
/// Shows at most 20 entries followed by a count of the remainder.
pub fn display_pull_requests(prs: &[PullRequest], since_tag: &str) {
    println!(
        "\n\x1b[1mPull requests merged since '{}'\x1b[0m",
        since_tag
    );

    for pr in prs.iter().take(20) {
        println!("  * {}", format_pull_request_line(pr));
    }

    if prs.len() > 20 {
        println!("  ... and {} more pull requests", prs.len() - 20);
    }
}

/// Display the release about to be cut.
pub fn display_proposed_release(previous_tag: &str, next_tag: &str) {
    println!("\n\x1b[1mProposed Release:\x1b[0m");
    println!("  From: \x1b[31m{}\x1b[0m", previous_tag);
    println!("  To:   \x1b[32m{}\x1b[0m", next_tag);
}

/// Display the short-form changelog.
pub fn display_changelog(markdown: &str) {
    println!("\n\x1b[1mChangeLog:\x1b[0m\n{}", markdown);
}

/// Display what a non-dry run would do.
pub fn display_dry_run_plan(changelog_path: &str, file_format: &str, tag: &str, push_to: Option<&str>) {
    display_status("Dry run, nothing is written:");
    println!("  Step 1: prepend to '{}':\n", changelog_path);
    for line in file_format.lines() {
        println!("    {}", line);
    }
    println!("\n  Step 2: create annotated tag {}", tag);
    match push_to {
        Some(remote) => println!("  Step 3: push branch and {} to {}", tag, remote),
        None => println!("  Step 3: (skipped) push, pass --push to enable"),
    }
}

/// Display manual push instruction for a release.
pub fn display_manual_push_instruction(remote: &str, branch: &str, tag: &str) {
    println!(
        "\n\x1b[33m→\x1b[0m To publish this release later, run:\n  \x1b[36mgit push {} {} {}\x1b[0m",
        remote, branch, tag
    );
}
