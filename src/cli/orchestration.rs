//! Main release workflow
//!
//! Ties the pure version and changelog logic to the repository and the pull
//! request records. Kept apart from `main.rs` so it can run against
//! [MockRepository](crate::git::MockRepository) in tests.

use anyhow::{bail, Result};
use chrono::NaiveDate;
use log::{debug, info};

use crate::boundary::BoundaryWarning;
use crate::domain::{Changelog, ChangelogEntry, PullRequest, Version};
use crate::error::ReleaseError;
use crate::git::Repository;
use crate::source::PullRequestSource;
use crate::ui;

/// Arguments for the release workflow
///
/// CLI flags and configuration already merged, so the workflow can be called
/// programmatically without depending on clap.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseWorkflowArgs {
    /// Branch the release is cut from
    pub branch: String,

    /// Remote used with `push`
    pub remote: String,

    /// ChangeLog file path inside the repository
    pub changelog_path: String,

    /// Previous release tag; detected from the branch history when `None`
    pub previous_tag: Option<String>,

    /// Release date written into the ChangeLog header
    pub date: NaiveDate,

    /// Compute and print everything, write nothing
    pub dry_run: bool,

    /// Push branch and tag after creating them
    pub push: bool,

    /// Skip confirmation prompts
    pub force: bool,
}

/// Result of a release that was cut (or would have been, in a dry run)
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    pub previous_tag: String,
    pub version: Version,
    pub tag: String,
    pub changelog: Changelog,
    /// Commit that updated the ChangeLog file
    pub changelog_commit: Option<String>,
    pub pushed: bool,
    pub dry_run: bool,
}

/// How a workflow run ended
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowOutcome {
    /// A release was cut, or planned in a dry run
    Released(WorkflowResult),
    /// Nothing qualifies for a release; not an error
    NothingToRelease(BoundaryWarning),
    /// The user declined the confirmation prompt
    Cancelled,
}

/// Main release workflow
///
/// 1. Resolve the previous release tag
/// 2. Collect the pull requests merged since then
/// 3. Infer the next version
/// 4. Build the changelog
/// 5. Commit the ChangeLog file, tag, and optionally push
pub fn run_release_workflow<R, S>(
    repo: &R,
    source: &S,
    args: &ReleaseWorkflowArgs,
) -> Result<WorkflowOutcome>
where
    R: Repository + ?Sized,
    S: PullRequestSource + ?Sized,
{
    let previous_tag = resolve_previous_tag(repo, args)?;
    info!("Previous release was at tag {:?}", previous_tag);
    let previous_version = Version::parse_tag(&previous_tag)?;

    let numbers = repo.merged_pull_requests_since(&previous_tag, &args.branch)?;
    info!("Found {} merged pull request(s)", numbers.len());
    if numbers.is_empty() {
        let warning = BoundaryWarning::NoMergedPullRequests {
            since_tag: previous_tag,
        };
        ui::display_boundary_warning(&warning);
        return Ok(WorkflowOutcome::NothingToRelease(warning));
    }

    let prs = fetch_pull_requests(source, &numbers)?;
    ui::display_pull_requests(&prs, &previous_tag);

    let version = match previous_version.next(&prs) {
        Ok(version) => version,
        Err(e) if e.is_nothing_to_release() => {
            let warning = BoundaryWarning::NothingToRelease {
                since_tag: previous_tag,
                merged: prs.len(),
            };
            ui::display_boundary_warning(&warning);
            return Ok(WorkflowOutcome::NothingToRelease(warning));
        }
        Err(e) => return Err(e.into()),
    };
    let tag = version.tag();
    info!("The next version is {}", version);
    ui::display_proposed_release(&previous_tag, &tag);

    let unmarked: Vec<u64> = prs
        .iter()
        .filter(|pr| ChangelogEntry::from_pull_request(pr).is_none())
        .map(|pr| pr.number)
        .collect();
    if !unmarked.is_empty() {
        ui::display_boundary_warning(&BoundaryWarning::MissingChangelogLine { numbers: unmarked });
    }

    let changelog = Changelog::new(args.date, version.clone(), &prs);
    ui::display_changelog(&changelog.markdown());

    let mut result = WorkflowResult {
        previous_tag,
        version,
        tag,
        changelog,
        changelog_commit: None,
        pushed: false,
        dry_run: args.dry_run,
    };

    if args.dry_run {
        ui::display_dry_run_plan(
            &args.changelog_path,
            &result.changelog.file_format(),
            &result.tag,
            args.push.then_some(args.remote.as_str()),
        );
        return Ok(WorkflowOutcome::Released(result));
    }

    if !args.force && !ui::confirm_action(&format!("Cut release {}?", result.tag))? {
        ui::display_status("Release cancelled by user.");
        return Ok(WorkflowOutcome::Cancelled);
    }

    let commit = update_changelog_file(repo, args, &result.changelog)?;
    ui::display_success(&format!(
        "Updated {} in commit {}",
        args.changelog_path, commit
    ));
    result.changelog_commit = Some(commit);

    repo.create_tag(&result.tag, &args.branch, &tag_message(&result.changelog))?;
    ui::display_success(&format!("Created tag: {}", result.tag));

    if args.push {
        ui::display_status(&format!("Pushing {} and {} to {}", args.branch, result.tag, args.remote));
        repo.push(&args.remote, &args.branch, &result.tag)?;
        ui::display_success(&format!("Pushed {} to {}", result.tag, args.remote));
        result.pushed = true;
    } else {
        ui::display_manual_push_instruction(&args.remote, &args.branch, &result.tag);
    }

    Ok(WorkflowOutcome::Released(result))
}

fn resolve_previous_tag<R: Repository + ?Sized>(
    repo: &R,
    args: &ReleaseWorkflowArgs,
) -> Result<String> {
    let detected = repo.latest_release_tag(&args.branch)?;
    debug!("Detected previous release tag: {:?}", detected);

    match (&args.previous_tag, detected) {
        (Some(tag), detected) => {
            if detected.as_deref() != Some(tag.as_str()) {
                ui::display_boundary_warning(&BoundaryWarning::PreviousTagOverride {
                    tag: tag.clone(),
                    detected,
                });
            }
            Ok(tag.clone())
        }
        (None, Some(tag)) => Ok(tag),
        (None, None) => bail!("no release found on branch '{}'", args.branch),
    }
}

fn fetch_pull_requests<S: PullRequestSource + ?Sized>(
    source: &S,
    numbers: &[u64],
) -> std::result::Result<Vec<PullRequest>, ReleaseError> {
    numbers
        .iter()
        .map(|number| {
            source.pull_request(*number)?.ok_or_else(|| {
                ReleaseError::pull_request(format!("no record for pull request #{}", number))
            })
        })
        .collect()
}

/// Prepend the long-form changelog to the ChangeLog file and commit it.
fn update_changelog_file<R: Repository + ?Sized>(
    repo: &R,
    args: &ReleaseWorkflowArgs,
    changelog: &Changelog,
) -> Result<String> {
    let previous = match repo.read_file(&args.branch, &args.changelog_path)? {
        Some(content) => content,
        None => {
            ui::display_boundary_warning(&BoundaryWarning::ChangelogFileMissing {
                path: args.changelog_path.clone(),
            });
            Vec::new()
        }
    };

    let content = changelog_file_content(changelog, &previous);
    let message = format!("Update ChangeLog for version {}.", changelog.version());

    Ok(repo.commit_file(&args.branch, &args.changelog_path, &content, &message)?)
}

/// New ChangeLog file: the release section, a blank line, then the old content.
pub fn changelog_file_content(changelog: &Changelog, previous: &[u8]) -> Vec<u8> {
    let mut content = changelog.file_format().into_bytes();
    content.push(b'\n');
    content.extend_from_slice(previous);
    content
}

/// Annotated tag message: a title line followed by the short-form changelog
pub fn tag_message(changelog: &Changelog) -> String {
    format!("Version {}\n\n{}", changelog.version(), changelog.markdown())
}
