use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::Parser;
use log::debug;

use collectd_releaser::cli::{run_release_workflow, ReleaseWorkflowArgs, WorkflowOutcome};
use collectd_releaser::config;
use collectd_releaser::git::Git2Repository;
use collectd_releaser::source::JsonPullRequestSource;
use collectd_releaser::ui;

#[derive(clap::Parser)]
#[command(
    name = "collectd-releaser",
    version,
    about = "Cut a collectd release from the pull requests merged since the last one"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(long, help = "Path inside the git repository to release")]
    repo: Option<PathBuf>,

    #[arg(short, long, help = "Branch to cut the release from")]
    branch: Option<String>,

    #[arg(long, help = "Remote to push the release to")]
    remote: Option<String>,

    #[arg(long, help = "JSON export of the merged pull requests")]
    pull_requests: Option<PathBuf>,

    #[arg(long, help = "Path of the ChangeLog file inside the repository")]
    changelog: Option<String>,

    #[arg(long, help = "Previous release tag, detected from history if omitted")]
    previous_tag: Option<String>,

    #[arg(long, help = "Release date (YYYY-MM-DD), defaults to today")]
    date: Option<NaiveDate>,

    #[arg(
        long,
        default_value_t = true,
        action = clap::ArgAction::Set,
        help = "Preview the release without writing anything"
    )]
    dry_run: bool,

    #[arg(long, help = "Push the branch and the new tag to the remote")]
    push: bool,

    #[arg(short, long, help = "Skip confirmation prompts")]
    force: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    // Load configuration
    let config = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&format!("Error loading config: {}", e));
            std::process::exit(1);
        }
    };

    let repo_path = args.repo.unwrap_or(config.repository.path);
    let pull_requests_path = args.pull_requests.unwrap_or(config.pull_requests.path);

    let repo = match Git2Repository::open(&repo_path) {
        Ok(repo) => repo,
        Err(e) => {
            ui::display_error(&format!("Git repository error: {}", e));
            std::process::exit(1);
        }
    };

    let source = match JsonPullRequestSource::load(&pull_requests_path) {
        Ok(source) => source,
        Err(e) => {
            ui::display_error(&format!(
                "Failed to load pull requests from '{}': {}",
                pull_requests_path.display(),
                e
            ));
            std::process::exit(1);
        }
    };

    let workflow_args = ReleaseWorkflowArgs {
        branch: args.branch.unwrap_or(config.repository.branch),
        remote: args.remote.unwrap_or(config.repository.remote),
        changelog_path: args.changelog.unwrap_or(config.changelog.path),
        previous_tag: args.previous_tag,
        date: args
            .date
            .unwrap_or_else(|| chrono::Local::now().date_naive()),
        dry_run: args.dry_run,
        push: args.push,
        force: args.force,
    };
    debug!("Workflow arguments: {:?}", workflow_args);

    match run_release_workflow(&repo, &source, &workflow_args) {
        Ok(WorkflowOutcome::Released(result)) if result.dry_run => {
            println!(
                "\n\x1b[32m✓\x1b[0m Dry run complete, {} would be released from {}\n",
                result.tag, workflow_args.branch
            );
        }
        Ok(WorkflowOutcome::Released(result)) => {
            println!(
                "\n\x1b[32m✓\x1b[0m Released {} from branch {}\n",
                result.tag, workflow_args.branch
            );
        }
        Ok(WorkflowOutcome::NothingToRelease(_)) => {
            ui::display_status("Nothing to release.");
        }
        Ok(WorkflowOutcome::Cancelled) => {}
        Err(e) => {
            ui::display_error(&format!("{:#}", e));
            std::process::exit(1);
        }
    }

    Ok(())
}
