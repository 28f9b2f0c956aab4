use anyhow::{Context, Result};
use clap::Parser;
use deploy_cash_config::{AppConfig, RepositoryConfig};
use deploy_cash_core::{ReleaseCoordinator, TrackingIssue};
use gh_client::GitHubClient;
use log::debug;
use std::process::ExitCode;

mod cli;
mod logger;

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(path) = logger::init(cli.command.needs_client()) {
        debug!("Logging to {}", path.display());
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::load(),
    };
    let repository = config.repository;

    if !cli.command.needs_client() {
        return run_offline(cli.command, repository);
    }

    // Load .env file if GITHUB_TOKEN not set
    if std::env::var("GITHUB_TOKEN").is_err() {
        match dotenvy::dotenv() {
            Ok(path) => debug!("Loaded .env file from: {:?}", path),
            Err(_) => debug!(".env file not found, will rely on environment variables"),
        }
    }

    let client = gh_client::connect(repository.api_host())
        .await
        .context("Failed to connect to GitHub")?;
    let coordinator = ReleaseCoordinator::new(client, repository);

    run_online(cli.command, &coordinator).await
}

/// Commands that only format output
fn run_offline(command: Command, repository: RepositoryConfig) -> Result<()> {
    match command {
        Command::Preview {
            tag,
            pull_requests,
            verified,
            blockers,
            resolved,
        } => {
            let body = deploy_cash_core::generate_body(
                &repository,
                &tag,
                &pull_requests,
                &verified,
                &blockers,
                &resolved,
            )?;
            print!("{}", body);
        }
        Command::ReleaseBody { numbers } => {
            println!(
                "{}",
                deploy_cash_core::release_notes::release_body(&repository, &numbers)
            );
        }
        other => anyhow::bail!("{:?} requires a GitHub connection", other),
    }
    Ok(())
}

async fn run_online<C: GitHubClient>(
    command: Command,
    coordinator: &ReleaseCoordinator<C>,
) -> Result<()> {
    match command {
        Command::Show { json } => {
            let issue = coordinator.find_open_tracking_issue().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&issue)?);
            } else {
                print_tracking_issue(&issue);
            }
        }
        Command::Create {
            title,
            tag,
            skip_automated,
            pull_requests,
        } => {
            let pull_requests = if skip_automated {
                coordinator
                    .exclude_automated_pull_requests(&pull_requests)
                    .await?
            } else {
                pull_requests
            };
            let issue = coordinator
                .create_tracking_issue(&title, tag.as_deref(), &pull_requests)
                .await?;
            println!("Created #{}: {}", issue.number, issue.html_url);
        }
        Command::Update {
            tag,
            pull_requests,
            blockers,
            skip_automated,
        } => {
            let pull_requests = if skip_automated {
                coordinator
                    .exclude_automated_pull_requests(&pull_requests)
                    .await?
            } else {
                pull_requests
            };
            let issue = coordinator
                .update_tracking_issue(tag.as_deref(), &pull_requests, &blockers)
                .await?;
            println!("Updated #{}: {}", issue.number, issue.html_url);
        }
        Command::NextTag => {
            println!("{}", coordinator.next_release_tag().await?);
        }
        other => return run_offline(other, coordinator.repository().clone()),
    }
    Ok(())
}

fn print_tracking_issue(issue: &TrackingIssue) {
    let mark = |checked: bool| if checked { 'x' } else { ' ' };

    println!("#{} {}", issue.number, issue.title);
    println!("{}", issue.html_url);
    println!("Release version: {}", issue.tag);

    println!();
    println!("Pull requests ({}):", issue.pull_requests.len());
    for entry in &issue.pull_requests {
        println!("  [{}] {}", mark(entry.checked), entry.reference.url());
    }

    if !issue.deploy_blockers.is_empty() {
        println!();
        println!("Deploy blockers ({}):", issue.deploy_blockers.len());
        for entry in &issue.deploy_blockers {
            println!("  [{}] {}", mark(entry.checked), entry.reference.url());
        }
    }
}
