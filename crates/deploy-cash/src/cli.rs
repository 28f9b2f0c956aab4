use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Maintain the staging deploy checklist issue
#[derive(Debug, Parser)]
#[command(name = "deploy-cash")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Read configuration from this file instead of the default lookup
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the open tracking issue
    Show {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Open a new tracking issue for a staging deploy
    Create {
        /// Title of the new issue
        #[arg(long)]
        title: String,
        /// Staging tag (default: next build of the latest tag)
        #[arg(long)]
        tag: Option<String>,
        /// Leave out version bump pull requests opened by the automation account
        #[arg(long)]
        skip_automated: bool,
        /// Pull requests deployed with this release
        #[arg(value_name = "PR_URL")]
        pull_requests: Vec<String>,
    },
    /// Add pull requests or deploy blockers to the open tracking issue
    Update {
        /// Replace the staging tag
        #[arg(long)]
        tag: Option<String>,
        /// Pull request to add (repeatable)
        #[arg(long = "pr", value_name = "URL")]
        pull_requests: Vec<String>,
        /// Issue or pull request blocking the deploy (repeatable)
        #[arg(long = "blocker", value_name = "URL")]
        blockers: Vec<String>,
        /// Leave out version bump pull requests opened by the automation account
        #[arg(long)]
        skip_automated: bool,
    },
    /// Print a tracking issue body without contacting GitHub
    Preview {
        /// Staging tag
        #[arg(long)]
        tag: String,
        /// Pull request in the release (repeatable)
        #[arg(long = "pr", value_name = "URL")]
        pull_requests: Vec<String>,
        /// Pull request to mark as verified (repeatable)
        #[arg(long = "verified", value_name = "URL")]
        verified: Vec<String>,
        /// Deploy blocker (repeatable)
        #[arg(long = "blocker", value_name = "URL")]
        blockers: Vec<String>,
        /// Deploy blocker to mark as resolved (repeatable)
        #[arg(long = "resolved", value_name = "URL")]
        resolved: Vec<String>,
    },
    /// Print the tag for the next staging deploy
    NextTag,
    /// Print release notes for the given pull request numbers
    ReleaseBody {
        #[arg(value_name = "NUMBER", required = true)]
        numbers: Vec<u64>,
    },
}

impl Command {
    /// Whether the command needs an authenticated GitHub client
    pub fn needs_client(&self) -> bool {
        !matches!(self, Command::Preview { .. } | Command::ReleaseBody { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("deploy-cash").chain(args.iter().copied()))
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_create() {
        let cli = parse(&[
            "create",
            "--title",
            "Deploy Checklist: New Expensify 1.0.2-12",
            "--skip-automated",
            "https://github.com/Expensify/Expensify.cash/pull/2",
            "https://github.com/Expensify/Expensify.cash/pull/1",
        ])
        .unwrap();

        match cli.command {
            Command::Create {
                title,
                tag,
                skip_automated,
                pull_requests,
            } => {
                assert_eq!(title, "Deploy Checklist: New Expensify 1.0.2-12");
                assert_eq!(tag, None);
                assert!(skip_automated);
                assert_eq!(pull_requests.len(), 2);
            }
            other => panic!("expected create, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_update_repeated_flags() {
        let cli = parse(&[
            "update",
            "--pr",
            "https://github.com/o/r/pull/24",
            "--pr",
            "https://github.com/o/r/pull/25",
            "--blocker",
            "https://github.com/o/r/issues/3",
            "--config",
            "/tmp/deploy-cash.toml",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("/tmp/deploy-cash.toml")));
        match cli.command {
            Command::Update {
                tag,
                pull_requests,
                blockers,
                skip_automated,
            } => {
                assert_eq!(tag, None);
                assert_eq!(pull_requests.len(), 2);
                assert_eq!(blockers, vec!["https://github.com/o/r/issues/3"]);
                assert!(!skip_automated);
            }
            other => panic!("expected update, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_missing_arguments() {
        assert!(parse(&["create"]).is_err());
        assert!(parse(&["preview"]).is_err());
        assert!(parse(&["release-body"]).is_err());
        assert!(parse(&["release-body", "twelve"]).is_err());
    }

    #[test]
    fn test_offline_commands() {
        let preview = parse(&["preview", "--tag", "1.0.2-12"]).unwrap();
        let release = parse(&["release-body", "1", "2"]).unwrap();
        let next_tag = parse(&["next-tag"]).unwrap();

        assert!(!preview.command.needs_client());
        assert!(!release.command.needs_client());
        assert!(next_tag.command.needs_client());
    }
}
