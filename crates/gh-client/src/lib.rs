//! GitHub API client capability
//!
//! This crate provides the trait-based GitHub API client that the staging
//! deploy checklist is built on. The checklist logic only ever talks to the
//! `GitHubClient` trait; `OctocrabClient` is the production implementation
//! and tests substitute their own.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │              GitHubClient trait                  │
//! │  - list_open_issues_by_label()                   │
//! │  - create_issue() / update_issue()               │
//! │  - list_tags() / list_pull_requests()            │
//! └─────────────────────────────────────────────────┘
//!                        │
//!        ┌───────────────┴───────────────┐
//!        ▼                               ▼
//! ┌─────────────────┐         ┌─────────────────────┐
//! │ OctocrabClient  │         │ test doubles         │
//! │ (direct API)    │         │ (recording mocks)    │
//! └─────────────────┘         └─────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use gh_client::GitHubClient;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = gh_client::connect(None).await?;
//! let tags = client.list_tags("Expensify", "Expensify.cash").await?;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod octocrab_client;
pub mod types;

pub use deploy_cash_config::DEFAULT_HOST;

pub use auth::{api_base_url, connect, TokenResolver};
pub use client::GitHubClient;
pub use octocrab_client::OctocrabClient;
pub use types::{Issue, IssueUpdate, NewIssue, PullRequest, Tag};

// Re-export octocrab so consumers don't need to depend on it directly
pub use octocrab;
