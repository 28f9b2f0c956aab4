//! Staging deploy checklist
//!
//! Keeps a single GitHub issue (the tracking issue) in sync with the pull
//! requests and deploy blockers of the release currently on staging. The
//! issue body is a markdown checklist and is the only state there is; every
//! operation reads it, merges into it and writes it back.
//!
//! # Layout
//!
//! - [`reference`]: issue and pull request URLs
//! - [`checklist`]: encoding and decoding of the tracking issue body
//! - [`tag`]: next staging tag from the repository's tags
//! - [`release_notes`]: pull request list for a published release
//! - [`coordinator`]: fetch, merge and submit against the GitHub client
//!
//! # Example
//!
//! ```rust,no_run
//! use deploy_cash_config::RepositoryConfig;
//! use deploy_cash_core::ReleaseCoordinator;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = gh_client::connect(None).await?;
//! let coordinator = ReleaseCoordinator::new(client, RepositoryConfig::default());
//!
//! let issue = coordinator
//!     .update_tracking_issue(
//!         None,
//!         &["https://github.com/Expensify/Expensify.cash/pull/24".to_string()],
//!         &[],
//!     )
//!     .await?;
//! println!("Updated {}", issue.html_url);
//! # Ok(())
//! # }
//! ```

pub mod checklist;
pub mod coordinator;
pub mod error;
pub mod reference;
pub mod release_notes;
pub mod tag;

pub use checklist::{BodyTemplate, Checklist, ChecklistEntry};
pub use coordinator::{generate_body, ReleaseCoordinator, TrackingIssue, TrackingIssueLookup};
pub use error::{DeployCashError, Result};
pub use reference::{
    parse_either_reference, parse_issue_reference, parse_pull_request_reference, Reference,
    ReferenceKind,
};
pub use tag::{next_tag, validate_release_tag, VersionTag};
