//! Error types for checklist coordination

use crate::reference::ReferenceKind;
use thiserror::Error;

/// Everything that can go wrong while maintaining the tracking issue
///
/// None of these are retried internally. Reference errors are caller
/// mistakes, body and tracking issue errors mean the repository is not in
/// the state the checklist relies on and need a human.
#[derive(Debug, Error)]
pub enum DeployCashError {
    /// URL does not point at the expected kind of resource
    #[error("Provided URL {url} is not a GitHub {expected}")]
    InvalidReferenceKind { url: String, expected: ReferenceKind },

    /// URL points at neither an issue nor a pull request
    #[error("Provided URL {url} is not a valid GitHub issue or pull request")]
    NotAReferenceUrl { url: String },

    /// Tracking issue body has no recoverable release version
    #[error("tracking issue body is malformed: {reason}")]
    MalformedChecklistBody { reason: String },

    /// Release tag supplied by the caller is not `MAJOR.MINOR.PATCH-BUILD`
    #[error("release tag '{tag}' is not of the form MAJOR.MINOR.PATCH-BUILD")]
    InvalidTag { tag: String },

    /// Latest tag's build number cannot be incremented
    #[error("build number of tag {tag} cannot be incremented")]
    BuildNumberExhausted { tag: String },

    /// Repository has no version tag to continue from
    #[error("no version tags found, the first release tag has to be created by hand")]
    NoTagsFound,

    #[error("unable to find an open {label} issue")]
    NoTrackingIssueFound { label: String },

    #[error("found {count} open {label} issues, expected exactly one")]
    AmbiguousTrackingIssue { label: String, count: usize },

    /// Failure reported by the GitHub client, passed through unmodified
    #[error(transparent)]
    Client(#[from] anyhow::Error),
}

pub type Result<T, E = DeployCashError> = std::result::Result<T, E>;
