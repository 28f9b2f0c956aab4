//! Issue and pull request references
//!
//! Extracts the number and kind of a GitHub issue or pull request from its
//! URL. Both the web form (`https://github.com/<owner>/<repo>/pull/<n>`) and
//! the API form (`https://api.github.com/repos/<owner>/<repo>/pulls/<n>`)
//! are accepted. Matching only looks at the path, so Enterprise hosts work
//! and query strings or fragments are ignored. URLs containing whitespace
//! or control characters are never references.

use crate::error::{DeployCashError, Result};
use deploy_cash_config::RepositoryConfig;
use regex::Regex;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

/// What a reference points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    Issue,
    PullRequest,
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceKind::Issue => write!(f, "issue"),
            ReferenceKind::PullRequest => write!(f, "pull request"),
        }
    }
}

/// A parsed issue or pull request URL
///
/// Issues and pull requests share one number space on GitHub, so two
/// references are equal when their numbers match. Kind, owner, repository
/// and URL are carried along but take no part in equality, hashing or
/// ordering.
#[derive(Debug, Clone, Serialize)]
pub struct Reference {
    kind: ReferenceKind,
    number: u64,
    owner: String,
    repo: String,
    url: String,
}

impl Reference {
    pub fn kind(&self) -> ReferenceKind {
        self.kind
    }

    pub fn number(&self) -> u64 {
        self.number
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Owner segment of the URL path
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Repository segment of the URL path
    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// Whether the URL points into the given repository (case-insensitive)
    pub fn belongs_to(&self, repository: &RepositoryConfig) -> bool {
        self.owner.eq_ignore_ascii_case(&repository.owner)
            && self.repo.eq_ignore_ascii_case(&repository.name)
    }

    pub fn is_pull_request(&self) -> bool {
        self.kind == ReferenceKind::PullRequest
    }
}

impl PartialEq for Reference {
    fn eq(&self, other: &Self) -> bool {
        self.number == other.number
    }
}

impl Eq for Reference {}

impl Hash for Reference {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.number.hash(state);
    }
}

impl PartialOrd for Reference {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Reference {
    fn cmp(&self, other: &Self) -> Ordering {
        self.number.cmp(&other.number)
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url)
    }
}

/// Parse a pull request URL
///
/// Fails with [`DeployCashError::InvalidReferenceKind`] for anything that is
/// not a pull request, issues included.
pub fn parse_pull_request_reference(url: &str) -> Result<Reference> {
    match_reference(pull_request_path(), ReferenceKind::PullRequest, url)
        .ok_or_else(|| DeployCashError::InvalidReferenceKind {
            url: url.to_string(),
            expected: ReferenceKind::PullRequest,
        })
}

/// Parse an issue URL
///
/// Fails with [`DeployCashError::InvalidReferenceKind`] for anything that is
/// not an issue, pull requests included.
pub fn parse_issue_reference(url: &str) -> Result<Reference> {
    match_reference(issue_path(), ReferenceKind::Issue, url)
        .ok_or_else(|| DeployCashError::InvalidReferenceKind {
            url: url.to_string(),
            expected: ReferenceKind::Issue,
        })
}

/// Parse a URL that may point at either an issue or a pull request
pub fn parse_either_reference(url: &str) -> Result<Reference> {
    parse_pull_request_reference(url)
        .or_else(|_| parse_issue_reference(url))
        .map_err(|_| DeployCashError::NotAReferenceUrl {
            url: url.to_string(),
        })
}

/// Web URL of a pull request in the configured repository
pub fn pull_request_url(repository: &RepositoryConfig, number: u64) -> String {
    format!("{}/pull/{}", repository.web_url(), number)
}

/// Web URL of an issue in the configured repository
pub fn issue_url(repository: &RepositoryConfig, number: u64) -> String {
    format!("{}/issues/{}", repository.web_url(), number)
}

fn pull_request_path() -> &'static Regex {
    static PULL_REQUEST_PATH: OnceLock<Regex> = OnceLock::new();
    PULL_REQUEST_PATH.get_or_init(|| {
        // /repos/<owner>/<repo>/pulls/<n> (API), /<owner>/<repo>/pull/<n> (web)
        Regex::new(r"^/(?:repos/([^/]+)/([^/]+)/pulls?|([^/]+)/([^/]+)/pull)/(\d+)(?:/\S*)?$")
            .unwrap()
    })
}

fn issue_path() -> &'static Regex {
    static ISSUE_PATH: OnceLock<Regex> = OnceLock::new();
    ISSUE_PATH.get_or_init(|| {
        Regex::new(r"^/(?:repos/)?([^/]+)/([^/]+)/issues/(\d+)(?:/\S*)?$").unwrap()
    })
}

/// Run a path pattern against the URL's path
///
/// Patterns capture owner, repository and number; alternative spellings of
/// the path repeat those three groups, so the last three that participated
/// in the match are used. The number must be positive.
fn match_reference(pattern: &Regex, kind: ReferenceKind, url: &str) -> Option<Reference> {
    if url.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return None;
    }

    let captures = pattern.captures(url_path(url))?;
    let groups: Vec<&str> = captures
        .iter()
        .skip(1)
        .flatten()
        .map(|group| group.as_str())
        .collect();
    let [owner, repo, number] = groups.as_slice() else {
        return None;
    };

    let number = number.parse::<u64>().ok().filter(|number| *number > 0)?;
    Some(Reference {
        kind,
        number,
        owner: owner.to_string(),
        repo: repo.to_string(),
        url: url.to_string(),
    })
}

/// Path component of a URL, without scheme, host, query or fragment
fn url_path(url: &str) -> &str {
    let without_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
    let without_query = without_scheme
        .split(['?', '#'])
        .next()
        .unwrap_or(without_scheme);
    without_query
        .find('/')
        .map_or("", |start| &without_query[start..])
}
