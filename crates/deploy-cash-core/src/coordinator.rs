//! Release coordination against the staging deploy tracking issue
//!
//! There is exactly one open issue carrying the tracking label while a
//! release is on staging. The coordinator finds it, creates it, or folds new
//! pull requests and deploy blockers into it.
//!
//! An update runs `Fetch → Decode → Merge → Encode → Submit`. Input URLs are
//! validated before anything is fetched, and nothing is written unless every
//! earlier step succeeded. The cycle is not transactional: a second writer
//! between Fetch and Submit loses its update. Callers that may run
//! concurrently have to serialize themselves.

use crate::checklist::{self, BodyTemplate, Checklist, ChecklistEntry};
use crate::error::{DeployCashError, Result};
use crate::reference::{parse_either_reference, parse_pull_request_reference, Reference};
use crate::release_notes;
use crate::tag::{self, validate_release_tag};
use deploy_cash_config::RepositoryConfig;
use gh_client::{GitHubClient, Issue, IssueUpdate, NewIssue};
use log::{debug, info};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};

/// The open tracking issue with its decoded checklist
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackingIssue {
    pub number: u64,
    /// API URL of the issue
    pub url: String,
    pub html_url: String,
    pub title: String,
    pub labels: BTreeSet<String>,
    pub tag: String,
    pub pull_requests: Vec<ChecklistEntry>,
    pub deploy_blockers: Vec<ChecklistEntry>,
}

impl TrackingIssue {
    /// Decode an issue fetched from GitHub
    ///
    /// An issue without a body has no release version and is malformed.
    pub fn from_issue(issue: Issue) -> Result<Self> {
        let Checklist {
            tag,
            pull_requests,
            deploy_blockers,
        } = checklist::decode(issue.body.as_deref().unwrap_or_default())?;

        Ok(Self {
            number: issue.number,
            url: issue.url,
            html_url: issue.html_url,
            title: issue.title,
            labels: issue.labels.into_iter().collect(),
            tag,
            pull_requests,
            deploy_blockers,
        })
    }
}

/// Outcome of looking for the single open tracking issue
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackingIssueLookup {
    Found(Issue),
    NotFound,
    Ambiguous(usize),
}

impl TrackingIssueLookup {
    /// Pick the tracking issue out of a label query result
    ///
    /// Pull requests returned by the issues endpoint do not count.
    pub fn select(issues: Vec<Issue>) -> Self {
        let mut issues: Vec<Issue> = issues
            .into_iter()
            .filter(|issue| !issue.is_pull_request)
            .collect();

        match issues.len() {
            0 => Self::NotFound,
            1 => issues.pop().map_or(Self::NotFound, Self::Found),
            count => Self::Ambiguous(count),
        }
    }
}

/// Maintains the staging deploy tracking issue of one repository
pub struct ReleaseCoordinator<C> {
    client: C,
    repository: RepositoryConfig,
}

impl<C: GitHubClient> ReleaseCoordinator<C> {
    pub fn new(client: C, repository: RepositoryConfig) -> Self {
        Self { client, repository }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn repository(&self) -> &RepositoryConfig {
        &self.repository
    }

    fn template(&self) -> BodyTemplate {
        BodyTemplate::for_repository(&self.repository)
    }

    /// Fetch and decode the single open tracking issue
    ///
    /// Fails with [`DeployCashError::NoTrackingIssueFound`] or
    /// [`DeployCashError::AmbiguousTrackingIssue`] unless exactly one open
    /// issue carries the tracking label.
    pub async fn find_open_tracking_issue(&self) -> Result<TrackingIssue> {
        let label = &self.repository.tracking_label;
        let issues = self
            .client
            .list_open_issues_by_label(&self.repository.owner, &self.repository.name, label)
            .await?;

        match TrackingIssueLookup::select(issues) {
            TrackingIssueLookup::Found(issue) => {
                debug!("Found {} issue #{}", label, issue.number);
                TrackingIssue::from_issue(issue)
            }
            TrackingIssueLookup::NotFound => Err(DeployCashError::NoTrackingIssueFound {
                label: label.clone(),
            }),
            TrackingIssueLookup::Ambiguous(count) => Err(DeployCashError::AmbiguousTrackingIssue {
                label: label.clone(),
                count,
            }),
        }
    }

    /// Tag for the next staging deploy, derived from the repository's tags
    pub async fn next_release_tag(&self) -> Result<String> {
        let tags = self
            .client
            .list_tags(&self.repository.owner, &self.repository.name)
            .await?;
        tag::next_tag(tags.iter().map(|tag| tag.name.as_str()))
    }

    /// Open a new tracking issue
    ///
    /// Every pull request starts unverified and there are no deploy
    /// blockers. Without a `tag` the next staging tag is computed from the
    /// repository's tags.
    pub async fn create_tracking_issue(
        &self,
        title: &str,
        tag: Option<&str>,
        pr_urls: &[String],
    ) -> Result<Issue> {
        let tag = tag.map(validate_release_tag).transpose()?;
        let pull_requests = parse_all(pr_urls, parse_pull_request_reference)?;

        let tag = match tag {
            Some(tag) => tag.to_string(),
            None => self.next_release_tag().await?,
        };

        let checklist = Checklist {
            tag,
            pull_requests: checklist::merge_references(&[], pull_requests),
            deploy_blockers: Vec::new(),
        };

        let new_issue = NewIssue {
            title: title.to_string(),
            body: checklist::encode(&checklist, &self.template()),
            labels: vec![self.repository.tracking_label.clone()],
            assignees: self.repository.assignees.clone(),
        };

        info!(
            "Creating {} issue for {} with {} pull requests",
            self.repository.tracking_label,
            checklist.tag,
            checklist.pull_requests.len()
        );
        let issue = self
            .client
            .create_issue(&self.repository.owner, &self.repository.name, &new_issue)
            .await?;
        Ok(issue)
    }

    /// Fold new pull requests and deploy blockers into the tracking issue
    ///
    /// The tag is replaced only when one is given; otherwise the issue keeps
    /// its current tag. Existing check marks are preserved and new entries
    /// start unchecked. Passing nothing rewrites the body unchanged.
    pub async fn update_tracking_issue(
        &self,
        tag: Option<&str>,
        new_pr_urls: &[String],
        new_blocker_urls: &[String],
    ) -> Result<Issue> {
        let tag = tag.map(validate_release_tag).transpose()?;
        let new_pull_requests = parse_all(new_pr_urls, parse_pull_request_reference)?;
        let new_blockers = parse_all(new_blocker_urls, parse_either_reference)?;

        let current = self.find_open_tracking_issue().await?;

        let checklist = Checklist {
            tag: tag.map_or_else(|| current.tag.clone(), str::to_string),
            pull_requests: checklist::merge_references(&current.pull_requests, new_pull_requests),
            deploy_blockers: checklist::merge_references(&current.deploy_blockers, new_blockers),
        };
        let body = checklist::encode(&checklist, &self.template());

        info!(
            "Updating {} issue #{} for {}: {} pull requests, {} deploy blockers",
            self.repository.tracking_label,
            current.number,
            checklist.tag,
            checklist.pull_requests.len(),
            checklist.deploy_blockers.len()
        );
        let issue = self
            .client
            .update_issue(
                &self.repository.owner,
                &self.repository.name,
                current.number,
                &IssueUpdate::body(body),
            )
            .await?;
        Ok(issue)
    }

    /// Render a tracking issue body without touching GitHub
    ///
    /// See [`generate_body`](crate::coordinator::generate_body).
    pub fn generate_body(
        &self,
        tag: &str,
        pr_urls: &[String],
        verified_urls: &[String],
        blocker_urls: &[String],
        resolved_urls: &[String],
    ) -> Result<String> {
        generate_body(
            &self.repository,
            tag,
            pr_urls,
            verified_urls,
            blocker_urls,
            resolved_urls,
        )
    }

    /// Drop pull requests opened by the automation account
    ///
    /// Version bump pull requests are authored by the configured automation
    /// account and carry the automation label; they have nothing to verify.
    /// Only URLs pointing into the configured repository are compared. The
    /// input order of the remaining URLs is kept.
    pub async fn exclude_automated_pull_requests(&self, pr_urls: &[String]) -> Result<Vec<String>> {
        let references = parse_all(pr_urls, parse_pull_request_reference)?;

        let automated: HashSet<u64> = self
            .client
            .list_pull_requests(&self.repository.owner, &self.repository.name)
            .await?
            .into_iter()
            .filter(|pr| {
                pr.author == self.repository.automation_author
                    && pr.has_label(&self.repository.automation_label)
            })
            .map(|pr| pr.number)
            .collect();

        Ok(pr_urls
            .iter()
            .zip(references)
            .filter(|(url, reference)| {
                let is_automated = reference.belongs_to(&self.repository)
                    && automated.contains(&reference.number());
                if is_automated {
                    debug!("Excluding automated pull request {}", url);
                }
                !is_automated
            })
            .map(|(url, _)| url.clone())
            .collect())
    }

    /// Release notes listing the given pull requests
    pub fn release_body(&self, pr_numbers: &[u64]) -> String {
        release_notes::release_body(&self.repository, pr_numbers)
    }
}

/// Render a tracking issue body for the given repository
///
/// A pull request is checked when it also appears in `verified_urls`, a
/// deploy blocker when it also appears in `resolved_urls`.
pub fn generate_body(
    repository: &RepositoryConfig,
    tag: &str,
    pr_urls: &[String],
    verified_urls: &[String],
    blocker_urls: &[String],
    resolved_urls: &[String],
) -> Result<String> {
    let tag = validate_release_tag(tag)?;
    let verified: HashSet<Reference> = parse_all(verified_urls, parse_pull_request_reference)?
        .into_iter()
        .collect();
    let resolved: HashSet<Reference> = parse_all(resolved_urls, parse_either_reference)?
        .into_iter()
        .collect();

    let flag = |references: Vec<Reference>, checked: &HashSet<Reference>| {
        checklist::normalize_entries(references.into_iter().map(|reference| {
            let is_checked = checked.contains(&reference);
            ChecklistEntry::new(reference, is_checked)
        }))
    };

    let checklist = Checklist {
        tag: tag.to_string(),
        pull_requests: flag(parse_all(pr_urls, parse_pull_request_reference)?, &verified),
        deploy_blockers: flag(parse_all(blocker_urls, parse_either_reference)?, &resolved),
    };
    Ok(checklist::encode(
        &checklist,
        &BodyTemplate::for_repository(repository),
    ))
}

fn parse_all(urls: &[String], parse: fn(&str) -> Result<Reference>) -> Result<Vec<Reference>> {
    urls.iter().map(|url| parse(url)).collect()
}
