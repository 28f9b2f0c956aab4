//! Octocrab-based GitHub API client
//!
//! Direct implementation of the `GitHubClient` trait using the octocrab library.
//! This client makes real API calls without any caching.

use crate::client::GitHubClient;
use crate::types::{Issue, IssueUpdate, NewIssue, PullRequest, Tag};
use async_trait::async_trait;
use log::debug;
use octocrab::Octocrab;
use std::sync::Arc;

const PER_PAGE: u8 = 100;

/// Upper bound on pull requests fetched by `list_pull_requests`
const MAX_PULL_REQUESTS: usize = 100;

/// Direct GitHub API client using octocrab
#[derive(Debug, Clone)]
pub struct OctocrabClient {
    octocrab: Arc<Octocrab>,
}

impl OctocrabClient {
    /// Create a new client with the given octocrab instance
    pub fn new(octocrab: Arc<Octocrab>) -> Self {
        Self { octocrab }
    }

    /// Get a reference to the underlying octocrab instance
    pub fn octocrab(&self) -> &Octocrab {
        &self.octocrab
    }
}

#[async_trait]
impl GitHubClient for OctocrabClient {
    async fn list_open_issues_by_label(
        &self,
        owner: &str,
        repo: &str,
        label: &str,
    ) -> anyhow::Result<Vec<Issue>> {
        debug!("Listing open issues labeled {} for {}/{}", label, owner, repo);

        let labels = vec![label.to_string()];
        let mut issues = Vec::new();
        let mut page_num = 1u32;

        loop {
            let page = self
                .octocrab
                .issues(owner, repo)
                .list()
                .state(octocrab::params::State::Open)
                .labels(&labels)
                .per_page(PER_PAGE)
                .page(page_num)
                .send()
                .await?;

            let is_last_page = page.items.is_empty() || page.next.is_none();
            issues.extend(page.items.iter().map(convert_issue));

            if is_last_page {
                break;
            }

            page_num += 1;
        }

        debug!(
            "Found {} open issues labeled {} for {}/{}",
            issues.len(),
            label,
            owner,
            repo
        );
        Ok(issues)
    }

    async fn create_issue(
        &self,
        owner: &str,
        repo: &str,
        issue: &NewIssue,
    ) -> anyhow::Result<Issue> {
        debug!("Creating issue '{}' in {}/{}", issue.title, owner, repo);

        let created = self
            .octocrab
            .issues(owner, repo)
            .create(issue.title.clone())
            .body(issue.body.clone())
            .labels(issue.labels.clone())
            .assignees(issue.assignees.clone())
            .send()
            .await?;

        debug!("Created issue #{} in {}/{}", created.number, owner, repo);
        Ok(convert_issue(&created))
    }

    async fn update_issue(
        &self,
        owner: &str,
        repo: &str,
        issue_number: u64,
        update: &IssueUpdate,
    ) -> anyhow::Result<Issue> {
        debug!("Updating issue #{} in {}/{}", issue_number, owner, repo);

        let issues = self.octocrab.issues(owner, repo);
        let mut request = issues.update(issue_number);
        if let Some(title) = &update.title {
            request = request.title(title);
        }
        if let Some(body) = &update.body {
            request = request.body(body);
        }

        let updated = request.send().await?;
        Ok(convert_issue(&updated))
    }

    async fn list_tags(&self, owner: &str, repo: &str) -> anyhow::Result<Vec<Tag>> {
        debug!("Listing tags for {}/{}", owner, repo);

        let mut tags = Vec::new();
        let mut page_num = 1u32;

        loop {
            let page = self
                .octocrab
                .repos(owner, repo)
                .list_tags()
                .per_page(PER_PAGE)
                .page(page_num)
                .send()
                .await?;

            let is_last_page = page.items.is_empty() || page.next.is_none();
            tags.extend(page.items.into_iter().map(|tag| Tag { name: tag.name }));

            if is_last_page {
                break;
            }

            page_num += 1;
        }

        debug!("Fetched {} tags for {}/{}", tags.len(), owner, repo);
        Ok(tags)
    }

    async fn list_pull_requests(
        &self,
        owner: &str,
        repo: &str,
    ) -> anyhow::Result<Vec<PullRequest>> {
        debug!("Fetching PRs for {}/{}", owner, repo);

        let mut prs = Vec::new();
        let mut page_num = 1u32;

        loop {
            let page = self
                .octocrab
                .pulls(owner, repo)
                .list()
                .state(octocrab::params::State::All)
                .per_page(PER_PAGE)
                .page(page_num)
                .send()
                .await?;
            let page_is_empty = page.items.is_empty();

            for pr in page.items {
                if prs.len() >= MAX_PULL_REQUESTS {
                    break;
                }
                prs.push(convert_pull_request(&pr));
            }

            if prs.len() >= MAX_PULL_REQUESTS || page_is_empty || page.next.is_none() {
                break;
            }

            page_num += 1;
        }

        debug!("Fetched {} PRs for {}/{}", prs.len(), owner, repo);
        Ok(prs)
    }
}

/// Convert octocrab Issue to our Issue type
fn convert_issue(issue: &octocrab::models::issues::Issue) -> Issue {
    Issue {
        number: issue.number,
        title: issue.title.clone(),
        body: issue.body.clone(),
        labels: issue.labels.iter().map(|l| l.name.clone()).collect(),
        url: issue.url.to_string(),
        html_url: issue.html_url.to_string(),
        is_pull_request: issue.pull_request.is_some(),
    }
}

/// Convert octocrab PullRequest to our PullRequest type
fn convert_pull_request(pr: &octocrab::models::pulls::PullRequest) -> PullRequest {
    PullRequest {
        number: pr.number,
        title: pr.title.clone().unwrap_or_default(),
        author: pr
            .user
            .as_ref()
            .map(|u| u.login.clone())
            .unwrap_or_else(|| "unknown".to_string()),
        labels: pr
            .labels
            .as_ref()
            .map(|labels| labels.iter().map(|l| l.name.clone()).collect())
            .unwrap_or_default(),
        html_url: pr
            .html_url
            .as_ref()
            .map(|u| u.to_string())
            .unwrap_or_default(),
    }
}
