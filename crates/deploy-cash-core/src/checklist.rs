//! Tracking issue body codec
//!
//! The body of the tracking issue is the only durable record of which pull
//! requests were verified and which deploy blockers were resolved. This
//! module is the single place that knows its layout:
//!
//! ```text
//! **Release Version:** `1.0.1-47`
//! **Compare Changes:** https://github.com/<owner>/<repo>/compare/production...staging
//!
//! **This release contains changes from the following pull requests:**
//! - [ ] https://github.com/<owner>/<repo>/pull/21
//! - [x] https://github.com/<owner>/<repo>/pull/22
//!
//! **Deploy Blockers:**
//! - [ ] https://github.com/<owner>/<repo>/issues/1
//!
//! cc @<team>
//! ```
//!
//! Encoding always emits `\r\n` line endings, which is what GitHub stores
//! for bodies edited in the browser. Decoding accepts `\r\n` and `\n`.

use crate::error::{DeployCashError, Result};
use crate::reference::{parse_either_reference, parse_pull_request_reference, Reference};
use deploy_cash_config::RepositoryConfig;
use log::{debug, warn};
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::OnceLock;

pub const RELEASE_VERSION_MARKER: &str = "**Release Version:**";
pub const COMPARE_CHANGES_MARKER: &str = "**Compare Changes:**";
pub const PULL_REQUEST_HEADER: &str =
    "**This release contains changes from the following pull requests:**";
pub const DEPLOY_BLOCKER_HEADER: &str = "**Deploy Blockers:**";

const LINE_ENDING: &str = "\r\n";

/// One checkbox line of the tracking issue
///
/// `checked` means "verified" for pull requests and "resolved" for deploy
/// blockers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChecklistEntry {
    pub reference: Reference,
    pub checked: bool,
}

impl ChecklistEntry {
    pub fn new(reference: Reference, checked: bool) -> Self {
        Self { reference, checked }
    }

    pub fn unchecked(reference: Reference) -> Self {
        Self::new(reference, false)
    }

    pub fn number(&self) -> u64 {
        self.reference.number()
    }

    fn to_line(&self) -> String {
        let mark = if self.checked { 'x' } else { ' ' };
        format!("- [{}] {}", mark, self.reference.url())
    }
}

/// Structured content of a tracking issue body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Checklist {
    /// Staging tag under test
    pub tag: String,
    /// Pull requests shipped with this release, checked when verified
    pub pull_requests: Vec<ChecklistEntry>,
    /// Issues or pull requests blocking the deploy, checked when resolved
    pub deploy_blockers: Vec<ChecklistEntry>,
}

/// Parts of the body that come from configuration rather than state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyTemplate {
    /// Link to the production...staging comparison
    pub compare_url: String,
    /// Team mentioned at the end of the body (without `@`)
    pub notify_team: String,
}

impl BodyTemplate {
    pub fn for_repository(repository: &RepositoryConfig) -> Self {
        Self {
            compare_url: repository.compare_url(),
            notify_team: repository.notify_team.clone(),
        }
    }
}

/// Collapse entries sharing a number and sort ascending by number
///
/// A number that is checked in any of its occurrences stays checked, no
/// matter where the unchecked duplicates appear, so repeated automation runs
/// never un-verify anything. The first occurrence's kind and URL are kept.
pub fn normalize_entries(entries: impl IntoIterator<Item = ChecklistEntry>) -> Vec<ChecklistEntry> {
    let mut merged: BTreeMap<Reference, bool> = BTreeMap::new();
    for entry in entries {
        let checked = merged.entry(entry.reference).or_insert(false);
        *checked |= entry.checked;
    }

    merged
        .into_iter()
        .map(|(reference, checked)| ChecklistEntry::new(reference, checked))
        .collect()
}

/// Add new references to an existing list, keeping existing check marks
///
/// New references start unchecked.
pub fn merge_references(
    prior: &[ChecklistEntry],
    additions: impl IntoIterator<Item = Reference>,
) -> Vec<ChecklistEntry> {
    normalize_entries(
        prior
            .iter()
            .cloned()
            .chain(additions.into_iter().map(ChecklistEntry::unchecked)),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Preamble,
    PullRequests,
    DeployBlockers,
}

/// Parse a tracking issue body
///
/// Only a missing release version is fatal. Missing sections mean empty
/// lists, and checkbox lines whose URL cannot be parsed are skipped.
pub fn decode(body: &str) -> Result<Checklist> {
    let body = body.replace("\r\n", "\n").replace('\r', "\n");
    let tag = extract_tag(&body)?;

    let mut pull_requests = Vec::new();
    let mut deploy_blockers = Vec::new();
    let mut section = Section::Preamble;

    for line in body.lines().map(str::trim) {
        if line.starts_with(PULL_REQUEST_HEADER) {
            section = Section::PullRequests;
            continue;
        }
        if line.starts_with(DEPLOY_BLOCKER_HEADER) {
            section = Section::DeployBlockers;
            continue;
        }

        let Some((checked, url)) = parse_checkbox(line) else {
            continue;
        };

        let parsed = match section {
            Section::Preamble => continue,
            Section::PullRequests => parse_pull_request_reference(url)
                .map(|reference| pull_requests.push(ChecklistEntry::new(reference, checked))),
            Section::DeployBlockers => parse_either_reference(url)
                .map(|reference| deploy_blockers.push(ChecklistEntry::new(reference, checked))),
        };

        if let Err(e) = parsed {
            warn!("Skipping checklist line '{}': {}", line, e);
        }
    }

    debug!(
        "Decoded checklist for {}: {} pull requests, {} deploy blockers",
        tag,
        pull_requests.len(),
        deploy_blockers.len()
    );

    Ok(Checklist {
        tag,
        pull_requests: normalize_entries(pull_requests),
        deploy_blockers: normalize_entries(deploy_blockers),
    })
}

/// Render a tracking issue body
///
/// Entries are normalized before rendering, so the output is ordered by
/// number whatever order the checklist holds them in.
pub fn encode(checklist: &Checklist, template: &BodyTemplate) -> String {
    let mut lines = vec![
        format!("{} `{}`", RELEASE_VERSION_MARKER, checklist.tag),
        format!("{} {}", COMPARE_CHANGES_MARKER, template.compare_url),
        String::new(),
        PULL_REQUEST_HEADER.to_string(),
    ];
    lines.extend(
        normalize_entries(checklist.pull_requests.iter().cloned())
            .iter()
            .map(ChecklistEntry::to_line),
    );
    lines.push(String::new());

    if !checklist.deploy_blockers.is_empty() {
        lines.push(DEPLOY_BLOCKER_HEADER.to_string());
        lines.extend(
            normalize_entries(checklist.deploy_blockers.iter().cloned())
                .iter()
                .map(ChecklistEntry::to_line),
        );
        lines.push(String::new());
    }

    lines.push(format!("cc @{}", template.notify_team));

    let mut body = lines.join(LINE_ENDING);
    body.push_str(LINE_ENDING);
    body
}

fn extract_tag(body: &str) -> Result<String> {
    static QUOTED_TAG: OnceLock<Regex> = OnceLock::new();
    let re = QUOTED_TAG.get_or_init(|| Regex::new(r"^\s*`([^`]+)`").unwrap());

    let marker_line = body
        .lines()
        .find(|line| line.contains(RELEASE_VERSION_MARKER))
        .ok_or_else(|| DeployCashError::MalformedChecklistBody {
            reason: "release version marker is missing".to_string(),
        })?;

    let after_marker = marker_line
        .split_once(RELEASE_VERSION_MARKER)
        .map_or("", |(_, rest)| rest);

    re.captures(after_marker)
        .and_then(|captures| captures.get(1))
        .map(|tag| tag.as_str().trim().to_string())
        .filter(|tag| !tag.is_empty())
        .ok_or_else(|| DeployCashError::MalformedChecklistBody {
            reason: format!(
                "release version is not wrapped in backticks: '{}'",
                marker_line.trim()
            ),
        })
}

/// Match `- [ ] <url>` / `- [x] <url>`, returning the mark and the URL
fn parse_checkbox(line: &str) -> Option<(bool, &str)> {
    static CHECKBOX: OnceLock<Regex> = OnceLock::new();
    let re = CHECKBOX.get_or_init(|| Regex::new(r"^-\s*\[([ xX])\]\s+(\S+)").unwrap());

    let captures = re.captures(line)?;
    let checked = captures.get(1)?.as_str().eq_ignore_ascii_case("x");
    let url = captures.get(2)?.as_str();
    Some((checked, url))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::parse_issue_reference;

    const BASE_BODY: &str = concat!(
        "**Release Version:** `1.0.1-47`\r\n",
        "**Compare Changes:** https://github.com/Expensify/Expensify.cash/compare/production...staging\r\n",
        "\r\n",
        "**This release contains changes from the following pull requests:**\r\n",
        "- [ ] https://github.com/Expensify/Expensify.cash/pull/21\r\n",
        "- [x] https://github.com/Expensify/Expensify.cash/pull/22\r\n",
        "- [ ] https://github.com/Expensify/Expensify.cash/pull/23\r\n",
        "\r\n",
    );

    const DEPLOY_BLOCKERS: &str = concat!(
        "\r\n**Deploy Blockers:**\r\n",
        "- [ ] https://github.com/Expensify/Expensify.cash/issues/1\r\n",
        "- [x] https://github.com/Expensify/Expensify.cash/issues/2\r\n",
        "- [ ] https://github.com/Expensify/Expensify.cash/pull/1234\r\n",
    );

    fn pr(number: u64) -> Reference {
        parse_pull_request_reference(&format!(
            "https://github.com/Expensify/Expensify.cash/pull/{}",
            number
        ))
        .unwrap()
    }

    fn issue(number: u64) -> Reference {
        parse_issue_reference(&format!(
            "https://github.com/Expensify/Expensify.cash/issues/{}",
            number
        ))
        .unwrap()
    }

    fn states(entries: &[ChecklistEntry]) -> Vec<(u64, bool)> {
        entries.iter().map(|e| (e.number(), e.checked)).collect()
    }

    fn template() -> BodyTemplate {
        BodyTemplate::for_repository(&RepositoryConfig::default())
    }

    #[test]
    fn test_decode_pull_requests_without_blockers() {
        let checklist = decode(BASE_BODY).unwrap();

        assert_eq!(checklist.tag, "1.0.1-47");
        assert_eq!(
            states(&checklist.pull_requests),
            vec![(21, false), (22, true), (23, false)]
        );
        assert_eq!(
            checklist.pull_requests[0].reference.url(),
            "https://github.com/Expensify/Expensify.cash/pull/21"
        );
        assert!(checklist.deploy_blockers.is_empty());
    }

    #[test]
    fn test_decode_with_deploy_blockers() {
        let body = format!("{}{}", BASE_BODY, DEPLOY_BLOCKERS);
        let checklist = decode(&body).unwrap();

        assert_eq!(
            states(&checklist.deploy_blockers),
            vec![(1, false), (2, true), (1234, false)]
        );
        assert!(!checklist.deploy_blockers[0].reference.is_pull_request());
        assert!(checklist.deploy_blockers[2].reference.is_pull_request());
    }

    #[test]
    fn test_decode_without_carriage_returns() {
        let body = format!("{}{}", BASE_BODY, DEPLOY_BLOCKERS);
        let with_crlf = decode(&body).unwrap();
        let with_lf = decode(&body.replace('\r', "")).unwrap();

        assert_eq!(with_crlf, with_lf);
    }

    #[test]
    fn test_decode_without_pull_request_section() {
        let body = concat!(
            "**Release Version:** `1.0.1-47`\r\n",
            "**Compare Changes:** https://github.com/Expensify/Expensify.cash/compare/production...staging\r\n",
            "\r\n",
            "cc @Expensify/applauseleads\n",
        );
        let checklist = decode(body).unwrap();

        assert_eq!(checklist.tag, "1.0.1-47");
        assert!(checklist.pull_requests.is_empty());
        assert!(checklist.deploy_blockers.is_empty());
    }

    #[test]
    fn test_decode_uppercase_mark() {
        let body = BASE_BODY.replace("- [x]", "- [X]");
        let checklist = decode(&body).unwrap();
        assert!(checklist.pull_requests[1].checked);
    }

    #[test]
    fn test_decode_empty_body_is_malformed() {
        assert!(matches!(
            decode(""),
            Err(DeployCashError::MalformedChecklistBody { .. })
        ));
    }

    #[test]
    fn test_decode_unquoted_tag_is_malformed() {
        let body = BASE_BODY.replace("`1.0.1-47`", "1.0.1-47");
        let err = decode(&body).unwrap_err();
        assert!(matches!(err, DeployCashError::MalformedChecklistBody { .. }));
        assert!(err.to_string().contains("backticks"));
    }

    #[test]
    fn test_decode_skips_unparsable_lines() {
        let body = BASE_BODY.replace(
            "- [ ] https://github.com/Expensify/Expensify.cash/pull/23",
            "- [ ] https://github.com/Expensify/Expensify.cash/issues/23\r\n- [x] not a url",
        );
        let checklist = decode(&body).unwrap();
        assert_eq!(states(&checklist.pull_requests), vec![(21, false), (22, true)]);
    }

    #[test]
    fn test_decode_collapses_duplicates() {
        let body = BASE_BODY.replace(
            "- [ ] https://github.com/Expensify/Expensify.cash/pull/23",
            "- [ ] https://github.com/Expensify/Expensify.cash/pull/22",
        );
        let checklist = decode(&body).unwrap();
        assert_eq!(states(&checklist.pull_requests), vec![(21, false), (22, true)]);
    }

    #[test]
    fn test_encode_matches_layout() {
        let checklist = Checklist {
            tag: "1.0.1-47".to_string(),
            pull_requests: vec![
                ChecklistEntry::unchecked(pr(21)),
                ChecklistEntry::new(pr(22), true),
                ChecklistEntry::unchecked(pr(23)),
            ],
            deploy_blockers: vec![],
        };

        assert_eq!(
            encode(&checklist, &template()),
            format!("{}cc @Expensify/applauseleads\r\n", BASE_BODY)
        );
    }

    #[test]
    fn test_encode_with_blockers() {
        let checklist = Checklist {
            tag: "1.0.1-47".to_string(),
            pull_requests: vec![ChecklistEntry::new(pr(22), true)],
            deploy_blockers: vec![
                ChecklistEntry::unchecked(pr(1234)),
                ChecklistEntry::new(issue(2), true),
            ],
        };

        let expected = concat!(
            "**Release Version:** `1.0.1-47`\r\n",
            "**Compare Changes:** https://github.com/Expensify/Expensify.cash/compare/production...staging\r\n",
            "\r\n",
            "**This release contains changes from the following pull requests:**\r\n",
            "- [x] https://github.com/Expensify/Expensify.cash/pull/22\r\n",
            "\r\n",
            "**Deploy Blockers:**\r\n",
            "- [x] https://github.com/Expensify/Expensify.cash/issues/2\r\n",
            "- [ ] https://github.com/Expensify/Expensify.cash/pull/1234\r\n",
            "\r\n",
            "cc @Expensify/applauseleads\r\n",
        );
        assert_eq!(encode(&checklist, &template()), expected);
    }

    #[test]
    fn test_encode_empty_pull_requests_keeps_header() {
        let checklist = Checklist {
            tag: "2.0.0-0".to_string(),
            pull_requests: vec![],
            deploy_blockers: vec![],
        };
        let body = encode(&checklist, &template());

        assert!(body.contains(&format!("{}\r\n\r\ncc @", PULL_REQUEST_HEADER)));
        assert!(!body.contains(DEPLOY_BLOCKER_HEADER));
    }

    #[test]
    fn test_round_trip() {
        let checklist = Checklist {
            tag: "1.0.1-48".to_string(),
            pull_requests: vec![
                ChecklistEntry::unchecked(pr(1)),
                ChecklistEntry::new(pr(5), true),
            ],
            deploy_blockers: vec![
                ChecklistEntry::new(issue(3), true),
                ChecklistEntry::unchecked(issue(4)),
                ChecklistEntry::unchecked(pr(6)),
            ],
        };

        let body = encode(&checklist, &template());
        assert_eq!(decode(&body).unwrap(), checklist);
        assert_eq!(encode(&decode(&body).unwrap(), &template()), body);
    }

    #[test]
    fn test_normalize_keeps_checked_state() {
        let entries = vec![
            ChecklistEntry::unchecked(pr(3)),
            ChecklistEntry::new(pr(2), true),
            ChecklistEntry::unchecked(pr(2)),
            ChecklistEntry::new(pr(3), true),
            ChecklistEntry::unchecked(pr(1)),
        ];

        assert_eq!(
            states(&normalize_entries(entries)),
            vec![(1, false), (2, true), (3, true)]
        );
    }

    #[test]
    fn test_normalize_collapses_issue_and_pull_request_with_same_number() {
        let entries = vec![
            ChecklistEntry::unchecked(issue(3)),
            ChecklistEntry::new(pr(3), true),
            ChecklistEntry::unchecked(pr(1234)),
        ];

        let normalized = normalize_entries(entries);

        assert_eq!(states(&normalized), vec![(3, true), (1234, false)]);
        assert!(!normalized[0].reference.is_pull_request());
    }

    #[test]
    fn test_merge_never_unverifies() {
        let prior = vec![ChecklistEntry::new(pr(22), true), ChecklistEntry::unchecked(pr(21))];
        let merged = merge_references(&prior, vec![pr(22), pr(24)]);

        assert_eq!(states(&merged), vec![(21, false), (22, true), (24, false)]);
    }

    #[test]
    fn test_merge_nothing_is_noop() {
        let prior = decode(BASE_BODY).unwrap().pull_requests;
        assert_eq!(merge_references(&prior, Vec::new()), prior);
    }
}
