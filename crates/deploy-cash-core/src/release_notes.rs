//! Release notes for a published release

use crate::reference::pull_request_url;
use deploy_cash_config::RepositoryConfig;

/// Bullet list of pull request links, one per number, in the given order
pub fn release_body(repository: &RepositoryConfig, pr_numbers: &[u64]) -> String {
    pr_numbers
        .iter()
        .map(|number| format!("- {}", pull_request_url(repository, *number)))
        .collect::<Vec<_>>()
        .join("\r\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_body() {
        let repository = RepositoryConfig::default();
        let cases: [(&[u64], &str); 3] = [
            (
                &[1, 2, 3],
                "- https://github.com/Expensify/Expensify.cash/pull/1\r\n- https://github.com/Expensify/Expensify.cash/pull/2\r\n- https://github.com/Expensify/Expensify.cash/pull/3",
            ),
            (&[], ""),
            (&[12345], "- https://github.com/Expensify/Expensify.cash/pull/12345"),
        ];

        for (numbers, expected) in cases {
            assert_eq!(release_body(&repository, numbers), expected);
        }
    }

    #[test]
    fn test_release_body_keeps_order() {
        let body = release_body(&RepositoryConfig::default(), &[30, 4, 12]);
        let numbers: Vec<&str> = body
            .split("\r\n")
            .map(|line| line.rsplit('/').next().unwrap())
            .collect();
        assert_eq!(numbers, vec!["30", "4", "12"]);
    }
}
