//! Staging tag sequencing
//!
//! Staging tags look like `MAJOR.MINOR.PATCH-BUILD` (`1.0.1-47`). Every
//! staging deploy of the same version bumps the build number.

use crate::error::{DeployCashError, Result};
use log::debug;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A `MAJOR.MINOR.PATCH-BUILD` version tag
///
/// Ordering is lexicographic over the four numbers, so the greatest tag is
/// the newest build of the newest version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VersionTag {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub build: u64,
}

/// Error returned when a tag name is not `MAJOR.MINOR.PATCH-BUILD`
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("not a staging version tag: {0}")]
pub struct ParseVersionTagError(pub String);

impl VersionTag {
    pub fn new(major: u64, minor: u64, patch: u64, build: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            build,
        }
    }

    /// The following build of the same version, `None` once the build
    /// number is exhausted
    pub fn next_build(&self) -> Option<Self> {
        Some(Self {
            build: self.build.checked_add(1)?,
            ..*self
        })
    }
}

impl FromStr for VersionTag {
    type Err = ParseVersionTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseVersionTagError(s.to_string());

        let (version, build) = s.split_once('-').ok_or_else(invalid)?;
        let mut parts = version.split('.');
        let (Some(major), Some(minor), Some(patch), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };

        Ok(Self {
            major: parse_component(major).ok_or_else(invalid)?,
            minor: parse_component(minor).ok_or_else(invalid)?,
            patch: parse_component(patch).ok_or_else(invalid)?,
            build: parse_component(build).ok_or_else(invalid)?,
        })
    }
}

impl fmt::Display for VersionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}-{}",
            self.major, self.minor, self.patch, self.build
        )
    }
}

/// Digits only; `u64::from_str` alone would accept a leading `+`
fn parse_component(component: &str) -> Option<u64> {
    if component.is_empty() || !component.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    component.parse().ok()
}

/// Compute the tag for the next staging deploy
///
/// Names that are not staging tags (`v1.0`, `latest`, ...) are ignored.
/// Fails with [`DeployCashError::NoTagsFound`] when nothing is left, since
/// there is no release line to continue.
pub fn next_tag<I, S>(existing_tag_names: I) -> Result<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let latest = existing_tag_names
        .into_iter()
        .filter_map(|name| match name.as_ref().parse::<VersionTag>() {
            Ok(tag) => Some(tag),
            Err(e) => {
                debug!("Ignoring tag: {}", e);
                None
            }
        })
        .max()
        .ok_or(DeployCashError::NoTagsFound)?;

    let next = latest
        .next_build()
        .ok_or_else(|| DeployCashError::BuildNumberExhausted {
            tag: latest.to_string(),
        })?;
    debug!("Latest tag is {}, next is {}", latest, next);
    Ok(next.to_string())
}

/// Check a caller-supplied release tag
///
/// The tag is written into the tracking issue verbatim, so anything that
/// would not read back as the same tag is refused.
pub fn validate_release_tag(tag: &str) -> Result<&str> {
    tag.parse::<VersionTag>()
        .map(|_| tag)
        .map_err(|_| DeployCashError::InvalidTag {
            tag: tag.to_string(),
        })
}
