//! Theme identifiers and version ordering.
//!
//! A theme is addressed as `author/name[@version]`, where the version is
//! either `latest` or a two-component `major.minor` string, optionally
//! written with a leading `v`. The parsed form is immutable; the canonical
//! string form omits the version segment when it is `latest`, so re-parsing
//! a canonical string is idempotent.

use std::cmp::Ordering;
use std::fmt;

use crate::error::ThemeError;

/// Version sentinel meaning "whatever the hub currently publishes".
pub const LATEST: &str = "latest";

/// File extension used for cached theme files.
pub const THEME_FILE_EXT: &str = "toml";

/// Parsed `author/name[@version]` reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeRef {
    pub author: String,
    pub name: String,
    /// Either [`LATEST`] or a literal `major.minor` string.
    pub version: String,
    /// True only when the caller wrote an explicit `@version` segment.
    pub version_explicit: bool,
}

impl ThemeRef {
    /// Parse a raw identifier into a reference.
    ///
    /// Accepts `author/name`, `author/name@latest`, and
    /// `author/name@[v]major.minor`. Surrounding whitespace is ignored.
    pub fn parse(input: &str) -> Result<Self, ThemeError> {
        let trimmed = input.trim();
        let invalid = || ThemeError::InvalidIdentifier(input.to_string());

        let (author, rest) = trimmed.split_once('/').ok_or_else(invalid)?;
        let (name, version_segment) = match rest.split_once('@') {
            Some((name, version)) => (name, Some(version)),
            None => (rest, None),
        };

        if !is_ident_segment(author) || !is_ident_segment(name) {
            return Err(invalid());
        }

        let (version, version_explicit) = match version_segment {
            Some(raw) => (normalize_version(raw).ok_or_else(invalid)?, true),
            None => (LATEST.to_string(), false),
        };

        Ok(Self {
            author: author.to_string(),
            name: name.to_string(),
            version,
            version_explicit,
        })
    }

    /// Version-independent `author/name` identifier used for download tracking.
    pub fn id(&self) -> String {
        format!("{}/{}", self.author, self.name)
    }

    /// Cached file name for this reference (`<version>.toml`).
    pub fn file_name(&self) -> String {
        format!("{}.{THEME_FILE_EXT}", self.version)
    }

    /// Copy of this reference pinned to a concrete version string.
    pub fn with_version(&self, version: &str) -> Self {
        Self {
            author: self.author.clone(),
            name: self.name.clone(),
            version: version.to_string(),
            version_explicit: self.version_explicit,
        }
    }
}

impl fmt::Display for ThemeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.version == LATEST {
            write!(f, "{}/{}", self.author, self.name)
        } else {
            write!(f, "{}/{}@{}", self.author, self.name, self.version)
        }
    }
}

/// True when the segment is non-empty `[A-Za-z0-9_-]+`.
fn is_ident_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
}

/// Normalize a raw `@version` segment, stripping an optional `v` prefix.
fn normalize_version(raw: &str) -> Option<String> {
    let stripped = raw.strip_prefix('v').unwrap_or(raw);
    if stripped == LATEST || parse_version(stripped).is_some() {
        Some(stripped.to_string())
    } else {
        None
    }
}

/// Parse a `major.minor` version string into its numeric components.
pub fn parse_version(version: &str) -> Option<(u32, u32)> {
    let (major, minor) = version.split_once('.')?;
    // Plain digits only: no second dot, no sign or whitespace the integer
    // parser would otherwise tolerate.
    let is_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !is_digits(major) || !is_digits(minor) {
        return None;
    }
    Some((major.parse().ok()?, minor.parse().ok()?))
}

/// Order two version strings.
///
/// Dotted `major.minor` versions order numerically and rank above anything
/// that does not parse (such as `latest`); two unparseable strings fall back
/// to lexicographic comparison. Sorting a mixed directory listing descending
/// with this ordering therefore yields the newest concrete version first,
/// with `latest` as the trailing fallback.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    match (parse_version(a), parse_version(b)) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => a.cmp(b),
    }
}

/// Pick the newest version from a list of cached version strings.
pub fn newest_version(versions: &[String]) -> Option<&str> {
    versions
        .iter()
        .max_by(|a, b| compare_versions(a, b))
        .map(String::as_str)
}
