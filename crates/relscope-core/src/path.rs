//! Dot-separated attribute paths
//!
//! `author.profile.rank` names the `rank` attribute reached through the
//! `author` relationship and then the `profile` relationship. Every
//! path-aware operation consumes one segment per recursion level, so the
//! split is always "first segment" versus "everything after it".

use crate::errors::ScopeError;

/// Split a raw path on its first `.` into `(head, rest)`
///
/// `rest` is empty when the path has no further dot. No validation is
/// performed; see [`AttributePath::parse`] for the checked form.
pub fn split_path(path: &str) -> (&str, &str) {
    match path.split_once('.') {
        Some((head, rest)) => (head, rest),
        None => (path, ""),
    }
}

/// A validated attribute path
///
/// Invariant: non-empty, and no segment is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributePath<'a> {
    raw: &'a str,
}

impl<'a> AttributePath<'a> {
    /// Validate a caller-supplied path
    ///
    /// # Errors
    ///
    /// Returns `EmptySegment` for `""`, `"a..b"`, `"a."` and `".a"`.
    pub fn parse(raw: &'a str) -> Result<Self, ScopeError> {
        if raw.split('.').any(str::is_empty) {
            return Err(ScopeError::EmptySegment {
                path: raw.to_string(),
            });
        }
        Ok(Self { raw })
    }

    /// The path as written
    pub fn as_str(&self) -> &'a str {
        self.raw
    }

    /// First segment and the remaining path, if any
    pub fn split(&self) -> (&'a str, Option<AttributePath<'a>>) {
        let (head, rest) = split_path(self.raw);
        if rest.is_empty() {
            (head, None)
        } else {
            // rest is a suffix of a validated path, so it is valid too
            (head, Some(AttributePath { raw: rest }))
        }
    }

    /// First segment
    pub fn head(&self) -> &'a str {
        split_path(self.raw).0
    }

    /// True when the path names an attribute of the current entity
    pub fn is_terminal(&self) -> bool {
        !self.raw.contains('.')
    }

    /// Number of segments
    pub fn depth(&self) -> usize {
        self.raw.split('.').count()
    }

    /// Segments in order
    pub fn segments(&self) -> impl Iterator<Item = &'a str> {
        self.raw.split('.')
    }

    /// Last segment: the attribute the path ultimately addresses
    pub fn leaf(&self) -> &'a str {
        self.raw.rsplit('.').next().unwrap_or(self.raw)
    }
}

impl std::fmt::Display for AttributePath<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.raw)
    }
}
