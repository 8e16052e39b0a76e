//! Redaction wrapper for caller-supplied text
//!
//! Search terms and filter values come straight from end users. They are
//! useful to know the *shape* of when reading logs (was it empty, how long
//! was it) but the content itself must never reach a log sink.

use std::fmt;

/// Wrapper that formats as a length marker instead of its content
///
/// # Example
///
/// ```
/// use relscope_core_types::Redacted;
///
/// let term = Redacted::new("alice@example.com");
/// assert_eq!(format!("{}", term), "<redacted:17>");
/// assert_eq!(format!("{:?}", term), "<redacted:17>");
/// assert_eq!(term.expose(), "alice@example.com");
/// ```
#[derive(Clone, Copy)]
pub struct Redacted<'a>(&'a str);

impl<'a> Redacted<'a> {
    /// Wrap a borrowed piece of caller text
    pub fn new(text: &'a str) -> Self {
        Self(text)
    }

    /// Access the wrapped text
    ///
    /// Only for building the query itself, never for logging.
    pub fn expose(&self) -> &'a str {
        self.0
    }

    /// Character count of the wrapped text
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }
}

impl fmt::Debug for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<redacted:{}>", self.char_len())
    }
}

impl fmt::Display for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redacted_hides_content() {
        let term = Redacted::new("secret search");
        let shown = format!("{:?} {}", term, term);
        assert!(!shown.contains("secret"));
        assert_eq!(shown, "<redacted:13> <redacted:13>");
    }

    #[test]
    fn test_redacted_counts_chars_not_bytes() {
        let term = Redacted::new("héllo");
        assert_eq!(term.char_len(), 5);
        assert_eq!(term.to_string(), "<redacted:5>");
    }

    #[test]
    fn test_redacted_expose() {
        let term = Redacted::new("x");
        assert_eq!(term.expose(), "x");
    }

    #[test]
    fn test_redacted_inside_struct_debug() {
        #[derive(Debug)]
        #[allow(dead_code)]
        struct SearchRequest<'a> {
            path: &'a str,
            text: Redacted<'a>,
        }

        let req = SearchRequest {
            path: "profile.bio",
            text: Redacted::new("hunter2"),
        };

        let debug_str = format!("{:?}", req);
        assert!(debug_str.contains("profile.bio"));
        assert!(debug_str.contains("<redacted:7>"));
        assert!(!debug_str.contains("hunter2"));
    }
}
