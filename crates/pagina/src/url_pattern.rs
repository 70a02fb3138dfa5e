//! URL glob patterns for navigation waits.
//!
//! Patterns are segment-based: literal segments, `*` (exactly one segment),
//! and `**` (any number of segments, including none). Leading scheme
//! separators in URLs are treated as ordinary segment noise, so a pattern like
//! `**/docs/intro` matches `https://playwright.dev/java/docs/intro`.

use serde::{Deserialize, Serialize};

/// A glob pattern over URL path segments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlPattern {
    pattern: String,
    segments: Vec<UrlSegment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
enum UrlSegment {
    Literal(String),
    Wildcard,
    GlobStar,
}

impl UrlPattern {
    /// Parse a pattern.
    ///
    /// - Literal segments: `/docs/intro`
    /// - Single-segment wildcard: `/users/*`
    /// - Multi-segment wildcard: `**/docs/intro`
    #[must_use]
    pub fn new(pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        let segments = pattern
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| match s {
                "*" => UrlSegment::Wildcard,
                "**" => UrlSegment::GlobStar,
                literal => UrlSegment::Literal(literal.to_string()),
            })
            .collect();

        Self { pattern, segments }
    }

    /// The original pattern text
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Check whether a URL matches the pattern.
    #[must_use]
    pub fn matches(&self, url: &str) -> bool {
        let url_segments: Vec<&str> = url.split('/').filter(|s| !s.is_empty()).collect();
        Self::match_segments(&self.segments, &url_segments)
    }

    fn match_segments(pattern: &[UrlSegment], url: &[&str]) -> bool {
        match pattern.split_first() {
            None => url.is_empty(),
            Some((UrlSegment::GlobStar, rest)) => {
                // `**` consumes zero or more segments.
                (0..=url.len()).any(|skip| Self::match_segments(rest, &url[skip..]))
            }
            Some((UrlSegment::Wildcard, rest)) => url
                .split_first()
                .is_some_and(|(_, tail)| Self::match_segments(rest, tail)),
            Some((UrlSegment::Literal(lit), rest)) => url
                .split_first()
                .is_some_and(|(head, tail)| head == lit && Self::match_segments(rest, tail)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_match() {
        let pattern = UrlPattern::new("/docs/intro");
        assert!(pattern.matches("/docs/intro"));
        assert!(!pattern.matches("/docs"));
        assert!(!pattern.matches("/docs/intro/extra"));
    }

    #[test]
    fn test_single_wildcard_consumes_one_segment() {
        let pattern = UrlPattern::new("/users/*");
        assert!(pattern.matches("/users/123"));
        assert!(!pattern.matches("/users"));
        assert!(!pattern.matches("/users/123/posts"));
    }

    #[test]
    fn test_globstar_prefix_matches_full_urls() {
        let pattern = UrlPattern::new("**/java/docs/intro");
        assert!(pattern.matches("https://playwright.dev/java/docs/intro"));
        assert!(pattern.matches("/java/docs/intro"));
        assert!(!pattern.matches("https://playwright.dev/java/docs"));
    }

    #[test]
    fn test_globstar_matches_zero_segments() {
        let pattern = UrlPattern::new("**/intro");
        assert!(pattern.matches("/intro"));
        assert!(pattern.matches("/a/b/c/intro"));
    }

    #[test]
    fn test_globstar_in_the_middle() {
        let pattern = UrlPattern::new("/api/**/users");
        assert!(pattern.matches("/api/users"));
        assert!(pattern.matches("/api/v1/internal/users"));
        assert!(!pattern.matches("/api/v1/accounts"));
    }

    #[test]
    fn test_pattern_getter() {
        assert_eq!(UrlPattern::new("**/intro").pattern(), "**/intro");
    }
}
