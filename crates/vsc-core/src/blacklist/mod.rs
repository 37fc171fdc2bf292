//! Site blacklist gate.
//!
//! The stored blacklist is one free-text string. It is split on whitespace,
//! commas and newlines into patterns; each pattern is either a literal
//! substring of the page URL or a `/regex/flags` expression.

mod pattern;

pub use pattern::{Pattern, REGEX_FLAGS};

/// Split a raw blacklist string into non-empty pattern tokens, keeping order.
pub fn parse_patterns(raw: &str) -> Vec<String> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// True iff any non-empty pattern matches `current_url`.
pub fn is_blocked<S: AsRef<str>>(current_url: &str, patterns: &[S]) -> bool {
    Blacklist::from_patterns(patterns).is_blocked(current_url)
}

/// Compiled, ordered list of blocked-site patterns.
#[derive(Debug, Clone, Default)]
pub struct Blacklist {
    patterns: Vec<Pattern>,
    rejected: Vec<String>,
}

impl Blacklist {
    /// Parse and compile a raw blacklist string.
    pub fn parse(raw: &str) -> Self {
        Self::from_patterns(&parse_patterns(raw))
    }

    /// Compile already-split patterns. Empty tokens and invalid regexes are dropped.
    pub fn from_patterns<S: AsRef<str>>(patterns: &[S]) -> Self {
        let mut list = Self::default();
        for p in patterns.iter().map(|p| p.as_ref().trim()) {
            if p.is_empty() {
                continue;
            }
            match Pattern::compile(p) {
                Ok(pattern) => list.patterns.push(pattern),
                Err(e) => {
                    tracing::warn!(pattern = p, "ignoring invalid blacklist pattern: {}", e);
                    list.rejected.push(p.to_string());
                }
            }
        }
        list
    }

    pub fn is_blocked(&self, current_url: &str) -> bool {
        self.matching(current_url).is_some()
    }

    /// First pattern (in stored order) that matches `current_url`.
    pub fn matching(&self, current_url: &str) -> Option<&str> {
        self.patterns
            .iter()
            .find(|p| p.matches(current_url))
            .map(Pattern::source)
    }

    /// Source text of each pattern, in order.
    pub fn patterns(&self) -> Vec<&str> {
        self.patterns.iter().map(Pattern::source).collect()
    }

    /// Tokens that failed to compile and were left out, in input order.
    pub fn rejected(&self) -> &[String] {
        &self.rejected
    }

    /// Stored form: patterns joined one per line.
    pub fn to_raw(&self) -> String {
        self.patterns().join("\n")
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_patterns_splits_on_all_delimiters() {
        let raw = "vine.com, example.org\nfoo.net\t bar.io,,\n\n";
        assert_eq!(
            parse_patterns(raw),
            vec!["vine.com", "example.org", "foo.net", "bar.io"]
        );
        assert!(parse_patterns(" ,\n, ").is_empty());
    }

    #[test]
    fn substring_patterns_block_matching_urls() {
        assert!(is_blocked("https://vine.com/v/abc", &["vine.com"]));
        assert!(is_blocked("https://www.vine.com/", &["nope.org", "vine.com"]));
        assert!(!is_blocked("https://youtube.com/watch?v=1", &["vine.com"]));
    }

    #[test]
    fn empty_patterns_never_match() {
        assert!(!is_blocked("https://example.com/", &["", "   "]));
        let none: [&str; 0] = [];
        assert!(!is_blocked("https://example.com/", &none));
    }

    #[test]
    fn regex_patterns_and_flags() {
        let list = Blacklist::parse(r"/youtube\.com.embed/ /NETFLIX/i");
        assert!(list.is_blocked("https://www.youtube.com/embed/xyz"));
        assert!(!list.is_blocked("https://www.youtube.com/watch?v=xyz"));
        assert_eq!(
            list.matching("https://www.netflix.com/title/1"),
            Some("/NETFLIX/i")
        );
    }

    #[test]
    fn invalid_regex_is_dropped() {
        let list = Blacklist::parse("/(unclosed/ vine.com");
        assert_eq!(list.patterns(), vec!["vine.com"]);
        assert_eq!(list.rejected(), ["/(unclosed/".to_string()]);
        assert_eq!(list.to_raw(), "vine.com");
    }

    #[test]
    fn path_like_tokens_match_literally() {
        let list = Blacklist::parse("/videos/embed");
        assert!(!list.is_blocked("https://example.com/videos/list"));
        assert!(list.is_blocked("https://example.com/videos/embed/42"));
        assert!(list.rejected().is_empty());
    }

    #[test]
    fn matching_reports_first_pattern_in_order() {
        let list = Blacklist::parse("example, example.com");
        assert_eq!(list.matching("https://example.com/"), Some("example"));
        assert_eq!(list.to_raw(), "example\nexample.com");
    }
}
