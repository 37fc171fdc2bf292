use regex::{Regex, RegexBuilder};

/// Letters allowed after the closing `/` of a regex pattern.
pub const REGEX_FLAGS: &str = "gimsuy";

/// One blacklist entry.
#[derive(Debug, Clone)]
pub enum Pattern {
    /// Plain text that must appear somewhere in the URL.
    Substring(String),
    /// `/body/flags` form. `source` keeps the text as the user wrote it.
    Regex { source: String, regex: Regex },
}

impl Pattern {
    /// Compile a single non-empty token.
    ///
    /// A token is a regex when it reads `/body/flags` with a non-empty body
    /// and flags drawn from [`REGEX_FLAGS`]; anything else, such as
    /// `/videos/embed`, is a literal substring. `i`, `m` and `s` are honoured,
    /// the other flags are accepted and ignored.
    pub fn compile(token: &str) -> Result<Self, regex::Error> {
        if let Some((body, flags)) = split_regex(token) {
            let regex = RegexBuilder::new(body)
                .case_insensitive(flags.contains('i'))
                .multi_line(flags.contains('m'))
                .dot_matches_new_line(flags.contains('s'))
                .build()?;
            return Ok(Pattern::Regex {
                source: token.to_string(),
                regex,
            });
        }
        Ok(Pattern::Substring(token.to_string()))
    }

    pub fn matches(&self, url: &str) -> bool {
        match self {
            Pattern::Substring(s) => !s.is_empty() && url.contains(s.as_str()),
            Pattern::Regex { regex, .. } => regex.is_match(url),
        }
    }

    pub fn source(&self) -> &str {
        match self {
            Pattern::Substring(s) => s,
            Pattern::Regex { source, .. } => source,
        }
    }
}

fn split_regex(token: &str) -> Option<(&str, &str)> {
    let rest = token.strip_prefix('/')?;
    let end = rest.rfind('/')?;
    let (body, flags) = (&rest[..end], &rest[end + 1..]);
    if body.is_empty() || !flags.chars().all(|c| REGEX_FLAGS.contains(c)) {
        return None;
    }
    Some((body, flags))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slash_only_tokens_are_substrings() {
        assert!(matches!(Pattern::compile("/").unwrap(), Pattern::Substring(_)));
        assert!(matches!(Pattern::compile("//").unwrap(), Pattern::Substring(_)));
        assert!(matches!(
            Pattern::compile("/path/").unwrap(),
            Pattern::Regex { .. }
        ));
    }

    #[test]
    fn unknown_flags_make_a_substring() {
        let p = Pattern::compile("/videos/embed").unwrap();
        assert!(matches!(p, Pattern::Substring(_)));
        assert!(!p.matches("https://example.com/videos/list"));
        assert!(p.matches("https://example.com/videos/embed/7"));

        assert!(matches!(
            Pattern::compile("/clips/gi").unwrap(),
            Pattern::Regex { .. }
        ));
    }

    #[test]
    fn dot_all_flag() {
        let p = Pattern::compile("/a.b/s").unwrap();
        assert!(p.matches("a\nb"));
        assert!(!Pattern::compile("/a.b/").unwrap().matches("a\nb"));
    }

    #[test]
    fn substring_without_slashes() {
        let p = Pattern::compile("vimeo.com").unwrap();
        assert!(p.matches("https://player.vimeo.com/video/1"));
        assert_eq!(p.source(), "vimeo.com");
    }
}
