use std::collections::HashMap;

use regex::Regex;

use crate::error::{BrexError, Result};

/// Parameters extracted from a matched URI. Absent optional segments are
/// absent keys, never empty strings.
pub type ParsedParams = HashMap<String, String>;

/// A resource URI pattern with optional trailing `{/name}` segments.
///
/// `brex://expenses/card{/id}` matches both `brex://expenses/card` and
/// `brex://expenses/card/exp_123`. Each marker captures exactly one path
/// segment, and markers are positional.
#[derive(Debug, Clone)]
pub struct PathTemplate {
    pattern: String,
    params: Vec<String>,
    matcher: Regex,
}

impl PathTemplate {
    /// Compile a pattern. Each `{/name}` marker becomes
    /// `(?:/([^/]+))?`; everything else is matched literally, with regex
    /// metacharacters such as `.` escaped.
    pub fn new(pattern: &str) -> Result<Self> {
        let invalid = |reason: &str| BrexError::InvalidTemplate {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        };

        let mut params = Vec::new();
        let mut source = String::from("^");
        let mut rest = pattern;

        while let Some(open) = rest.find('{') {
            source.push_str(&regex::escape(&rest[..open]));
            let after = &rest[open + 1..];
            let close = after.find('}').ok_or_else(|| invalid("unclosed '{'"))?;
            let marker = &after[..close];

            let name = marker
                .strip_prefix('/')
                .ok_or_else(|| invalid("only optional '{/name}' segments are supported"))?;
            if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err(invalid("one parameter name per optional segment"));
            }
            if params.iter().any(|p| p == name) {
                return Err(invalid("duplicate parameter name"));
            }

            params.push(name.to_string());
            source.push_str("(?:/([^/]+))?");
            rest = &after[close + 1..];
        }
        if rest.contains('}') {
            return Err(invalid("unmatched '}'"));
        }
        source.push_str(&regex::escape(rest));
        source.push('$');

        let matcher = Regex::new(&source).map_err(|e| invalid(&e.to_string()))?;
        debug_assert_eq!(matcher.captures_len() - 1, params.len());

        Ok(Self {
            pattern: pattern.to_string(),
            params,
            matcher,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Declared parameter names, in pattern order.
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// True iff the whole URI fits the pattern.
    pub fn matches(&self, uri: &str) -> bool {
        self.matcher.is_match(uri)
    }

    /// Extract parameters. Returns an empty map when the URI does not match.
    pub fn parse(&self, uri: &str) -> ParsedParams {
        let Some(caps) = self.matcher.captures(uri) else {
            return ParsedParams::new();
        };
        self.params
            .iter()
            .enumerate()
            .filter_map(|(i, name)| caps.get(i + 1).map(|m| (name.clone(), m.as_str().to_string())))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_id_present() {
        let t = PathTemplate::new("brex://expenses/card{/id}").unwrap();
        assert!(t.matches("brex://expenses/card/exp_123"));
        let params = t.parse("brex://expenses/card/exp_123");
        assert_eq!(params.get("id").map(String::as_str), Some("exp_123"));
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn optional_id_absent() {
        let t = PathTemplate::new("brex://expenses/card{/id}").unwrap();
        assert!(t.matches("brex://expenses/card"));
        assert!(t.parse("brex://expenses/card").is_empty());
    }

    #[test]
    fn mismatch_yields_empty_params() {
        let t = PathTemplate::new("brex://col{/id}").unwrap();
        for uri in ["brex://other", "brex://col/a/b", "brex://col/", "xbrex://col", "brex://colx"] {
            assert!(!t.matches(uri), "{uri}");
            assert!(t.parse(uri).is_empty(), "{uri}");
        }
        assert_eq!(t.parse("brex://col/itemA").get("id").unwrap(), "itemA");
    }

    #[test]
    fn multiple_optional_segments_are_positional() {
        let t = PathTemplate::new("brex://accounts{/account_id}{/statement_id}").unwrap();
        assert_eq!(t.params(), ["account_id", "statement_id"]);

        let both = t.parse("brex://accounts/a1/s9");
        assert_eq!(both["account_id"], "a1");
        assert_eq!(both["statement_id"], "s9");

        let first = t.parse("brex://accounts/a1");
        assert_eq!(first["account_id"], "a1");
        assert!(!first.contains_key("statement_id"));
    }

    #[test]
    fn literal_metacharacters_match_literally() {
        let t = PathTemplate::new("brex://v1.expenses{/id}").unwrap();
        assert!(t.matches("brex://v1.expenses/x"));
        assert!(!t.matches("brex://v1xexpenses/x"));
    }

    #[test]
    fn template_without_markers() {
        let t = PathTemplate::new("brex://accounts/card").unwrap();
        assert!(t.params().is_empty());
        assert!(t.matches("brex://accounts/card"));
        assert!(t.parse("brex://accounts/card").is_empty());
    }

    #[test]
    fn rejects_malformed_patterns() {
        assert!(PathTemplate::new("brex://x{id}").is_err());
        assert!(PathTemplate::new("brex://x{/a,b}").is_err());
        assert!(PathTemplate::new("brex://x{/id").is_err());
        assert!(PathTemplate::new("brex://x{/}").is_err());
        assert!(PathTemplate::new("brex://x}").is_err());
        assert!(PathTemplate::new("brex://x{/id}{/id}").is_err());
    }
}
