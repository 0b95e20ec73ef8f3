use std::collections::HashMap;

use crate::config::types::LimitsConfig;
use crate::error::{BrexError, Result};

/// Flat query-string pairs from a URI. Later duplicates overwrite earlier
/// ones. A URI without a query yields an empty map.
pub fn query_params(uri: &str) -> HashMap<String, String> {
    let Some((_, query)) = uri.split_once('?') else {
        return HashMap::new();
    };
    let query = query.split_once('#').map_or(query, |(q, _)| q);
    url::form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

/// The part of a URI the path templates see: everything before `?` or `#`.
pub fn strip_query(uri: &str) -> &str {
    uri.find(['?', '#']).map_or(uri, |i| &uri[..i])
}

/// Caller-supplied paging and shaping hints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShapeHints {
    pub cursor: Option<String>,
    pub limit: Option<u32>,
    pub fields: Option<Vec<String>>,
    pub summary_only: bool,
}

impl ShapeHints {
    /// Read `cursor`, `limit`, `fields` and `summary_only` from query params.
    pub fn from_params(params: &HashMap<String, String>, limits: &LimitsConfig) -> Result<Self> {
        let limit = match params.get("limit") {
            Some(raw) => Some(parse_limit(raw, limits.max_page_size)?),
            None => None,
        };
        Ok(Self {
            cursor: params.get("cursor").filter(|c| !c.is_empty()).cloned(),
            limit,
            fields: params.get("fields").and_then(|f| parse_fields(f)),
            summary_only: params.get("summary_only").is_some_and(|v| v == "true"),
        })
    }
}

/// Parse a page size, enforcing `1..=max`.
pub fn parse_limit(raw: &str, max: u32) -> Result<u32> {
    let limit: u32 = raw
        .trim()
        .parse()
        .map_err(|_| BrexError::validation(format!("limit must be an integer, got '{raw}'")))?;
    check_limit(limit, max)
}

pub fn check_limit(limit: u32, max: u32) -> Result<u32> {
    if limit == 0 || limit > max {
        return Err(BrexError::validation(format!(
            "limit must be between 1 and {max}, got {limit}"
        )));
    }
    Ok(limit)
}

/// Split a comma-separated field list. Returns `None` when nothing usable
/// remains after dropping blanks.
pub fn parse_fields(raw: &str) -> Option<Vec<String>> {
    let fields: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(String::from)
        .collect();
    (!fields.is_empty()).then_some(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_query_string() {
        assert!(query_params("brex://expenses/card").is_empty());
        assert!(query_params("brex://expenses/card?").is_empty());
    }

    #[test]
    fn last_duplicate_wins() {
        let params = query_params("brex://expenses?limit=5&cursor=abc&limit=10");
        assert_eq!(params["limit"], "10");
        assert_eq!(params["cursor"], "abc");
    }

    #[test]
    fn fragment_is_not_part_of_query() {
        let params = query_params("brex://budgets?summary_only=true#top");
        assert_eq!(params["summary_only"], "true");
        assert_eq!(strip_query("brex://budgets?summary_only=true#top"), "brex://budgets");
        assert_eq!(strip_query("brex://budgets#top"), "brex://budgets");
    }

    #[test]
    fn field_lists_are_decoded() {
        let params = query_params("brex://expenses?fields=id%2Camount.amount");
        assert_eq!(params["fields"], "id,amount.amount");
    }

    #[test]
    fn hints_from_params() {
        let params = query_params(
            "brex://expenses?limit=25&fields=id, amount.amount,,&summary_only=true&cursor=c1",
        );
        let hints = ShapeHints::from_params(&params, &LimitsConfig::default()).unwrap();
        assert_eq!(hints.limit, Some(25));
        assert_eq!(hints.cursor.as_deref(), Some("c1"));
        assert_eq!(hints.fields, Some(vec!["id".to_string(), "amount.amount".to_string()]));
        assert!(hints.summary_only);
    }

    #[test]
    fn summary_only_requires_literal_true() {
        let params = query_params("brex://expenses?summary_only=1");
        let hints = ShapeHints::from_params(&params, &LimitsConfig::default()).unwrap();
        assert!(!hints.summary_only);
    }

    #[test]
    fn limit_validation() {
        let limits = LimitsConfig::default();
        for bad in ["0", "101", "ten", "-1", ""] {
            let params = HashMap::from([("limit".to_string(), bad.to_string())]);
            let err = ShapeHints::from_params(&params, &limits).unwrap_err();
            assert!(matches!(err, BrexError::Validation(_)), "{bad}");
        }
        assert_eq!(parse_limit("100", 100).unwrap(), 100);
        assert_eq!(parse_limit("1", 100).unwrap(), 1);
    }

    #[test]
    fn blank_field_list_is_no_field_list() {
        assert_eq!(parse_fields(" , ,"), None);
    }
}
