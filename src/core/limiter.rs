use std::num::NonZeroUsize;

use serde::Serialize;
use serde_json::Value;

use super::estimate::estimate_tokens;
use super::project::project_fields;
use crate::error::{BrexError, Result};

/// Token budget observed for a single response.
pub const DEFAULT_HARD_TOKEN_LIMIT: usize = 24_000;

/// Per-request shaping configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimiterConfig {
    pub summary_only: bool,
    pub fields: Option<Vec<String>>,
    hard_token_limit: NonZeroUsize,
}

impl LimiterConfig {
    pub fn new(summary_only: bool, fields: Option<Vec<String>>, hard_token_limit: usize) -> Result<Self> {
        let hard_token_limit = NonZeroUsize::new(hard_token_limit)
            .ok_or_else(|| BrexError::validation("hard token limit must be positive"))?;
        Ok(Self {
            summary_only,
            fields,
            hard_token_limit,
        })
    }

    pub fn hard_token_limit(&self) -> usize {
        self.hard_token_limit.get()
    }

    fn explicit_fields(&self) -> Option<&[String]> {
        self.fields.as_deref().filter(|f| !f.is_empty())
    }
}

impl Default for LimiterConfig {
    fn default() -> Self {
        Self {
            summary_only: false,
            fields: None,
            hard_token_limit: NonZeroUsize::new(DEFAULT_HARD_TOKEN_LIMIT).unwrap_or(NonZeroUsize::MIN),
        }
    }
}

/// Which branch of the shaping policy produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LimiterMode {
    Normal,
    ForcedSummary,
    AutoSummary,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LimiterResult {
    pub items: Vec<Value>,
    pub summary_applied: bool,
    pub estimated_tokens: usize,
    pub mode: LimiterMode,
}

/// Decide whether to return items verbatim or projected.
///
/// 1. Estimate tokens of the full serialization.
/// 2. Explicit `fields` or `summary_only` → project onto the explicit fields,
///    or `default_fields` when none were given.
/// 3. Otherwise, an estimate strictly above the hard limit → project onto
///    `default_fields`.
/// 4. Otherwise return the items unchanged.
pub fn limit_payload(items: Vec<Value>, config: &LimiterConfig, default_fields: &[String]) -> LimiterResult {
    let serialized = serde_json::to_string(&items).unwrap_or_default();
    let estimated_tokens = estimate_tokens(&serialized);

    let (mode, fields) = if let Some(fields) = config.explicit_fields() {
        (LimiterMode::ForcedSummary, fields)
    } else if config.summary_only {
        (LimiterMode::ForcedSummary, default_fields)
    } else if estimated_tokens > config.hard_token_limit() {
        (LimiterMode::AutoSummary, default_fields)
    } else {
        return LimiterResult {
            items,
            summary_applied: false,
            estimated_tokens,
            mode: LimiterMode::Normal,
        };
    };

    let projected = project_fields(items, fields);
    tracing::debug!(
        ?mode,
        estimated_tokens,
        limit = config.hard_token_limit(),
        fields = fields.len(),
        "payload summarized"
    );

    LimiterResult {
        items: projected.items,
        summary_applied: projected.applied_projection,
        estimated_tokens,
        mode,
    }
}
