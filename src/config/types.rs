use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::fields::DataKind;
use crate::core::limiter::DEFAULT_HARD_TOKEN_LIMIT;
use crate::error::{BrexError, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BrexConfig {
    pub api: ApiConfig,
    pub limits: LimitsConfig,
    pub logging: LoggingConfig,
    /// Per-kind replacements for the built-in summary projection, keyed by
    /// data kind name (`expense`, `card_transaction`, ...).
    pub summary_fields: HashMap<String, Vec<String>>,
}

impl BrexConfig {
    /// Summary field overrides with their keys resolved to data kinds.
    pub fn summary_overrides(&self) -> Result<HashMap<DataKind, Vec<String>>> {
        self.summary_fields
            .iter()
            .map(|(key, fields)| {
                let kind = serde_plain::from_str::<DataKind>(key)
                    .map_err(|_| BrexError::Config(format!("unknown data kind in [summary_fields]: {key}")))?;
                Ok((kind, fields.clone()))
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// Name of the environment variable holding the API token.
    pub token_env: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://platform.brexapis.com".into(),
            token_env: "BREX_API_KEY".into(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    pub hard_token_limit: usize,
    pub default_page_size: u32,
    pub max_page_size: u32,
    /// Upper bound on items gathered across pages by multi-page tools.
    pub max_items: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            hard_token_limit: DEFAULT_HARD_TOKEN_LIMIT,
            default_page_size: 50,
            max_page_size: 100,
            max_items: 1000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}
