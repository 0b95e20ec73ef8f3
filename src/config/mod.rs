pub mod types;

use std::path::{Path, PathBuf};

use crate::error::{BrexError, Result};
use types::BrexConfig;

/// Environment variable that overrides `[api] base_url`.
pub const BASE_URL_ENV: &str = "BREX_API_BASE_URL";

/// Load config from `path`, or the XDG config file when `path` is None.
/// A missing XDG file means defaults; a missing explicit path is an error.
pub fn load_config(path: Option<&Path>) -> Result<BrexConfig> {
    let (path, required) = match path {
        Some(p) => (p.to_path_buf(), true),
        None => (config_path(), false),
    };

    let mut config = if path.exists() {
        let text = std::fs::read_to_string(&path)
            .map_err(|e| BrexError::Config(format!("failed to read {}: {}", path.display(), e)))?;
        parse_config(&text)?
    } else if required {
        return Err(BrexError::Config(format!("config file not found: {}", path.display())));
    } else {
        BrexConfig::default()
    };

    if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
        if !base_url.is_empty() {
            config.api.base_url = base_url;
        }
    }

    validate(&config)?;
    Ok(config)
}

/// Parse TOML config text. Unset keys take their defaults.
pub fn parse_config(text: &str) -> Result<BrexConfig> {
    toml::from_str(text).map_err(|e| BrexError::Config(e.to_string()))
}

/// Reject configs the limiter and handlers cannot work with.
pub fn validate(config: &BrexConfig) -> Result<()> {
    let limits = &config.limits;
    if limits.hard_token_limit == 0 {
        return Err(BrexError::Config("limits.hard_token_limit must be positive".into()));
    }
    if limits.max_page_size == 0 || limits.max_items == 0 {
        return Err(BrexError::Config("limits.max_page_size and limits.max_items must be positive".into()));
    }
    if limits.default_page_size == 0 || limits.default_page_size > limits.max_page_size {
        return Err(BrexError::Config(format!(
            "limits.default_page_size must be between 1 and {}",
            limits.max_page_size
        )));
    }
    if config.api.timeout_secs == 0 {
        return Err(BrexError::Config("api.timeout_secs must be positive".into()));
    }
    config.summary_overrides()?;
    Ok(())
}

/// Read the API token from the environment variable named in config.
pub fn api_token(config: &BrexConfig) -> Result<String> {
    std::env::var(&config.api.token_env)
        .ok()
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| BrexError::Config(format!("{} is not set", config.api.token_env)))
}

/// Return XDG config dir (~/.config/brex-mcp/)
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("~/.config"))
        .join("brex-mcp")
}

/// Return the default config file path
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}
