use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use super::{BrexApi, Collection, ItemRef, ListParams, Page};
use crate::config::types::BrexConfig;
use crate::config::api_token;
use crate::error::{BrexError, Result};

/// Longest upstream error body kept in an error message.
const MAX_ERROR_BODY: usize = 512;

/// HTTP client for the Brex platform API.
pub struct BrexClient {
    http: reqwest::Client,
    base_url: Url,
    token: String,
}

impl BrexClient {
    pub fn new(base_url: &str, token: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| BrexError::Config(format!("invalid api base url '{base_url}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(BrexError::Config(format!("api base url cannot be a base: {base_url}")));
        }
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("brex-mcp/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url,
            token: token.into(),
        })
    }

    /// Build a client from config, reading the token from the environment.
    pub fn from_config(config: &BrexConfig) -> Result<Self> {
        let token = api_token(config)?;
        Self::new(
            &config.api.base_url,
            token,
            Duration::from_secs(config.api.timeout_secs),
        )
    }

    /// Join path segments onto the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json(&self, url: Url, query: &[(String, String)]) -> Result<Value> {
        debug!(%url, params = query.len(), "GET");
        let response = self
            .http
            .get(url.clone())
            .bearer_auth(&self.token)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            if body.len() > MAX_ERROR_BODY {
                let mut end = MAX_ERROR_BODY;
                while !body.is_char_boundary(end) {
                    end -= 1;
                }
                body.truncate(end);
            }
            warn!(%url, status = status.as_u16(), "brex api error");
            return Err(BrexError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| BrexError::DataShape(format!("response is not JSON: {e}")))
    }
}

#[async_trait]
impl BrexApi for BrexClient {
    async fn list(&self, collection: &Collection, params: &ListParams) -> Result<Page> {
        let url = self.endpoint(&collection.segments());
        let value = self.get_json(url, &params.query_pairs()).await?;
        Page::from_value(value)
    }

    async fn get(&self, item: &ItemRef) -> Result<Value> {
        let url = self.endpoint(&item.segments());
        let value = self.get_json(url, &[]).await?;
        if !value.is_object() {
            return Err(BrexError::DataShape("expected a single JSON object".into()));
        }
        Ok(value)
    }
}
