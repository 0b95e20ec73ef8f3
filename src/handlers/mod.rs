//! Request handlers shared by the MCP server and the CLI. Each handler
//! fetches raw items through [`BrexApi`], then hands them to the payload
//! limiter together with the caller's shaping hints.

pub mod resources;
pub mod tools;

use std::sync::Arc;

use tracing::debug;

use crate::api::{BrexApi, Page};
use crate::config::types::{BrexConfig, LimitsConfig};
use crate::core::envelope::Envelope;
use crate::core::fields::{DataKind, SummaryFields};
use crate::core::limiter::{LimiterConfig, limit_payload};
use crate::core::query::check_limit;
use crate::core::routes::ResourceRouter;
use crate::error::Result;

pub struct Handlers {
    api: Arc<dyn BrexApi>,
    limits: LimitsConfig,
    summary_fields: SummaryFields,
    router: ResourceRouter,
}

impl Handlers {
    pub fn new(api: Arc<dyn BrexApi>, config: &BrexConfig) -> Result<Self> {
        Ok(Self {
            api,
            limits: config.limits.clone(),
            summary_fields: SummaryFields::with_overrides(&config.summary_overrides()?),
            router: ResourceRouter::new()?,
        })
    }

    pub fn router(&self) -> &ResourceRouter {
        &self.router
    }

    /// Validated page size, or the configured default.
    fn page_size(&self, limit: Option<u32>) -> Result<u32> {
        match limit {
            Some(limit) => check_limit(limit, self.limits.max_page_size),
            None => Ok(self.limits.default_page_size),
        }
    }

    /// Run a fetched page through the limiter and wrap it for the response.
    fn shape(
        &self,
        kind: DataKind,
        page: Page,
        summary_only: bool,
        fields: Option<Vec<String>>,
    ) -> Result<Envelope> {
        let config = LimiterConfig::new(summary_only, fields, self.limits.hard_token_limit)?;
        let limited = limit_payload(page.items, &config, self.summary_fields.for_kind(kind));
        debug!(
            kind = kind.label(),
            count = limited.items.len(),
            estimated_tokens = limited.estimated_tokens,
            summary_applied = limited.summary_applied,
            "response shaped"
        );
        Ok(Envelope::new(limited, page.next_cursor))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::Value;

    use crate::api::{BrexApi, Collection, ItemRef, ListParams, Page};
    use crate::error::{BrexError, Result};

    /// Canned API that records every call it receives.
    #[derive(Default)]
    pub struct FakeApi {
        pub pages: Mutex<Vec<Page>>,
        pub item: Option<Value>,
        pub lists: Mutex<Vec<(Collection, ListParams)>>,
        pub gets: Mutex<Vec<ItemRef>>,
    }

    impl FakeApi {
        pub fn with_pages(pages: Vec<Page>) -> Self {
            Self {
                pages: Mutex::new(pages),
                ..Default::default()
            }
        }

        pub fn with_item(item: Value) -> Self {
            Self {
                item: Some(item),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl BrexApi for FakeApi {
        async fn list(&self, collection: &Collection, params: &ListParams) -> Result<Page> {
            self.lists.lock().unwrap().push((collection.clone(), params.clone()));
            let mut pages = self.pages.lock().unwrap();
            if pages.is_empty() {
                return Ok(Page::default());
            }
            Ok(pages.remove(0))
        }

        async fn get(&self, item: &ItemRef) -> Result<Value> {
            self.gets.lock().unwrap().push(item.clone());
            self.item.clone().ok_or(BrexError::Upstream {
                status: 404,
                body: "not found".into(),
            })
        }
    }
}
