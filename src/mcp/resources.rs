// MCP resource listing and reads.
//
// Collections are listed by their base URI. Single items are reachable by
// appending `/{id}` where the route allows it, and every read accepts
// `?cursor=&limit=&fields=&summary_only=true`.

use rmcp::ErrorData as McpError;
use rmcp::model::{AnnotateAble, RawResource, ReadResourceResult, Resource, ResourceContents};

use brex_mcp::core::routes::ResourceRoute;
use brex_mcp::handlers::Handlers;

use super::format::resource_error;

/// One listed resource per route, addressed by its collection URI.
pub fn list(handlers: &Handlers) -> Vec<Resource> {
    handlers
        .router()
        .templates()
        .map(|(template, route)| {
            let mut raw = RawResource::new(route.base_uri(), route.name());
            raw.description = Some(describe(route, template.pattern()));
            raw.mime_type = Some("application/json".into());
            raw.no_annotation()
        })
        .collect()
}

fn describe(route: ResourceRoute, pattern: &str) -> String {
    format!("{} Template: {}", route.description(), pattern)
}

pub async fn read(handlers: &Handlers, uri: &str) -> Result<ReadResourceResult, McpError> {
    let envelope = handlers
        .read_resource(uri)
        .await
        .map_err(|e| resource_error(uri, e))?;
    Ok(ReadResourceResult {
        contents: vec![ResourceContents::text(envelope.to_json(), uri)],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use brex_mcp::api::{BrexApi, Collection, ItemRef, ListParams, Page};
    use brex_mcp::config::types::BrexConfig;
    use serde_json::{Value, json};

    struct OneBudget;

    #[async_trait]
    impl BrexApi for OneBudget {
        async fn list(&self, _: &Collection, _: &ListParams) -> brex_mcp::error::Result<Page> {
            Ok(Page {
                items: vec![json!({"budget_id": "b1", "name": "Travel", "description": "trips"})],
                next_cursor: None,
            })
        }

        async fn get(&self, _: &ItemRef) -> brex_mcp::error::Result<Value> {
            Ok(json!({"budget_id": "b1"}))
        }
    }

    fn handlers() -> Handlers {
        Handlers::new(Arc::new(OneBudget), &BrexConfig::default()).unwrap()
    }

    #[test]
    fn lists_every_route() {
        let resources = list(&handlers());
        assert_eq!(resources.len(), ResourceRoute::ALL.len());
        assert!(resources.iter().any(|r| r.raw.uri == "brex://expenses/card"));
    }

    #[tokio::test]
    async fn read_wraps_envelope() {
        let result = read(&handlers(), "brex://budgets?fields=name").await.unwrap();
        let ResourceContents::TextResourceContents { text, uri, .. } = &result.contents[0] else {
            panic!("expected text contents");
        };
        assert_eq!(uri, "brex://budgets?fields=name");
        let value: Value = serde_json::from_str(text).unwrap();
        assert_eq!(value["items"], json!([{"name": "Travel"}]));
        assert_eq!(value["meta"]["summary_applied"], true);
    }

    #[tokio::test]
    async fn unknown_uri_is_not_found() {
        let err = read(&handlers(), "brex://nope").await.unwrap_err();
        assert_eq!(err.code, rmcp::model::ErrorCode::RESOURCE_NOT_FOUND);
    }
}
