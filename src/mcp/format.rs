// Protocol-facing rendering of handler results and errors.
//
// Caller mistakes become invalid-params errors, unknown URIs become
// resource-not-found, upstream trouble is reported as a tool error result
// (tools) or an internal error (resources).

use rmcp::ErrorData as McpError;
use rmcp::model::{CallToolResult, Content};
use serde_json::json;

use brex_mcp::core::envelope::Envelope;
use brex_mcp::error::{BrexError, ErrorKind};

/// Render an envelope as a successful tool result.
pub fn tool_success(envelope: &Envelope) -> CallToolResult {
    CallToolResult::success(vec![Content::text(envelope.to_json())])
}

/// Map a handler error for a tool call. Validation failures are protocol
/// errors; everything else is reported to the model as a failed tool run.
pub fn tool_failure(err: BrexError) -> Result<CallToolResult, McpError> {
    match err.kind() {
        ErrorKind::Validation => Err(McpError::invalid_params(err.to_string(), None)),
        kind => {
            tracing::warn!(error = %err, ?kind, "tool call failed");
            Ok(CallToolResult::error(vec![Content::text(format!(
                "[error] {}",
                err
            ))]))
        }
    }
}

/// Map a handler error for a resource read.
pub fn resource_error(uri: &str, err: BrexError) -> McpError {
    let data = Some(json!({ "uri": uri }));
    match err.kind() {
        ErrorKind::Validation => McpError::invalid_params(err.to_string(), data),
        ErrorKind::NotFound => McpError::resource_not_found(err.to_string(), data),
        ErrorKind::Upstream | ErrorKind::DataShape | ErrorKind::Config => {
            tracing::warn!(uri, error = %err, "resource read failed");
            McpError::internal_error(err.to_string(), data)
        }
    }
}
