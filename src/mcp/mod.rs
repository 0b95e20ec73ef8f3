pub mod format;
pub mod resources;
pub mod tools;

use std::sync::Arc;

use rmcp::ServiceExt;

use brex_mcp::api::BrexClient;
use brex_mcp::config::types::BrexConfig;
use brex_mcp::handlers::Handlers;
use tools::BrexServer;

/// Start the MCP server over stdio. Blocks until the connection closes.
pub fn serve_stdio(config: &BrexConfig) -> anyhow::Result<()> {
    let client = BrexClient::from_config(config)?;
    let handlers = Arc::new(Handlers::new(Arc::new(client), config)?);

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        tracing::info!(base_url = %config.api.base_url, "serving MCP over stdio");
        let server = BrexServer::new(handlers);
        let service = server.serve(rmcp::transport::stdio()).await?;
        service.waiting().await?;
        tracing::info!("client disconnected");

        Ok(())
    })
}
