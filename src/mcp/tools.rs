// MCP server: tools plus resource handlers.
//
// Every tool returns the same JSON envelope: `items` and a `meta` block with
// `count`, `next_cursor`, `summary_applied` and `estimated_tokens`.

use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Implementation, ListResourcesResult, PaginatedRequestParam,
    ReadResourceRequestParam, ReadResourceResult, ServerCapabilities, ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData as McpError, RoleServer, ServerHandler, tool, tool_handler, tool_router};

use brex_mcp::handlers::Handlers;
use brex_mcp::handlers::tools::{
    GetAccountDetailsRequest, GetAllExpensesRequest, GetBudgetsRequest,
    GetCardTransactionsRequest, GetCashTransactionsRequest, GetExpensesRequest,
};

use super::{format, resources};

#[derive(Clone)]
pub struct BrexServer {
    handlers: Arc<Handlers>,
    tool_router: ToolRouter<Self>,
}

impl BrexServer {
    pub fn new(handlers: Arc<Handlers>) -> Self {
        Self {
            handlers,
            tool_router: Self::tool_router(),
        }
    }
}

#[tool_router]
impl BrexServer {
    #[tool(description = "List expenses with optional type, status, payment status and purchase date filters. Large pages are summarized automatically; pass fields or summary_only to control the shape.")]
    async fn get_expenses(
        &self,
        Parameters(req): Parameters<GetExpensesRequest>,
    ) -> Result<CallToolResult, McpError> {
        match self.handlers.get_expenses(req).await {
            Ok(envelope) => Ok(format::tool_success(&envelope)),
            Err(e) => format::tool_failure(e),
        }
    }

    #[tool(description = "Collect expenses across pages up to max_items. Returns next_cursor when the walk stopped early.")]
    async fn get_all_expenses(
        &self,
        Parameters(req): Parameters<GetAllExpensesRequest>,
    ) -> Result<CallToolResult, McpError> {
        match self.handlers.get_all_expenses(req).await {
            Ok(envelope) => Ok(format::tool_success(&envelope)),
            Err(e) => format::tool_failure(e),
        }
    }

    #[tool(description = "List card expenses with merchant details. Accepts the same filters as get_expenses except expense_type.")]
    async fn get_card_expenses(
        &self,
        Parameters(req): Parameters<GetExpensesRequest>,
    ) -> Result<CallToolResult, McpError> {
        match self.handlers.get_card_expenses(req).await {
            Ok(envelope) => Ok(format::tool_success(&envelope)),
            Err(e) => format::tool_failure(e),
        }
    }

    #[tool(description = "List settled transactions on the primary card account, optionally from a posting date.")]
    async fn get_card_transactions(
        &self,
        Parameters(req): Parameters<GetCardTransactionsRequest>,
    ) -> Result<CallToolResult, McpError> {
        match self.handlers.get_card_transactions(req).await {
            Ok(envelope) => Ok(format::tool_success(&envelope)),
            Err(e) => format::tool_failure(e),
        }
    }

    #[tool(description = "List transactions for one cash account.")]
    async fn get_cash_transactions(
        &self,
        Parameters(req): Parameters<GetCashTransactionsRequest>,
    ) -> Result<CallToolResult, McpError> {
        match self.handlers.get_cash_transactions(req).await {
            Ok(envelope) => Ok(format::tool_success(&envelope)),
            Err(e) => format::tool_failure(e),
        }
    }

    #[tool(description = "Show one cash account by id, or list card and cash accounts with balances.")]
    async fn get_account_details(
        &self,
        Parameters(req): Parameters<GetAccountDetailsRequest>,
    ) -> Result<CallToolResult, McpError> {
        match self.handlers.get_account_details(req).await {
            Ok(envelope) => Ok(format::tool_success(&envelope)),
            Err(e) => format::tool_failure(e),
        }
    }

    #[tool(description = "List budgets with their limits and recurrence.")]
    async fn get_budgets(
        &self,
        Parameters(req): Parameters<GetBudgetsRequest>,
    ) -> Result<CallToolResult, McpError> {
        match self.handlers.get_budgets(req).await {
            Ok(envelope) => Ok(format::tool_success(&envelope)),
            Err(e) => format::tool_failure(e),
        }
    }
}

#[tool_handler]
impl ServerHandler for BrexServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Brex accounts, expenses, transactions, budgets and statements. \
                 Read brex:// resources or call the get_* tools. Responses carry \
                 meta.summary_applied when large payloads were reduced to summary \
                 fields; request specific fields with `fields` to see more."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation::from_build_env(),
            ..Default::default()
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        Ok(ListResourcesResult::with_all_items(resources::list(&self.handlers)))
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        resources::read(&self.handlers, &request.uri).await
    }
}
