use std::io::IsTerminal;
use std::sync::Arc;

use crate::cli::OutputFormat;
use brex_mcp::api::BrexClient;
use brex_mcp::config::types::BrexConfig;
use brex_mcp::handlers::Handlers;

#[derive(clap::Args)]
pub struct ReadArgs {
    /// Resource URI, e.g. 'brex://expenses/card?limit=10&summary_only=true'
    pub uri: String,
}

pub fn run(args: ReadArgs, config: &BrexConfig, format: OutputFormat) -> anyhow::Result<()> {
    let client = BrexClient::from_config(config)?;
    let handlers = Handlers::new(Arc::new(client), config)?;

    let rt = tokio::runtime::Runtime::new()?;
    let envelope = rt.block_on(handlers.read_resource(&args.uri))?;

    let color = std::io::stdout().is_terminal();
    crate::cli::output::output_envelope(&envelope, format, color, &mut std::io::stdout())
}
