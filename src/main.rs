use clap::Parser;

mod cli;
mod mcp;

use brex_mcp::{config, logging};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();
    let cfg = config::load_config(args.config.as_deref())?;
    logging::init(&cfg.logging);
    let path = args.config.clone().unwrap_or_else(config::config_path);
    tracing::debug!(path = %path.display(), "config loaded");

    if args.mcp {
        mcp::serve_stdio(&cfg)?;
    } else {
        cli::run(args, &cfg)?;
    }

    Ok(())
}
