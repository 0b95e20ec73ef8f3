pub mod commands;
pub mod display;
pub mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use brex_mcp::config::types::BrexConfig;

#[derive(Parser)]
#[command(name = "brex-mcp", about = "Brex data for language-model hosts, over MCP.", version)]
pub struct Cli {
    /// Start MCP server over stdio
    #[arg(long)]
    pub mcp: bool,

    /// Config file (default: ~/.config/brex-mcp/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "human")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the effective configuration
    Config,
    /// List resource URI templates
    Routes,
    /// Read a brex:// resource and print the response envelope
    Read(commands::read::ReadArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, clap::ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

/// Dispatch a CLI command.
pub fn run(cli: Cli, config: &BrexConfig) -> anyhow::Result<()> {
    match cli.command {
        Some(Commands::Config) => commands::config::run(config, cli.format),
        Some(Commands::Routes) => commands::routes::run(cli.format),
        Some(Commands::Read(args)) => commands::read::run(args, config, cli.format),
        None => {
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
            Ok(())
        }
    }
}
