use crate::cli::OutputFormat;
use brex_mcp::config::types::BrexConfig;

pub fn run(config: &BrexConfig, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(std::io::stdout(), config)?;
            println!();
        }
        OutputFormat::Human => {
            let toml_str = toml::to_string_pretty(config)?;
            println!("{}", toml_str);
        }
    }

    Ok(())
}
