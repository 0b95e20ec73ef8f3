use serde_json::json;

use crate::cli::OutputFormat;
use brex_mcp::core::routes::ResourceRouter;

pub fn run(format: OutputFormat) -> anyhow::Result<()> {
    let router = ResourceRouter::new()?;

    match format {
        OutputFormat::Json => {
            let routes: Vec<_> = router
                .templates()
                .map(|(template, route)| {
                    json!({
                        "template": template.pattern(),
                        "params": template.params(),
                        "kind": route.kind(),
                        "name": route.name(),
                    })
                })
                .collect();
            serde_json::to_writer_pretty(std::io::stdout(), &routes)?;
            println!();
        }
        OutputFormat::Human => {
            for (template, route) in router.templates() {
                println!("{}", crate::cli::display::render_route_line(template.pattern(), route));
            }
        }
    }

    Ok(())
}
