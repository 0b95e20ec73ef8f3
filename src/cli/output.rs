use std::io::Write;

use brex_mcp::core::envelope::Envelope;
use crate::cli::OutputFormat;

/// Write an envelope in the requested output format.
pub fn output_envelope(
    envelope: &Envelope,
    format: OutputFormat,
    color: bool,
    writer: &mut dyn Write,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *writer, envelope)?;
            writeln!(writer)?;
        }
        OutputFormat::Human => {
            writeln!(writer, "{}", super::display::render_header(envelope, color))?;
            for item in &envelope.items {
                writeln!(writer, "  {}", super::display::render_item(item))?;
            }
            if let Some(ref cursor) = envelope.meta.next_cursor {
                writeln!(writer, "→ next: cursor={}", cursor)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use brex_mcp::core::limiter::{LimiterConfig, limit_payload};
    use serde_json::json;

    fn envelope() -> Envelope {
        let limited = limit_payload(
            vec![json!({"id": "b1"}), json!({"id": "b2"})],
            &LimiterConfig::default(),
            &[],
        );
        Envelope::new(limited, Some("c9".into()))
    }

    #[test]
    fn human_output_lists_items_and_cursor() {
        let mut out = Vec::new();
        output_envelope(&envelope(), OutputFormat::Human, false, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("[listing] 2 items"));
        assert!(text.contains(r#"  {"id":"b1"}"#));
        assert!(text.ends_with("→ next: cursor=c9\n"));
    }

    #[test]
    fn json_output_is_the_envelope() {
        let mut out = Vec::new();
        output_envelope(&envelope(), OutputFormat::Json, false, &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["meta"]["count"], 2);
        assert_eq!(value["meta"]["next_cursor"], "c9");
    }
}
