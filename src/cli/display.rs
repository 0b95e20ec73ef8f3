use owo_colors::{OwoColorize, Style};
use serde_json::Value;

use brex_mcp::core::envelope::Envelope;
use brex_mcp::core::routes::ResourceRoute;

/// Longest rendering of a single item before it is cut off.
const MAX_ITEM_CHARS: usize = 160;

/// One-line header: item count, summary flag, token estimate.
pub fn render_header(envelope: &Envelope, color: bool) -> String {
    let meta = &envelope.meta;
    let mut header = format!("[listing] {} items", meta.count);
    if meta.summary_applied {
        header.push_str(" (summarized)");
    }
    header.push_str(&format!(" ~{} tokens", meta.estimated_tokens));

    if !color {
        return header;
    }
    header.style(Style::new().bold()).to_string()
}

/// Compact single-line JSON for an item, truncated for the terminal.
pub fn render_item(item: &Value) -> String {
    let text = item.to_string();
    if text.chars().count() <= MAX_ITEM_CHARS {
        return text;
    }
    let cut: String = text.chars().take(MAX_ITEM_CHARS).collect();
    format!("{cut}…")
}

/// A route line for `brex-mcp routes`.
pub fn render_route_line(pattern: &str, route: ResourceRoute) -> String {
    format!("{:<36} {:<17} {}", pattern, route.kind().label(), route.description())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn long_items_are_truncated() {
        let item = json!({"memo": "x".repeat(500)});
        let line = render_item(&item);
        assert_eq!(line.chars().count(), MAX_ITEM_CHARS + 1);
        assert!(line.ends_with('…'));
    }

    #[test]
    fn short_items_are_untouched() {
        assert_eq!(render_item(&json!({"id": 1})), r#"{"id":1}"#);
    }

    #[test]
    fn route_line_shows_kind() {
        let line = render_route_line("brex://budgets{/id}", ResourceRoute::Budgets);
        assert!(line.starts_with("brex://budgets{/id}"));
        assert!(line.contains("budget "));
    }
}
