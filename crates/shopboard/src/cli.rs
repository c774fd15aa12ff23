//! Terminal output for panel views
//!
//! Renders a [`PanelView`] with comfy-table, or the raw panel payload as JSON.

use anyhow::{Context, Result};
use comfy_table::{Cell, Color, ContentArrangement, Table};
use serde_json::json;
use shopboard_core::{
    ErrorKind, PanelKind, PanelState, PanelStatus, PanelView, RetentionTier, SegmentTier,
    StyleTier, UrgencyTier,
};
use shopboard_types::TabularRecord;

/// Human-readable rendering of a panel view
pub fn format_view(kind: PanelKind, view: &PanelView, no_color: bool) -> String {
    match view {
        PanelView::Idle { message }
        | PanelView::Loading { message }
        | PanelView::Empty { message } => format!("{}\n\n{}", kind.title(), message),
        PanelView::Error { kind: err_kind, message } => {
            let prefix = match err_kind {
                ErrorKind::Validation => "Invalid input",
                ErrorKind::Transport => "Network error",
                ErrorKind::Server => "Server error",
            };
            format!("{}\n\n{}: {}", kind.title(), prefix, message)
        }
        PanelView::Cards(cards) => {
            let mut table = new_table();
            set_header(&mut table, ["Metric", "Value"].iter().copied(), no_color);
            for card in cards {
                table.add_row(vec![card.label, card.value.as_str()]);
            }
            format!("{}\n{}", kind.title(), table)
        }
        PanelView::Table(view) => {
            let mut table = new_table();
            set_header(&mut table, view.columns.iter().map(String::as_str), no_color);
            for row in &view.rows {
                table.add_row(row.iter().map(|cell| {
                    let out = Cell::new(&cell.text);
                    match (cell.tier, no_color) {
                        (Some(tier), false) => out.fg(tier_color(tier)),
                        _ => out,
                    }
                }));
            }
            let mut out = format!("{}\n{}", kind.title(), table);
            if let Some(footnote) = &view.footnote {
                out.push('\n');
                out.push_str(footnote);
            }
            out
        }
    }
}

/// Raw payload as pretty JSON; errors become `{"error", "kind"}`
pub fn format_json(state: &PanelState) -> Result<String> {
    let value = match (state.status(), state.payload(), state.error()) {
        (PanelStatus::Success, Some(payload), _) => {
            let records: &[TabularRecord] = payload;
            serde_json::to_value(records).context("Failed to serialize payload")?
        }
        (PanelStatus::Error, _, Some(err)) => json!({
            "error": err.message,
            "kind": err.kind.label(),
        }),
        _ => serde_json::Value::Null,
    };
    serde_json::to_string_pretty(&value).context("Failed to format JSON")
}

fn new_table() -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn set_header<'a>(table: &mut Table, columns: impl Iterator<Item = &'a str>, no_color: bool) {
    if no_color {
        table.set_header(columns.collect::<Vec<_>>());
    } else {
        table.set_header(columns.map(|c| Cell::new(c).fg(Color::Cyan)).collect::<Vec<_>>());
    }
}

fn tier_color(tier: StyleTier) -> Color {
    match tier {
        StyleTier::Retention(RetentionTier::High) => Color::Green,
        StyleTier::Retention(RetentionTier::Medium) => Color::Yellow,
        StyleTier::Retention(RetentionTier::Low) => Color::Red,
        StyleTier::Segment(SegmentTier::Champions) => Color::Green,
        StyleTier::Segment(SegmentTier::Loyal) => Color::Cyan,
        StyleTier::Segment(SegmentTier::AtRisk) => Color::Yellow,
        StyleTier::Segment(SegmentTier::Lost) => Color::Red,
        StyleTier::Urgency(UrgencyTier::Critical) => Color::Red,
        StyleTier::Urgency(UrgencyTier::Low) => Color::Yellow,
        StyleTier::Urgency(UrgencyTier::OutOfStock) => Color::DarkRed,
    }
}
