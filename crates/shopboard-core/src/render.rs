//! Panel renderers
//!
//! Pure functions from a [`PanelState`] to a [`PanelView`]: a
//! presentation-agnostic description of what the panel shows. Whether a
//! successful response is "empty" is decided here, not in the state machine.

use serde::de::DeserializeOwned;
use shopboard_types::{
    CohortRecord, FunnelRow, KpiSnapshot, LowStockRow, RecordError, RepeatRateRow, RevenueRow,
    RfmRecord, TabularRecord, TopProductRow,
};
use tracing::warn;

use crate::cohort::{build_pivot, CohortCell};
use crate::config::DEFAULT_RFM_PREVIEW_ROWS;
use crate::error::ErrorKind;
use crate::format::{
    format_count, format_currency, format_month_long, format_month_short, format_number,
    format_percent,
};
use crate::panel::{PanelKind, PanelState, PanelStatus};
use crate::segment::{RetentionTier, Segment, SegmentTier, UrgencyTier};

pub const LOADING_MESSAGE: &str = "Loading data...";
pub const IDLE_MESSAGE: &str = "Select inputs and load the panel.";
pub const MALFORMED_DATA_MESSAGE: &str = "Received malformed data from the server.";

/// Styling hint attached to a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleTier {
    Retention(RetentionTier),
    Segment(SegmentTier),
    Urgency(UrgencyTier),
}

impl StyleTier {
    pub fn class_name(&self) -> &'static str {
        match self {
            StyleTier::Retention(t) => t.class_name(),
            StyleTier::Segment(t) => t.class_name(),
            StyleTier::Urgency(t) => t.class_name(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    pub tier: Option<StyleTier>,
}

impl Cell {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tier: None,
        }
    }

    pub fn styled(text: impl Into<String>, tier: StyleTier) -> Self {
        Self {
            text: text.into(),
            tier: Some(tier),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KpiCard {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
    pub footnote: Option<String>,
}

impl TableView {
    fn new(columns: &[&str], rows: Vec<Vec<Cell>>) -> Self {
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows,
            footnote: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelView {
    Idle { message: &'static str },
    Loading { message: &'static str },
    Empty { message: &'static str },
    Error { kind: ErrorKind, message: String },
    Cards(Vec<KpiCard>),
    Table(TableView),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Maximum RFM rows shown; the full set is available through export
    pub rfm_preview_rows: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            rfm_preview_rows: DEFAULT_RFM_PREVIEW_ROWS,
        }
    }
}

/// Render a panel's current state
pub fn render(kind: PanelKind, state: &PanelState, options: &RenderOptions) -> PanelView {
    match state.status() {
        PanelStatus::Idle => PanelView::Idle {
            message: IDLE_MESSAGE,
        },
        PanelStatus::Loading => PanelView::Loading {
            message: LOADING_MESSAGE,
        },
        PanelStatus::Error => match state.error() {
            Some(err) => PanelView::Error {
                kind: err.kind,
                message: err.message.clone(),
            },
            None => PanelView::Error {
                kind: ErrorKind::Server,
                message: kind.failure_message().to_string(),
            },
        },
        PanelStatus::Success => match state.payload() {
            Some(records) if !records.is_empty() => render_records(kind, records, options),
            _ => PanelView::Empty {
                message: kind.empty_message(),
            },
        },
    }
}

/// Render a non-empty payload
pub fn render_records(
    kind: PanelKind,
    records: &[TabularRecord],
    options: &RenderOptions,
) -> PanelView {
    let view = match kind {
        PanelKind::Kpi => decode_all::<KpiSnapshot>(records).map(|rows| kpi_cards(&rows)),
        PanelKind::Revenue => decode_all::<RevenueRow>(records).map(|rows| revenue_table(&rows)),
        PanelKind::RepeatRate => decode_all::<RepeatRateRow>(records).map(|rows| repeat_rate_table(&rows)),
        PanelKind::Cohort => decode_all::<CohortRecord>(records).map(|rows| cohort_table(kind, &rows)),
        PanelKind::Rfm => decode_all::<RfmRecord>(records).map(|rows| rfm_table(&rows, options)),
        PanelKind::TopProducts => decode_all::<TopProductRow>(records).map(|rows| top_products_table(&rows)),
        PanelKind::LowStock => decode_all::<LowStockRow>(records).map(|rows| low_stock_table(&rows)),
        PanelKind::Funnel => decode_all::<FunnelRow>(records).map(|rows| funnel_table(&rows)),
    };

    view.unwrap_or_else(|e| {
        warn!(panel = ?kind, error = %e, "Cannot decode panel payload");
        PanelView::Error {
            kind: ErrorKind::Server,
            message: MALFORMED_DATA_MESSAGE.to_string(),
        }
    })
}

fn decode_all<T: DeserializeOwned>(records: &[TabularRecord]) -> Result<Vec<T>, RecordError> {
    records.iter().map(|r| r.decode::<T>()).collect()
}

fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

/// Format a nullable column, `-` for SQL `NULL`
fn fmt_or_dash<T>(value: Option<T>, format: impl FnOnce(T) -> String) -> String {
    value.map(format).unwrap_or_else(|| "-".to_string())
}

fn count_cell(value: Option<u64>) -> Cell {
    Cell::plain(fmt_or_dash(value, format_count))
}

fn currency_cell(value: Option<f64>) -> Cell {
    Cell::plain(fmt_or_dash(value, format_currency))
}

fn percent_cell(value: Option<f64>) -> Cell {
    Cell::plain(fmt_or_dash(value, format_percent))
}

fn quantity_cell(value: Option<i64>) -> Cell {
    Cell::plain(fmt_or_dash(value, |n| format_number(n as f64)))
}

fn literal_cell<T: ToString>(value: Option<T>) -> Cell {
    Cell::plain(fmt_or_dash(value, |v| v.to_string()))
}

fn kpi_cards(rows: &[KpiSnapshot]) -> PanelView {
    let Some(kpi) = rows.first() else {
        return PanelView::Empty {
            message: PanelKind::Kpi.empty_message(),
        };
    };
    PanelView::Cards(vec![
        KpiCard { label: "Orders", value: fmt_or_dash(kpi.orders, format_count) },
        KpiCard { label: "Revenue", value: fmt_or_dash(kpi.revenue, format_currency) },
        KpiCard { label: "AOV", value: fmt_or_dash(kpi.aov, format_currency) },
        KpiCard { label: "Customers", value: fmt_or_dash(kpi.unique_customers, format_count) },
        KpiCard { label: "New Customers", value: fmt_or_dash(kpi.new_customers, format_count) },
        KpiCard { label: "Repeat Rate", value: fmt_or_dash(kpi.repeat_rate, format_percent) },
        KpiCard { label: "Top Category", value: or_dash(kpi.top_category.as_deref()) },
        KpiCard { label: "Top Product", value: or_dash(kpi.top_product.as_deref()) },
    ])
}

fn revenue_table(rows: &[RevenueRow]) -> PanelView {
    let rows = rows
        .iter()
        .map(|r| {
            vec![
                Cell::plain(format_month_long(&r.month)),
                Cell::plain(&r.category_name),
                currency_cell(r.revenue),
            ]
        })
        .collect();
    PanelView::Table(TableView::new(&["Month", "Category", "Revenue"], rows))
}

fn repeat_rate_table(rows: &[RepeatRateRow]) -> PanelView {
    let rows = rows
        .iter()
        .map(|r| {
            vec![
                Cell::plain(format_month_long(&r.month)),
                count_cell(r.total_customers),
                count_cell(r.repeat_customers),
                percent_cell(r.repeat_rate),
            ]
        })
        .collect();
    PanelView::Table(TableView::new(
        &["Month", "Total Customers", "Repeat Customers", "Repeat Rate"],
        rows,
    ))
}

fn cohort_table(kind: PanelKind, records: &[CohortRecord]) -> PanelView {
    let matrix = match build_pivot(records) {
        Ok(Some(matrix)) => matrix,
        Ok(None) => {
            return PanelView::Empty {
                message: kind.empty_message(),
            }
        }
        Err(e) => {
            warn!(error = %e, "Cannot pivot cohort data");
            return PanelView::Error {
                kind: ErrorKind::Server,
                message: MALFORMED_DATA_MESSAGE.to_string(),
            };
        }
    };

    let mut columns = vec!["Cohort".to_string(), "Size".to_string()];
    columns.extend(matrix.column_labels());

    let rows = matrix
        .rows
        .iter()
        .map(|row| {
            let mut cells = Vec::with_capacity(row.cells.len() + 2);
            cells.push(Cell::plain(format_month_short(&row.cohort_key)));
            cells.push(Cell::plain(format_count(row.cohort_size)));
            cells.extend(row.cells.iter().map(|cell| match cell {
                CohortCell::Value { rate, tier } => {
                    Cell::styled(format_percent(*rate), StyleTier::Retention(*tier))
                }
                CohortCell::Missing => Cell::plain("-"),
            }));
            cells
        })
        .collect();

    PanelView::Table(TableView {
        columns,
        rows,
        footnote: None,
    })
}

fn rfm_table(rows: &[RfmRecord], options: &RenderOptions) -> PanelView {
    let limit = options.rfm_preview_rows;
    let shown = rows
        .iter()
        .take(limit)
        .map(|r| {
            let segment = Segment::parse(&r.segment);
            vec![
                Cell::plain(r.customer_id.to_string()),
                literal_cell(r.recency_days),
                literal_cell(r.frequency),
                currency_cell(r.monetary),
                literal_cell(r.r_score),
                literal_cell(r.f_score),
                literal_cell(r.m_score),
                literal_cell(r.rfm_total),
                Cell::styled(segment.label(), StyleTier::Segment(segment.tier())),
            ]
        })
        .collect();

    let mut table = TableView::new(
        &[
            "Customer ID",
            "Recency (days)",
            "Frequency",
            "Monetary",
            "R",
            "F",
            "M",
            "RFM Total",
            "Segment",
        ],
        shown,
    );
    if rows.len() > limit {
        table.footnote = Some(format!(
            "Showing first {} customers. Use download CSV for full data.",
            limit
        ));
    }
    PanelView::Table(table)
}

fn top_products_table(rows: &[TopProductRow]) -> PanelView {
    let rows = rows
        .iter()
        .map(|r| {
            vec![
                Cell::plain(r.product_id.to_string()),
                Cell::plain(&r.product_name),
                Cell::plain(&r.category_name),
                count_cell(r.units_sold),
                currency_cell(r.revenue),
                currency_cell(r.margin),
                percent_cell(r.margin_percent),
            ]
        })
        .collect();
    PanelView::Table(TableView::new(
        &[
            "Product ID",
            "Product Name",
            "Category",
            "Units Sold",
            "Revenue",
            "Margin",
            "Margin %",
        ],
        rows,
    ))
}

fn low_stock_table(rows: &[LowStockRow]) -> PanelView {
    let rows = rows
        .iter()
        .map(|r| {
            vec![
                Cell::plain(r.product_id.to_string()),
                Cell::plain(&r.product_name),
                Cell::plain(&r.category_name),
                quantity_cell(r.on_hand_qty),
                quantity_cell(r.reorder_point),
                quantity_cell(r.recommended_order_qty),
                Cell::styled(
                    &r.urgency,
                    StyleTier::Urgency(UrgencyTier::classify(&r.urgency)),
                ),
            ]
        })
        .collect();
    PanelView::Table(TableView::new(
        &[
            "Product ID",
            "Product Name",
            "Category",
            "On Hand",
            "Reorder Point",
            "Recommended Order",
            "Urgency",
        ],
        rows,
    ))
}

fn funnel_table(rows: &[FunnelRow]) -> PanelView {
    let rows = rows
        .iter()
        .map(|r| {
            vec![
                Cell::plain(&r.status),
                count_cell(r.orders),
                percent_cell(r.percentage),
            ]
        })
        .collect();
    PanelView::Table(TableView::new(&["Status", "Orders", "Percentage"], rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PanelError;
    use serde_json::json;

    fn success(body: serde_json::Value) -> PanelState {
        let mut state = PanelState::new();
        let gen = state.begin_loading();
        state.resolve(gen, Ok(TabularRecord::from_json_body(body).unwrap()));
        state
    }

    fn table(view: PanelView) -> TableView {
        match view {
            PanelView::Table(table) => table,
            other => panic!("expected a table, got {:?}", other),
        }
    }

    fn texts(row: &[Cell]) -> Vec<&str> {
        row.iter().map(|c| c.text.as_str()).collect()
    }

    #[test]
    fn test_idle_loading_and_error_views() {
        let opts = RenderOptions::default();
        let mut state = PanelState::new();
        assert!(matches!(render(PanelKind::Kpi, &state, &opts), PanelView::Idle { .. }));

        let gen = state.begin_loading();
        assert_eq!(
            render(PanelKind::Kpi, &state, &opts),
            PanelView::Loading { message: "Loading data..." }
        );

        state.resolve(gen, Err(PanelError::transport("Network error occurred.")));
        assert_eq!(
            render(PanelKind::Kpi, &state, &opts),
            PanelView::Error {
                kind: ErrorKind::Transport,
                message: "Network error occurred.".to_string()
            }
        );
    }

    #[test]
    fn test_empty_payload_renders_empty_not_error() {
        let opts = RenderOptions::default();
        assert_eq!(
            render(PanelKind::Revenue, &success(json!([])), &opts),
            PanelView::Empty {
                message: "No data available for the selected criteria."
            }
        );
        assert_eq!(
            render(PanelKind::LowStock, &success(json!([])), &opts),
            PanelView::Empty {
                message: "No low stock items found. All products are well stocked!"
            }
        );
    }

    #[test]
    fn test_kpi_cards() {
        let state = success(json!({
            "orders": 1234, "revenue": 45678.9, "aov": 37.02,
            "unique_customers": 800, "new_customers": 120, "repeat_rate": 40.5,
            "top_category": "Kitchen", "top_product": null
        }));
        let PanelView::Cards(cards) = render(PanelKind::Kpi, &state, &RenderOptions::default())
        else {
            panic!("expected cards");
        };
        let values: Vec<_> = cards.iter().map(|c| (c.label, c.value.as_str())).collect();
        assert_eq!(
            values,
            vec![
                ("Orders", "1,234"),
                ("Revenue", "$45,678.90"),
                ("AOV", "$37.02"),
                ("Customers", "800"),
                ("New Customers", "120"),
                ("Repeat Rate", "40.5%"),
                ("Top Category", "Kitchen"),
                ("Top Product", "-"),
            ]
        );
    }

    #[test]
    fn test_cohort_heatmap() {
        let state = success(json!([
            {"cohort_month": "2024-01-01", "cohort_size": 100, "months_since": 0, "retention_rate": "100.00"},
            {"cohort_month": "2024-01-01", "cohort_size": 100, "months_since": 1, "retention_rate": "40.00"},
            {"cohort_month": "2024-02-01", "cohort_size": 50, "months_since": 0, "retention_rate": "100.00"}
        ]));
        let table = table(render(PanelKind::Cohort, &state, &RenderOptions::default()));
        assert_eq!(table.columns, vec!["Cohort", "Size", "M0", "M1"]);
        assert_eq!(texts(&table.rows[0]), vec!["Jan 2024", "100", "100%", "40%"]);
        assert_eq!(texts(&table.rows[1]), vec!["Feb 2024", "50", "100%", "-"]);
        assert_eq!(
            table.rows[0][3].tier,
            Some(StyleTier::Retention(RetentionTier::Medium))
        );
        assert_eq!(table.rows[1][3].tier, None);
    }

    #[test]
    fn test_duplicate_cohort_cell_is_server_error() {
        let state = success(json!([
            {"cohort_month": "2024-01", "cohort_size": 1, "months_since": 0, "retention_rate": 100},
            {"cohort_month": "2024-01", "cohort_size": 1, "months_since": 0, "retention_rate": 90}
        ]));
        assert!(matches!(
            render(PanelKind::Cohort, &state, &RenderOptions::default()),
            PanelView::Error { kind: ErrorKind::Server, .. }
        ));
    }

    #[test]
    fn test_rfm_preview_truncates_with_footnote() {
        let rows: Vec<_> = (0..5)
            .map(|i| {
                let segment = if i == 0 { "Champions" } else { "Hibernating" };
                json!({
                    "customer_id": i, "recency_days": 3, "frequency": 2, "monetary": 99.5,
                    "r_score": 5, "f_score": 4, "m_score": 3, "rfm_total": 12,
                    "segment": segment
                })
            })
            .collect();
        let state = success(serde_json::Value::Array(rows));
        let opts = RenderOptions { rfm_preview_rows: 3 };
        let table = table(render(PanelKind::Rfm, &state, &opts));

        assert_eq!(table.rows.len(), 3);
        assert_eq!(
            table.footnote.as_deref(),
            Some("Showing first 3 customers. Use download CSV for full data.")
        );
        assert_eq!(table.rows[0][3].text, "$99.50");
        assert_eq!(
            table.rows[0][8].tier.map(|t| t.class_name()),
            Some("segment-champions")
        );
        assert_eq!(
            table.rows[1][8].tier.map(|t| t.class_name()),
            Some("segment-loyal")
        );
    }

    #[test]
    fn test_low_stock_urgency_tier() {
        let state = success(json!([{
            "product_id": 17, "product_name": "Mug", "category_name": "Kitchen",
            "on_hand_qty": 0, "reorder_point": 1500, "recommended_order_qty": 3000,
            "urgency": "Out of Stock"
        }]));
        let table = table(render(PanelKind::LowStock, &state, &RenderOptions::default()));
        assert_eq!(
            texts(&table.rows[0]),
            vec!["17", "Mug", "Kitchen", "0", "1,500", "3,000", "Out of Stock"]
        );
        assert_eq!(
            table.rows[0][6].tier,
            Some(StyleTier::Urgency(UrgencyTier::OutOfStock))
        );
    }

    #[test]
    fn test_revenue_months_are_long_names() {
        let state = success(json!([{"month": "2024-03", "category_name": "Garden", "revenue": "1500.5"}]));
        let table = table(render(PanelKind::Revenue, &state, &RenderOptions::default()));
        assert_eq!(texts(&table.rows[0]), vec!["March 2024", "Garden", "$1,500.50"]);
    }

    #[test]
    fn test_malformed_payload_is_server_error() {
        let state = success(json!([{"status": "paid", "orders": "many", "percentage": 10}]));
        assert_eq!(
            render(PanelKind::Funnel, &state, &RenderOptions::default()),
            PanelView::Error {
                kind: ErrorKind::Server,
                message: MALFORMED_DATA_MESSAGE.to_string()
            }
        );
    }

    #[test]
    fn test_null_kpi_metrics_render_as_dash() {
        // A day without orders: SUM/COUNT aggregates come back NULL
        let state = success(json!({
            "orders": 0, "revenue": null, "aov": null,
            "unique_customers": 0, "new_customers": 0, "repeat_rate": null,
            "top_category": null, "top_product": null
        }));
        let PanelView::Cards(cards) = render(PanelKind::Kpi, &state, &RenderOptions::default())
        else {
            panic!("expected cards");
        };
        let values: Vec<_> = cards.iter().map(|c| (c.label, c.value.as_str())).collect();
        assert_eq!(
            values,
            vec![
                ("Orders", "0"),
                ("Revenue", "-"),
                ("AOV", "-"),
                ("Customers", "0"),
                ("New Customers", "0"),
                ("Repeat Rate", "-"),
                ("Top Category", "-"),
                ("Top Product", "-"),
            ]
        );
    }

    #[test]
    fn test_null_cell_only_blanks_its_own_row() {
        let state = success(json!([
            {"month": "2024-01", "total_customers": 40, "repeat_customers": 10, "repeat_rate": "25.00"},
            {"month": "2024-02", "total_customers": 0, "repeat_customers": 0, "repeat_rate": null}
        ]));
        let table = table(render(PanelKind::RepeatRate, &state, &RenderOptions::default()));
        assert_eq!(texts(&table.rows[0]), vec!["January 2024", "40", "10", "25%"]);
        assert_eq!(texts(&table.rows[1]), vec!["February 2024", "0", "0", "-"]);
    }

    #[test]
    fn test_null_cohort_rate_renders_missing() {
        let state = success(json!([
            {"cohort_month": "2024-01", "cohort_size": 10, "months_since": 0, "retention_rate": 100},
            {"cohort_month": "2024-01", "cohort_size": 10, "months_since": 1, "retention_rate": null}
        ]));
        let table = table(render(PanelKind::Cohort, &state, &RenderOptions::default()));
        assert_eq!(texts(&table.rows[0]), vec!["Jan 2024", "10", "100%", "-"]);
        assert_eq!(table.rows[0][3].tier, None);
    }
}
