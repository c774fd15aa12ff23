//! Panel catalogue and per-panel state machine
//!
//! Each panel moves `Idle -> Loading -> Success | Error`. Every dispatch
//! bumps the panel's generation; a response is applied only when it carries
//! the current generation and the panel is still loading, so the most
//! recently issued request wins.

use std::fmt;
use std::sync::Arc;

use shopboard_types::TabularRecord;

use crate::error::PanelError;

/// Records held by a panel in `Success`, shared with renderers and export
pub type Payload = Arc<Vec<TabularRecord>>;

pub const NETWORK_ERROR_MESSAGE: &str = "Network error occurred.";
pub const DEFAULT_EMPTY_MESSAGE: &str = "No data available for the selected criteria.";
pub const LOW_STOCK_EMPTY_MESSAGE: &str = "No low stock items found. All products are well stocked!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PanelKind {
    Kpi,
    Revenue,
    RepeatRate,
    Cohort,
    Rfm,
    TopProducts,
    LowStock,
    Funnel,
}

pub const PANEL_COUNT: usize = 8;

impl PanelKind {
    pub const ALL: [PanelKind; PANEL_COUNT] = [
        PanelKind::Kpi,
        PanelKind::Revenue,
        PanelKind::RepeatRate,
        PanelKind::Cohort,
        PanelKind::Rfm,
        PanelKind::TopProducts,
        PanelKind::LowStock,
        PanelKind::Funnel,
    ];

    /// Backend path, relative to the API base URL
    pub fn endpoint(&self) -> &'static str {
        match self {
            PanelKind::Kpi => "/analytics/kpi",
            PanelKind::Revenue => "/analytics/revenue-by-month-category",
            PanelKind::RepeatRate => "/analytics/repeat-rate",
            PanelKind::Cohort => "/analytics/cohort-retention",
            PanelKind::Rfm => "/analytics/rfm",
            PanelKind::TopProducts => "/analytics/top-products",
            PanelKind::LowStock => "/analytics/low-stock",
            PanelKind::Funnel => "/analytics/order-funnel",
        }
    }

    /// Required query parameters, in the order they are sent
    pub fn params(&self) -> &'static [&'static str] {
        match self {
            PanelKind::Kpi => &["date"],
            PanelKind::Revenue | PanelKind::RepeatRate | PanelKind::Funnel => &["start", "end"],
            PanelKind::Cohort => &["start", "end", "horizon"],
            PanelKind::Rfm => &["as_of"],
            PanelKind::TopProducts => &["metric", "n", "start", "end"],
            PanelKind::LowStock => &["n"],
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            PanelKind::Kpi => "KPI Dashboard",
            PanelKind::Revenue => "Revenue by Month & Category",
            PanelKind::RepeatRate => "Repeat Rate Analysis",
            PanelKind::Cohort => "Cohort Retention",
            PanelKind::Rfm => "RFM Analysis",
            PanelKind::TopProducts => "Top Products",
            PanelKind::LowStock => "Low Stock Alert",
            PanelKind::Funnel => "Order Funnel",
        }
    }

    /// Shown when the backend fails without its own `error` message
    pub fn failure_message(&self) -> &'static str {
        match self {
            PanelKind::Kpi => "Failed to load KPI data.",
            PanelKind::Revenue => "Failed to load revenue data.",
            PanelKind::RepeatRate => "Failed to load repeat rate data.",
            PanelKind::Cohort => "Failed to load cohort data.",
            PanelKind::Rfm => "Failed to load RFM data.",
            PanelKind::TopProducts => "Failed to load products data.",
            PanelKind::LowStock => "Failed to load inventory data.",
            PanelKind::Funnel => "Failed to load funnel data.",
        }
    }

    pub fn empty_message(&self) -> &'static str {
        match self {
            PanelKind::LowStock => LOW_STOCK_EMPTY_MESSAGE,
            _ => DEFAULT_EMPTY_MESSAGE,
        }
    }

    /// User-facing message for the given missing parameters
    pub fn validation_message(missing: &[&str]) -> String {
        if missing.iter().any(|p| *p == "start" || *p == "end") {
            "Please select start and end dates.".to_string()
        } else if missing.contains(&"date") {
            "Please select a date.".to_string()
        } else if missing.contains(&"as_of") {
            "Please select an \"as of\" date.".to_string()
        } else {
            format!("Please provide: {}.", missing.join(", "))
        }
    }
}

impl fmt::Display for PanelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelStatus {
    Idle,
    Loading,
    Success,
    Error,
}

/// Outcome of applying a response to a panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Applied(PanelStatus),
    /// The response belonged to a superseded dispatch and was discarded
    Stale,
}

#[derive(Debug, Clone)]
pub struct PanelState {
    status: PanelStatus,
    payload: Option<Payload>,
    error: Option<PanelError>,
    generation: u64,
}

impl Default for PanelState {
    fn default() -> Self {
        Self::new()
    }
}

impl PanelState {
    pub fn new() -> Self {
        Self {
            status: PanelStatus::Idle,
            payload: None,
            error: None,
            generation: 0,
        }
    }

    pub fn status(&self) -> PanelStatus {
        self.status
    }

    /// Set only in `Success`
    pub fn payload(&self) -> Option<&Payload> {
        self.payload.as_ref()
    }

    /// Set only in `Error`
    pub fn error(&self) -> Option<&PanelError> {
        self.error.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Enter `Loading`, dropping any previous payload or error. Returns the
    /// generation the response must carry.
    pub fn begin_loading(&mut self) -> u64 {
        self.generation += 1;
        self.status = PanelStatus::Loading;
        self.payload = None;
        self.error = None;
        self.generation
    }

    /// Enter `Error` without issuing a request. In-flight responses become stale.
    pub fn fail_validation(&mut self, error: PanelError) {
        self.generation += 1;
        self.status = PanelStatus::Error;
        self.payload = None;
        self.error = Some(error);
    }

    /// Apply a response issued under `generation`
    pub fn resolve(
        &mut self,
        generation: u64,
        outcome: Result<Vec<TabularRecord>, PanelError>,
    ) -> Resolution {
        if generation != self.generation || self.status != PanelStatus::Loading {
            return Resolution::Stale;
        }
        match outcome {
            Ok(records) => {
                self.status = PanelStatus::Success;
                self.payload = Some(Arc::new(records));
            }
            Err(error) => {
                self.status = PanelStatus::Error;
                self.error = Some(error);
            }
        }
        Resolution::Applied(self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopboard_types::CellValue;

    fn one_record() -> Vec<TabularRecord> {
        vec![TabularRecord::from_pairs([("orders", CellValue::Int(3))])]
    }

    #[test]
    fn test_params_in_declared_order() {
        assert_eq!(PanelKind::TopProducts.params(), &["metric", "n", "start", "end"]);
        assert_eq!(PanelKind::Cohort.params(), &["start", "end", "horizon"]);
        assert_eq!(PanelKind::Rfm.endpoint(), "/analytics/rfm");
    }

    #[test]
    fn test_validation_messages() {
        assert_eq!(
            PanelKind::validation_message(&["end"]),
            "Please select start and end dates."
        );
        assert_eq!(PanelKind::validation_message(&["date"]), "Please select a date.");
        assert_eq!(
            PanelKind::validation_message(&["as_of"]),
            "Please select an \"as of\" date."
        );
        assert_eq!(
            PanelKind::validation_message(&["metric", "n"]),
            "Please provide: metric, n."
        );
    }

    #[test]
    fn test_begin_loading_clears_previous_result() {
        let mut state = PanelState::new();
        let gen = state.begin_loading();
        state.resolve(gen, Ok(one_record()));
        assert_eq!(state.status(), PanelStatus::Success);

        state.begin_loading();
        assert_eq!(state.status(), PanelStatus::Loading);
        assert!(state.payload().is_none());
        assert!(state.error().is_none());
    }

    #[test]
    fn test_last_request_wins() {
        let mut state = PanelState::new();
        let first = state.begin_loading();
        let second = state.begin_loading();

        assert_eq!(
            state.resolve(second, Ok(one_record())),
            Resolution::Applied(PanelStatus::Success)
        );
        assert_eq!(
            state.resolve(first, Err(PanelError::transport(NETWORK_ERROR_MESSAGE))),
            Resolution::Stale
        );
        assert_eq!(state.status(), PanelStatus::Success);
        assert_eq!(state.payload().map(|p| p.len()), Some(1));
    }

    #[test]
    fn test_validation_failure_supersedes_in_flight() {
        let mut state = PanelState::new();
        let gen = state.begin_loading();
        state.fail_validation(PanelError::validation("Please select a date."));

        assert_eq!(state.resolve(gen, Ok(one_record())), Resolution::Stale);
        assert_eq!(state.status(), PanelStatus::Error);
        assert_eq!(
            state.error().map(|e| e.message.as_str()),
            Some("Please select a date.")
        );
    }

    #[test]
    fn test_response_after_settle_is_stale() {
        let mut state = PanelState::new();
        let gen = state.begin_loading();
        state.resolve(gen, Ok(Vec::new()));
        assert_eq!(state.resolve(gen, Ok(one_record())), Resolution::Stale);
        assert_eq!(state.payload().map(|p| p.len()), Some(0));
    }
}
