//! shopboard-core - Core library for shopboard
//!
//! Panel state machine, fetch dispatch, backend client, cohort pivot,
//! segment tiers, renderers, and CSV export for the e-commerce analytics
//! dashboard.

pub mod backend;
pub mod cohort;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod export;
pub mod format;
pub mod panel;
pub mod render;
pub mod segment;

pub use backend::{classify_response, AnalyticsBackend, FetchError, HttpBackend};
pub use cohort::{build_pivot, CohortCell, CohortMatrix, CohortRow, PivotError};
pub use config::BoardConfig;
pub use dispatch::{Dashboard, DispatchRequest, PanelInputs, RequestTicket};
pub use error::{CoreError, ErrorKind, PanelError};
pub use event::{EventBus, PanelEvent};
pub use export::{encode_csv, ExportArtifact, ExportError};
pub use panel::{PanelKind, PanelState, PanelStatus, Resolution};
pub use render::{render, Cell, KpiCard, PanelView, RenderOptions, StyleTier, TableView};
pub use segment::{RetentionTier, Segment, SegmentTier, UrgencyTier};
