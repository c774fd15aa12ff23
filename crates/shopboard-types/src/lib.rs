//! shopboard-types - Shared data types for shopboard
//!
//! This crate contains pure data structures without heavy dependencies.
//! No tokio, no async runtime - just serde-serializable types.
//!
//! Used by:
//! - shopboard-core (state machine, transforms, export)
//! - shopboard (CLI presentation)

pub mod lenient;
pub mod models;
pub mod record;

// Re-export record types
pub use record::{CellValue, RecordError, TabularRecord};

// Re-export typed rows
pub use models::{
    CohortRecord, FunnelRow, KpiSnapshot, LowStockRow, RepeatRateRow, RevenueRow, RfmRecord,
    TopProductRow,
};
