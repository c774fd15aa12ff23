//! Typed rows for each analytics endpoint

pub mod cohort;
pub mod kpi;
pub mod rfm;
pub mod rows;

pub use cohort::CohortRecord;
pub use kpi::KpiSnapshot;
pub use rfm::RfmRecord;
pub use rows::{FunnelRow, LowStockRow, RepeatRateRow, RevenueRow, TopProductRow};
