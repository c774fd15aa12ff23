//! Rows for the plain tabular panels

use serde::{Deserialize, Serialize};

use crate::lenient;
use crate::record::CellValue;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueRow {
    pub month: String,
    pub category_name: String,
    #[serde(default, deserialize_with = "lenient::option_float")]
    pub revenue: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepeatRateRow {
    pub month: String,
    #[serde(default, deserialize_with = "lenient::option_integer")]
    pub total_customers: Option<u64>,
    #[serde(default, deserialize_with = "lenient::option_integer")]
    pub repeat_customers: Option<u64>,
    #[serde(default, deserialize_with = "lenient::option_float")]
    pub repeat_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopProductRow {
    pub product_id: CellValue,
    pub product_name: String,
    pub category_name: String,
    #[serde(default, deserialize_with = "lenient::option_integer")]
    pub units_sold: Option<u64>,
    #[serde(default, deserialize_with = "lenient::option_float")]
    pub revenue: Option<f64>,
    #[serde(default, deserialize_with = "lenient::option_float")]
    pub margin: Option<f64>,
    #[serde(default, deserialize_with = "lenient::option_float")]
    pub margin_percent: Option<f64>,
}

/// Inventory row below its reorder point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LowStockRow {
    pub product_id: CellValue,
    pub product_name: String,
    pub category_name: String,
    #[serde(default, deserialize_with = "lenient::option_integer")]
    pub on_hand_qty: Option<i64>,
    #[serde(default, deserialize_with = "lenient::option_integer")]
    pub reorder_point: Option<i64>,
    #[serde(default, deserialize_with = "lenient::option_integer")]
    pub recommended_order_qty: Option<i64>,
    pub urgency: String,
}

/// Orders per status, with share of the period's total
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunnelRow {
    pub status: String,
    #[serde(default, deserialize_with = "lenient::option_integer")]
    pub orders: Option<u64>,
    #[serde(default, deserialize_with = "lenient::option_float")]
    pub percentage: Option<f64>,
}
