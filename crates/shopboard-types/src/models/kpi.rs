use serde::{Deserialize, Serialize};

use crate::lenient;

/// Daily KPI snapshot returned by `/analytics/kpi`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiSnapshot {
    #[serde(default, deserialize_with = "lenient::option_integer")]
    pub orders: Option<u64>,
    #[serde(default, deserialize_with = "lenient::option_float")]
    pub revenue: Option<f64>,
    #[serde(default, deserialize_with = "lenient::option_float")]
    pub aov: Option<f64>,
    #[serde(default, deserialize_with = "lenient::option_integer")]
    pub unique_customers: Option<u64>,
    #[serde(default, deserialize_with = "lenient::option_integer")]
    pub new_customers: Option<u64>,
    #[serde(default, deserialize_with = "lenient::option_float")]
    pub repeat_rate: Option<f64>,
    #[serde(default)]
    pub top_category: Option<String>,
    #[serde(default)]
    pub top_product: Option<String>,
}
