use serde::{Deserialize, Serialize};

use crate::lenient;

/// One `(cohort, months_since)` retention observation
///
/// The backend names the key column `cohort_month`; `cohort_key` is accepted
/// as well. `retention_rate` is a percentage in `[0, 100]`, or `None` when
/// the backend sent `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortRecord {
    #[serde(rename = "cohort_month", alias = "cohort_key")]
    pub cohort_key: String,
    #[serde(deserialize_with = "lenient::integer")]
    pub cohort_size: u64,
    #[serde(deserialize_with = "lenient::integer")]
    pub months_since: u32,
    #[serde(default, deserialize_with = "lenient::option_float")]
    pub retention_rate: Option<f64>,
}

impl CohortRecord {
    pub fn new(
        cohort_key: impl Into<String>,
        cohort_size: u64,
        months_since: u32,
        retention_rate: f64,
    ) -> Self {
        Self {
            cohort_key: cohort_key.into(),
            cohort_size,
            months_since,
            retention_rate: Some(retention_rate),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decodes_backend_shape() {
        let rec: CohortRecord = serde_json::from_value(json!({
            "cohort_month": "2024-01-01",
            "cohort_size": 120,
            "months_since": 2,
            "retention_rate": "37.50"
        }))
        .unwrap();
        assert_eq!(rec.cohort_key, "2024-01-01");
        assert_eq!(rec.months_since, 2);
        assert_eq!(rec.retention_rate, Some(37.5));
    }

    #[test]
    fn test_accepts_cohort_key_alias() {
        let rec: CohortRecord = serde_json::from_value(json!({
            "cohort_key": "2024-02",
            "cohort_size": 50,
            "months_since": 0,
            "retention_rate": 100
        }))
        .unwrap();
        assert_eq!(rec, CohortRecord::new("2024-02", 50, 0, 100.0));
    }
}
