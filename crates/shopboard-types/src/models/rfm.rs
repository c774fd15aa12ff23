use serde::{Deserialize, Serialize};

use crate::lenient;
use crate::record::CellValue;

/// Per-customer RFM score row returned by `/analytics/rfm`
///
/// Each of `r_score`, `f_score`, `m_score` is in `1..=5`; `segment` is the
/// backend's label (e.g. "Champions", "At Risk").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RfmRecord {
    pub customer_id: CellValue,
    #[serde(default, deserialize_with = "lenient::option_integer")]
    pub recency_days: Option<u64>,
    #[serde(default, deserialize_with = "lenient::option_integer")]
    pub frequency: Option<u64>,
    #[serde(default, deserialize_with = "lenient::option_float")]
    pub monetary: Option<f64>,
    #[serde(default, deserialize_with = "lenient::option_integer")]
    pub r_score: Option<u8>,
    #[serde(default, deserialize_with = "lenient::option_integer")]
    pub f_score: Option<u8>,
    #[serde(default, deserialize_with = "lenient::option_integer")]
    pub m_score: Option<u8>,
    #[serde(default, deserialize_with = "lenient::option_integer")]
    pub rfm_total: Option<i64>,
    pub segment: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decodes_rfm_row() {
        let rec: RfmRecord = serde_json::from_value(json!({
            "customer_id": "C001",
            "recency_days": 12,
            "frequency": 4,
            "monetary": "310.20",
            "r_score": 5,
            "f_score": 4,
            "m_score": 3,
            "rfm_total": 12,
            "segment": "Champions"
        }))
        .unwrap();
        assert_eq!(rec.customer_id, CellValue::Text("C001".to_string()));
        assert_eq!(rec.monetary, Some(310.2));
        assert_eq!(rec.rfm_total, Some(12));
    }

    #[test]
    fn test_null_monetary_decodes_as_none() {
        let rec: RfmRecord = serde_json::from_value(json!({
            "customer_id": 7,
            "recency_days": 30,
            "frequency": 1,
            "monetary": null,
            "r_score": 2,
            "f_score": 1,
            "m_score": 1,
            "rfm_total": 4,
            "segment": "Lost"
        }))
        .unwrap();
        assert_eq!(rec.monetary, None);
        assert_eq!(rec.recency_days, Some(30));
    }
}
