//! Cohort retention pivot
//!
//! Turns the flat `(cohort, months_since, rate)` rows of
//! `/analytics/cohort-retention` into a rectangular matrix. Every cohort row
//! gets `max_months_since + 1` columns; offsets a cohort never reached, or
//! reached with a `null` rate, are `Missing`, not zero.

use std::collections::BTreeMap;

use shopboard_types::CohortRecord;
use thiserror::Error;

use crate::segment::RetentionTier;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PivotError {
    #[error("duplicate retention value for cohort {cohort_key} at month {months_since}")]
    DuplicateCell { cohort_key: String, months_since: u32 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum CohortCell {
    Value { rate: f64, tier: RetentionTier },
    Missing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CohortRow {
    pub cohort_key: String,
    pub cohort_size: u64,
    pub cells: Vec<CohortCell>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CohortMatrix {
    pub max_months_since: u32,
    /// Ascending by cohort key
    pub rows: Vec<CohortRow>,
}

impl CohortMatrix {
    pub fn column_count(&self) -> usize {
        self.max_months_since as usize + 1
    }

    /// `M0`, `M1`, ... one label per month offset
    pub fn column_labels(&self) -> Vec<String> {
        (0..=self.max_months_since).map(|m| format!("M{}", m)).collect()
    }
}

struct CohortAccumulator {
    cohort_size: u64,
    rates: BTreeMap<u32, Option<f64>>,
}

/// Build the matrix. `Ok(None)` when there is nothing to show.
pub fn build_pivot(records: &[CohortRecord]) -> Result<Option<CohortMatrix>, PivotError> {
    let Some(max_months_since) = records.iter().map(|r| r.months_since).max() else {
        return Ok(None);
    };

    let mut cohorts: BTreeMap<&str, CohortAccumulator> = BTreeMap::new();
    for record in records {
        let entry = cohorts
            .entry(record.cohort_key.as_str())
            .or_insert_with(|| CohortAccumulator {
                cohort_size: record.cohort_size,
                rates: BTreeMap::new(),
            });
        if entry
            .rates
            .insert(record.months_since, record.retention_rate)
            .is_some()
        {
            return Err(PivotError::DuplicateCell {
                cohort_key: record.cohort_key.clone(),
                months_since: record.months_since,
            });
        }
    }

    let rows = cohorts
        .into_iter()
        .map(|(key, acc)| CohortRow {
            cohort_key: key.to_string(),
            cohort_size: acc.cohort_size,
            cells: (0..=max_months_since)
                .map(|m| match acc.rates.get(&m) {
                    Some(&Some(rate)) => CohortCell::Value {
                        rate,
                        tier: RetentionTier::classify(rate),
                    },
                    Some(None) | None => CohortCell::Missing,
                })
                .collect(),
        })
        .collect();

    Ok(Some(CohortMatrix {
        max_months_since,
        rows,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(rate: f64, tier: RetentionTier) -> CohortCell {
        CohortCell::Value { rate, tier }
    }

    #[test]
    fn test_empty_input_is_no_data() {
        assert_eq!(build_pivot(&[]).unwrap(), None);
    }

    #[test]
    fn test_short_cohort_padded_with_missing() {
        let records = vec![
            CohortRecord::new("2024-01", 100, 0, 100.0),
            CohortRecord::new("2024-01", 100, 1, 40.0),
            CohortRecord::new("2024-02", 50, 0, 100.0),
        ];
        let matrix = build_pivot(&records).unwrap().unwrap();

        assert_eq!(matrix.column_labels(), vec!["M0", "M1"]);
        assert_eq!(matrix.rows.len(), 2);

        let jan = &matrix.rows[0];
        assert_eq!(jan.cohort_key, "2024-01");
        assert_eq!(jan.cohort_size, 100);
        assert_eq!(
            jan.cells,
            vec![
                value(100.0, RetentionTier::High),
                value(40.0, RetentionTier::Medium)
            ]
        );

        let feb = &matrix.rows[1];
        assert_eq!(feb.cohort_size, 50);
        assert_eq!(
            feb.cells,
            vec![value(100.0, RetentionTier::High), CohortCell::Missing]
        );
    }

    #[test]
    fn test_rows_sorted_regardless_of_input_order() {
        let records = vec![
            CohortRecord::new("2024-03", 10, 0, 100.0),
            CohortRecord::new("2024-01", 30, 2, 10.0),
            CohortRecord::new("2024-02", 20, 0, 100.0),
        ];
        let matrix = build_pivot(&records).unwrap().unwrap();
        let keys: Vec<_> = matrix.rows.iter().map(|r| r.cohort_key.as_str()).collect();
        assert_eq!(keys, vec!["2024-01", "2024-02", "2024-03"]);

        // Every row spans the global maximum offset
        assert_eq!(matrix.column_count(), 3);
        assert!(matrix.rows.iter().all(|r| r.cells.len() == 3));
        assert_eq!(matrix.rows[0].cells[0], CohortCell::Missing);
        assert_eq!(matrix.rows[0].cells[2], value(10.0, RetentionTier::Low));
    }

    #[test]
    fn test_cohort_size_taken_from_first_record() {
        let records = vec![
            CohortRecord::new("2024-01", 100, 0, 100.0),
            CohortRecord::new("2024-01", 999, 1, 50.0),
        ];
        let matrix = build_pivot(&records).unwrap().unwrap();
        assert_eq!(matrix.rows[0].cohort_size, 100);
    }

    #[test]
    fn test_duplicate_cell_rejected() {
        let records = vec![
            CohortRecord::new("2024-01", 100, 1, 40.0),
            CohortRecord::new("2024-01", 100, 1, 42.0),
        ];
        assert_eq!(
            build_pivot(&records).unwrap_err(),
            PivotError::DuplicateCell {
                cohort_key: "2024-01".to_string(),
                months_since: 1
            }
        );
    }

    #[test]
    fn test_null_rate_is_missing_cell() {
        let mut blank = CohortRecord::new("2024-01", 100, 1, 0.0);
        blank.retention_rate = None;
        let records = vec![CohortRecord::new("2024-01", 100, 0, 100.0), blank];

        let matrix = build_pivot(&records).unwrap().unwrap();
        assert_eq!(matrix.column_count(), 2);
        assert_eq!(
            matrix.rows[0].cells,
            vec![value(100.0, RetentionTier::High), CohortCell::Missing]
        );
    }
}
