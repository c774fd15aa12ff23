//! Lenient numeric deserializers
//!
//! Decimal columns are serialized as strings by some database drivers
//! (`"40.50"` instead of `40.5`), and SQLite hands back floats for integer
//! expressions. These helpers accept all of those shapes. The `option_*`
//! variants map SQL `NULL` (an empty aggregate) to `None`.

use crate::record::CellValue;
use serde::de::{Deserializer, Error};
use serde::Deserialize;

/// Accept a JSON number or numeric string as `f64`
pub fn float<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let cell = CellValue::deserialize(deserializer)?;
    cell_float(&cell)
}

/// Like [`float`], but `null` becomes `None`
pub fn option_float<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let cell = CellValue::deserialize(deserializer)?;
    if cell.is_null() {
        return Ok(None);
    }
    cell_float(&cell).map(Some)
}

/// Accept an integral JSON number (or numeric string) as any integer type
pub fn integer<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64>,
{
    let cell = CellValue::deserialize(deserializer)?;
    cell_integer(&cell)
}

/// Like [`integer`], but `null` becomes `None`
pub fn option_integer<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64>,
{
    let cell = CellValue::deserialize(deserializer)?;
    if cell.is_null() {
        return Ok(None);
    }
    cell_integer(&cell).map(Some)
}

fn cell_float<E: Error>(cell: &CellValue) -> Result<f64, E> {
    match cell {
        CellValue::Int(_) | CellValue::Float(_) | CellValue::Text(_) => cell
            .as_f64()
            .ok_or_else(|| E::custom(format!("expected a number, found \"{}\"", cell))),
        CellValue::Null | CellValue::Bool(_) => {
            Err(E::custom(format!("expected a number, found {:?}", cell)))
        }
    }
}

fn cell_integer<E: Error, T: TryFrom<i64>>(cell: &CellValue) -> Result<T, E> {
    let value = match cell {
        CellValue::Int(i) => *i,
        CellValue::Float(_) | CellValue::Text(_) => {
            let f = cell
                .as_f64()
                .ok_or_else(|| E::custom(format!("expected an integer, found \"{}\"", cell)))?;
            if f.fract() != 0.0 || !f.is_finite() {
                return Err(E::custom(format!("expected an integer, found {}", f)));
            }
            f as i64
        }
        CellValue::Null | CellValue::Bool(_) => {
            return Err(E::custom(format!("expected an integer, found {:?}", cell)))
        }
    };
    T::try_from(value).map_err(|_| E::custom(format!("integer {} out of range", value)))
}
