//! CSV export of panel payloads
//!
//! The header is the key order of the first record. Text cells are quoted
//! with embedded quotes doubled; numbers and booleans are written as their
//! literal text; null and absent columns are empty cells. Rows are joined
//! with `\n` and there is no trailing newline.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use shopboard_types::{CellValue, TabularRecord};
use thiserror::Error;
use tracing::info;

use crate::error::CoreError;

/// Filename prefix of the RFM export
pub const RFM_EXPORT_PREFIX: &str = "rfm_analysis";

pub const CSV_MIME: &str = "text/csv";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExportError {
    #[error("No RFM data to download. Please run the analysis first.")]
    NoData,
}

/// A ready-to-save download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub filename: String,
    pub mime: &'static str,
    pub contents: String,
}

impl ExportArtifact {
    /// CSV artifact named `<prefix>_<YYYY-MM-DD>.csv` for today's local date
    pub fn csv(prefix: &str, records: &[TabularRecord]) -> Self {
        Self::csv_dated(prefix, Local::now().date_naive(), records)
    }

    pub fn csv_dated(prefix: &str, date: NaiveDate, records: &[TabularRecord]) -> Self {
        Self {
            filename: format!("{}_{}.csv", prefix, date.format("%Y-%m-%d")),
            mime: CSV_MIME,
            contents: encode_csv(records),
        }
    }

    /// Write the artifact into `dir` (created if missing), returning the full path
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, CoreError> {
        std::fs::create_dir_all(dir).map_err(|source| CoreError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;

        let path = dir.join(&self.filename);
        let write = |path: &Path| -> std::io::Result<()> {
            let mut writer = BufWriter::new(File::create(path)?);
            writer.write_all(self.contents.as_bytes())?;
            writer.flush()
        };
        write(&path).map_err(|source| CoreError::FileWrite {
            path: path.clone(),
            source,
        })?;

        info!(path = %path.display(), bytes = self.contents.len(), "Export written");
        Ok(path)
    }
}

/// Encode records as CSV. Empty input yields an empty string.
pub fn encode_csv(records: &[TabularRecord]) -> String {
    let Some(first) = records.first() else {
        return String::new();
    };
    let header: Vec<&str> = first.keys().collect();

    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(header.join(","));
    for record in records {
        let row: Vec<String> = header
            .iter()
            .map(|column| record.get(column).map(encode_cell).unwrap_or_default())
            .collect();
        lines.push(row.join(","));
    }
    lines.join("\n")
}

fn encode_cell(cell: &CellValue) -> String {
    match cell {
        CellValue::Text(s) => format!("\"{}\"", s.replace('"', "\"\"")),
        other => other.to_string(),
    }
}
