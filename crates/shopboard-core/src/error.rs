//! Error types for shopboard-core
//!
//! Each component owns a narrow error enum (`FetchError`, `PivotError`,
//! `ExportError`); `CoreError` is the umbrella for operations that cross
//! components or touch the file system.

use std::path::PathBuf;
use thiserror::Error;

use crate::export::ExportError;

/// Core error type for shopboard operations
#[derive(Error, Debug)]
pub enum CoreError {
    // ===================
    // IO Errors
    // ===================
    #[error("Failed to write file: {path}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create directory: {path}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ===================
    // Config Errors
    // ===================
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    // ===================
    // Export Errors
    // ===================
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// User-facing failure category of a panel
///
/// The four panel presentations (validation, transport, server, empty) are
/// mutually exclusive; "empty" is not an error and lives in the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Required inputs missing; no request was issued
    Validation,
    /// The request could not complete (network, unreadable body)
    Transport,
    /// The backend answered with a failure status or an `error` field
    Server,
}

impl ErrorKind {
    pub fn label(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::Transport => "network",
            ErrorKind::Server => "server",
        }
    }
}

/// Error held by a panel in the `Error` state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelError {
    pub kind: ErrorKind,
    pub message: String,
}

impl PanelError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Validation,
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Transport,
            message: message.into(),
        }
    }

    pub fn server(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Server,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for PanelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} error: {}", self.kind.label(), self.message)
    }
}
