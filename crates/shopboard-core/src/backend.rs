//! Analytics backend client
//!
//! [`AnalyticsBackend`] is the seam between panel dispatch and the network.
//! [`HttpBackend`] talks to the Flask analytics service; tests substitute
//! in-memory implementations.

use std::future::Future;
use std::time::Duration;

use serde_json::Value;
use shopboard_types::TabularRecord;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::BoardConfig;
use crate::error::{CoreError, PanelError};
use crate::panel::{PanelKind, NETWORK_ERROR_MESSAGE};

/// Why a fetch did not produce records
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The request never completed or the body was unreadable
    #[error("transport failure: {message}")]
    Transport { message: String },

    /// The backend reported a failure (status code or `error` field)
    #[error("server returned {status}: {}", .message.as_deref().unwrap_or("no error message"))]
    Server {
        status: u16,
        message: Option<String>,
    },
}

impl FetchError {
    pub fn transport(message: impl Into<String>) -> Self {
        FetchError::Transport {
            message: message.into(),
        }
    }

    /// Map to what the panel shows. Transport causes are never shown.
    pub fn into_panel_error(self, kind: PanelKind) -> PanelError {
        match self {
            FetchError::Transport { .. } => PanelError::transport(NETWORK_ERROR_MESSAGE),
            FetchError::Server { message, .. } => PanelError::server(
                message.unwrap_or_else(|| kind.failure_message().to_string()),
            ),
        }
    }
}

/// Source of analytics records
pub trait AnalyticsBackend: Send + Sync {
    /// GET `endpoint` with `params` as the query string, in order
    fn fetch(
        &self,
        endpoint: &'static str,
        params: &[(String, String)],
    ) -> impl Future<Output = Result<Vec<TabularRecord>, FetchError>> + Send;
}

/// reqwest-based backend
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, CoreError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| CoreError::InvalidConfig {
            message: format!("failed to build HTTP client: {}", e),
        })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &BoardConfig) -> Result<Self, CoreError> {
        Self::new(config.api_base_url.clone(), config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl AnalyticsBackend for HttpBackend {
    async fn fetch(
        &self,
        endpoint: &'static str,
        params: &[(String, String)],
    ) -> Result<Vec<TabularRecord>, FetchError> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!(url = %url, ?params, "GET");

        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| {
                warn!(url = %url, error = %e, "Request failed");
                FetchError::transport(e.to_string())
            })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            warn!(url = %url, error = %e, "Failed to read response body");
            FetchError::transport(e.to_string())
        })?;

        classify_response(status, &body)
    }
}

/// Turn a status code and raw body into records or a [`FetchError`]
///
/// - non-2xx: `Server`, with the body's `error` message when it has one
/// - 2xx body that is not JSON records: `Transport`
/// - 2xx object carrying a non-null `error`: `Server`
/// - 2xx array: one record per element; 2xx object: a single record
pub fn classify_response(status: u16, body: &str) -> Result<Vec<TabularRecord>, FetchError> {
    let parsed: Option<Value> = serde_json::from_str(body).ok();

    if !(200..300).contains(&status) {
        return Err(FetchError::Server {
            status,
            message: parsed.as_ref().and_then(error_message),
        });
    }

    let Some(value) = parsed else {
        warn!(status, "Response body is not valid JSON");
        return Err(FetchError::transport("response body is not valid JSON"));
    };

    if let Some(field) = value.get("error").filter(|v| !v.is_null()) {
        return Err(FetchError::Server {
            status,
            message: error_message_from(field),
        });
    }

    TabularRecord::from_json_body(value).map_err(|e| {
        warn!(status, error = %e, "Response body is not a record set");
        FetchError::transport(e.to_string())
    })
}

fn error_message(body: &Value) -> Option<String> {
    body.get("error").and_then(error_message_from)
}

/// Falsy values (`""`, `false`, `0`, `null`) carry no message
fn error_message_from(field: &Value) -> Option<String> {
    match field {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Bool(true) => Some("true".to_string()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        Value::Array(_) | Value::Object(_) => Some(field.to_string()),
        _ => None,
    }
}
