//! Fetch dispatch
//!
//! [`Dashboard`] owns one [`PanelState`] per panel and drives it through a
//! request: validate inputs, enter `Loading`, call the backend, apply the
//! response if it is still current. The two halves (`begin` / `resolve`)
//! are public so callers can run the request themselves.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use shopboard_types::TabularRecord;
use tracing::{debug, info, warn};

use crate::backend::{AnalyticsBackend, FetchError};
use crate::error::{CoreError, PanelError};
use crate::event::{EventBus, PanelEvent};
use crate::export::{ExportArtifact, ExportError, RFM_EXPORT_PREFIX};
use crate::panel::{PanelKind, PanelState, PanelStatus, Resolution, PANEL_COUNT};

/// Raw user inputs for a panel, keyed by query parameter name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PanelInputs {
    values: Vec<(String, String)>,
}

impl PanelInputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter; a repeated name replaces the earlier value
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.values.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.values.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Query parameters for `kind` in declared order, or the names that are
    /// missing (absent or blank after trimming)
    pub fn query_for(&self, kind: PanelKind) -> Result<Vec<(String, String)>, Vec<&'static str>> {
        let mut params = Vec::with_capacity(kind.params().len());
        let mut missing = Vec::new();
        for &name in kind.params() {
            match self.get(name) {
                Some(value) if !value.trim().is_empty() => {
                    params.push((name.to_string(), value.to_string()))
                }
                _ => missing.push(name),
            }
        }
        if missing.is_empty() {
            Ok(params)
        } else {
            Err(missing)
        }
    }
}

/// Identifies the dispatch a response belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestTicket {
    pub kind: PanelKind,
    pub generation: u64,
}

/// A validated request, ready to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchRequest {
    pub ticket: RequestTicket,
    pub endpoint: &'static str,
    pub params: Vec<(String, String)>,
}

/// All panels plus the backend they load from
pub struct Dashboard<B> {
    backend: B,
    panels: [Mutex<PanelState>; PANEL_COUNT],
    events: EventBus,
}

impl<B: AnalyticsBackend> Dashboard<B> {
    pub fn new(backend: B) -> Self {
        Self::with_event_bus(backend, EventBus::default_capacity())
    }

    pub fn with_event_bus(backend: B, events: EventBus) -> Self {
        Self {
            backend,
            panels: std::array::from_fn(|_| Mutex::new(PanelState::new())),
            events,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    fn panel(&self, kind: PanelKind) -> &Mutex<PanelState> {
        &self.panels[kind as usize]
    }

    /// Copy of the panel's current state
    pub fn snapshot(&self, kind: PanelKind) -> PanelState {
        self.panel(kind).lock().clone()
    }

    /// Validate inputs and enter `Loading`.
    ///
    /// On missing inputs the panel goes straight to `Error(Validation)` and
    /// `None` is returned: no request must be sent.
    pub fn begin(&self, kind: PanelKind, inputs: &PanelInputs) -> Option<DispatchRequest> {
        match inputs.query_for(kind) {
            Ok(params) => {
                let generation = self.panel(kind).lock().begin_loading();
                info!(panel = ?kind, generation, "Dispatching");
                self.events.publish(PanelEvent::Loading(kind));
                Some(DispatchRequest {
                    ticket: RequestTicket { kind, generation },
                    endpoint: kind.endpoint(),
                    params,
                })
            }
            Err(missing) => {
                let error = PanelError::validation(PanelKind::validation_message(&missing));
                debug!(panel = ?kind, ?missing, "Validation failed");
                self.panel(kind).lock().fail_validation(error);
                self.events.publish(PanelEvent::Settled {
                    kind,
                    status: PanelStatus::Error,
                });
                None
            }
        }
    }

    /// Apply a backend outcome to the panel the ticket was issued for
    pub fn resolve(
        &self,
        ticket: RequestTicket,
        outcome: Result<Vec<TabularRecord>, FetchError>,
    ) -> Resolution {
        let kind = ticket.kind;
        let outcome = outcome.map_err(|e| {
            if let FetchError::Transport { message } = &e {
                warn!(panel = ?kind, cause = %message, "Transport failure");
            }
            e.into_panel_error(kind)
        });
        let rows = outcome.as_ref().map(|r| r.len()).ok();

        let resolution = self.panel(kind).lock().resolve(ticket.generation, outcome);
        match resolution {
            Resolution::Applied(status) => {
                info!(panel = ?kind, generation = ticket.generation, ?status, ?rows, "Resolved");
                self.events.publish(PanelEvent::Settled { kind, status });
            }
            Resolution::Stale => {
                debug!(panel = ?kind, generation = ticket.generation, "Dropping stale response");
                self.events.publish(PanelEvent::StaleResponseDropped {
                    kind,
                    generation: ticket.generation,
                });
            }
        }
        resolution
    }

    /// Validate, fetch and apply in one step. Returns the panel's status
    /// afterwards, which may reflect a newer dispatch.
    pub async fn dispatch(&self, kind: PanelKind, inputs: &PanelInputs) -> PanelStatus {
        if let Some(request) = self.begin(kind, inputs) {
            let outcome = self.backend.fetch(request.endpoint, &request.params).await;
            self.resolve(request.ticket, outcome);
        }
        self.panel(kind).lock().status()
    }

    /// CSV of the RFM panel's current successful payload
    pub fn export_rfm(&self) -> Result<ExportArtifact, ExportError> {
        let payload = {
            let state = self.panel(PanelKind::Rfm).lock();
            match (state.status(), state.payload()) {
                (PanelStatus::Success, Some(payload)) if !payload.is_empty() => payload.clone(),
                _ => return Err(ExportError::NoData),
            }
        };

        let artifact = ExportArtifact::csv(RFM_EXPORT_PREFIX, &payload);
        info!(filename = %artifact.filename, rows = payload.len(), "RFM export prepared");
        self.events.publish(PanelEvent::Exported {
            kind: PanelKind::Rfm,
            filename: artifact.filename.clone(),
        });
        Ok(artifact)
    }

    /// Export the RFM payload and write it into `dir`
    pub fn write_rfm_export(&self, dir: &Path) -> Result<PathBuf, CoreError> {
        let artifact = self.export_rfm()?;
        artifact.write_to(dir)
    }
}
