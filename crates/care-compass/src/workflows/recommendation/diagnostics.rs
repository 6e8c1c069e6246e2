use std::sync::{Arc, Mutex};

use serde::Serialize;
use tracing::warn;

/// Data-quality event recovered during one ranking request. These never
/// abort the request; they flow to the caller's sink so operators can see
/// how much of the result rests on fallbacks.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DataQualityEvent {
    GeocodeUnresolved { facility: String, detail: String },
    RouteFallback { facility: String, detail: String },
    RouteUnresolved { facility: String, detail: String },
    PriceImputed { facility: String, price_won: f64 },
}

impl DataQualityEvent {
    pub fn facility(&self) -> &str {
        match self {
            DataQualityEvent::GeocodeUnresolved { facility, .. }
            | DataQualityEvent::RouteFallback { facility, .. }
            | DataQualityEvent::RouteUnresolved { facility, .. }
            | DataQualityEvent::PriceImputed { facility, .. } => facility,
        }
    }
}

impl std::fmt::Display for DataQualityEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataQualityEvent::GeocodeUnresolved { facility, detail } => {
                write!(f, "{facility}: geocode unresolved ({detail})")
            }
            DataQualityEvent::RouteFallback { facility, detail } => {
                write!(f, "{facility}: straight-line fallback ({detail})")
            }
            DataQualityEvent::RouteUnresolved { facility, detail } => {
                write!(f, "{facility}: excluded, no usable distance ({detail})")
            }
            DataQualityEvent::PriceImputed { facility, price_won } => {
                write!(f, "{facility}: price imputed at {price_won:.0} won")
            }
        }
    }
}

/// Injected diagnostics channel. The pipeline takes a sink per service
/// instance rather than logging through a module-level singleton.
pub trait DiagnosticsSink: Send + Sync {
    fn record(&self, event: DataQualityEvent);
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticsSink for NullSink {
    fn record(&self, _event: DataQualityEvent) {}
}

/// Collects events for later inspection.
#[derive(Default, Clone)]
pub struct MemorySink {
    events: Arc<Mutex<Vec<DataQualityEvent>>>,
}

impl MemorySink {
    pub fn events(&self) -> Vec<DataQualityEvent> {
        self.events.lock().expect("diagnostics mutex poisoned").clone()
    }
}

impl DiagnosticsSink for MemorySink {
    fn record(&self, event: DataQualityEvent) {
        self.events
            .lock()
            .expect("diagnostics mutex poisoned")
            .push(event);
    }
}

/// Forwards events to the tracing subscriber at warn level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn record(&self, event: DataQualityEvent) {
        match &event {
            DataQualityEvent::GeocodeUnresolved { facility, detail } => {
                warn!(%facility, %detail, "address could not be geocoded; facility skipped for this request");
            }
            DataQualityEvent::RouteFallback { facility, detail } => {
                warn!(%facility, %detail, "route lookup failed; falling back to straight-line distance");
            }
            DataQualityEvent::RouteUnresolved { facility, detail } => {
                warn!(%facility, %detail, "no usable distance; facility excluded from scoring");
            }
            DataQualityEvent::PriceImputed { facility, price_won } => {
                warn!(%facility, price_won, "price missing; cohort median imputed");
            }
        }
    }
}
