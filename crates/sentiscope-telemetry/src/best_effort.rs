//! Fire-and-forget delivery wrapper
//!
//! Telemetry is secondary: a failed delivery is handed to a continuation
//! (by default a warning log) and never reaches the caller.

use crate::record::TelemetryRecord;
use crate::sink::TelemetrySink;
use sentiscope_core::Error;
use std::sync::Arc;

/// Called with the error of a failed delivery
pub type FailureHandler = Arc<dyn Fn(&Error) + Send + Sync>;

/// Outcome of a best-effort submission, for callers that want to inspect it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    Failed,
}

/// Wraps a sink so that delivery failures are swallowed
#[derive(Clone)]
pub struct BestEffort {
    sink: Arc<dyn TelemetrySink>,
    on_failure: FailureHandler,
}

impl BestEffort {
    /// Wrap a sink with the default continuation, which logs a warning
    pub fn new(sink: Arc<dyn TelemetrySink>) -> Self {
        Self {
            sink,
            on_failure: Arc::new(|e: &Error| {
                tracing::warn!(error = %e, "Failed to log telemetry record");
            }),
        }
    }

    /// Replace the failure continuation
    pub fn on_failure(mut self, handler: impl Fn(&Error) + Send + Sync + 'static) -> Self {
        self.on_failure = Arc::new(handler);
        self
    }

    /// Deliver a record, swallowing any failure
    pub async fn submit(&self, record: &TelemetryRecord) -> Delivery {
        match self.sink.send(record).await {
            Ok(ack) => {
                metrics::counter!("sentiscope_telemetry_total", "outcome" => "delivered")
                    .increment(1);
                tracing::debug!(sink = self.sink.name(), response = %ack, "Telemetry record logged");
                Delivery::Delivered
            }
            Err(e) => {
                metrics::counter!("sentiscope_telemetry_total", "outcome" => "failed")
                    .increment(1);
                (self.on_failure)(&e);
                Delivery::Failed
            }
        }
    }

    pub fn sink_name(&self) -> &str {
        self.sink.name()
    }
}
