//! Sentiscope Telemetry
//!
//! Builds one record per analysis and forwards it to a spreadsheet-backed
//! collection endpoint.
//!
//! Provides:
//! - [`TelemetryRecord`] and the [`ClientEnvironment`] snapshot it carries
//! - The [`TelemetrySink`] trait with HTTP and no-op implementations
//! - [`BestEffort`], which keeps delivery failures away from the caller

pub mod best_effort;
pub mod environment;
pub mod record;
pub mod sink;

pub use best_effort::{BestEffort, Delivery, FailureHandler};
pub use environment::{ClientEnvironment, Screen};
pub use record::{SentimentSummary, TelemetryRecord};
pub use sink::{HttpSink, NoopSink, TelemetrySink};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::best_effort::BestEffort;
    pub use crate::record::TelemetryRecord;
    pub use crate::sink::{HttpSink, NoopSink, TelemetrySink};
}
