//! Application context shared by startup tasks and the analyze action

use crate::gate::{GateState, ReadyGate};
use sentiscope_classifiers::Classifier;
use sentiscope_corpus::Corpus;
use sentiscope_telemetry::BestEffort;

/// Everything the analyze action depends on
pub struct AppContext {
    /// Loaded review corpus
    pub corpus: ReadyGate<Corpus>,

    /// Initialized sentiment classifier
    pub classifier: ReadyGate<dyn Classifier>,

    /// Best-effort telemetry delivery
    pub telemetry: BestEffort,

    /// Model identifier reported in telemetry
    pub model_id: String,

    /// Corpus location reported in telemetry
    pub source: String,
}

/// Snapshot of both startup gates
#[derive(Debug)]
pub struct Readiness {
    pub corpus: GateState<Corpus>,
    pub classifier: GateState<dyn Classifier>,
}

impl Readiness {
    /// Both resources are available
    pub fn is_ready(&self) -> bool {
        matches!(self.corpus, GateState::Ready(_)) && matches!(self.classifier, GateState::Ready(_))
    }
}

impl AppContext {
    pub fn new(telemetry: BestEffort, model_id: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            corpus: ReadyGate::new(),
            classifier: ReadyGate::new(),
            telemetry,
            model_id: model_id.into(),
            source: source.into(),
        }
    }

    pub fn readiness(&self) -> Readiness {
        Readiness {
            corpus: self.corpus.state(),
            classifier: self.classifier.state(),
        }
    }

    /// Human-readable readiness summary
    pub fn status_line(&self) -> String {
        let corpus = match self.corpus.state() {
            GateState::Ready(corpus) => format!("{} reviews", corpus.len()),
            other => other.label().to_string(),
        };
        let classifier = match self.classifier.state() {
            GateState::Ready(classifier) => format!("{} ready", classifier.name()),
            GateState::Failed(reason) => format!("failed ({reason})"),
            GateState::Pending => "loading".to_string(),
        };
        format!("corpus: {corpus} | model: {classifier} | telemetry: {}", self.telemetry.sink_name())
    }
}
