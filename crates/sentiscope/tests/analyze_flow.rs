//! End-to-end behavior of the analyze action with mock collaborators

use async_trait::async_trait;
use parking_lot::Mutex;
use sentiscope::analyze::{AnalyzeState, Analyzer, Outcome, NO_REVIEWS};
use sentiscope::context::AppContext;
use sentiscope::view::View;
use sentiscope_classifiers::Classifier;
use sentiscope_core::{Candidate, Error, Result, Review, SentimentCategory, SentimentResult};
use sentiscope_corpus::Corpus;
use sentiscope_telemetry::{BestEffort, Delivery, TelemetryRecord, TelemetrySink};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

const MODEL_NOT_READY: &str = "Sentiment model is not ready yet. Please wait a moment.";

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Review(String),
    ClearResult,
    Result(String),
    Error(String),
    HideError,
    Busy(bool),
}

#[derive(Default)]
struct RecordingView {
    events: Mutex<Vec<Event>>,
}

impl RecordingView {
    fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }

    fn push(&self, event: Event) {
        self.events.lock().push(event);
    }
}

impl View for RecordingView {
    fn show_review(&self, review: &Review) {
        self.push(Event::Review(review.as_str().to_string()));
    }

    fn clear_result(&self) {
        self.push(Event::ClearResult);
    }

    fn show_result(&self, result: &SentimentResult) {
        self.push(Event::Result(result.to_string()));
    }

    fn show_error(&self, message: &str) {
        self.push(Event::Error(message.to_string()));
    }

    fn hide_error(&self) {
        self.push(Event::HideError);
    }

    fn set_busy(&self, busy: bool) {
        self.push(Event::Busy(busy));
    }
}

/// Returns a fixed answer and counts calls
struct FixedClassifier {
    label: &'static str,
    score: f32,
    calls: AtomicUsize,
}

impl FixedClassifier {
    fn new(label: &'static str, score: f32) -> Self {
        Self {
            label,
            score,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Classifier for FixedClassifier {
    async fn classify(&self, _text: &str) -> Result<Vec<Candidate>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![Candidate::new(self.label, self.score)])
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

struct BrokenClassifier;

#[async_trait]
impl Classifier for BrokenClassifier {
    async fn classify(&self, _text: &str) -> Result<Vec<Candidate>> {
        Err(Error::classification("inference backend crashed"))
    }

    fn name(&self) -> &str {
        "broken"
    }
}

/// Holds every call until released
struct GatedClassifier {
    release: Notify,
}

#[async_trait]
impl Classifier for GatedClassifier {
    async fn classify(&self, _text: &str) -> Result<Vec<Candidate>> {
        self.release.notified().await;
        Ok(vec![Candidate::new("POSITIVE", 0.9)])
    }

    fn name(&self) -> &str {
        "gated"
    }
}

#[derive(Default)]
struct CapturingSink {
    records: Mutex<Vec<TelemetryRecord>>,
}

#[async_trait]
impl TelemetrySink for CapturingSink {
    async fn send(&self, record: &TelemetryRecord) -> Result<Value> {
        self.records.lock().push(record.clone());
        Ok(serde_json::json!({"status": "success"}))
    }

    fn name(&self) -> &str {
        "capture"
    }
}

/// Never answers, like an endpoint that accepts the connection and hangs
struct HungSink;

#[async_trait]
impl TelemetrySink for HungSink {
    async fn send(&self, _record: &TelemetryRecord) -> Result<Value> {
        std::future::pending().await
    }

    fn name(&self) -> &str {
        "hung"
    }
}

struct FailingSink;

#[async_trait]
impl TelemetrySink for FailingSink {
    async fn send(&self, _record: &TelemetryRecord) -> Result<Value> {
        Err(Error::logging("endpoint returned HTTP 500"))
    }

    fn name(&self) -> &str {
        "failing"
    }
}

fn context(sink: Arc<dyn TelemetrySink>) -> Arc<AppContext> {
    Arc::new(AppContext::new(
        BestEffort::new(sink),
        "distilbert/distilbert-base-uncased-finetuned-sst-2-english",
        "reviews_test.tsv",
    ))
}

fn one_review() -> Arc<Corpus> {
    Arc::new(Corpus::from_texts(["Sturdy and quiet, would buy again"]))
}

#[tokio::test]
async fn test_successful_analysis() {
    let sink = Arc::new(CapturingSink::default());
    let ctx = context(sink.clone());
    let classifier = Arc::new(FixedClassifier::new("POSITIVE", 0.8234));
    ctx.corpus.open(one_review());
    ctx.classifier.open(classifier.clone());

    let analyzer = Analyzer::new(ctx);
    let view = RecordingView::default();

    let Outcome::Done(analysis) = analyzer.trigger(&view).await else {
        panic!("expected a completed analysis");
    };

    assert_eq!(analysis.result.category, SentimentCategory::Positive);
    assert_eq!(analyzer.flush_telemetry().await, vec![Delivery::Delivered]);
    assert_eq!(analyzer.state(), AnalyzeState::Done);
    assert_eq!(classifier.calls.load(Ordering::SeqCst), 1);

    assert_eq!(
        view.events(),
        vec![
            Event::HideError,
            Event::Review("Sturdy and quiet, would buy again".to_string()),
            Event::Busy(true),
            Event::ClearResult,
            Event::Result("👍 POSITIVE (82.3% confidence)".to_string()),
            Event::Busy(false),
        ]
    );

    let records = sink.records.lock();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].review, "Sturdy and quiet, would buy again");
    assert_eq!(records[0].sentiment.label, "POSITIVE");
    assert_eq!(records[0].confidence, "82.3");
    assert_eq!(
        records[0].meta.model,
        "distilbert/distilbert-base-uncased-finetuned-sst-2-english"
    );
}

#[tokio::test]
async fn test_empty_corpus_never_classifies() {
    let ctx = context(Arc::new(CapturingSink::default()));
    let classifier = Arc::new(FixedClassifier::new("POSITIVE", 0.9));
    ctx.corpus.open(Arc::new(Corpus::empty()));
    ctx.classifier.open(classifier.clone());

    let analyzer = Analyzer::new(ctx);
    let view = RecordingView::default();

    let outcome = analyzer.trigger(&view).await;
    assert!(matches!(outcome, Outcome::Failed(ref m) if m == NO_REVIEWS));
    assert_eq!(classifier.calls.load(Ordering::SeqCst), 0);
    assert_eq!(
        view.events(),
        vec![Event::HideError, Event::Error(NO_REVIEWS.to_string())]
    );
}

#[tokio::test]
async fn test_corpus_still_loading_reports_no_reviews() {
    let ctx = context(Arc::new(CapturingSink::default()));
    ctx.classifier
        .open(Arc::new(FixedClassifier::new("POSITIVE", 0.9)));

    let view = RecordingView::default();
    let outcome = Analyzer::new(ctx).trigger(&view).await;
    assert!(matches!(outcome, Outcome::Failed(ref m) if m == NO_REVIEWS));
}

#[tokio::test]
async fn test_model_not_ready_leaves_result_panel() {
    let ctx = context(Arc::new(CapturingSink::default()));
    ctx.corpus.open(one_review());

    let analyzer = Analyzer::new(ctx);
    let view = RecordingView::default();

    let outcome = analyzer.trigger(&view).await;
    assert!(matches!(outcome, Outcome::Failed(ref m) if m == MODEL_NOT_READY));
    assert_eq!(analyzer.state(), AnalyzeState::Error);
    assert_eq!(
        view.events(),
        vec![Event::HideError, Event::Error(MODEL_NOT_READY.to_string())]
    );
}

#[tokio::test]
async fn test_failed_model_load_reports_not_ready() {
    let ctx = context(Arc::new(CapturingSink::default()));
    ctx.corpus.open(one_review());
    ctx.classifier.fail("download failed");

    let view = RecordingView::default();
    let outcome = Analyzer::new(ctx).trigger(&view).await;
    assert!(matches!(outcome, Outcome::Failed(ref m) if m == MODEL_NOT_READY));
}

#[tokio::test]
async fn test_logging_failure_is_invisible() {
    let ctx = context(Arc::new(FailingSink));
    ctx.corpus.open(one_review());
    ctx.classifier
        .open(Arc::new(FixedClassifier::new("NEGATIVE", 0.97)));

    let analyzer = Analyzer::new(ctx);
    let view = RecordingView::default();

    assert!(
        analyzer.trigger(&view).await.is_done(),
        "logging failure must not fail the action"
    );
    assert_eq!(analyzer.flush_telemetry().await, vec![Delivery::Failed]);
    assert_eq!(analyzer.state(), AnalyzeState::Done);

    let events = view.events();
    assert!(events.contains(&Event::Result("👎 NEGATIVE (97.0% confidence)".to_string())));
    assert!(!events.iter().any(|e| matches!(e, Event::Error(_))));
    assert_eq!(events.last(), Some(&Event::Busy(false)));
}

#[tokio::test]
async fn test_classification_failure_shows_error() {
    let ctx = context(Arc::new(CapturingSink::default()));
    ctx.corpus.open(one_review());
    ctx.classifier.open(Arc::new(BrokenClassifier));

    let analyzer = Analyzer::new(ctx);
    let view = RecordingView::default();

    let outcome = analyzer.trigger(&view).await;
    let Outcome::Failed(message) = outcome else {
        panic!("expected failure");
    };
    assert!(message.contains("inference backend crashed"));
    assert_eq!(analyzer.state(), AnalyzeState::Error);

    let events = view.events();
    assert!(events.contains(&Event::Error(message.clone())));
    assert!(!events.iter().any(|e| matches!(e, Event::Result(_))));
    assert_eq!(events.last(), Some(&Event::Busy(false)));
}

#[tokio::test]
async fn test_error_banner_hidden_on_next_trigger() {
    let ctx = context(Arc::new(CapturingSink::default()));
    ctx.corpus.open(one_review());

    let analyzer = Analyzer::new(ctx.clone());
    let view = RecordingView::default();
    analyzer.trigger(&view).await;

    ctx.classifier
        .open(Arc::new(FixedClassifier::new("POSITIVE", 0.9)));
    assert!(analyzer.trigger(&view).await.is_done());

    let events = view.events();
    let error_at = events
        .iter()
        .position(|e| matches!(e, Event::Error(_)))
        .unwrap();
    assert_eq!(events[error_at + 1], Event::HideError);
}

#[tokio::test]
async fn test_trigger_while_loading_is_ignored() {
    let ctx = context(Arc::new(CapturingSink::default()));
    let classifier = Arc::new(GatedClassifier {
        release: Notify::new(),
    });
    ctx.corpus.open(one_review());
    ctx.classifier.open(classifier.clone());

    let analyzer = Arc::new(Analyzer::new(ctx));
    let view = Arc::new(RecordingView::default());

    let first = {
        let analyzer = analyzer.clone();
        let view = view.clone();
        tokio::spawn(async move { analyzer.trigger(view.as_ref()).await })
    };

    tokio::time::timeout(Duration::from_secs(5), async {
        while analyzer.state() != AnalyzeState::Loading {
            tokio::task::yield_now().await;
        }
    })
    .await
    .unwrap();

    let before = view.events().len();
    assert!(matches!(analyzer.trigger(view.as_ref()).await, Outcome::Busy));
    assert_eq!(view.events().len(), before);

    classifier.release.notify_one();
    let outcome = tokio::time::timeout(Duration::from_secs(5), first)
        .await
        .unwrap()
        .unwrap();
    assert!(outcome.is_done());
    assert_eq!(analyzer.state(), AnalyzeState::Done);
}

#[tokio::test]
async fn test_hung_endpoint_does_not_block_action() {
    let ctx = context(Arc::new(HungSink));
    ctx.corpus.open(one_review());
    ctx.classifier
        .open(Arc::new(FixedClassifier::new("POSITIVE", 0.9)));

    let analyzer = Analyzer::new(ctx);
    let view = RecordingView::default();

    let outcome = tokio::time::timeout(Duration::from_secs(2), analyzer.trigger(&view))
        .await
        .expect("action must finish while telemetry is still pending");
    assert!(outcome.is_done());
    assert_eq!(analyzer.state(), AnalyzeState::Done);
    assert_eq!(view.events().last(), Some(&Event::Busy(false)));

    // The trigger is usable again straight away
    let again = tokio::time::timeout(Duration::from_secs(2), analyzer.trigger(&view))
        .await
        .unwrap();
    assert!(again.is_done());
}
