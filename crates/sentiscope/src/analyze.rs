//! The analyze action: sample, classify, render, log

use crate::context::AppContext;
use crate::view::View;
use parking_lot::Mutex;
use sentiscope_classifiers::Classifier;
use sentiscope_core::{Error, Review, SentimentResult};
use sentiscope_telemetry::{ClientEnvironment, Delivery, TelemetryRecord};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;

pub const NO_REVIEWS: &str = "No reviews available. Please try again later.";
pub const MODEL_LOAD_FAILED: &str = "Failed to load sentiment model. Please restart the application.";
const ANALYSIS_FAILED: &str = "Failed to analyze sentiment.";

/// Lifecycle of the analyze action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyzeState {
    Idle,
    Loading,
    Done,
    Error,
}

/// A completed analysis. Its telemetry record is delivered in the background.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub review: Review,
    pub result: SentimentResult,
}

/// Result of one trigger
#[derive(Debug, Clone)]
pub enum Outcome {
    Done(Analysis),
    Failed(String),
    /// An earlier action is still running; nothing happened
    Busy,
}

impl Outcome {
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done(_))
    }
}

pub struct Analyzer {
    ctx: Arc<AppContext>,
    state: Mutex<AnalyzeState>,
    deliveries: Mutex<JoinSet<Delivery>>,
}

impl Analyzer {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self {
            ctx,
            state: Mutex::new(AnalyzeState::Idle),
            deliveries: Mutex::new(JoinSet::new()),
        }
    }

    pub fn state(&self) -> AnalyzeState {
        *self.state.lock()
    }

    pub fn context(&self) -> &Arc<AppContext> {
        &self.ctx
    }

    /// Run one analyze action against the view
    pub async fn trigger<V: View + ?Sized>(&self, view: &V) -> Outcome {
        if self.state() == AnalyzeState::Loading {
            return Outcome::Busy;
        }

        view.hide_error();

        let corpus = match self.ctx.corpus.get() {
            Some(corpus) if !corpus.is_empty() => corpus,
            _ => return self.reject(view, NO_REVIEWS),
        };

        let Some(classifier) = self.ctx.classifier.get() else {
            return self.reject(view, &Error::ClassifierNotReady.to_string());
        };

        let Some(review) = corpus.sample_one().cloned() else {
            return self.reject(view, NO_REVIEWS);
        };

        {
            let mut state = self.state.lock();
            if *state == AnalyzeState::Loading {
                return Outcome::Busy;
            }
            *state = AnalyzeState::Loading;
        }

        view.show_review(&review);
        view.set_busy(true);
        view.clear_result();

        let outcome = self.run(view, classifier.as_ref(), review).await;

        view.set_busy(false);
        outcome
    }

    async fn run<V: View + ?Sized>(
        &self,
        view: &V,
        classifier: &dyn Classifier,
        review: Review,
    ) -> Outcome {
        let start = Instant::now();
        let result = match classifier.analyze(review.as_str()).await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(error = %e, "Sentiment analysis failed");
                metrics::counter!("sentiscope_analyses_total", "outcome" => "error").increment(1);
                let message = if e.is_user_facing() {
                    e.to_string()
                } else {
                    ANALYSIS_FAILED.to_string()
                };
                view.show_error(&message);
                *self.state.lock() = AnalyzeState::Error;
                return Outcome::Failed(message);
            }
        };

        metrics::histogram!("sentiscope_classification_latency_ms")
            .record(start.elapsed().as_secs_f64() * 1000.0);
        tracing::info!(
            label = %result.label,
            category = %result.category,
            confidence = %result.confidence_percent(),
            "Review classified"
        );

        view.show_result(&result);

        let record = TelemetryRecord::new(
            &review,
            &result,
            ClientEnvironment::capture(&self.ctx.model_id, &self.ctx.source),
        );
        self.deliver(record);

        metrics::counter!("sentiscope_analyses_total", "outcome" => "done").increment(1);
        *self.state.lock() = AnalyzeState::Done;

        Outcome::Done(Analysis { review, result })
    }

    /// Hand the record to a background task; the action never waits on it
    fn deliver(&self, record: TelemetryRecord) {
        let telemetry = self.ctx.telemetry.clone();
        let mut deliveries = self.deliveries.lock();
        while deliveries.try_join_next().is_some() {}
        deliveries.spawn(async move { telemetry.submit(&record).await });
    }

    /// Wait for telemetry deliveries that are still in flight
    pub async fn flush_telemetry(&self) -> Vec<Delivery> {
        let mut pending = std::mem::take(&mut *self.deliveries.lock());
        let mut outcomes = Vec::new();
        while let Some(joined) = pending.join_next().await {
            match joined {
                Ok(delivery) => outcomes.push(delivery),
                Err(e) => tracing::warn!(error = %e, "Telemetry task failed"),
            }
        }
        outcomes
    }

    /// Precondition failure: show the error without entering Loading
    fn reject<V: View + ?Sized>(&self, view: &V, message: &str) -> Outcome {
        tracing::warn!("{}", message);
        metrics::counter!("sentiscope_analyses_total", "outcome" => "rejected").increment(1);
        view.show_error(message);
        *self.state.lock() = AnalyzeState::Error;
        Outcome::Failed(message.to_string())
    }
}
