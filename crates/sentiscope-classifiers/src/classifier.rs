//! Classifier trait and output normalization

use async_trait::async_trait;
use sentiscope_core::{Candidate, Result, SentimentResult};
use serde_json::Value;

/// Trait for all sentiment classifiers
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify the given text, returning candidates best first
    async fn classify(&self, text: &str) -> Result<Vec<Candidate>>;

    /// Get the classifier name
    fn name(&self) -> &str;

    /// Classify and normalize into a display-ready result
    async fn analyze(&self, text: &str) -> Result<SentimentResult> {
        let candidates = self.classify(text).await?;
        Ok(SentimentResult::from_candidates(&candidates))
    }
}

/// Extract label/score candidates from a pipeline-style JSON reply.
///
/// Accepts `[[{label, score}, ..]]`, `[{label, score}, ..]` and a bare
/// `{label, score}`. Entries without a string label or numeric score are
/// skipped, so an unexpected shape yields no candidates.
pub fn candidates_from_json(value: &Value) -> Vec<Candidate> {
    match value {
        Value::Array(items) => match items.first() {
            Some(Value::Array(_)) => items
                .first()
                .map(candidates_from_json)
                .unwrap_or_default(),
            _ => items.iter().filter_map(candidate_from_object).collect(),
        },
        Value::Object(_) => candidate_from_object(value).into_iter().collect(),
        _ => Vec::new(),
    }
}

fn candidate_from_object(value: &Value) -> Option<Candidate> {
    let label = value.get("label")?.as_str()?;
    let score = value.get("score")?.as_f64()?;
    Some(Candidate::new(label, score as f32))
}

/// Sort candidates by descending score
pub(crate) fn rank(mut candidates: Vec<Candidate>) -> Vec<Candidate> {
    candidates.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    candidates
}
