//! Lightweight sentiment classifier
//!
//! Lexicon-based fallback used when no pretrained model can be loaded.
//! Labels and scores follow the SST-2 model's conventions.

use crate::classifier::{rank, Classifier};
use aho_corasick::AhoCorasick;
use sentiscope_core::{Candidate, Error, Result};

/// Model identifier reported for this classifier
pub const MODEL_ID: &str = "sentiment-lexicon";

const POSITIVE_WORDS: &[&str] = &[
    "good",
    "great",
    "excellent",
    "love",
    "amazing",
    "wonderful",
    "happy",
    "fantastic",
    "awesome",
    "best",
    "perfect",
    "recommend",
];

const NEGATIVE_WORDS: &[&str] = &[
    "bad",
    "terrible",
    "awful",
    "hate",
    "horrible",
    "worst",
    "broken",
    "refund",
    "disappointed",
    "poor",
    "waste",
    "useless",
];

pub struct LexiconClassifier {
    positive: AhoCorasick,
    negative: AhoCorasick,
}

impl LexiconClassifier {
    pub fn new() -> Result<Self> {
        let positive = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(POSITIVE_WORDS)
            .map_err(|e| {
                Error::classification(format!("Failed to build positive sentiment matcher: {e}"))
            })?;

        let negative = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(NEGATIVE_WORDS)
            .map_err(|e| {
                Error::classification(format!("Failed to build negative sentiment matcher: {e}"))
            })?;

        Ok(Self { positive, negative })
    }
}

#[async_trait::async_trait]
impl Classifier for LexiconClassifier {
    async fn classify(&self, text: &str) -> Result<Vec<Candidate>> {
        let positive_hits = self.positive.find_iter(text).count() as f32;
        let negative_hits = self.negative.find_iter(text).count() as f32;
        let total = positive_hits + negative_hits;

        // Smoothed so a single hit never reads as full confidence
        let positive = (positive_hits + 1.0) / (total + 2.0);

        Ok(rank(vec![
            Candidate::new("POSITIVE", positive),
            Candidate::new("NEGATIVE", 1.0 - positive),
        ]))
    }

    fn name(&self) -> &str {
        MODEL_ID
    }
}
