//! Core types for Sentiscope

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Score used when the classifier output carries no usable confidence
pub const NEUTRAL_SCORE: f32 = 0.5;

/// Label used when the classifier output is missing or malformed
pub const NEUTRAL_LABEL: &str = "NEUTRAL";

/// A single review text sampled from the corpus
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Review(Arc<str>);

impl Review {
    /// Create a review from its text
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        Self(text.into())
    }

    /// Review text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the text is empty after trimming
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for Review {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Review {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// One label/score pair produced by a classifier, best candidate first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Raw model label, e.g. `POSITIVE`
    pub label: String,

    /// Confidence score (0.0-1.0)
    pub score: f32,
}

impl Candidate {
    /// Create a new candidate
    pub fn new(label: impl Into<String>, score: f32) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Display category derived from a label and its score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentCategory {
    Positive,
    Negative,
    Neutral,
}

impl SentimentCategory {
    /// Apply the decision rule to a raw label and score.
    ///
    /// Only a POSITIVE or NEGATIVE label with a score strictly above 0.5
    /// leaves the neutral category.
    pub fn decide(label: &str, score: f32) -> Self {
        match label {
            "POSITIVE" if score > 0.5 => Self::Positive,
            "NEGATIVE" if score > 0.5 => Self::Negative,
            _ => Self::Neutral,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }

    /// Icon shown next to the label in the result panel
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Positive => "👍",
            Self::Negative => "👎",
            Self::Neutral => "❓",
        }
    }
}

impl fmt::Display for SentimentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized outcome of classifying one review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    /// Upper-cased model label
    pub label: String,

    /// Confidence score (0.0-1.0)
    pub score: f32,

    /// Display category
    pub category: SentimentCategory,
}

impl SentimentResult {
    /// The fallback result for missing or malformed classifier output
    pub fn neutral() -> Self {
        Self {
            label: NEUTRAL_LABEL.to_string(),
            score: NEUTRAL_SCORE,
            category: SentimentCategory::Neutral,
        }
    }

    /// Normalize raw classifier output.
    ///
    /// Only the first candidate is considered. A missing candidate, an
    /// empty label or a non-finite score yields [`SentimentResult::neutral`].
    /// A score of zero or less is treated as absent and replaced by 0.5.
    pub fn from_candidates(candidates: &[Candidate]) -> Self {
        let Some(first) = candidates.first() else {
            return Self::neutral();
        };

        let label = first.label.trim().to_uppercase();
        if label.is_empty() || !first.score.is_finite() {
            return Self::neutral();
        }

        let score = if first.score > 0.0 {
            first.score.min(1.0)
        } else {
            NEUTRAL_SCORE
        };

        Self {
            category: SentimentCategory::decide(&label, score),
            label,
            score,
        }
    }

    /// Confidence as a percentage with one decimal, without the `%` sign
    pub fn confidence_value(&self) -> String {
        format_confidence(self.score)
    }

    /// Confidence as rendered in the result panel, e.g. `82.3%`
    pub fn confidence_percent(&self) -> String {
        format!("{}%", format_confidence(self.score))
    }
}

impl fmt::Display for SentimentResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({} confidence)",
            self.category.icon(),
            self.label,
            self.confidence_percent()
        )
    }
}

/// Format a 0-1 score as a percentage rounded to one decimal place
pub fn format_confidence(score: f32) -> String {
    let pct = (f64::from(score) * 1000.0).round() / 10.0;
    format!("{pct:.1}")
}
