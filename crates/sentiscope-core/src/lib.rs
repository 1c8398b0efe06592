//! Sentiscope Core
//!
//! Core types shared across Sentiscope components.
//!
//! This crate provides:
//! - The error taxonomy and result alias
//! - Review and classifier candidate types
//! - The sentiment decision rule and confidence formatting

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{
    format_confidence, Candidate, Review, SentimentCategory, SentimentResult, NEUTRAL_LABEL,
    NEUTRAL_SCORE,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{Candidate, Review, SentimentCategory, SentimentResult};
}
