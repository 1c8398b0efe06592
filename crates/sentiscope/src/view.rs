//! User interface surface
//!
//! The analyze action drives four elements: the trigger (busy or not), the
//! review text area, the result panel and the error banner.

use parking_lot::Mutex;
use sentiscope_core::{Review, SentimentResult};
use std::io::Write;

/// Rendering target for the analyze action
pub trait View: Send + Sync {
    /// Show the selected review in the text area
    fn show_review(&self, review: &Review);

    /// Empty the result panel
    fn clear_result(&self);

    /// Render icon, label and confidence in the result panel
    fn show_result(&self, result: &SentimentResult);

    /// Show the error banner with a message
    fn show_error(&self, message: &str);

    /// Hide the error banner
    fn hide_error(&self);

    /// Disable (busy) or re-enable the trigger
    fn set_busy(&self, busy: bool);
}

/// Line-oriented terminal renderer
pub struct TerminalView<W: Write + Send> {
    out: Mutex<W>,
}

impl TerminalView<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Consume the view and return the writer
    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    fn write(&self, text: &str) {
        let mut out = self.out.lock();
        // A closed stdout leaves nothing to report to
        let _ = writeln!(out, "{text}");
        let _ = out.flush();
    }
}

impl<W: Write + Send> View for TerminalView<W> {
    fn show_review(&self, review: &Review) {
        self.write(&format!("\nReview:\n  {}", review.as_str().trim()));
    }

    fn clear_result(&self) {}

    fn show_result(&self, result: &SentimentResult) {
        self.write(&format!("Sentiment: {result}"));
    }

    fn show_error(&self, message: &str) {
        self.write(&format!("Error: {message}"));
    }

    // Printed errors scroll away with the next review
    fn hide_error(&self) {}

    fn set_busy(&self, busy: bool) {
        if busy {
            self.write("Analyzing...");
        }
    }
}
