pub mod analyze;
pub mod cli;
pub mod config;
pub mod context;
pub mod gate;
pub mod repl;
pub mod startup;
pub mod view;

pub use analyze::{AnalyzeState, Analysis, Analyzer, Outcome};
pub use cli::*;
pub use config::*;
pub use context::*;
pub use gate::{GateState, ReadyGate};
pub use view::{TerminalView, View};
