use clap::{Args, Parser, Subcommand};
use sentiscope_classifiers::Backend;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sentiscope")]
#[command(
    author,
    version,
    about = "Classify the sentiment of random product reviews"
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub global: GlobalArgs,
}

#[derive(Args, Debug, Default, Clone)]
pub struct GlobalArgs {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Review corpus (TSV file path or http(s) URL)
    #[arg(long, global = true, env = "SENTISCOPE_CORPUS")]
    pub corpus: Option<String>,

    /// Classifier backend: distilbert, remote or lexicon
    #[arg(short, long, global = true, value_parser = parse_backend)]
    pub backend: Option<Backend>,

    /// Hugging Face model id or local model directory
    #[arg(short, long, global = true)]
    pub model: Option<String>,

    /// Bearer token for the remote inference backend
    #[arg(long, global = true, env = "HF_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    /// Telemetry endpoint URL
    #[arg(short, long, global = true, env = "SENTISCOPE_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Do not send telemetry records
    #[arg(long, global = true)]
    pub no_telemetry: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Prompt-driven session: press Enter to analyze a random review (default)
    Interactive,

    /// Wait for the corpus and model, analyze reviews, then exit
    Analyze {
        /// Number of reviews to analyze
        #[arg(short = 'n', long, default_value = "1")]
        count: u32,
    },
}

fn parse_backend(s: &str) -> Result<Backend, String> {
    s.parse()
}
