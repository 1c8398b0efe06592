//! Interactive prompt

use crate::analyze::Analyzer;
use crate::view::View;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

/// A single line of user input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplCommand {
    Analyze,
    Status,
    Help,
    Quit,
    Unknown,
}

impl ReplCommand {
    pub fn parse(line: &str) -> Self {
        match line.trim().to_ascii_lowercase().as_str() {
            "" | "a" | "analyze" => Self::Analyze,
            "s" | "status" => Self::Status,
            "h" | "help" | "?" => Self::Help,
            "q" | "quit" | "exit" => Self::Quit,
            _ => Self::Unknown,
        }
    }
}

const HELP: &str = "Commands:
  <Enter>, a, analyze   Analyze a random review
  s, status             Show corpus and model status
  h, help               Show this help
  q, quit               Exit";

/// Run the prompt on stdin until quit or end of input
pub async fn run_repl<V: View + ?Sized>(analyzer: &Analyzer, view: &V) -> anyhow::Result<()> {
    let stdin = BufReader::new(tokio::io::stdin());
    run_lines(analyzer, view, stdin).await
}

/// Run the prompt over any line source
pub async fn run_lines<V, R>(analyzer: &Analyzer, view: &V, input: R) -> anyhow::Result<()>
where
    V: View + ?Sized,
    R: AsyncBufRead + Unpin,
{
    println!("Press Enter to analyze a random review. Type 'help' for commands.");

    let mut lines = input.lines();
    loop {
        prompt()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        match ReplCommand::parse(&line) {
            ReplCommand::Analyze => {
                analyzer.trigger(view).await;
            }
            ReplCommand::Status => println!("{}", analyzer.context().status_line()),
            ReplCommand::Help => println!("{HELP}"),
            ReplCommand::Quit => break,
            ReplCommand::Unknown => println!("Unknown command: {}", line.trim()),
        }
    }

    println!("Goodbye.");
    Ok(())
}

fn prompt() -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    write!(stdout, "> ")?;
    stdout.flush()
}
