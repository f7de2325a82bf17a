//! oreganote - Personal Note Workspace
//!
//! A command-line workspace for notes, daily calendar notes, tasks, and
//! quick links, persisted locally as JSON. Projects can be exported to and
//! imported from a single snapshot file, rendered as HTML or plain text,
//! summarized or rewritten with a local Ollama model, and uploaded to
//! Google Drive.

use std::error::Error;

mod app;
mod cli;
mod error;
mod export;
mod handlers;
mod models;

/// Application entry point
/// Initializes logging and dispatches the command-line arguments.
fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    cli::execute_cli(&args)
}
