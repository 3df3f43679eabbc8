//! Command-line definitions and the headless output format.

use crate::activity::LogEntry;
use crate::config::DEFAULT_CONFIG_FILE;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

/// Simulated LinkedIn auto-posting dashboard.
#[derive(Debug, Parser)]
#[command(name = "autopost")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Seed for tag and article selection
    #[arg(long, global = true, env = "AUTOPOST_SEED")]
    pub seed: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactive dashboard (default)
    Tui,

    /// Run the pipeline once and print the activity log
    Run {
        /// Run the credential check instead of the mock pipeline
        #[arg(long)]
        real: bool,

        /// Print one JSON object per log entry
        #[arg(long)]
        json: bool,
    },

    /// Show which environment variables are set
    Env {
        /// Print one JSON object per log entry
        #[arg(long)]
        json: bool,
    },
}

/// Write log entries as text lines or JSON lines.
pub fn write_entries<W: Write>(out: &mut W, entries: &[LogEntry], json: bool) -> Result<()> {
    for entry in entries {
        if json {
            writeln!(out, "{}", serde_json::to_string(entry)?)?;
        } else {
            writeln!(out, "{}", entry)?;
        }
    }
    Ok(())
}
