use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use client_logging::LogDestination;

/// Upload DOCX documents to a scriptorium processing service, follow the
/// job to completion and collect the results.
#[derive(Debug, Parser)]
#[command(name = "scriptorium", version, about)]
pub struct Cli {
    /// Base URL of the processing service.
    #[arg(
        long,
        env = "SCRIPTORIUM_SERVER",
        default_value = "http://127.0.0.1:5000"
    )]
    pub server: String,

    /// Directory processed artifacts are written to.
    #[arg(long, env = "SCRIPTORIUM_OUTPUT", default_value = "./processed")]
    pub output: PathBuf,

    /// Seconds between status polls.
    #[arg(long, default_value_t = 2)]
    pub poll_interval: u64,

    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = 30)]
    pub request_timeout: u64,

    /// Accept the .docx suffix in any character case.
    #[arg(long)]
    pub any_case: bool,

    /// Fetch a preview for each result and report how it would render.
    #[arg(long)]
    pub preview: bool,

    /// Never prompt; exit immediately on failure instead of offering a retry.
    #[arg(long)]
    pub no_input: bool,

    /// Where log output goes.
    #[arg(long, value_enum, default_value = "file")]
    pub log: LogTarget,

    /// Files (or directories of files) to process.
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogTarget {
    File,
    Terminal,
    Both,
}

impl Cli {
    pub fn log_destination(&self) -> LogDestination {
        match self.log {
            LogTarget::File => LogDestination::File,
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::Both => LogDestination::Both,
        }
    }
}
