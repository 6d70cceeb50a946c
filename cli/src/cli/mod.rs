use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

use crate::config::LogLevel;

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print raw battery attributes and configuration paths
    Debug,

    /// Show or reset configuration
    Config {
        /// Print config file path
        #[arg(long)]
        path: bool,

        /// Reset config to defaults
        #[arg(long)]
        reset: bool,
    },
}

/// Aggregated battery status for one or more batteries.
///
/// Without a subcommand, prints the battery report once and exits.
#[derive(Debug, Parser)]
#[command(name = "bathud", version, verbatim_doc_comment)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Keep reprinting the report
    #[arg(short, long)]
    pub watch: bool,

    /// Time between reports in watch mode (e.g. 2s, 500ms)
    #[arg(short, long, value_parser = humantime::parse_duration)]
    pub interval: Option<Duration>,

    /// Number of reports in watch mode (0 = infinite)
    #[arg(short, long, default_value_t = 0)]
    pub samples: u32,

    /// Power-supply class directory to read from
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Fail instead of assuming 100% when a stop threshold is missing
    #[arg(long, global = true)]
    pub strict_thresholds: bool,

    /// Log level for bathud itself (off, error, warn, info, debug, trace)
    #[arg(long, global = true)]
    pub log_level: Option<LogLevel>,
}

impl Cli {
    pub fn refresh_ms(&self) -> Option<u64> {
        self.interval
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }
}
