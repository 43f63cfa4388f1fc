//! Command-line interface for the worklog server.

use std::path::PathBuf;

use clap::Parser;

use crate::logging::Verbosity;
use worklog_core::ServerConfig;

/// worklog - log your work hours from the browser
///
/// Serves the work-hours logger page; entries are stored client-side in
/// localStorage, so the server needs no database and no accounts.
#[derive(Debug, Parser)]
#[command(name = "worklog")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Port to bind
    #[arg(short, long, default_value_t = 5000)]
    pub port: u16,

    /// Asset root directory (index.html plus a static/ subdirectory)
    #[arg(long, value_name = "DIR", default_value = "assets")]
    pub assets: PathBuf,

    /// Worker threads (defaults to available CPUs)
    #[arg(long, value_name = "N")]
    pub workers: Option<usize>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::Trace,
            }
        }
    }

    /// Build the server configuration from the parsed flags.
    #[must_use]
    pub fn server_config(&self) -> ServerConfig {
        let defaults = ServerConfig::default();
        ServerConfig {
            hostname: self.host.clone(),
            port: self.port,
            workers: self.workers.unwrap_or(defaults.workers),
        }
    }
}
