//! Command-line interface parsing for Restoview
//!
//! This module handles parsing of CLI arguments and environment variables
//! using clap, and resolves them into the `StartupConfig` the binary runs with.

use clap::Parser;
use directories::ProjectDirs;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::Level;

use crate::data::api::DEFAULT_API_URL;

/// Error types for CLI argument resolution
#[derive(Debug, Error)]
pub enum CliError {
    /// No home directory to derive default data paths from
    #[error("Could not determine a data directory; pass --data-dir")]
    NoDataDir,

    /// The log level is not one tracing understands
    #[error("Invalid log level: '{0}'. Valid levels: trace, debug, info, warn, error")]
    InvalidLogLevel(String),
}

/// Restoview - browse restaurants and reviews, online or offline
#[derive(Parser, Debug)]
#[command(name = "restoview")]
#[command(about = "Restaurant reviews in the terminal, with offline caching")]
#[command(version)]
pub struct Cli {
    /// Base URL of the restaurant review backend
    #[arg(long, env = "RESTOVIEW_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Open this restaurant directly instead of the list
    #[arg(long, value_name = "ID", value_parser = clap::value_parser!(u32).range(1..))]
    pub id: Option<u32>,

    /// Initial cuisine filter ("all" for no filter)
    #[arg(long, default_value = "all")]
    pub cuisine: String,

    /// Initial neighborhood filter ("all" for no filter)
    #[arg(long, default_value = "all")]
    pub neighborhood: String,

    /// Never contact the backend for writes; reviews are saved for later
    #[arg(long)]
    pub offline: bool,

    /// Post reviews saved while offline, then exit
    #[arg(long)]
    pub sync: bool,

    /// Directory for the local store, saved reviews and the log file
    #[arg(long, env = "RESTOVIEW_DATA_DIR", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = 10)]
    pub timeout: u64,

    /// Log verbosity written to the log file
    #[arg(long, env = "RESTOVIEW_LOG", default_value = "info")]
    pub log_level: String,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone)]
pub struct StartupConfig {
    /// Backend base URL
    pub api_url: String,
    /// Restaurant to open on start
    pub restaurant_id: Option<u32>,
    /// Initial cuisine filter, `None` for all
    pub cuisine: Option<String>,
    /// Initial neighborhood filter, `None` for all
    pub neighborhood: Option<String>,
    /// Whether the app is pinned offline
    pub offline: bool,
    /// Whether to only post saved reviews and exit
    pub sync_only: bool,
    /// Directory of the local store
    pub cache_dir: PathBuf,
    /// Directory of the pending queue and the log file
    pub data_dir: PathBuf,
    /// Per-request timeout
    pub timeout: Duration,
    /// Maximum log level
    pub log_level: Level,
}

/// Parses a filter argument, mapping "all" (any case) to no filter
pub fn parse_filter_arg(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Parses a log level argument
pub fn parse_log_level_arg(s: &str) -> Result<Level, CliError> {
    s.trim()
        .parse()
        .map_err(|_| CliError::InvalidLogLevel(s.to_string()))
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with resolved directories and filters
    /// * `Err(CliError)` if the log level is invalid or no directory can be found
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let (cache_dir, data_dir) = match &cli.data_dir {
            Some(dir) => (dir.join("cache"), dir.clone()),
            None => {
                let dirs = ProjectDirs::from("", "", "restoview").ok_or(CliError::NoDataDir)?;
                (dirs.cache_dir().to_path_buf(), dirs.data_dir().to_path_buf())
            }
        };

        Ok(StartupConfig {
            api_url: cli.api_url.trim_end_matches('/').to_string(),
            restaurant_id: cli.id,
            cuisine: parse_filter_arg(&cli.cuisine),
            neighborhood: parse_filter_arg(&cli.neighborhood),
            offline: cli.offline,
            sync_only: cli.sync,
            cache_dir,
            data_dir,
            timeout: Duration::from_secs(cli.timeout.max(1)),
            log_level: parse_log_level_arg(&cli.log_level)?,
        })
    }

    /// Path of the log file
    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join("restoview.log")
    }
}
