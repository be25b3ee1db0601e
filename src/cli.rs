//! Command-line argument parsing for the explorer.

use clap::Parser;
use std::path::PathBuf;

use ista_explorer::config::Config;

/// Read-only SQL console for the ISTA operations database.
#[derive(Parser, Debug)]
#[command(name = "ista")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Query RPC endpoint URL
    #[arg(short = 'e', long, value_name = "URL", env = "ISTA_ENDPOINT")]
    pub endpoint: Option<String>,

    /// API key forwarded to the query service
    #[arg(long, value_name = "KEY", env = "ISTA_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Config file path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Execute one query and print the result table, instead of loading the dashboard
    #[arg(short = 'x', long, value_name = "SQL")]
    pub execute: Option<String>,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path, falling back to the platform default.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }
}
