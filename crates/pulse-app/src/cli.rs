//! CLI argument definitions for the `pulse` binary.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;

/// Customer Pulse assistant: ask questions about your customers, leads, and contacts.
#[derive(Parser, Debug)]
#[command(name = "pulse", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Path to a JSON snapshot of customers, leads, and contacts.
    #[arg(short = 'd', long = "data")]
    pub data: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Answer immediately instead of simulating typing.
    #[arg(long = "no-delay")]
    pub no_delay: bool,

    /// Order every collection newest first before answering.
    #[arg(long = "newest-first")]
    pub newest_first: bool,

    /// Ask a single question and exit. Starts an interactive session when omitted.
    #[arg(trailing_var_arg = true)]
    pub query: Vec<String>,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > PULSE_CONFIG env var > ~/.pulse/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("PULSE_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the snapshot file path.
    ///
    /// Priority: --data flag > config file value. `None` means no snapshot
    /// was configured anywhere.
    pub fn resolve_data_path(&self, config_path: Option<&str>) -> Option<PathBuf> {
        if let Some(ref p) = self.data {
            return Some(p.clone());
        }
        config_path.map(expand_home)
    }

    /// Resolve the log level.
    ///
    /// Priority: --log-level flag > config file value.
    pub fn resolve_log_level(&self, config_level: &str) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| config_level.to_string())
    }

    /// Typing delay in milliseconds; zero when --no-delay is set.
    pub fn resolve_typing_delay(&self, config_delay_ms: u64) -> u64 {
        if self.no_delay {
            0
        } else {
            config_delay_ms
        }
    }

    pub fn resolve_newest_first(&self, config_newest_first: bool) -> bool {
        self.newest_first || config_newest_first
    }

    /// The one-shot question, if any words were given.
    pub fn one_shot_query(&self) -> Option<String> {
        if self.query.is_empty() {
            None
        } else {
            Some(self.query.join(" "))
        }
    }
}

/// Expand a leading `~` to the home directory.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        if let Some(home) = home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    match home_dir() {
        Some(home) => home.join(".pulse").join("config.toml"),
        None => PathBuf::from("config.toml"),
    }
}

fn home_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    let var = "USERPROFILE";
    #[cfg(not(target_os = "windows"))]
    let var = "HOME";
    std::env::var(var).ok().map(PathBuf::from)
}
