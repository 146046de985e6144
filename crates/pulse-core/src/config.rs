use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{PulseError, Result};

/// Greeting shown as the first assistant turn of every session.
pub const DEFAULT_GREETING: &str = "Hi! I'm your Customer Pulse assistant. I can help you with information about your customers, leads, and contacts. What would you like to know?";

/// Top-level configuration for Customer Pulse.
///
/// Loaded from `~/.pulse/config.toml` by default. Every section is optional
/// and falls back to its defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PulseConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub assistant: AssistantConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub data: DataConfig,
}

impl PulseConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: PulseConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        let (config, error) = Self::load_with_fallback(path);
        if let Some(e) = error {
            warn!(
                "Failed to load config from {}: {}. Using defaults.",
                path.display(),
                e
            );
        }
        config
    }

    /// Like [`load_or_default`](Self::load_or_default), but hands the load
    /// error back instead of logging it.
    pub fn load_with_fallback(path: &Path) -> (Self, Option<PulseError>) {
        match Self::load(path) {
            Ok(config) => (config, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| PulseError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Assistant answer shaping.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// First message of every session.
    pub greeting: String,
    /// How many records the "recent" answers list.
    pub recent_limit: usize,
    /// How many leads the "top leads" answer lists.
    pub top_leads_limit: usize,
    /// Cap for name/company lists before they are cut with "...".
    pub list_limit: usize,
    /// Longest message (in characters) a session accepts.
    pub max_message_length: usize,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            greeting: DEFAULT_GREETING.to_string(),
            recent_limit: 5,
            top_leads_limit: 5,
            list_limit: 10,
            max_message_length: 2000,
        }
    }
}

/// Interactive session behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Pause before an answer is shown, in milliseconds.
    pub typing_delay_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            typing_delay_ms: 800,
        }
    }
}

/// Where CRM records come from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// JSON snapshot with `customers`, `leads` and `contacts` arrays.
    pub snapshot_path: Option<String>,
    /// Reorder every collection newest-first after loading, the way the
    /// hosted backend lists records.
    pub newest_first: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = PulseConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.assistant.greeting, DEFAULT_GREETING);
        assert_eq!(config.assistant.recent_limit, 5);
        assert_eq!(config.assistant.top_leads_limit, 5);
        assert_eq!(config.assistant.list_limit, 10);
        assert_eq!(config.assistant.max_message_length, 2000);
        assert_eq!(config.session.typing_delay_ms, 800);
        assert!(config.data.snapshot_path.is_none());
        assert!(!config.data.newest_first);
    }

    #[test]
    fn test_load_valid_config() {
        let content = r#"
[general]
log_level = "debug"

[assistant]
greeting = "Hello there"
recent_limit = 3
top_leads_limit = 2
list_limit = 4
max_message_length = 500

[session]
typing_delay_ms = 0

[data]
snapshot_path = "/srv/pulse/snapshot.json"
newest_first = true
"#;
        let file = create_temp_config(content);
        let config = PulseConfig::load(file.path()).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.assistant.greeting, "Hello there");
        assert_eq!(config.assistant.recent_limit, 3);
        assert_eq!(config.assistant.top_leads_limit, 2);
        assert_eq!(config.assistant.list_limit, 4);
        assert_eq!(config.assistant.max_message_length, 500);
        assert_eq!(config.session.typing_delay_ms, 0);
        assert_eq!(
            config.data.snapshot_path.as_deref(),
            Some("/srv/pulse/snapshot.json")
        );
        assert!(config.data.newest_first);
    }

    #[test]
    fn test_load_partial_config_uses_defaults() {
        let content = r#"
[assistant]
list_limit = 20
"#;
        let file = create_temp_config(content);
        let config = PulseConfig::load(file.path()).unwrap();
        assert_eq!(config.assistant.list_limit, 20);
        assert_eq!(config.assistant.recent_limit, 5);
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.session.typing_delay_ms, 800);
    }

    #[test]
    fn test_load_invalid_toml_is_config_error() {
        let file = create_temp_config("[assistant\nlist_limit = ");
        let err = PulseConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, PulseError::Config(_)));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = PulseConfig::load(Path::new("/nonexistent/pulse/config.toml")).unwrap_err();
        assert!(matches!(err, PulseError::Io(_)));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = PulseConfig::load_or_default(Path::new("/nonexistent/config.toml"));
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.assistant.recent_limit, 5);
    }

    #[test]
    fn test_load_with_fallback_reports_bad_file() {
        let file = create_temp_config("[assistant]\nlist_limit = \"many\"\n");
        let (config, error) = PulseConfig::load_with_fallback(file.path());
        assert_eq!(config.assistant.list_limit, 10);
        assert!(matches!(error, Some(PulseError::Config(_))));
    }

    #[test]
    fn test_load_with_fallback_good_file_has_no_error() {
        let file = create_temp_config("[general]\nlog_level = \"debug\"\n");
        let (config, error) = PulseConfig::load_with_fallback(file.path());
        assert_eq!(config.general.log_level, "debug");
        assert!(error.is_none());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = PulseConfig::default();
        config.assistant.list_limit = 25;
        config.session.typing_delay_ms = 150;
        config.data.snapshot_path = Some("data/sample_snapshot.json".to_string());

        config.save(&path).unwrap();
        let loaded = PulseConfig::load(&path).unwrap();
        assert_eq!(loaded.assistant.list_limit, 25);
        assert_eq!(loaded.session.typing_delay_ms, 150);
        assert_eq!(
            loaded.data.snapshot_path.as_deref(),
            Some("data/sample_snapshot.json")
        );
        assert_eq!(loaded.assistant.greeting, DEFAULT_GREETING);
    }
}
