//! Configuration persistence for SnapExplain settings

use std::time::Duration;

use cosmic::cosmic_config::{self, CosmicConfigEntry, cosmic_config_derive::CosmicConfigEntry};
use serde::{Deserialize, Serialize};

use crate::ollama::{DEFAULT_PROMPT_TEMPLATE, DEFAULT_SERVER_URL};

/// Application configuration persisted between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, CosmicConfigEntry)]
#[version = 1]
pub struct SnapExplainConfig {
    /// Base URL of the Ollama server
    pub server_url: String,
    /// Prompt sent with the recognized text; `{text}` is replaced by it
    pub prompt_template: String,
    /// Tesseract language code(s), e.g. "eng" or "eng+deu"
    pub ocr_language: String,
    /// Timeout for each HTTP request to the server
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Model picked last time, preselected when still available
    #[serde(default)]
    pub last_model: Option<String>,
}

fn default_request_timeout_secs() -> u64 {
    120
}

impl SnapExplainConfig {
    /// Configuration ID for cosmic-config
    pub const ID: &'static str = "io.github.snapexplain.SnapExplain";

    /// Load configuration from disk, or return defaults if unavailable
    pub fn load() -> Self {
        match cosmic_config::Config::new(Self::ID, Self::VERSION) {
            Ok(config) => match Self::get_entry(&config) {
                Ok(entry) => entry,
                Err((errs, entry)) => {
                    log::warn!("Error loading config, using defaults: {:?}", errs);
                    entry
                }
            },
            Err(err) => {
                log::warn!("Could not create config handler: {:?}", err);
                Self::default()
            }
        }
    }

    /// Save configuration to disk
    pub fn save(&self) {
        match cosmic_config::Config::new(Self::ID, Self::VERSION) {
            Ok(config) => {
                if let Err(err) = self.write_entry(&config) {
                    log::error!("Failed to save config: {:?}", err);
                }
            }
            Err(err) => {
                log::error!("Could not create config handler for saving: {:?}", err);
            }
        }
    }

    pub fn request_timeout(&self) -> Duration {
        // A zero timeout would fail every request immediately
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

impl Default for SnapExplainConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            prompt_template: DEFAULT_PROMPT_TEMPLATE.to_string(),
            ocr_language: "eng".to_string(),
            request_timeout_secs: default_request_timeout_secs(),
            last_model: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_local_ollama() {
        let config = SnapExplainConfig::default();
        assert_eq!(config.server_url, "http://localhost:11434");
        assert!(config.prompt_template.contains("{text}"));
        assert_eq!(config.ocr_language, "eng");
        assert_eq!(config.request_timeout(), Duration::from_secs(120));
        assert!(config.last_model.is_none());
    }

    #[test]
    fn test_zero_timeout_is_clamped() {
        let config = SnapExplainConfig {
            request_timeout_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.request_timeout(), Duration::from_secs(1));
    }

    #[test]
    fn test_older_entries_fill_new_fields() {
        let config: SnapExplainConfig = serde_json::from_str(
            r#"{"server_url":"http://gpu-box:11434","prompt_template":"{text}","ocr_language":"deu"}"#,
        )
        .unwrap();
        assert_eq!(config.server_url, "http://gpu-box:11434");
        assert_eq!(config.request_timeout_secs, 120);
        assert_eq!(config.last_model, None);
    }
}
