//! Configuration loading for the explanation client.

use anyhow::Context;
use serde::Deserialize;
use std::path::Path;

/// Default text-generation endpoint (Gemini `generateContent`).
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent";

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Settings for the text-generation endpoint.
///
/// Every key is optional in the file; absent keys keep their defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ExplanationConfig {
    /// API key sent as the `key` query parameter. Can also be typed in the UI.
    pub api_key: String,
    /// Full URL of the `generateContent` style endpoint.
    pub endpoint: String,
    pub temperature: f32,
    pub top_p: f32,
    pub max_output_tokens: u32,
    /// Request timeout. `None` keeps the HTTP client's default.
    pub timeout_secs: Option<u64>,
}

impl Default for ExplanationConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            temperature: 0.4,
            top_p: 0.8,
            max_output_tokens: 1000,
            timeout_secs: None,
        }
    }
}

impl ExplanationConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Returns
    /// * `Ok(config)` parsed from the file, or the defaults when the file does not exist
    /// * `Err` if the file exists but cannot be read or parsed
    pub fn load(config_path: &Path) -> anyhow::Result<Self> {
        if !config_path.exists() {
            log::info!("No {} found, using default explanation settings", config_path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(config_path).with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
        let config: Self = toml::from_str(&content).with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;
        log::info!("Loaded explanation settings from {} (endpoint: {})", config_path.display(), config.endpoint);
        Ok(config)
    }
}
