//! Runtime configuration for deepseek-gateway.
//!
//! Configuration is loaded from a JSON file or constructed programmatically.
//! Every section has defaults, so a partial file (or none at all) is valid.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use serde::{Deserialize, Serialize};

/// Number of synthetic parts emitted by the streaming endpoint.
pub const DEFAULT_STREAM_PARTS: usize = 5;

/// Delay between synthetic parts, in milliseconds.
pub const DEFAULT_STREAM_INTERVAL_MS: u64 = 500;

/// Command-line arguments.
#[derive(Parser, Debug, Clone)]
#[command(name = "deepseek-gateway", about = "HTTP gateway to the DeepSeek chat API")]
pub struct Cli {
    /// Path to configuration file (JSON).
    #[arg(short, long, default_value = "config.json")]
    pub config: PathBuf,

    /// HTTP listen address. Overrides `server.listen` from the config file.
    #[arg(long)]
    pub listen: Option<String>,

    /// Enable verbose logging.
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines.
    #[arg(long)]
    pub json_logs: bool,
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,

    /// Chat-completion provider configuration.
    pub provider: ProviderConfig,

    /// Synthetic streaming endpoint settings.
    pub stream: StreamConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address (e.g. "0.0.0.0:8080").
    pub listen: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Chat-completion provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Base URL of the OpenAI-compatible API, without the `/chat/completions` suffix.
    pub base_url: String,

    /// Model name sent with every request.
    pub model: String,

    /// API key. When absent, `api_key_env` is consulted.
    pub api_key: Option<String>,

    /// Environment variable holding the API key.
    pub api_key_env: String,

    /// Timeout for a single provider request, in seconds.
    pub request_timeout_secs: u64,

    /// Sampling temperature. Omitted from requests when unset.
    pub temperature: Option<f64>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.deepseek.com".to_string(),
            model: "deepseek-chat".to_string(),
            api_key: None,
            api_key_env: "DEEPSEEK_API_KEY".to_string(),
            request_timeout_secs: 60,
            temperature: None,
        }
    }
}

impl ProviderConfig {
    /// The explicit key if set, otherwise the value of `api_key_env`.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|key| !key.is_empty())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Settings for the timer-driven streaming endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// How many parts to emit before completing.
    pub parts: usize,

    /// Delay between parts in milliseconds.
    pub interval_ms: u64,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            parts: DEFAULT_STREAM_PARTS,
            interval_ms: DEFAULT_STREAM_INTERVAL_MS,
        }
    }
}

impl StreamConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Config {
    /// Load configuration from a JSON file, falling back to defaults for missing fields.
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        if path.exists() {
            let data = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&data)?;
            Ok(config)
        } else {
            tracing::warn!("Config file not found at {:?}, using defaults", path);
            Ok(Config::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = Config::default();
        assert_eq!(cfg.server.listen, "0.0.0.0:8080");
        assert_eq!(cfg.provider.base_url, "https://api.deepseek.com");
        assert_eq!(cfg.provider.model, "deepseek-chat");
        assert_eq!(cfg.stream.parts, 5);
        assert_eq!(cfg.stream.interval(), Duration::from_millis(500));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"provider": {{"model": "deepseek-reasoner"}}}}"#).unwrap();

        let cfg = Config::load(file.path()).unwrap();
        assert_eq!(cfg.provider.model, "deepseek-reasoner");
        assert_eq!(cfg.provider.base_url, "https://api.deepseek.com");
        assert_eq!(cfg.stream.parts, DEFAULT_STREAM_PARTS);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load(&dir.path().join("absent.json")).unwrap();
        assert_eq!(cfg.provider.request_timeout_secs, 60);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(Config::load(file.path()).is_err());
    }

    #[test]
    fn test_explicit_api_key_wins() {
        let provider = ProviderConfig {
            api_key: Some("sk-explicit".to_string()),
            api_key_env: "DEEPSEEK_GATEWAY_TEST_UNSET_VAR".to_string(),
            ..Default::default()
        };
        assert_eq!(provider.resolve_api_key().as_deref(), Some("sk-explicit"));
    }

    #[test]
    fn test_empty_api_key_is_none() {
        let provider = ProviderConfig {
            api_key: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(provider.resolve_api_key(), None);
    }
}
