//! Configuration management

use crate::error::{DigestError, Result};
use crate::retry::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Document store connection
    #[serde(default)]
    pub notion: NotionConfig,

    /// Summarization endpoint
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Retry budget for network calls
    #[serde(default)]
    pub retry: RetryPolicy,
}

/// Document store connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotionConfig {
    /// Integration token
    pub token: String,

    /// Database to query
    pub database_id: String,

    /// API base URL
    #[serde(default = "default_notion_url")]
    pub url: String,

    /// Versioned API contract header
    #[serde(default = "default_notion_version")]
    pub version: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for NotionConfig {
    fn default() -> Self {
        Self {
            token: std::env::var("NOTEDIGEST_NOTION_TOKEN").unwrap_or_default(),
            database_id: std::env::var("NOTEDIGEST_NOTION_DATABASE_ID").unwrap_or_default(),
            url: default_notion_url(),
            version: default_notion_version(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_notion_url() -> String {
    std::env::var("NOTEDIGEST_NOTION_URL")
        .unwrap_or_else(|_| "https://api.notion.com".to_string())
}

fn default_notion_version() -> String {
    "2022-06-28".to_string()
}

/// Summarization endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// API key
    pub api_key: String,

    /// Model name
    #[serde(default = "default_gemini_model")]
    pub model: String,

    /// API base URL
    #[serde(default = "default_gemini_url")]
    pub url: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Output token budget per request
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: std::env::var("NOTEDIGEST_GEMINI_API_KEY").unwrap_or_default(),
            model: default_gemini_model(),
            url: default_gemini_url(),
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_gemini_model() -> String {
    std::env::var("NOTEDIGEST_GEMINI_MODEL").unwrap_or_else(|_| "gemini-2.0-flash".to_string())
}

fn default_gemini_url() -> String {
    std::env::var("NOTEDIGEST_GEMINI_URL")
        .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".to_string())
}

fn default_temperature() -> f32 {
    0.3
}

fn default_max_output_tokens() -> u32 {
    2048
}

fn default_timeout() -> u64 {
    30
}

impl Config {
    /// Load config from default path
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path())
    }

    /// Load config from a specific path; a missing file yields the
    /// env-var-backed defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_yaml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_path())
    }

    /// Save config to a specific path, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(crate::CONFIG_DIR_NAME)
            .join("config.yml")
    }

    /// Check that both upstream services have credentials
    pub fn ensure_credentials(&self) -> Result<()> {
        if self.notion.token.is_empty() {
            return Err(DigestError::Config(
                "document store token is not set (NOTEDIGEST_NOTION_TOKEN or config file)"
                    .to_string(),
            ));
        }
        if self.notion.database_id.is_empty() {
            return Err(DigestError::Config(
                "database id is not set (NOTEDIGEST_NOTION_DATABASE_ID or config file)".to_string(),
            ));
        }
        if self.gemini.api_key.is_empty() {
            return Err(DigestError::Config(
                "model API key is not set (NOTEDIGEST_GEMINI_API_KEY or config file)".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_fills_remaining_fields_with_defaults() {
        let yaml = r#"
notion:
  token: "secret"
  database_id: "db-123"
retry:
  max_attempts: 5
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.notion.token, "secret");
        assert_eq!(config.notion.url, "https://api.notion.com");
        assert_eq!(config.notion.version, "2022-06-28");
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.base_delay_ms, 1000);
        assert_eq!(config.gemini.max_output_tokens, 2048);
    }

    #[test]
    fn config_round_trips_through_yaml() {
        let mut config = Config::default();
        config.notion.token = "t".to_string();
        config.notion.database_id = "d".to_string();
        config.gemini.api_key = "k".to_string();
        config.gemini.temperature = 0.7;

        let yaml = serde_yaml::to_string(&config).unwrap();
        let reloaded: Config = serde_yaml::from_str(&yaml).unwrap();

        assert_eq!(reloaded.notion.token, "t");
        assert_eq!(reloaded.gemini.temperature, 0.7);
    }

    #[test]
    fn load_from_reads_the_file_when_present() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        std::fs::write(
            &path,
            "notion:\n  token: \"file-token\"\n  database_id: \"file-db\"\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.notion.token, "file-token");
        assert_eq!(config.notion.database_id, "file-db");

        // missing file falls back to defaults instead of erroring
        let config = Config::load_from(&dir.path().join("absent.yml")).unwrap();
        assert_eq!(config.notion.url, "https://api.notion.com");
    }

    #[test]
    fn save_to_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yml");

        let mut config = Config::default();
        config.notion.token = "t".to_string();
        config.save_to(&path).unwrap();

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.notion.token, "t");
    }

    #[test]
    fn missing_credentials_are_reported() {
        let mut config = Config::default();
        config.notion.token = String::new();
        config.notion.database_id = "d".to_string();
        config.gemini.api_key = "k".to_string();

        let err = config.ensure_credentials().unwrap_err();
        assert!(err.to_string().contains("token"));

        config.notion.token = "t".to_string();
        assert!(config.ensure_credentials().is_ok());
    }
}
