//! Configuration file and pipeline limits
//!
//! Stored at `~/.marketscout/config.toml`, created with defaults on first load.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable consulted before the config file for the API key
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Models offered by the front end
pub const KNOWN_MODELS: &[&str] = &["gpt-4o-mini", "gpt-4o"];

/// Number of relevance-accepted documents that stops the filter
pub const DEFAULT_QUOTA: usize = 5;

/// Size of the unfiltered candidate pool
pub const DEFAULT_MAX_CANDIDATES: usize = 10;

/// Per-document content cap, in characters
pub const DEFAULT_MAX_CONTENT_CHARS: usize = 5000;

/// Report word ceiling
pub const DEFAULT_WORD_BUDGET: usize = 500;

/// Words allotted to each report section
pub const DEFAULT_SECTION_WORD_TARGET: usize = 100;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub limits: Limits,
    #[serde(default)]
    pub timeouts: TimeoutConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        LlmConfig {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.2,
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// MediaWiki Action API endpoint; `{lang}` is substituted
    pub endpoint: String,
    pub language: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            endpoint: "https://{lang}.wikipedia.org/w/api.php".to_string(),
            language: "en".to_string(),
        }
    }
}

/// Tunable bounds of the retrieval filter and report synthesis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub quota: usize,
    pub max_candidates: usize,
    pub max_content_chars: usize,
    pub word_budget: usize,
    pub section_word_target: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            quota: DEFAULT_QUOTA,
            max_candidates: DEFAULT_MAX_CANDIDATES,
            max_content_chars: DEFAULT_MAX_CONTENT_CHARS,
            word_budget: DEFAULT_WORD_BUDGET,
            section_word_target: DEFAULT_SECTION_WORD_TARGET,
        }
    }
}

impl Limits {
    /// Reject limit combinations the filter cannot honour
    pub fn validate(&self) -> Result<()> {
        if self.quota == 0 {
            bail!("limits.quota must be at least 1");
        }
        if self.quota > self.max_candidates {
            bail!(
                "limits.quota ({}) cannot exceed limits.max_candidates ({})",
                self.quota,
                self.max_candidates
            );
        }
        if self.word_budget == 0 {
            bail!("limits.word_budget must be at least 1");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Upper bound on any single collaborator call
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        TimeoutConfig { request_secs: 60 }
    }
}

impl TimeoutConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_secs)
    }
}

impl Config {
    /// Load configuration from the default path, creating it if missing
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from an explicit path, creating it if missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Config::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let contents = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&contents).context("Failed to parse config file")?;
        config.limits.validate()?;

        Ok(config)
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let toml_string = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, toml_string).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;

        Ok(home.join(".marketscout").join("config.toml"))
    }

    /// API key from the environment, falling back to the config file
    pub fn resolve_api_key(&self) -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .or_else(|| self.llm.api_key.clone())
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
    }

    /// Whether the configured model is one the front end offers
    pub fn is_known_model(&self) -> bool {
        KNOWN_MODELS.contains(&self.llm.model.as_str())
    }

    /// Search endpoint with the language substituted
    pub fn search_endpoint(&self) -> String {
        self.search.endpoint.replace("{lang}", &self.search.language)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.limits.quota, 5);
        assert_eq!(config.limits.max_candidates, 10);
        assert_eq!(config.limits.max_content_chars, 5000);
        assert_eq!(config.limits.word_budget, 500);
        assert!(config.llm.api_key.is_none());
    }

    #[test]
    fn test_limits_validation() {
        assert!(Limits::default().validate().is_ok());

        let zero_quota = Limits { quota: 0, ..Limits::default() };
        assert!(zero_quota.validate().is_err());

        let oversized = Limits { quota: 11, ..Limits::default() };
        assert!(oversized.validate().is_err());

        let no_budget = Limits { word_budget: 0, ..Limits::default() };
        assert!(no_budget.validate().is_err());
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[llm]\nmodel = \"gpt-4o\"\n\n[limits]\nquota = 3\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.llm.model, "gpt-4o");
        assert_eq!(config.llm.temperature, 0.2);
        assert_eq!(config.limits.quota, 3);
        assert_eq!(config.limits.max_candidates, 10);
        assert!(config.is_known_model());
    }

    #[test]
    fn test_invalid_limits_rejected_on_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[limits]\nquota = 20\n").unwrap();

        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_search_endpoint_substitution() {
        let mut config = Config::default();
        config.search.language = "de".to_string();
        assert_eq!(config.search_endpoint(), "https://de.wikipedia.org/w/api.php");
    }

    #[test]
    fn test_config_serialization() {
        let mut config = Config::default();
        config.llm.model = "gpt-4o".to_string();

        let toml_string = toml::to_string(&config).unwrap();
        assert!(toml_string.contains("gpt-4o"));
        assert!(!toml_string.contains("api_key"));

        let deserialized: Config = toml::from_str(&toml_string).unwrap();
        assert_eq!(deserialized.llm.model, "gpt-4o");
    }
}
