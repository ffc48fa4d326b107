//! Configuration loading, validation, and management for Ruchulu.
//!
//! Loads configuration from `~/.ruchulu/config.toml` with environment
//! variable overrides. Read once at startup and never mutated afterwards;
//! the presence of provider credentials decides which upstream path the
//! Genie uses.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// OpenAI chat-completion base URL.
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
/// OpenRouter chat-completion base URL.
pub const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
/// Model used by the secondary provider when none is configured.
pub const DEFAULT_SECONDARY_MODEL: &str = "gpt-4o-mini";
/// Model used when the secondary provider is configured through OpenRouter.
pub const OPENROUTER_DEFAULT_MODEL: &str = "meta-llama/llama-3.3-8b-instruct:free";

/// The root configuration structure.
///
/// Maps directly to `~/.ruchulu/config.toml`.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Genie pipeline behaviour
    #[serde(default)]
    pub genie: GenieConfig,

    /// Hosted inference endpoint (primary provider)
    #[serde(default)]
    pub primary: PrimaryConfig,

    /// Chat-completion API (secondary provider)
    #[serde(default)]
    pub secondary: SecondaryConfig,

    /// Gateway configuration
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Document store configuration
    #[serde(default)]
    pub store: StoreConfig,
}

/// Where the pipeline runs. Decides how secondary-provider failures are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentMode {
    /// Server-side callable: secondary failures surface to the caller
    #[default]
    Server,
    /// Direct-from-client call: secondary failures fall back to the oracle
    Client,
}

impl std::str::FromStr for DeploymentMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "server" => Ok(Self::Server),
            "client" => Ok(Self::Client),
            other => Err(ConfigError::ValidationError(format!(
                "unknown deployment mode '{other}' (expected 'server' or 'client')"
            ))),
        }
    }
}

impl std::fmt::Display for DeploymentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Server => "server",
            Self::Client => "client",
        })
    }
}

/// What to do when a provider call fails at the transport level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Report the failure to the caller
    Surface,
    /// Move on to the next candidate
    FallThrough,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenieConfig {
    #[serde(default)]
    pub mode: DeploymentMode,

    /// Overrides the policy implied by `mode`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_failure: Option<FailurePolicy>,

    /// Replaces the built-in persona prompt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persona: Option<String>,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_max_new_tokens")]
    pub max_new_tokens: u32,

    #[serde(default = "default_primary_temperature")]
    pub primary_temperature: f32,

    #[serde(default = "default_secondary_temperature")]
    pub secondary_temperature: f32,
}

fn default_request_timeout_secs() -> u64 {
    20
}
fn default_max_new_tokens() -> u32 {
    180
}
fn default_primary_temperature() -> f32 {
    0.7
}
fn default_secondary_temperature() -> f32 {
    0.75
}

impl GenieConfig {
    /// Failure policy for the secondary provider.
    pub fn secondary_failure_policy(&self) -> FailurePolicy {
        self.secondary_failure.unwrap_or(match self.mode {
            DeploymentMode::Server => FailurePolicy::Surface,
            DeploymentMode::Client => FailurePolicy::FallThrough,
        })
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for GenieConfig {
    fn default() -> Self {
        Self {
            mode: DeploymentMode::default(),
            secondary_failure: None,
            persona: None,
            request_timeout_secs: default_request_timeout_secs(),
            max_new_tokens: default_max_new_tokens(),
            primary_temperature: default_primary_temperature(),
            secondary_temperature: default_secondary_temperature(),
        }
    }
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct PrimaryConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
}

impl PrimaryConfig {
    /// Both the endpoint URL and the token are required.
    pub fn is_configured(&self) -> bool {
        present(&self.api_url) && present(&self.api_token)
    }
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct SecondaryConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Sent as `HTTP-Referer`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referer: Option<String>,

    /// Sent as `X-Title`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl SecondaryConfig {
    pub fn is_configured(&self) -> bool {
        present(&self.api_key)
    }

    pub fn base_url(&self) -> &str {
        self.api_url
            .as_deref()
            .filter(|u| !u.is_empty())
            .unwrap_or(OPENAI_BASE_URL)
    }

    /// Whether the configured endpoint is OpenRouter.
    pub fn targets_openrouter(&self) -> bool {
        self.base_url().trim_end_matches('/') == OPENROUTER_BASE_URL
    }

    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_SECONDARY_MODEL)
    }
}

fn present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    /// Origin allowed by CORS (the web front end)
    #[serde(default = "default_allowed_origin")]
    pub allowed_origin: String,
}

fn default_port() -> u16 {
    8787
}
fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_allowed_origin() -> String {
    "http://localhost:5173".into()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            allowed_origin: default_allowed_origin(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// JSON file with menus and leaderboard entries loaded at startup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed_file: Option<String>,
}

fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("genie", &self.genie)
            .field("primary", &self.primary)
            .field("secondary", &self.secondary)
            .field("gateway", &self.gateway)
            .field("store", &self.store)
            .finish()
    }
}

impl std::fmt::Debug for PrimaryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrimaryConfig")
            .field("api_url", &self.api_url)
            .field("api_token", &redact(&self.api_token))
            .finish()
    }
}

impl std::fmt::Debug for SecondaryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecondaryConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("referer", &self.referer)
            .field("title", &self.title)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.ruchulu/config.toml).
    ///
    /// Environment variables take priority over the file:
    /// - `HUGGINGFACE_API_URL`, `HUGGINGFACE_API_TOKEN`
    /// - `OPENAI_API_KEY`, `OPENAI_MODEL`
    /// - `OPENROUTER_API_KEY`, `OPENROUTER_MODEL`, `OPENROUTER_REFERER`, `OPENROUTER_TITLE`
    /// - `RUCHULU_MODE`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env_with(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides using `lookup` to read variables.
    ///
    /// Empty values are treated as unset. An OpenAI key wins over an
    /// OpenRouter key; the OpenRouter key also switches the secondary
    /// base URL unless the file already set one. `OPENAI_MODEL` or
    /// `OPENROUTER_MODEL` (matching the endpoint) overrides the model even
    /// when the key comes from the file.
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = var("HUGGINGFACE_API_URL") {
            self.primary.api_url = Some(url);
        }
        if let Some(token) = var("HUGGINGFACE_API_TOKEN") {
            self.primary.api_token = Some(token);
        }

        if let Some(key) = var("OPENAI_API_KEY") {
            self.secondary.api_key = Some(key);
        } else if let Some(key) = var("OPENROUTER_API_KEY") {
            self.secondary.api_key = Some(key);
            if self.secondary.api_url.is_none() {
                self.secondary.api_url = Some(OPENROUTER_BASE_URL.into());
            }
            if self.secondary.model.is_none() {
                self.secondary.model = Some(OPENROUTER_DEFAULT_MODEL.into());
            }
        }

        // The model override follows the endpoint, wherever the key came from.
        let model_var = if self.secondary.targets_openrouter() {
            "OPENROUTER_MODEL"
        } else {
            "OPENAI_MODEL"
        };
        if let Some(model) = var(model_var) {
            self.secondary.model = Some(model);
        }

        if let Some(referer) = var("OPENROUTER_REFERER") {
            self.secondary.referer = Some(referer);
        }
        if let Some(title) = var("OPENROUTER_TITLE") {
            self.secondary.title = Some(title);
        }

        if let Some(mode) = var("RUCHULU_MODE") {
            self.genie.mode = mode.parse()?;
        }

        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".ruchulu")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, t) in [
            ("primary_temperature", self.genie.primary_temperature),
            ("secondary_temperature", self.genie.secondary_temperature),
        ] {
            if !(0.0..=2.0).contains(&t) {
                return Err(ConfigError::ValidationError(format!(
                    "{name} must be between 0.0 and 2.0"
                )));
            }
        }

        if self.genie.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "request_timeout_secs must be > 0".into(),
            ));
        }

        if self.genie.max_new_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "max_new_tokens must be > 0".into(),
            ));
        }

        Ok(())
    }

    /// Generate a default config TOML string (for the `init` command).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn default_config_has_no_providers() {
        let config = AppConfig::default();
        assert!(!config.primary.is_configured());
        assert!(!config.secondary.is_configured());
        assert_eq!(config.genie.mode, DeploymentMode::Server);
        assert_eq!(config.gateway.port, 8787);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.gateway.port, config.gateway.port);
        assert_eq!(parsed.genie.max_new_tokens, 180);
    }

    #[test]
    fn primary_needs_url_and_token() {
        let mut primary = PrimaryConfig {
            api_url: Some("https://hf.example/models/x".into()),
            api_token: None,
        };
        assert!(!primary.is_configured());
        primary.api_token = Some("   ".into());
        assert!(!primary.is_configured());
        primary.api_token = Some("hf_abc".into());
        assert!(primary.is_configured());
    }

    #[test]
    fn mode_decides_secondary_policy() {
        let mut genie = GenieConfig::default();
        assert_eq!(genie.secondary_failure_policy(), FailurePolicy::Surface);
        genie.mode = DeploymentMode::Client;
        assert_eq!(genie.secondary_failure_policy(), FailurePolicy::FallThrough);
        genie.secondary_failure = Some(FailurePolicy::Surface);
        assert_eq!(genie.secondary_failure_policy(), FailurePolicy::Surface);
    }

    #[test]
    fn invalid_temperature_rejected() {
        let mut config = AppConfig::default();
        config.genie.secondary_temperature = 5.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_timeout_rejected() {
        let mut config = AppConfig::default();
        config.genie.request_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let config = AppConfig::load_from(Path::new("/nonexistent/config.toml")).unwrap();
        assert!(!config.secondary.is_configured());
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[genie]
mode = "client"
request_timeout_secs = 5

[primary]
api_url = "https://hf.example/models/genie"
api_token = "hf_test"

[secondary]
api_key = "sk-test"
model = "gpt-4o"
"#,
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.genie.mode, DeploymentMode::Client);
        assert_eq!(config.genie.request_timeout_secs, 5);
        assert!(config.primary.is_configured());
        assert_eq!(config.secondary.model(), "gpt-4o");
        assert_eq!(config.secondary.base_url(), OPENAI_BASE_URL);
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[genie\nmode = ").unwrap();
        assert!(matches!(
            AppConfig::load_from(&path),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn env_configures_both_providers() {
        let mut config = AppConfig::default();
        config
            .apply_env_with(env(&[
                ("HUGGINGFACE_API_URL", "https://hf.example/models/genie"),
                ("HUGGINGFACE_API_TOKEN", "hf_env"),
                ("OPENAI_API_KEY", "sk-env"),
                ("OPENAI_MODEL", "gpt-4.1-mini"),
            ]))
            .unwrap();
        assert!(config.primary.is_configured());
        assert!(config.secondary.is_configured());
        assert_eq!(config.secondary.model(), "gpt-4.1-mini");
        assert_eq!(config.secondary.base_url(), OPENAI_BASE_URL);
    }

    #[test]
    fn env_openrouter_switches_base_url_and_model() {
        let mut config = AppConfig::default();
        config
            .apply_env_with(env(&[
                ("OPENROUTER_API_KEY", "or-key"),
                ("OPENROUTER_REFERER", "https://ruchulu.example"),
                ("OPENROUTER_TITLE", "Ruchulu"),
                ("RUCHULU_MODE", "client"),
            ]))
            .unwrap();
        assert_eq!(config.secondary.base_url(), OPENROUTER_BASE_URL);
        assert_eq!(config.secondary.model(), OPENROUTER_DEFAULT_MODEL);
        assert_eq!(config.secondary.referer.as_deref(), Some("https://ruchulu.example"));
        assert_eq!(config.secondary.title.as_deref(), Some("Ruchulu"));
        assert_eq!(config.genie.mode, DeploymentMode::Client);
    }

    #[test]
    fn env_model_applies_to_key_from_file() {
        let mut config = AppConfig::default();
        config.secondary.api_key = Some("sk-file".into());
        config
            .apply_env_with(env(&[("OPENAI_MODEL", "gpt-4.1")]))
            .unwrap();
        assert_eq!(config.secondary.api_key.as_deref(), Some("sk-file"));
        assert_eq!(config.secondary.model(), "gpt-4.1");
    }

    #[test]
    fn env_model_follows_the_endpoint() {
        let mut config = AppConfig::default();
        config.secondary.api_key = Some("or-file".into());
        config.secondary.api_url = Some(OPENROUTER_BASE_URL.into());
        config
            .apply_env_with(env(&[
                ("OPENAI_MODEL", "gpt-4.1"),
                ("OPENROUTER_MODEL", "mistralai/mistral-7b-instruct"),
            ]))
            .unwrap();
        assert_eq!(config.secondary.model(), "mistralai/mistral-7b-instruct");

        let mut config = AppConfig::default();
        config
            .apply_env_with(env(&[
                ("OPENROUTER_API_KEY", "or-env"),
                ("OPENROUTER_MODEL", "mistralai/mistral-7b-instruct"),
            ]))
            .unwrap();
        assert_eq!(config.secondary.model(), "mistralai/mistral-7b-instruct");
    }

    #[test]
    fn empty_env_values_count_as_absent() {
        let mut config = AppConfig::default();
        config
            .apply_env_with(env(&[("OPENAI_API_KEY", ""), ("HUGGINGFACE_API_URL", " ")]))
            .unwrap();
        assert!(!config.secondary.is_configured());
        assert!(config.primary.api_url.is_none());
    }

    #[test]
    fn bad_mode_in_env_is_rejected() {
        let mut config = AppConfig::default();
        let result = config.apply_env_with(env(&[("RUCHULU_MODE", "browser")]));
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let mut config = AppConfig::default();
        config.primary.api_token = Some("hf_supersecret".into());
        config.secondary.api_key = Some("sk-supersecret".into());
        let debug = format!("{config:?}");
        assert!(!debug.contains("supersecret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("8787"));
        assert!(toml_str.contains("server"));
    }
}
