//! Configuration management

use serde::{Deserialize, Serialize};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub reasoning: ReasoningConfig,
    pub analysis: AnalysisConfig,
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            reasoning: ReasoningConfig::default(),
            analysis: AnalysisConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_seconds: u64,
    pub allowed_origins: Vec<String>,
    pub enable_docs: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            request_timeout_seconds: 90,
            allowed_origins: vec!["*".to_string()],
            enable_docs: true,
        }
    }
}

/// PostgreSQL configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connect_timeout_seconds: u64,
    pub run_migrations: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 10,
            connect_timeout_seconds: 10,
            run_migrations: true,
        }
    }
}

/// Reasoning service (OpenAI-compatible) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReasoningConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    /// HTTP client timeout; the pipeline applies its own deadline on top
    pub timeout_seconds: u64,
    pub max_tokens: u32,
    pub temperature: f64,
}

impl Default for ReasoningConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            model: "gpt-4o-mini".to_string(),
            timeout_seconds: 60,
            max_tokens: 4096,
            temperature: 0.2,
        }
    }
}

/// Analysis pipeline tunables
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Deadline for one reasoning call, after which the run degrades to
    /// zero findings
    pub reasoning_timeout_seconds: u64,
    /// Source content beyond this many KB is truncated before prompting
    pub max_source_kb: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            reasoning_timeout_seconds: 45,
            max_source_kb: 200,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// "json" or "pretty"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "json".to_string(),
        }
    }
}

/// Validation for loaded configuration values
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid configuration: {field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl Validate for Config {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.server.port == 0 {
            return Err(ValidationError::new("server.port", "must be non-zero"));
        }
        if self.database.url.trim().is_empty() {
            return Err(ValidationError::new(
                "database.url",
                "must be set (CODEGUARD__DATABASE__URL)",
            ));
        }
        if self.reasoning.base_url.trim().is_empty() {
            return Err(ValidationError::new("reasoning.base_url", "must be set"));
        }
        if self.analysis.reasoning_timeout_seconds == 0 {
            return Err(ValidationError::new(
                "analysis.reasoning_timeout_seconds",
                "must be non-zero",
            ));
        }
        if self.analysis.max_source_kb == 0 {
            return Err(ValidationError::new(
                "analysis.max_source_kb",
                "must be non-zero",
            ));
        }
        if !(0.0..=2.0).contains(&self.reasoning.temperature) {
            return Err(ValidationError::new(
                "reasoning.temperature",
                "must be within 0.0..=2.0",
            ));
        }
        Ok(())
    }
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Layering, lowest to highest priority: `config/default`, `config/{ENV}`,
    /// `config/local`, then `CODEGUARD__`-prefixed environment variables with
    /// `__` separators (e.g. `CODEGUARD__SERVER__PORT=8080`).
    pub fn load() -> Result<Self, ConfigLoadError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false));

        if let Ok(env) = std::env::var("ENV") {
            builder = builder
                .add_source(config::File::with_name(&format!("config/{}", env)).required(false));
        }

        builder = builder
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("CODEGUARD").separator("__"));

        let config: Config = builder.build()?.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }
}

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("Configuration file error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Configuration validation error: {0}")]
    Validation(#[from] ValidationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate_once_database_url_is_set() {
        let mut config = Config::default();
        assert!(config.validate().is_err());

        config.database.url = "postgres://localhost/codeguard".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_analysis_bounds() {
        let config = Config::default();
        assert_eq!(config.analysis.max_source_kb, 200);
        assert_eq!(config.analysis.reasoning_timeout_seconds, 45);
    }

    #[test]
    fn test_temperature_range_enforced() {
        let mut config = Config::default();
        config.database.url = "postgres://localhost/codeguard".to_string();
        config.reasoning.temperature = 3.5;
        assert!(config.validate().is_err());
    }
}
