use serde::Deserialize;
use std::net::SocketAddr;

use domain::models::RANKING_LIMIT;
use shared::jwt::{JwtError, TokenKeys};
use shared::pagination::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub security: SecurityConfig,
    pub jwt: JwtAuthConfig,
    #[serde(default)]
    pub gamification: GamificationConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,

    /// Serve from the in-memory store instead of PostgreSQL. Data is lost on
    /// restart; meant for local runs.
    #[serde(default)]
    pub in_memory: bool,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

impl DatabaseConfig {
    pub fn pool_config(&self) -> persistence::db::DatabaseConfig {
        persistence::db::DatabaseConfig {
            url: self.url.clone(),
            max_connections: self.max_connections,
            min_connections: self.min_connections,
            connect_timeout_secs: self.connect_timeout_secs,
            idle_timeout_secs: self.idle_timeout_secs,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecurityConfig {
    /// Allowed CORS origins. Empty allows any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtAuthConfig {
    /// `RS256` (default) or `HS256`.
    #[serde(default = "default_jwt_algorithm")]
    pub algorithm: String,

    /// RSA public key in PEM format for verifying tokens
    #[serde(default)]
    pub public_key: String,

    /// RSA private key in PEM format. Only needed to issue tokens.
    #[serde(default)]
    pub private_key: String,

    /// Shared secret for HS256
    #[serde(default)]
    pub secret: String,

    /// Leeway in seconds for clock skew tolerance
    #[serde(default = "default_jwt_leeway")]
    pub leeway_secs: u64,
}

impl JwtAuthConfig {
    pub fn token_keys(&self) -> Result<TokenKeys, JwtError> {
        match self.algorithm.as_str() {
            "HS256" => TokenKeys::shared_secret(&self.secret, self.leeway_secs),
            _ => TokenKeys::rsa_pem(&self.public_key, &self.private_key, self.leeway_secs),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GamificationConfig {
    /// Rows returned by the ranking, capped at 20.
    #[serde(default = "default_ranking_limit")]
    pub ranking_limit: usize,

    /// Ledger page size when the client does not ask for one.
    #[serde(default = "default_ledger_page_size")]
    pub ledger_page_size: u32,
}

impl Default for GamificationConfig {
    fn default() -> Self {
        Self {
            ranking_limit: default_ranking_limit(),
            ledger_page_size: default_ledger_page_size(),
        }
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_request_timeout() -> u64 {
    30
}
fn default_max_connections() -> u32 {
    20
}
fn default_min_connections() -> u32 {
    5
}
fn default_connect_timeout() -> u64 {
    10
}
fn default_idle_timeout() -> u64 {
    600
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}
fn default_jwt_algorithm() -> String {
    "RS256".to_string()
}
fn default_jwt_leeway() -> u64 {
    shared::jwt::DEFAULT_LEEWAY_SECS
}
fn default_ranking_limit() -> usize {
    RANKING_LIMIT
}
fn default_ledger_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Loading order (later sources override earlier):
    /// 1. config/default.toml - base configuration with defaults
    /// 2. config/local.toml - local overrides (optional, not in git)
    /// 3. Environment variables with PORTAL__ prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("PORTAL").separator("__"))
            .build()?;

        let cfg: Self = config.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Builds a configuration from embedded defaults plus overrides, without
    /// touching config files or validating. Used by tests.
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let defaults = r#"
            [server]
            host = "127.0.0.1"
            port = 8080
            request_timeout_secs = 30

            [database]
            url = ""
            in_memory = true
            max_connections = 5
            min_connections = 1
            connect_timeout_secs = 10
            idle_timeout_secs = 600

            [logging]
            level = "debug"
            format = "pretty"

            [security]
            cors_origins = []

            [jwt]
            algorithm = "HS256"
            secret = "portal-test-secret-0123456789abcdef"
            leeway_secs = 30

            [gamification]
            ranking_limit = 20
            ledger_page_size = 50
        "#;

        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(defaults, config::FileFormat::Toml));

        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.database.url.is_empty() && !self.database.in_memory {
            return Err(ConfigValidationError::MissingRequired(
                "PORTAL__DATABASE__URL environment variable must be set".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "Server port cannot be 0".to_string(),
            ));
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigValidationError::InvalidValue(
                "min_connections cannot exceed max_connections".to_string(),
            ));
        }

        if self.gamification.ranking_limit == 0 || self.gamification.ranking_limit > RANKING_LIMIT
        {
            return Err(ConfigValidationError::InvalidValue(format!(
                "gamification.ranking_limit must be between 1 and {}",
                RANKING_LIMIT
            )));
        }

        if self.gamification.ledger_page_size == 0
            || self.gamification.ledger_page_size > MAX_PAGE_SIZE
        {
            return Err(ConfigValidationError::InvalidValue(format!(
                "gamification.ledger_page_size must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }

        match self.jwt.algorithm.as_str() {
            "RS256" if self.jwt.public_key.is_empty() => {
                Err(ConfigValidationError::MissingRequired(
                    "PORTAL__JWT__PUBLIC_KEY must be set for RS256".to_string(),
                ))
            }
            "HS256" if self.jwt.secret.is_empty() => Err(ConfigValidationError::MissingRequired(
                "PORTAL__JWT__SECRET must be set for HS256".to_string(),
            )),
            "RS256" | "HS256" => Ok(()),
            other => Err(ConfigValidationError::InvalidValue(format!(
                "Unsupported JWT algorithm '{}'",
                other
            ))),
        }
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigValidationError> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|_| {
                ConfigValidationError::InvalidValue(format!(
                    "Invalid listen address {}:{}",
                    self.server.host, self.server.port
                ))
            })
    }
}
