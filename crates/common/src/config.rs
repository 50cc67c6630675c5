//! Application configuration.

use serde::Deserialize;
use std::path::Path;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Security configuration.
    pub security: SecurityConfig,
    /// Mail configuration. When absent, outgoing mail is logged and dropped.
    #[serde(default)]
    pub mail: Option<MailConfig>,
    /// Pagination configuration.
    #[serde(default)]
    pub pagination: PaginationConfig,
    /// Seed accounts created on first start.
    #[serde(default)]
    pub seed: SeedConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Public URL of this instance.
    pub url: String,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Security configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    /// Process-wide secret key used to sign password-reset tokens.
    pub secret_key: String,
    /// Lifetime of a password-reset token, in seconds.
    #[serde(default = "default_reset_token_ttl")]
    pub reset_token_ttl_secs: u64,
}

/// SMTP mail configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
    /// SMTP relay host.
    pub smtp_host: String,
    /// SMTP relay port.
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    /// SMTP username.
    #[serde(default)]
    pub username: Option<String>,
    /// SMTP password.
    #[serde(default)]
    pub password: Option<String>,
    /// From address for outgoing mail.
    pub from_address: String,
    /// From display name for outgoing mail.
    #[serde(default = "default_from_name")]
    pub from_name: String,
}

/// Pagination configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PaginationConfig {
    /// Posts per feed page.
    #[serde(default = "default_posts_per_page")]
    pub posts_per_page: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            posts_per_page: default_posts_per_page(),
        }
    }
}

/// Seed accounts configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedConfig {
    /// Accounts created when the user table is empty.
    #[serde(default)]
    pub users: Vec<SeedUser>,
}

/// A single seed account.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedUser {
    /// Username of the seed account.
    pub username: String,
    /// Email address of the seed account.
    pub email: String,
    /// Initial password of the seed account.
    pub password: String,
    /// Whether the account gets the editor role.
    #[serde(default)]
    pub editor: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3000
}

const fn default_max_connections() -> u32 {
    100
}

const fn default_min_connections() -> u32 {
    5
}

const fn default_reset_token_ttl() -> u64 {
    600
}

const fn default_smtp_port() -> u16 {
    587
}

fn default_from_name() -> String {
    "tanvan".to_string()
}

const fn default_posts_per_page() -> u64 {
    25
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `TANVAN_ENV`)
    /// 3. Environment variables with `TANVAN_` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let env = std::env::var("TANVAN_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("TANVAN")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("TANVAN")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
