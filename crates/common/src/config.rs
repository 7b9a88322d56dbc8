//! Application configuration.

use serde::Deserialize;
use std::path::Path;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Outbound mail configuration.
    #[serde(default)]
    pub mail: MailConfig,
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

/// Outbound mail configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
    /// Whether outbound mail is enabled at all.
    #[serde(default)]
    pub enabled: bool,
    /// From address for outbound notification mails.
    #[serde(default = "default_from_address")]
    pub from_address: String,
    /// Display name for the From header.
    #[serde(default = "default_from_name")]
    pub from_name: String,
    /// Delivery provider settings.
    #[serde(default)]
    pub provider: MailProviderConfig,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            from_address: default_from_address(),
            from_name: default_from_name(),
            provider: MailProviderConfig::default(),
        }
    }
}

/// Delivery provider settings. Exactly one provider is active, selected by
/// the `kind` field.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MailProviderConfig {
    /// Plain SMTP relay.
    Smtp {
        /// SMTP host.
        host: String,
        /// SMTP port.
        #[serde(default = "default_smtp_port")]
        port: u16,
        /// Use STARTTLS.
        #[serde(default = "default_true")]
        use_tls: bool,
        /// Username, if the relay requires authentication.
        #[serde(default)]
        username: Option<String>,
        /// Password, if the relay requires authentication.
        #[serde(default)]
        password: Option<String>,
    },
    /// SendGrid HTTP API.
    Sendgrid {
        /// SendGrid API key.
        api_key: String,
    },
    /// Mailgun HTTP API.
    Mailgun {
        /// Mailgun API key.
        api_key: String,
        /// Mailgun sending domain.
        domain: String,
        /// Use the EU region endpoint.
        #[serde(default)]
        eu_region: bool,
    },
}

impl Default for MailProviderConfig {
    fn default() -> Self {
        Self::Smtp {
            host: "localhost".to_string(),
            port: default_smtp_port(),
            use_tls: false,
            username: None,
            password: None,
        }
    }
}

const fn default_max_connections() -> u32 {
    100
}

const fn default_min_connections() -> u32 {
    5
}

fn default_from_address() -> String {
    "notifications@localhost".to_string()
}

fn default_from_name() -> String {
    "Mailroom".to_string()
}

const fn default_smtp_port() -> u16 {
    25
}

const fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `MAILROOM_ENV`)
    /// 3. Environment variables with `MAILROOM_` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let env = std::env::var("MAILROOM_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("MAILROOM")
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
                config::Environment::with_prefix("MAILROOM")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
