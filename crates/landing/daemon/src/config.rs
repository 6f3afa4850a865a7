//! Configuration for landing-daemon
//!
//! Sources, later ones winning:
//! 1. built-in defaults
//! 2. optional config file (`--config` / `LANDING_CONFIG`)
//! 3. `LANDING_*` environment variables, `__` between nested keys
//!    (`LANDING_MAIL__HOST`, `LANDING_STORAGE__PASSWORD`)
//! 4. legacy deployment variable names (`DB_HOST`, `SMTP_PASS`, ...)

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Main daemon configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LandingConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Operator notification mail
    #[serde(default)]
    pub mail: MailConfig,

    /// Access to the application listing
    #[serde(default)]
    pub admin: AdminConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: SocketAddr,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub enable_cors: bool,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Maximum request body size in bytes
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,

    /// Directory holding the landing page assets
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            enable_cors: true,
            request_timeout_secs: default_request_timeout(),
            max_body_size: default_max_body_size(),
            static_dir: default_static_dir(),
        }
    }
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StorageConfig {
    /// In-memory storage (for development/testing)
    Memory,

    /// PostgreSQL storage
    Postgres(PostgresConfig),
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig::Postgres(PostgresConfig::default())
    }
}

impl StorageConfig {
    /// Postgres settings, switching a memory backend to Postgres defaults first
    fn postgres_mut(&mut self) -> &mut PostgresConfig {
        if matches!(self, StorageConfig::Memory) {
            *self = StorageConfig::Postgres(PostgresConfig::default());
        }
        match self {
            StorageConfig::Postgres(pg) => pg,
            StorageConfig::Memory => unreachable!("memory backend replaced above"),
        }
    }
}

/// PostgreSQL connection and pool settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostgresConfig {
    #[serde(default = "default_db_host")]
    pub host: String,

    #[serde(default = "default_db_port")]
    pub port: u16,

    #[serde(default = "default_db_user")]
    pub user: String,

    #[serde(default)]
    pub password: Option<String>,

    #[serde(default = "default_db_name")]
    pub database: String,

    /// Maximum connections in pool
    #[serde(default = "default_pool_size")]
    pub max_connections: u32,

    /// Idle connections are closed after this many seconds
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,

    /// Connection acquire timeout in seconds
    #[serde(default = "default_connection_timeout")]
    pub connect_timeout_secs: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            host: default_db_host(),
            port: default_db_port(),
            user: default_db_user(),
            password: None,
            database: default_db_name(),
            max_connections: default_pool_size(),
            idle_timeout_secs: default_idle_timeout(),
            connect_timeout_secs: default_connection_timeout(),
        }
    }
}

/// SMTP settings for the operator notification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// Send notifications at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_smtp_host")]
    pub host: String,

    #[serde(default = "default_smtp_port")]
    pub port: u16,

    /// Implicit TLS; otherwise STARTTLS is used when offered
    #[serde(default = "default_true")]
    pub secure: bool,

    #[serde(default)]
    pub user: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    #[serde(default = "default_mail_from")]
    pub from: String,

    #[serde(default = "default_mail_to")]
    pub to: String,

    /// Upper bound on one dispatch
    #[serde(default = "default_mail_timeout")]
    pub timeout_secs: u64,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            host: default_smtp_host(),
            port: default_smtp_port(),
            secure: true,
            user: None,
            password: None,
            from: default_mail_from(),
            to: default_mail_to(),
            timeout_secs: default_mail_timeout(),
        }
    }
}

impl MailConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Listing access control
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Bearer token required by `GET /api/contact`; open when unset
    #[serde(default)]
    pub token: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// Default value helpers
fn default_true() -> bool {
    true
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 3002))
}

fn default_request_timeout() -> u64 {
    30
}

fn default_max_body_size() -> usize {
    1024 * 1024
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("public")
}

fn default_db_host() -> String {
    "localhost".to_string()
}

fn default_db_port() -> u16 {
    5432
}

fn default_db_user() -> String {
    "postgres".to_string()
}

fn default_db_name() -> String {
    "n8n_landing".to_string()
}

fn default_pool_size() -> u32 {
    20
}

fn default_idle_timeout() -> u64 {
    30
}

fn default_connection_timeout() -> u64 {
    5
}

fn default_smtp_host() -> String {
    "smtp.yandex.ru".to_string()
}

fn default_smtp_port() -> u16 {
    465
}

fn default_mail_from() -> String {
    "noreply@fastpassnews.ru".to_string()
}

fn default_mail_to() -> String {
    "admin@fastpassnews.ru".to_string()
}

fn default_mail_timeout() -> u64 {
    5
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Drop one pair of matching quotes around a secret.
///
/// Deployment tooling tends to write `DB_PASSWORD="s3cret"` into env files
/// that are then passed through verbatim.
pub fn strip_wrapping_quotes(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'"' || first == b'\'') {
            return &value[1..value.len() - 1];
        }
    }
    value
}

fn parse_legacy<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, config::ConfigError>
where
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| config::ConfigError::Message(format!("invalid {}={:?}: {}", key, raw, e)))
}

impl LandingConfig {
    /// Load configuration from defaults, file, and environment
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        // Add default configuration
        builder = builder.add_source(config::Config::try_from(&LandingConfig::default())?);

        // Add file configuration if provided
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        // Add environment variables with LANDING_ prefix
        builder = builder.add_source(
            config::Environment::with_prefix("LANDING")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let mut config: LandingConfig = builder.build()?.try_deserialize()?;
        config.apply_legacy_env(|key| std::env::var(key).ok())?;
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    /// Apply legacy deployment variable names (`DB_*`, `SMTP_*`, `EMAIL_*`, `PORT`).
    pub fn apply_legacy_env<F>(&mut self, lookup: F) -> Result<(), config::ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            self.server.listen_addr.set_port(parse_legacy("PORT", &port)?);
        }

        let db_keys = ["DB_HOST", "DB_PORT", "DB_USER", "DB_PASSWORD", "DB_NAME"];
        if db_keys.iter().any(|key| lookup(key).is_some()) {
            let pg = self.storage.postgres_mut();
            if let Some(host) = lookup("DB_HOST") {
                pg.host = host;
            }
            if let Some(port) = lookup("DB_PORT") {
                pg.port = parse_legacy("DB_PORT", &port)?;
            }
            if let Some(user) = lookup("DB_USER") {
                pg.user = user;
            }
            if let Some(password) = lookup("DB_PASSWORD") {
                pg.password = Some(password);
            }
            if let Some(database) = lookup("DB_NAME") {
                pg.database = database;
            }
        }

        if let Some(host) = lookup("SMTP_HOST") {
            self.mail.host = host;
        }
        if let Some(port) = lookup("SMTP_PORT") {
            self.mail.port = parse_legacy("SMTP_PORT", &port)?;
        }
        if let Some(secure) = lookup("SMTP_SECURE") {
            self.mail.secure = secure.trim() == "true";
        }
        if let Some(user) = lookup("SMTP_USER") {
            self.mail.user = Some(user);
        }
        if let Some(password) = lookup("SMTP_PASS") {
            self.mail.password = Some(password);
        }
        if let Some(from) = lookup("EMAIL_FROM") {
            self.mail.from = from;
        }
        if let Some(to) = lookup("EMAIL_TO") {
            self.mail.to = to;
        }
        if let Some(token) = lookup("ADMIN_TOKEN") {
            self.admin.token = Some(token);
        }

        Ok(())
    }

    /// Clean up loaded values: unquote secrets, drop empty optionals.
    pub fn normalize(&mut self) {
        fn clean(slot: &mut Option<String>) {
            *slot = slot
                .as_deref()
                .map(strip_wrapping_quotes)
                .filter(|v| !v.is_empty())
                .map(str::to_string);
        }

        if let StorageConfig::Postgres(pg) = &mut self.storage {
            clean(&mut pg.password);
        }
        clean(&mut self.mail.user);
        clean(&mut self.mail.password);
        clean(&mut self.admin.token);
    }

    /// Reject combinations the server cannot honour.
    ///
    /// The mail dispatch runs inside the request, so it has to finish before
    /// the request timeout fires; otherwise a stored submission is answered
    /// with a timeout instead of 201.
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.server.request_timeout_secs == 0 {
            return Err(config::ConfigError::Message(
                "server.request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.mail.enabled && self.mail.timeout_secs >= self.server.request_timeout_secs {
            return Err(config::ConfigError::Message(format!(
                "mail.timeout_secs ({}) must be shorter than server.request_timeout_secs ({})",
                self.mail.timeout_secs, self.server.request_timeout_secs
            )));
        }
        Ok(())
    }

    /// Log the effective configuration with secrets reduced to presence flags
    pub fn log_summary(&self) {
        tracing::info!(
            listen = %self.server.listen_addr,
            static_dir = %self.server.static_dir.display(),
            cors = self.server.enable_cors,
            "Server configuration"
        );

        match &self.storage {
            StorageConfig::Memory => tracing::info!("Storage backend: in-memory"),
            StorageConfig::Postgres(pg) => tracing::info!(
                host = %pg.host,
                port = pg.port,
                user = %pg.user,
                database = %pg.database,
                password_set = pg.password.is_some(),
                max_connections = pg.max_connections,
                "Storage backend: postgres"
            ),
        }

        tracing::info!(
            enabled = self.mail.enabled,
            host = %self.mail.host,
            port = self.mail.port,
            secure = self.mail.secure,
            user = self.mail.user.as_deref().unwrap_or("-"),
            password_set = self.mail.password.is_some(),
            from = %self.mail.from,
            to = %self.mail.to,
            "Mail configuration"
        );

        tracing::info!(listing_protected = self.admin.token.is_some(), "Admin configuration");
    }
}
