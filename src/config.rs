//! Service configuration.
//!
//! Settings come from an optional `config/app.{toml,yaml,json}` file and are
//! overridden by environment variables (`SERVER_PORT` sets `server.port`).
//! `database.url` takes precedence; otherwise PostgreSQL settings are
//! assembled from the individual `database.*` keys.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;

use ::config::builder::DefaultState;
use ::config::ConfigBuilder;
use serde::Deserialize;
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

impl ServerConfig {
    pub fn addr(&self) -> SocketAddr { SocketAddr::new(self.host, self.port) }
}

#[derive(Debug, Clone)]
pub enum DatabaseConfig {
    Postgres(PostgresConfig),
    Sqlite { url: String },
}

#[derive(Debug, Clone)]
pub enum PostgresConfig {
    Url(String),
    Parts {
        host: String,
        port: u16,
        username: String,
        password: String,
        dbname: String,
        sslmode: PgSslMode,
    },
}

impl PostgresConfig {
    pub fn connect_options(&self) -> Result<PgConnectOptions, sqlx::Error> {
        match self {
            PostgresConfig::Url(url) => PgConnectOptions::from_str(url),
            PostgresConfig::Parts { host, port, username, password, dbname, sslmode } => Ok(PgConnectOptions::new()
                .host(host)
                .port(*port)
                .username(username)
                .password(password)
                .database(dbname)
                .ssl_mode(*sslmode)),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Source(#[from] ::config::ConfigError),

    #[error("missing required setting {0}")]
    Missing(&'static str),

    #[error("invalid value '{value}' for {key}: {reason}")]
    Invalid { key: &'static str, value: String, reason: String },
}

/// Raw settings as deserialized from the layered sources.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Settings {
    server: ServerSettings,
    database: DatabaseSettings,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct ServerSettings {
    host: IpAddr,
    port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self { Self { host: IpAddr::V4(Ipv4Addr::UNSPECIFIED), port: 8080 } }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct DatabaseSettings {
    url: Option<String>,
    host: Option<String>,
    port: u16,
    username: Option<String>,
    password: Option<String>,
    #[serde(alias = "dbname")]
    name: Option<String>,
    sslmode: Option<String>,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self { url: None, host: None, port: 5432, username: None, password: None, name: None, sslmode: None }
    }
}

impl Config {
    /// Reads `config/app.*` when present, then the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_builder(
            ::config::Config::builder()
                .add_source(::config::File::with_name("config/app").required(false))
                .add_source(environment()),
        )
    }

    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.try_into()
    }
}

/// Environment source mapping `DATABASE_HOST` onto `database.host`.
pub fn environment() -> ::config::Environment {
    ::config::Environment::default().separator("_").ignore_empty(true)
}

fn non_blank(value: Option<String>) -> Option<String> { value.filter(|v| !v.trim().is_empty()) }

impl TryFrom<Settings> for Config {
    type Error = ConfigError;

    fn try_from(settings: Settings) -> Result<Self, Self::Error> {
        let Settings { server, database: db } = settings;
        let server = ServerConfig { host: server.host, port: server.port };

        let database = match non_blank(db.url) {
            Some(url) if url.starts_with("sqlite:") => DatabaseConfig::Sqlite { url },
            Some(url) if url.starts_with("postgres://") || url.starts_with("postgresql://") => {
                DatabaseConfig::Postgres(PostgresConfig::Url(url))
            }
            Some(url) => {
                return Err(ConfigError::Invalid {
                    key: "database.url",
                    value: url,
                    reason: "expected a postgres:// or sqlite: URL".into(),
                });
            }
            None => {
                let sslmode = match non_blank(db.sslmode) {
                    None => PgSslMode::Disable,
                    Some(value) => {
                        let parsed = value.trim().parse::<PgSslMode>();
                        parsed.map_err(|e| ConfigError::Invalid { key: "database.sslmode", reason: e.to_string(), value })?
                    }
                };
                DatabaseConfig::Postgres(PostgresConfig::Parts {
                    host: non_blank(db.host).ok_or(ConfigError::Missing("database.host"))?,
                    port: db.port,
                    username: non_blank(db.username).ok_or(ConfigError::Missing("database.username"))?,
                    password: db.password.unwrap_or_default(),
                    dbname: non_blank(db.name).ok_or(ConfigError::Missing("database.name"))?,
                    sslmode,
                })
            }
        };

        Ok(Self { server, database })
    }
}
