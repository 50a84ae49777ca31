//! Process-wide settings
//!
//! Loaded once from the environment (after an optional `./.env`) and
//! treated as immutable afterwards.

use std::fmt;

use tracing::{debug, info};

use crate::db::pool::DEFAULT_MAX_CONNECTIONS;
use crate::error::{Error, Result};
use crate::models::parse_bool;

/// Postgres connection settings
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseSettings {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,
    /// Full URL; takes precedence over the parts above
    pub url: Option<String>,
    pub max_connections: u32,
}

impl DatabaseSettings {
    /// Connection URL, preferring an explicit `DATABASE_URL`.
    ///
    /// SQLAlchemy-style `postgresql+asyncpg://` URLs are accepted and
    /// rewritten to plain `postgresql://`.
    pub fn url(&self) -> String {
        match &self.url {
            Some(url) => match url.split_once("://") {
                Some((scheme, rest)) if scheme.starts_with("postgresql+") => {
                    format!("postgresql://{}", rest)
                }
                _ => url.clone(),
            },
            None => format!(
                "postgresql://{}:{}@{}:{}/{}",
                self.user, self.password, self.host, self.port, self.name
            ),
        }
    }
}

impl fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("url", &self.url.as_ref().map(|_| "<redacted>"))
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

/// Application settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub app_name: String,
    pub app_version: String,
    pub app_env: String,
    pub debug: bool,
    /// Prefix for the versioned API routes, e.g. `/api/v1`
    pub api_prefix: String,
    pub host: String,
    pub port: u16,
    pub database: DatabaseSettings,
    pub cors_origins: Vec<String>,
    pub frontend_url: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            host: "localhost".to_owned(),
            port: 5432,
            name: "folio".to_owned(),
            user: "postgres".to_owned(),
            password: "postgres".to_owned(),
            url: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        let frontend_url = "http://localhost:3000".to_owned();
        Self {
            app_name: "Folio Contacts API".to_owned(),
            app_version: env!("CARGO_PKG_VERSION").to_owned(),
            app_env: "development".to_owned(),
            debug: false,
            api_prefix: "/api/v1".to_owned(),
            host: "0.0.0.0".to_owned(),
            port: 8000,
            database: DatabaseSettings::default(),
            cors_origins: vec![frontend_url.clone(), "http://localhost:3001".to_owned()],
            frontend_url,
        }
    }
}

impl Settings {
    /// Load `./.env` if present, then read the environment.
    pub fn load() -> Result<Self> {
        match dotenvy::dotenv() {
            Ok(path) => info!("Loaded .env from {}", path.display()),
            Err(e) if e.not_found() => debug!("No .env file found, using environment only"),
            Err(e) => return Err(Error::Config(format!("failed to read .env: {}", e))),
        }
        Self::from_env()
    }

    /// Read settings from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup (env, map, ...).
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let string = |key: &str, default: String| lookup(key).unwrap_or(default);

        let frontend_url = string("FRONTEND_URL", defaults.frontend_url);
        let mut cors_origins = match lookup("CORS_ORIGINS") {
            Some(raw) => parse_origins(&raw)?,
            None => defaults.cors_origins,
        };
        if !cors_origins.contains(&frontend_url) {
            cors_origins.push(frontend_url.clone());
        }

        let db = defaults.database;
        Ok(Self {
            app_name: string("APP_NAME", defaults.app_name),
            app_version: string("APP_VERSION", defaults.app_version),
            app_env: string("APP_ENV", defaults.app_env),
            debug: parse_var(&lookup, "DEBUG", defaults.debug, parse_bool)?,
            api_prefix: normalize_prefix(&string("API_V1_STR", defaults.api_prefix)),
            host: string("HOST", defaults.host),
            port: parse_var(&lookup, "PORT", defaults.port, |s| s.parse::<u16>().ok())?,
            database: DatabaseSettings {
                host: string("POSTGRES_HOST", db.host),
                port: parse_var(&lookup, "POSTGRES_PORT", db.port, |s| s.parse::<u16>().ok())?,
                name: string("POSTGRES_DB", db.name),
                user: string("POSTGRES_USER", db.user),
                password: string("POSTGRES_PASSWORD", db.password),
                url: lookup("DATABASE_URL").filter(|s| !s.is_empty()),
                max_connections: parse_var(&lookup, "DB_MAX_CONNECTIONS", db.max_connections, |s| {
                    s.parse::<u32>().ok().filter(|n| *n > 0)
                })?,
            },
            cors_origins,
            frontend_url,
        })
    }
}

fn parse_var<F, T, P>(lookup: &F, key: &str, default: T, parse: P) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    P: Fn(&str) -> Option<T>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => parse(raw.trim())
            .ok_or_else(|| Error::Config(format!("invalid value for {}: {:?}", key, raw))),
    }
}

/// Accept a JSON array or a comma-separated list.
fn parse_origins(raw: &str) -> Result<Vec<String>> {
    let raw = raw.trim();
    if raw.starts_with('[') {
        return serde_json::from_str(raw)
            .map_err(|e| Error::Config(format!("invalid CORS_ORIGINS JSON: {}", e)));
    }
    Ok(raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect())
}

/// Leading slash, no trailing slash; empty or "/" means no prefix.
fn normalize_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}
