use std::net::IpAddr;

use axum::http::HeaderValue;

/// Which origins the CORS layer admits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    /// `*`: any origin, without credentials.
    Any,
    /// An explicit allow-list, with credentials.
    List(Vec<HeaderValue>),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// A configuration variable that could not be parsed.
#[derive(Debug, thiserror::Error)]
#[error("{var} has invalid value '{value}': {reason}")]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
    pub reason: String,
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development. Built once in
/// `main` and shared through `AppState`.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: IpAddr,
    /// Bind port (default: `5000`).
    pub port: u16,
    /// SQLite URL of the vehicle store (default: `sqlite://carlog.db`).
    pub database_url: String,
    /// Maximum pooled connections for file databases (default: `5`).
    pub db_max_connections: u32,
    /// Verbose logging (default: `false`).
    pub debug: bool,
    /// Log output format (default: pretty).
    pub log_format: LogFormat,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: CorsOrigins,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Whether `decode-vin` stores results when the request does not say
    /// (default: `false`).
    pub save_decoded: bool,
}

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                | Default              |
    /// |------------------------|----------------------|
    /// | `HOST`                 | `0.0.0.0`            |
    /// | `PORT`                 | `5000`               |
    /// | `DATABASE_URL`         | `sqlite://carlog.db` |
    /// | `DB_MAX_CONNECTIONS`   | `5`                  |
    /// | `DEBUG`                | `false`              |
    /// | `LOG_FORMAT`           | `pretty`             |
    /// | `CORS_ORIGINS`         | `*`                  |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                 |
    /// | `SAVE_DECODED_VINS`    | `false`              |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &'static str, default: &str| -> (&'static str, String) {
            (key, lookup(key).unwrap_or_else(|| default.to_string()))
        };

        let host = parse(var("HOST", "0.0.0.0"))?;
        let port = parse(var("PORT", "5000"))?;
        let (_, database_url) = var("DATABASE_URL", "sqlite://carlog.db");
        let db_max_connections = parse(var("DB_MAX_CONNECTIONS", "5"))?;
        let debug = parse_flag(var("DEBUG", "false"))?;
        let log_format = parse_log_format(var("LOG_FORMAT", "pretty"))?;
        let cors_origins = parse_cors_origins(var("CORS_ORIGINS", "*"))?;
        let request_timeout_secs = parse(var("REQUEST_TIMEOUT_SECS", "30"))?;
        let save_decoded = parse_flag(var("SAVE_DECODED_VINS", "false"))?;

        Ok(Self {
            host,
            port,
            database_url,
            db_max_connections,
            debug,
            log_format,
            cors_origins,
            request_timeout_secs,
            save_decoded,
        })
    }
}

fn parse<T>((var, value): (&'static str, String)) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError {
        var,
        reason: e.to_string(),
        value,
    })
}

fn parse_flag((var, value): (&'static str, String)) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError {
            var,
            value,
            reason: "expected true or false".into(),
        }),
    }
}

fn parse_log_format((var, value): (&'static str, String)) -> Result<LogFormat, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "pretty" | "text" | "" => Ok(LogFormat::Pretty),
        "json" => Ok(LogFormat::Json),
        _ => Err(ConfigError {
            var,
            value,
            reason: "expected pretty or json".into(),
        }),
    }
}

fn parse_cors_origins((var, value): (&'static str, String)) -> Result<CorsOrigins, ConfigError> {
    let entries: Vec<&str> = value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    if entries.is_empty() || entries.contains(&"*") {
        return Ok(CorsOrigins::Any);
    }

    let mut origins = Vec::with_capacity(entries.len());
    for origin in entries {
        let header = HeaderValue::from_str(origin).map_err(|e| ConfigError {
            var,
            value: value.clone(),
            reason: format!("origin '{origin}': {e}"),
        })?;
        origins.push(header);
    }
    Ok(CorsOrigins::List(origins))
}
