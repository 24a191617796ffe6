use std::env;
use std::net::{IpAddr, SocketAddr};

use anyhow::{anyhow, Context, Result};
use chrono::Duration;
use common_auth::config::DEFAULT_TOKEN_TTL_MINUTES;
use common_auth::JwtConfig;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://clinic.db?mode=rwc";
pub const DEFAULT_PORT: u16 = 8000;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_CORS_ORIGINS: &[&str] = &[
    "http://localhost:3000",
    "http://localhost:3001",
    "http://localhost:5173",
];

/// Process-wide settings, read once at startup and injected into the app state.
#[derive(Debug, Clone)]
pub struct ClinicConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub db_max_connections: u32,
    pub cors_origins: Vec<String>,
    pub jwt: JwtConfig,
}

impl ClinicConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .and_then(|value| normalize_optional(&value))
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or("PORT", lookup("PORT"), DEFAULT_PORT)?;
        let db_max_connections = parse_or(
            "CLINIC_DB_MAX_CONNECTIONS",
            lookup("CLINIC_DB_MAX_CONNECTIONS"),
            DEFAULT_MAX_CONNECTIONS,
        )?;
        let cors_origins = lookup("CLINIC_CORS_ORIGINS")
            .map(|value| parse_list(&value))
            .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect());
        let jwt = jwt_config_from_lookup(&lookup)?;

        Ok(Self {
            database_url,
            host,
            port,
            db_max_connections,
            cors_origins,
            jwt,
        })
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .host
            .parse()
            .with_context(|| format!("Invalid HOST '{}'", self.host))?;
        Ok(SocketAddr::from((ip, self.port)))
    }
}

/// Token settings only, for tools that sign tokens without serving HTTP.
pub fn jwt_config_from_env() -> Result<JwtConfig> {
    jwt_config_from_lookup(&|key: &str| env::var(key).ok())
}

fn jwt_config_from_lookup<F>(lookup: &F) -> Result<JwtConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let secret = lookup("CLINIC_JWT_SECRET")
        .and_then(|value| normalize_optional(&value))
        .context("CLINIC_JWT_SECRET must be set")?;
    let ttl_minutes: i64 = parse_or(
        "CLINIC_TOKEN_TTL_MINUTES",
        lookup("CLINIC_TOKEN_TTL_MINUTES"),
        DEFAULT_TOKEN_TTL_MINUTES,
    )?;
    if ttl_minutes <= 0 {
        return Err(anyhow!("CLINIC_TOKEN_TTL_MINUTES must be positive"));
    }
    let leeway: u32 = parse_or(
        "CLINIC_JWT_LEEWAY_SECS",
        lookup("CLINIC_JWT_LEEWAY_SECS"),
        0,
    )?;

    let config = JwtConfig::new(secret.into_bytes())
        .map_err(|err| anyhow!("Invalid CLINIC_JWT_SECRET: {err}"))?
        .with_ttl(Duration::minutes(ttl_minutes))
        .with_leeway(leeway);
    Ok(config)
}

fn parse_or<T>(key: &str, value: Option<String>, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match value.and_then(|v| normalize_optional(&v)) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|err| anyhow!("Failed to parse {key}='{raw}': {err}")),
        None => Ok(default),
    }
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(|c| c == ',' || c == ';' || c == ' ')
        .filter_map(normalize_optional)
        .collect()
}

fn normalize_optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
