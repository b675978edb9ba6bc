use std::env;
use thiserror::Error;

const DEFAULT_DATABASE: &str = "mealDB";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("PORT must be a valid port number, got '{0}'")]
    InvalidPort(String),
}

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub database_name: String,
    pub user_collection: String,
    pub jwt_secret: String,
    pub allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup so tests don't touch the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let port_raw = lookup("PORT").unwrap_or_else(|| "5000".to_string());
        let port = port_raw
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort(port_raw.clone()))?;

        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let database_name = lookup("DATABASE_NAME")
            .filter(|v| !v.trim().is_empty())
            .or_else(|| database_name_from_uri(&database_url))
            .unwrap_or_else(|| DEFAULT_DATABASE.to_string());

        let user_collection =
            lookup("USER_COLLECTION").unwrap_or_else(|| "userCollection".to_string());

        let jwt_secret = lookup("JWT_SECRET")
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let allowed_origins = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".to_string())
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(String::from)
            .collect();

        Ok(Self {
            host,
            port,
            database_url,
            database_name,
            user_collection,
            jwt_secret,
            allowed_origins,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Extracts the database segment of a MongoDB URI, e.g.
/// `mongodb://host:27017/mealDB?retryWrites=true` -> `mealDB`.
fn database_name_from_uri(uri: &str) -> Option<String> {
    let rest = uri.split_once("://").map(|(_, rest)| rest).unwrap_or(uri);
    let (_, path) = rest.split_once('/')?;
    let name = path.split('?').next().unwrap_or_default();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}
