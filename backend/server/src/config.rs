//! Application configuration loaded from environment variables.

use crate::errors::{Result, ServerError};

#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the SQLite database file
    pub database_url: String,
    /// Size of the SQLite connection pool
    pub max_connections: u32,
    /// Port for the REST API server
    pub api_port: u16,
    /// Create a few sample boxes at startup
    pub seed_sample_data: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Config {
            database_url: env_var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:./charity_boxes.db".to_string()),
            max_connections: env_var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .map_err(|_| ServerError::Config("Invalid DB_MAX_CONNECTIONS".to_string()))?,
            api_port: env_var("API_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| ServerError::Config("Invalid API_PORT".to_string()))?,
            seed_sample_data: parse_flag(
                &env_var("SEED_SAMPLE_DATA").unwrap_or_else(|_| "false".to_string()),
            )
            .ok_or_else(|| ServerError::Config("Invalid SEED_SAMPLE_DATA".to_string()))?,
        })
    }
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| ServerError::Config(format!("Missing env var: {key}")))
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
