use std::net::IpAddr;

#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string. `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub host: IpAddr,
    pub port: u16,
    pub max_body_size: usize,
    /// Empty means any origin.
    pub cors_origins: Vec<String>,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|s| !s.trim().is_empty());

        let db_max_connections: u32 = env_or("WORKFLOWS_DB_MAX_CONNECTIONS", "10")
            .parse()
            .map_err(|e| format!("Invalid WORKFLOWS_DB_MAX_CONNECTIONS: {e}"))?;

        let host: IpAddr = env_or("WORKFLOWS_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid WORKFLOWS_HOST: {e}"))?;

        let port: u16 = env_or("WORKFLOWS_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid WORKFLOWS_PORT: {e}"))?;

        let max_body_size: usize = env_or("WORKFLOWS_MAX_BODY_SIZE", "1048576")
            .parse()
            .map_err(|e| format!("Invalid WORKFLOWS_MAX_BODY_SIZE: {e}"))?;

        let cors_origins: Vec<String> = env_or("WORKFLOWS_CORS_ORIGINS", "")
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect();

        let log_level = env_or("WORKFLOWS_LOG_LEVEL", "info");

        Ok(Config {
            database_url,
            db_max_connections,
            host,
            port,
            max_body_size,
            cors_origins,
            log_level,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
