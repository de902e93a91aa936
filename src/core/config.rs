//! Configurazione - Caricata dalle variabili d'ambiente (con supporto a `.env`)

use dotenv::dotenv;
use std::env;
use tracing::{info, warn};

const DEFAULT_JWT_SECRET: &str = "un segreto meno bello";

/// Backend di persistenza da usare per utenti e messaggi
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    MySql,
    Memory,
}

impl StorageKind {
    fn parse(value: &str) -> Result<Self, String> {
        match value.to_ascii_lowercase().as_str() {
            "mysql" => Ok(Self::MySql),
            "memory" => Ok(Self::Memory),
            other => Err(format!(
                "Invalid STORAGE '{}': expected 'mysql' or 'memory'",
                other
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub storage: StorageKind,
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub bcrypt_cost: u32,
    pub server_host: String,
    pub server_port: u16,
    pub max_connections: u32,
    pub connection_lifetime_secs: u64,
    pub app_env: String,
}

impl Config {
    /// Carica la configurazione dalle variabili d'ambiente
    /// Chiama dotenv() automaticamente
    pub fn from_env() -> Result<Self, String> {
        dotenv().ok();

        let storage = StorageKind::parse(
            &env::var("STORAGE").unwrap_or_else(|_| "mysql".to_string()),
        )?;

        let database_url = env::var("DATABASE_URL").ok();
        if storage == StorageKind::MySql && database_url.is_none() {
            return Err("DATABASE_URL must be set in .env file".to_string());
        }

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            warn!("JWT_SECRET not set, using default (not secure for production!)");
            DEFAULT_JWT_SECRET.to_string()
        });

        let bcrypt_cost = env::var("BCRYPT_COST")
            .unwrap_or_else(|_| bcrypt::DEFAULT_COST.to_string())
            .parse::<u32>()
            .map_err(|_| "Invalid BCRYPT_COST: must be a number between 4-31".to_string())?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err("Invalid BCRYPT_COST: must be a number between 4-31".to_string());
        }

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| "Invalid SERVER_PORT: must be a number between 0-65535".to_string())?;

        let max_connections = env::var("MAX_DB_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u32>()
            .map_err(|_| "Invalid MAX_DB_CONNECTIONS: must be a positive number".to_string())?;

        let connection_lifetime_secs = env::var("DB_CONNECTION_LIFETIME_SECS")
            .unwrap_or_else(|_| "1800".to_string())
            .parse::<u64>()
            .map_err(|_| {
                "Invalid DB_CONNECTION_LIFETIME_SECS: must be a positive number".to_string()
            })?;

        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        Ok(Config {
            storage,
            database_url,
            jwt_secret,
            bcrypt_cost,
            server_host,
            server_port,
            max_connections,
            connection_lifetime_secs,
            app_env,
        })
    }

    /// Logga la configurazione (nascondendo i segreti)
    pub fn print_info(&self) {
        info!(
            environment = %self.app_env,
            address = %format!("{}:{}", self.server_host, self.server_port),
            storage = ?self.storage,
            "Server configuration loaded"
        );
        if let Some(url) = &self.database_url {
            info!(
                database = %mask_url(url),
                max_connections = self.max_connections,
                connection_lifetime_secs = self.connection_lifetime_secs,
                "Database configuration"
            );
        }
        if self.jwt_secret == DEFAULT_JWT_SECRET {
            warn!("JWT secret: USING DEFAULT (INSECURE!)");
        } else {
            info!("JWT secret: custom secret configured");
        }
    }
}

/// Maschera le credenziali dell'URL del database per il logging
fn mask_url(url: &str) -> String {
    if let (Some(at_pos), Some(scheme_end)) = (url.find('@'), url.find("://")) {
        let scheme = &url[..scheme_end + 3];
        let after_at = &url[at_pos..];
        return format!("{}***{}", scheme, after_at);
    }
    "***".to_string()
}
