use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse TOML from config file at {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("Failed to load config from environment: {0}")]
    Env(#[from] envy::Error),
    #[error("{0} is required")]
    Missing(&'static str),
}

#[derive(Deserialize, Debug, Clone)]
pub struct ServerConfig {
    pub jwt_secret: String,

    #[serde(default = "default_database_url")]
    pub database_url: String,

    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    #[serde(default = "default_http_port")]
    pub http_port: u16,

    #[serde(default = "default_log_dir")]
    pub log_dir: String,

    /// Path to a Google service-account JSON key. Without it pushes are not delivered.
    #[serde(default)]
    pub fcm_service_account: Option<String>,

    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: i64,
}

// Partial config for layering
#[derive(Deserialize, Default, Debug)]
struct PartialServerConfig {
    jwt_secret: Option<String>,
    database_url: Option<String>,
    bind_address: Option<String>,
    http_port: Option<u16>,
    log_dir: Option<String>,
    fcm_service_account: Option<String>,
    session_ttl_secs: Option<i64>,
}

fn default_database_url() -> String {
    "sqlite://pushcast.db?mode=rwc".to_string()
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_http_port() -> u16 {
    5000
}

fn default_log_dir() -> String {
    "logs".to_string()
}

fn default_session_ttl_secs() -> i64 {
    3600
}

impl ServerConfig {
    /// Loads the configuration: the TOML file (if any) first, then environment
    /// variables on top of it.
    pub fn load(config_path: Option<&str>) -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let file_config = match config_path {
            Some(path) => read_file_config(Path::new(path))?,
            None => PartialServerConfig::default(),
        };
        let env_config: PartialServerConfig = envy::from_env()?;

        merge(env_config, file_config)
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.http_port)
    }
}

fn read_file_config(path: &Path) -> Result<PartialServerConfig, ConfigError> {
    if !path.exists() {
        return Ok(PartialServerConfig::default());
    }
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

// Environment overrides file.
fn merge(
    env_config: PartialServerConfig,
    file_config: PartialServerConfig,
) -> Result<ServerConfig, ConfigError> {
    Ok(ServerConfig {
        jwt_secret: env_config
            .jwt_secret
            .or(file_config.jwt_secret)
            .ok_or(ConfigError::Missing("JWT_SECRET"))?,
        database_url: env_config
            .database_url
            .or(file_config.database_url)
            .unwrap_or_else(default_database_url),
        bind_address: env_config
            .bind_address
            .or(file_config.bind_address)
            .unwrap_or_else(default_bind_address),
        http_port: env_config
            .http_port
            .or(file_config.http_port)
            .unwrap_or_else(default_http_port),
        log_dir: env_config
            .log_dir
            .or(file_config.log_dir)
            .unwrap_or_else(default_log_dir),
        fcm_service_account: env_config
            .fcm_service_account
            .or(file_config.fcm_service_account),
        session_ttl_secs: env_config
            .session_ttl_secs
            .or(file_config.session_ttl_secs)
            .unwrap_or_else(default_session_ttl_secs),
    })
}
