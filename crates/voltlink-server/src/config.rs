//! Server configuration loading from file and environment variables.

use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use thiserror::Error;
use voltlink_types::{BusinessDetails, CredentialsRole, PartyRole};

/// Top-level server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server network settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Database settings.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// This platform's own identity.
    #[serde(default)]
    pub platform: PlatformConfig,
}

/// Network configuration for the HTTP server.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,

    /// Connection pool size.
    #[serde(default = "default_pool_max_size")]
    pub pool_max_size: u32,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "voltlink_server=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

/// Identity this platform presents to counterparties.
#[derive(Debug, Clone, Deserialize)]
pub struct PlatformConfig {
    /// Publicly reachable base URL, without a trailing slash. Version
    /// discovery lives at `{public_url}/versions`.
    #[serde(default = "default_public_url")]
    pub public_url: String,

    /// Business roles declared during the credentials handshake.
    #[serde(default)]
    pub roles: Vec<RoleConfig>,
}

/// One declared business role.
#[derive(Debug, Clone, Deserialize)]
pub struct RoleConfig {
    pub role: PartyRole,
    pub name: String,
    pub party_id: String,
    pub country_code: String,
    #[serde(default)]
    pub website: Option<String>,
}

impl PlatformConfig {
    /// The version-discovery URL counterparties should store for us.
    pub fn versions_url(&self) -> String {
        format!("{}/versions", self.public_url)
    }

    /// The declared roles as handshake payload entries.
    pub fn credentials_roles(&self) -> Vec<CredentialsRole> {
        self.roles
            .iter()
            .map(|role| CredentialsRole {
                role: role.role,
                business_details: BusinessDetails {
                    name: role.name.clone(),
                    website: role.website.clone(),
                    logo: None,
                },
                party_id: role.party_id.clone(),
                country_code: role.country_code.clone(),
            })
            .collect()
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))
}

fn default_port() -> u16 {
    3000
}

fn default_db_path() -> String {
    "voltlink.db".to_string()
}

fn default_pool_max_size() -> u32 {
    8
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_public_url() -> String {
    "http://127.0.0.1:3000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            pool_max_size: default_pool_max_size(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            public_url: default_public_url(),
            roles: Vec::new(),
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Loads configuration from a TOML file, falling back to defaults.
///
/// Environment variable overrides:
/// - `VOLTLINK_HOST` overrides `server.host`
/// - `VOLTLINK_PORT` overrides `server.port`
/// - `VOLTLINK_DB_PATH` overrides `database.path`
/// - `VOLTLINK_LOG_LEVEL` overrides `logging.level`
/// - `VOLTLINK_LOG_JSON` overrides `logging.json` (set to "true" to enable)
/// - `VOLTLINK_PUBLIC_URL` overrides `platform.public_url`
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                Config::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => Config::default(),
    };

    // Environment variable overrides
    if let Ok(host) = std::env::var("VOLTLINK_HOST") {
        if let Ok(parsed) = host.parse() {
            config.server.host = parsed;
        }
    }
    if let Ok(port) = std::env::var("VOLTLINK_PORT") {
        if let Ok(parsed) = port.parse() {
            config.server.port = parsed;
        }
    }
    if let Ok(db_path) = std::env::var("VOLTLINK_DB_PATH") {
        config.database.path = db_path;
    }
    if let Ok(level) = std::env::var("VOLTLINK_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Ok(json) = std::env::var("VOLTLINK_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }
    if let Ok(url) = std::env::var("VOLTLINK_PUBLIC_URL") {
        config.platform.public_url = url.trim_end_matches('/').to_string();
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_no_file() {
        let config = load_config(None).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.database.path, "voltlink.db");
        assert!(config.platform.roles.is_empty());
    }

    #[test]
    fn parses_platform_section() {
        let config: Config = toml::from_str(
            r#"
            [platform]
            public_url = "https://cpo.example"

            [[platform.roles]]
            role = "CPO"
            name = "Example CPO"
            party_id = "EXA"
            country_code = "FR"
            "#,
        )
        .unwrap();

        assert_eq!(config.platform.versions_url(), "https://cpo.example/versions");
        let roles = config.platform.credentials_roles();
        assert_eq!(roles.len(), 1);
        assert_eq!(roles[0].role, PartyRole::Cpo);
        assert_eq!(roles[0].business_details.name, "Example CPO");
    }
}
