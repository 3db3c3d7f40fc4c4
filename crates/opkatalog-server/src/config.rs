//! Application configuration.
//!
//! Settings come from an optional `opkatalog.toml`, `OPKATALOG__`-prefixed
//! environment variables, and the two deployment-compatibility variables
//! `DATABASE_URL` and `PORT`.

use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

use opkatalog_db_postgres::PostgresConfig;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("server.port must be > 0".into());
        }
        let lvl = self.logging.level.to_ascii_lowercase();
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&lvl.as_str()) {
            return Err(format!("logging.level must be one of {valid_levels:?}"));
        }
        if let Some(ref pg) = self.storage.postgres {
            if pg.url.is_empty() {
                return Err("storage.postgres.url must not be empty".into());
            }
            if pg.pool_size == 0 {
                return Err("storage.postgres.pool_size must be > 0".into());
            }
        }
        Ok(())
    }

    pub fn addr(&self) -> SocketAddr {
        use std::net::{IpAddr, Ipv4Addr};
        let host: IpAddr = self
            .server
            .host
            .parse()
            .unwrap_or(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));
        SocketAddr::from((host, self.server.port))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Storage settings. A missing `postgres` section is not an error: the
/// server starts anyway and data endpoints answer 503 until a connection
/// string is supplied.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    #[serde(default)]
    pub postgres: Option<PostgresConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}
fn default_log_level() -> String {
    "info".into()
}
impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

pub mod loader {
    use super::AppConfig;
    use config::{Config, Environment, File};
    use opkatalog_db_postgres::PostgresConfig;
    use std::path::PathBuf;

    /// Loads the configuration from an optional TOML file plus environment
    /// overrides.
    ///
    /// `DATABASE_URL` and `PORT` take precedence over the file; they are
    /// what hosting providers inject.
    pub fn load_config(path: Option<&str>) -> Result<AppConfig, String> {
        let mut builder = Config::builder();
        let pathbuf = PathBuf::from(path.unwrap_or("opkatalog.toml"));
        if pathbuf.exists() {
            builder = builder.add_source(File::from(pathbuf));
        }
        // Environment variable overrides, e.g., OPKATALOG__SERVER__PORT=9090
        builder = builder.add_source(
            Environment::with_prefix("OPKATALOG")
                .try_parsing(true)
                .separator("__"),
        );
        let cfg = builder
            .build()
            .map_err(|e| format!("config build error: {e}"))?;
        let mut merged: AppConfig = cfg
            .try_deserialize()
            .map_err(|e| format!("config deserialize error: {e}"))?;

        apply_env_compat(&mut merged);

        merged.validate()?;
        Ok(merged)
    }

    /// Applies the `DATABASE_URL` and `PORT` compatibility variables.
    fn apply_env_compat(cfg: &mut AppConfig) {
        if let Ok(url) = std::env::var("DATABASE_URL")
            && !url.is_empty()
        {
            match cfg.storage.postgres {
                Some(ref mut pg) => pg.url = url,
                None => cfg.storage.postgres = Some(PostgresConfig::new(url)),
            }
        }
        if let Ok(port) = std::env::var("PORT")
            && let Ok(port) = port.parse::<u16>()
        {
            cfg.server.port = port;
        }
    }
}
