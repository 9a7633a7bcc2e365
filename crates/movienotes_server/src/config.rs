//! Service configuration.
//!
//! Sources, lowest to highest priority: built-in defaults, an optional
//! `movienotes.toml`, `MOVIENOTES_*` environment variables (nested keys use
//! `__`, e.g. `MOVIENOTES_DATABASE__PATH`), and finally the plain `PORT`
//! variable.

use config::{Config, ConfigError, Environment, File, FileFormat};
use movienotes_core::default_log_level;
use serde::Deserialize;

const CONFIG_FILE: &str = "movienotes";
const ENV_PREFIX: &str = "MOVIENOTES";

#[derive(Debug, Clone, Deserialize)]
pub struct Database {
    /// SQLite file path, created on first start.
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Log {
    pub level: String,
    /// Absolute directory for rolling log files; stderr when unset.
    pub dir: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub database: Database,
    pub log: Log,
}

impl Settings {
    /// Loads settings from `.env`, the config file and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::build(
            std::env::var("PORT").ok(),
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        )
    }

    fn build(port: Option<String>, environment: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 3000)?
            .set_default("database.path", "movienotes.sqlite3")?
            .set_default("log.level", default_log_level())?
            .add_source(
                File::with_name(CONFIG_FILE)
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(environment)
            .set_override_option("port", port)?
            .build()?
            .try_deserialize()
    }

    /// The socket address the server listens on.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
