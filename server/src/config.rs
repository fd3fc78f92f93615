//! Configuration management using Figment.
//!
//! Sources, highest precedence first:
//! 1. `PORT`
//! 2. Environment variables prefixed `TODO_API_`
//! 3. A TOML file: `$TODO_API_CONFIG`, or `./todo-api.toml`
//! 4. Default values

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "todo-api.toml";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Test,
    Production,
}

impl Environment {
    pub fn is_production(self) -> bool {
        self == Environment::Production
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    /// MongoDB connection string.
    pub mongo_url: String,
    /// Name of the database holding the `todos` collection.
    pub database: String,
    /// `EnvFilter` directives, used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3500,
            environment: Environment::Development,
            mongo_url: "mongodb://localhost:27017".to_string(),
            database: "todo-api".to_string(),
            log_filter: "info,tower_http=debug".to_string(),
        }
    }
}

#[derive(Debug, Error)]
#[error("invalid configuration: {0}")]
pub struct ConfigError(#[from] Box<figment::Error>);

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        ConfigError(Box::new(err))
    }
}

impl Config {
    /// Loads configuration from the file named by `TODO_API_CONFIG` (or the
    /// default file) plus the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let path =
            std::env::var("TODO_API_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load_from(path)
    }

    /// A missing file is not an error; it simply contributes nothing.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Ok(Self::figment(path.as_ref()).extract()?)
    }

    pub fn figment(path: &Path) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("TODO_API_").ignore(&["config"]))
            .merge(Env::raw().only(&["port"]))
    }
}
