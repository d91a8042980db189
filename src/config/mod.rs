mod backend;
mod basic;

pub use backend::BackendConfig;
pub use basic::BasicConfig;

use crate::error::ConfigError;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Core server configuration (see `basic` table in config.toml).
    #[serde(default)]
    pub basic: BasicConfig,

    /// GraphQL backend settings (see `backend` table in config.toml).
    #[serde(default)]
    pub backend: BackendConfig,
}

const DEFAULT_CONFIG_FILE: &str = "config.toml";
const ENV_PREFIX: &str = "METAGATE_";

impl Config {
    /// Builds a Figment that merges defaults, `config.toml` if present, then
    /// `METAGATE_`-prefixed environment variables (`__` separates tables).
    pub fn figment() -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));
        if PathBuf::from(DEFAULT_CONFIG_FILE).is_file() {
            figment = figment.merge(Toml::file(DEFAULT_CONFIG_FILE));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Loads and validates configuration from the default sources.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(Self::figment())
    }

    /// Extracts from an arbitrary figment and validates required fields.
    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let cfg = figment.extract::<Self>().map_err(Box::new)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.basic.auth_key.trim().is_empty() {
            return Err(ConfigError::Missing("basic.auth_key"));
        }
        if self.backend.endpoint.is_none() {
            return Err(ConfigError::Missing("backend.endpoint"));
        }
        if self.backend.admin_secret.trim().is_empty() {
            return Err(ConfigError::Missing("backend.admin_secret"));
        }
        Ok(())
    }
}
