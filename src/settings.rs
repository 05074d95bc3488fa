// src/settings.rs
//! Service configuration.
//!
//! Sources, later ones overriding earlier ones:
//! 1. built-in defaults
//! 2. optional `registry.toml` in the working directory
//! 3. `REGISTRY_*` environment variables (a `.env` file is loaded first)
//!
//! ## Keys
//! - `bind_address`: HTTP listen address (default `127.0.0.1:3000`)
//! - `seed_organization`: account seeded with the organization role (required)
//! - `snapshot_path`: JSON snapshot file; unset keeps state in memory only
//! - `require_signatures`: verify `x-signature` on mutating calls (default `true`)
//! - `signature_max_age_secs`: accepted clock distance of `x-timestamp` (default `300`)

use config::{Config, ConfigError, Environment, File};
use ethers::types::Address;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub bind_address: SocketAddr,
    pub seed_organization: Address,
    #[serde(default)]
    pub snapshot_path: Option<PathBuf>,
    pub require_signatures: bool,
    pub signature_max_age_secs: u64,
}

impl Settings {
    /// Loads settings from the default file and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::builder("registry")?
            .add_source(
                Environment::with_prefix("REGISTRY")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    fn builder(file: &str) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Ok(Config::builder()
            .set_default("bind_address", "127.0.0.1:3000")?
            .set_default("require_signatures", true)?
            .set_default("signature_max_age_secs", 300)?
            .add_source(File::with_name(file).required(false)))
    }
}
