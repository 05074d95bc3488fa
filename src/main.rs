// src/main.rs

//! # Certificate Registry - Main Entry Point
//!
//! Loads configuration, restores or seeds the registry store and starts the
//! API server.
//!
//! ## Environment Variables
//! - `REGISTRY_SEED_ORGANIZATION`: account seeded with the organization role
//! - `REGISTRY_BIND_ADDRESS`: (Optional) listen address (default: 127.0.0.1:3000)
//! - `REGISTRY_SNAPSHOT_PATH`: (Optional) JSON snapshot file for persistence
//! - `REGISTRY_REQUIRE_SIGNATURES`: (Optional) set to `false` for unsigned local testing
//! - `REGISTRY_SIGNATURE_MAX_AGE_SECS`: (Optional) freshness window for `x-timestamp` (default: 300)
//! - `RUST_LOG`: (Optional) log filter (default: info)

use anyhow::Context;
use cert_registry::settings::Settings;
use cert_registry::services::api_server::ApiServer;
use cert_registry::services::registry_service::RegistryService;
use cert_registry::storage::snapshot::SnapshotStore;
use dotenv::dotenv;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = Settings::load().context("failed to load registry settings")?;

    let service = match &settings.snapshot_path {
        Some(path) => RegistryService::with_snapshots(
            settings.seed_organization,
            SnapshotStore::new(path),
        )
        .with_context(|| format!("failed to open snapshot {}", path.display()))?,
        None => {
            log::warn!("no snapshot_path configured, registry state will not survive a restart");
            RegistryService::new(settings.seed_organization)
        }
    };

    if !settings.require_signatures {
        log::warn!("request signatures are disabled, x-caller is trusted as given");
    }

    let api_server = ApiServer::new(service, settings.require_signatures)
        .with_signature_max_age(Duration::from_secs(settings.signature_max_age_secs));
    api_server
        .run(settings.bind_address)
        .await
        .with_context(|| format!("API server failed on {}", settings.bind_address))
}
