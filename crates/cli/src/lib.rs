//! Shared start-up for the impact binaries: logging, settings and reference data.

use std::path::{Path, PathBuf};

use anyhow::Context;
use impact_risk::config::{Settings, load_settings};
use impact_risk::geo::SettlementCatalog;
use tracing::warn;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_SETTINGS_PATH: &str = "configs/impact.toml";
pub const DEFAULT_SETTLEMENTS_PATH: &str = "data/settlements.yaml";

/// Log to stderr at `info` unless `RUST_LOG` says otherwise.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Explicit settings must load; the default file may be absent.
pub fn settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    match path {
        Some(path) => load_settings(path)
            .with_context(|| format!("failed to load settings from {}", path.display())),
        None if Path::new(DEFAULT_SETTINGS_PATH).exists() => {
            Ok(load_settings(DEFAULT_SETTINGS_PATH)?)
        }
        None => Ok(Settings::default()),
    }
}

/// Settlement catalog from the command line, the settings file or the bundled data.
pub fn settlements(path: Option<&Path>, settings: &Settings) -> anyhow::Result<SettlementCatalog> {
    if let Some(path) = path {
        return SettlementCatalog::load(path)
            .with_context(|| format!("failed to load settlements from {}", path.display()));
    }
    let configured = settings
        .assessment
        .settlements
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTLEMENTS_PATH));
    if configured.exists() {
        Ok(SettlementCatalog::load(&configured)?)
    } else {
        warn!(
            path = %configured.display(),
            "settlement catalog not found; using latitude bands only"
        );
        Ok(SettlementCatalog::default())
    }
}
