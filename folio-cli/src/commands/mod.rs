//! Command implementations for the folio CLI

pub mod migrate;
pub mod serve;

pub use migrate::run_migrate;
pub use serve::run_serve;

use anyhow::{Context, Result};
use folio_server::Settings;

/// Load settings from `.env` and the environment, applying CLI overrides.
pub(crate) fn load_settings(database_url: Option<String>, debug: bool) -> Result<Settings> {
    let mut settings = Settings::load().context("Failed to load settings")?;
    if let Some(url) = database_url {
        settings.database.url = Some(url);
    }
    settings.debug |= debug;
    Ok(settings)
}
