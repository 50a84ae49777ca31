//! Schema migration command

use anyhow::{Context, Result};
use clap::Parser;

use folio_server::db::{create_pool_with_options, run_migrations};

use super::load_settings;

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    /// Database URL (overrides POSTGRES_* settings)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,
}

/// Apply all pending migrations
pub async fn run_migrate(args: MigrateArgs, debug: bool) -> Result<()> {
    let settings = load_settings(args.database_url, debug)?;

    let pool = create_pool_with_options(&settings.database.url(), 1, settings.debug)
        .await
        .context("Failed to connect to database")?;

    run_migrations(&pool)
        .await
        .context("Failed to apply migrations")?;

    pool.close().await;
    Ok(())
}
