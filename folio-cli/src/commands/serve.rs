//! HTTP server command

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use folio_server::db::{
    create_pool_with_options, run_migrations, ContactRepo, ContactStore, MemoryContactStore,
};
use folio_server::http::run_server;

use super::load_settings;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Interface to bind (overrides HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides PORT)
    #[arg(long, short = 'p')]
    pub port: Option<u16>,

    /// Database URL (overrides POSTGRES_* settings)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Apply pending migrations before serving
    #[arg(long, conflicts_with = "in_memory")]
    pub migrate: bool,

    /// Keep contacts in process memory instead of Postgres (lost on exit)
    #[arg(long)]
    pub in_memory: bool,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs, debug: bool) -> Result<()> {
    let mut settings = load_settings(args.database_url, debug)?;
    if let Some(host) = args.host {
        settings.host = host;
    }
    if let Some(port) = args.port {
        settings.port = port;
    }

    let store: Arc<dyn ContactStore> = if args.in_memory {
        tracing::warn!("Using in-memory contact store; submissions will not persist");
        Arc::new(MemoryContactStore::new())
    } else {
        let pool = create_pool_with_options(
            &settings.database.url(),
            settings.database.max_connections,
            settings.debug,
        )
        .await
        .context("Failed to create database pool")?;

        if args.migrate {
            run_migrations(&pool)
                .await
                .context("Failed to apply migrations")?;
        }
        Arc::new(ContactRepo::new(pool))
    };

    // Blocks until shutdown
    run_server(store, settings).await.context("Server error")?;

    Ok(())
}
