//! Axum server setup
//!
//! Server skeleton with:
//! - CORS restricted to the configured origins
//! - Tracing middleware
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use super::routes;
use crate::config::Settings;
use crate::db::ContactStore;
use crate::error::Result;
use crate::service::ContactService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: ContactService,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(store: Arc<dyn ContactStore>, settings: Settings) -> Self {
        Self {
            service: ContactService::new(store),
            settings: Arc::new(settings),
        }
    }
}

/// CORS for the configured origins, with credentials.
///
/// A literal `*` entry mirrors the request origin, since a wildcard
/// cannot be combined with credentials.
fn cors_layer(settings: &Settings) -> CorsLayer {
    let allow_origin = if settings.cors_origins.iter().any(|o| o == "*") {
        tracing::warn!("CORS: wildcard origin configured - mirroring request origin");
        AllowOrigin::mirror_request()
    } else {
        let origins: Vec<HeaderValue> = settings
            .cors_origins
            .iter()
            .filter_map(|origin| match origin.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(origin = %origin, "CORS: ignoring invalid origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// Build the application router with all routes.
pub fn build_router(state: AppState) -> Router {
    let api = routes::contacts::router();
    let prefix = state.settings.api_prefix.clone();
    let cors = cors_layer(&state.settings);

    let router = routes::health::router();
    let router = if prefix.is_empty() {
        router.merge(api)
    } else {
        router.nest(&prefix, api)
    };

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Run the HTTP server.
///
/// # Example
///
/// ```ignore
/// let settings = Settings::load()?;
/// let pool = create_pool(&settings.database.url()).await?;
/// run_server(Arc::new(ContactRepo::new(pool)), settings).await?;
/// ```
pub async fn run_server(store: Arc<dyn ContactStore>, settings: Settings) -> Result<()> {
    tracing::info!(
        app = %settings.app_name,
        environment = %settings.app_env,
        debug = settings.debug,
        "Starting up"
    );

    let listener = TcpListener::bind((settings.host.as_str(), settings.port)).await?;
    let local_addr = listener.local_addr()?;
    let prefix = settings.api_prefix.clone();

    let app = build_router(AppState::new(store, settings));
    tracing::info!("Server listening on {} (API at {}/contacts)", local_addr, prefix);

    // Run with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}
