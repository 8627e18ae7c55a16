//! Application builder: wires router, middleware and state into an Axum app,
//! and runs it.

use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware as axum_middleware;
use tower_http::trace::TraceLayer;

use resqroute_core::config::AppConfig;
use resqroute_core::error::AppError;
use resqroute_database::Stores;
use resqroute_push::PushManager;
use resqroute_service::RetentionScheduler;

use crate::middleware::compression::build_compression_layer;
use crate::middleware::cors::build_cors_layer;
use crate::middleware::logging::request_logging;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    let max_body = state.config.server.max_body_bytes;
    let cors = build_cors_layer(&state.config.server.cors);

    build_router(state)
        .layer(DefaultBodyLimit::max(max_body))
        .layer(build_compression_layer())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(request_logging))
}

/// Runs the ResQroute server until a shutdown signal arrives.
pub async fn run_server(config: AppConfig, stores: Stores) -> Result<(), AppError> {
    tracing::info!("Starting ResQroute v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Push provider ────────────────────────────────────
    tracing::info!("Initializing push provider ({:?})...", config.push.provider);
    let push = PushManager::new(&config.push).await?;

    // ── Step 2: Services ─────────────────────────────────────────
    let state = AppState::new(config.clone(), stores.clone(), push);

    // ── Step 3: Activity log retention ───────────────────────────
    let retention = if config.activity.cleanup_enabled {
        let scheduler = RetentionScheduler::new((*state.activity_service).clone()).await?;
        scheduler.register(&config.activity).await?;
        scheduler.start().await?;
        Some(scheduler)
    } else {
        tracing::info!("Activity log retention disabled");
        None
    };

    // ── Step 4: HTTP server ──────────────────────────────────────
    let app = build_app(state);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!(
        store = stores.provider_name(),
        "ResQroute API listening on {}",
        addr
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
    })
    .await
    .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    // ── Step 5: Drain background work ────────────────────────────
    if let Some(scheduler) = retention {
        let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
        match tokio::time::timeout(grace, scheduler.shutdown()).await {
            Ok(Err(e)) => tracing::warn!("Retention scheduler shutdown failed: {}", e),
            Err(_) => tracing::warn!("Retention scheduler did not stop within {:?}", grace),
            Ok(Ok(())) => {}
        }
    }
    stores.close().await;

    tracing::info!("ResQroute server shut down gracefully");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
