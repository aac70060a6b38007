//! HTTP server lifecycle

use super::{
    middleware::{create_middleware_stack, create_trace_layer, request_logger},
    routes::create_router,
    AppState,
};
use crate::commands::cli::ServeArgs;
use axum::middleware;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::signal;
use tracing::{info, warn};
use vintner_core::api::{AppConfig, CliError};
use vintner_plugins::factory::build_coordinator;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout: Duration,
}

/// `vintner serve`: wire the coordinator, start the retention sweeper and serve.
pub async fn handle_serve(args: ServeArgs, cfg: AppConfig) -> Result<(), CliError> {
    let (host, port) = args.resolve_bind(&cfg.http_server.host, cfg.http_server.port);
    let server_config = ServerConfig {
        host,
        port,
        request_timeout: Duration::from_secs(cfg.http_server.request_timeout_secs),
    };

    let coordinator = build_coordinator(&cfg)?;
    let sweeper = coordinator.spawn_sweeper(
        Duration::from_secs(cfg.worker.retention_secs),
        Duration::from_secs(cfg.worker.sweep_interval_secs),
    );
    if sweeper.is_none() {
        info!("task retention disabled; finished tasks are kept until restart");
    }

    info!(
        workers = coordinator.max_workers(),
        upload_dir = %cfg.app.upload_dir,
        model_dir = %cfg.app.trained_model_dir,
        "task coordinator ready"
    );

    let state = AppState::new(coordinator, cfg);
    let result = start_server_with_config(server_config, state)
        .await
        .map_err(|e| CliError::Server(e.to_string()));

    if let Some(handle) = sweeper {
        handle.abort();
    }
    result
}

/// Bind and serve until Ctrl+C or SIGTERM.
pub async fn start_server_with_config(
    config: ServerConfig,
    state: AppState,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let router = create_router(state);

    let app = router
        .layer(middleware::from_fn(request_logger))
        .layer(create_trace_layer())
        .layer(create_middleware_stack(config.request_timeout));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("HTTP server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::select! {
                _ = signal::ctrl_c() => {
                    info!("Received Ctrl+C signal");
                }
                _ = wait_for_sigterm() => {
                    info!("Received SIGTERM signal");
                }
            }

            info!("Starting graceful shutdown...");
        })
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

#[cfg(unix)]
async fn wait_for_sigterm() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            sigterm.recv().await;
        }
        Err(e) => {
            warn!("Failed to install SIGTERM handler: {}", e);
            std::future::pending::<()>().await
        }
    }
}

/// No SIGTERM on Windows; Ctrl+C still works.
#[cfg(not(unix))]
async fn wait_for_sigterm() {
    std::future::pending::<()>().await
}
