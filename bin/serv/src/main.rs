use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{Router, middleware, routing::get};
use sts_api::{
    ApiConfig, ApiState,
    middleware::{apply_security_headers, create_cors_layer, request_id::apply_request_id},
    relay::RelayHub,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = ApiConfig::from_env().context("failed to read configuration")?;
    config.validate()?;

    sts_api::tracing::init_tracing(&config.env);
    let metrics_handle = sts_api::metrics::init_metrics()?;

    let pool = sts_db::create_pool(&config.database_url, config.db_max_connections).await?;
    sts_db::ensure_db_and_migrate(&config.database_url, &pool).await?;
    tracing::info!("Database ready");

    let state = ApiState::new(&config, pool);
    let relay = state.relay.clone();

    let metrics_app = Router::new()
        .route("/metrics", get(sts_api::metrics::metrics_handler))
        .with_state(metrics_handle);

    let app = sts_api::router::router()
        .with_state(state)
        .merge(metrics_app)
        .layer(create_cors_layer(config.parsed_allowed_origins()))
        .layer(middleware::from_fn(sts_api::metrics::track_metrics));
    let app = apply_request_id(app);
    let app = apply_security_headers(app, config.env);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, environment = ?config.env, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(relay))
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolve on Ctrl-C or SIGTERM, then close every relay socket.
async fn shutdown_signal(relay: Arc<RelayHub>) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
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
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
    relay.shutdown_all().await;
}
