//! Robot panel server
//!
//! Polls the robot API and serves the panel render state and controls.

use std::sync::Arc;

use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use robot_panel::api;
use robot_panel::config::PanelConfig;
use robot_panel::robot::RobotClient;
use robot_panel::sync::PanelController;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    robot_panel::init_tracing("robot_panel=info,tower_http=debug");

    tracing::info!("Starting robot panel...");

    // Load configuration
    let config = PanelConfig::load()?;
    tracing::info!(
        "Configuration loaded (backend: {}, refresh rate: {} Hz, request timeout: {} ms)",
        config.backend_url,
        config.refresh_rate,
        config.request_timeout_ms
    );

    // Start synchronizing with the device
    let client = Arc::new(RobotClient::from_config(&config)?);
    let controller = PanelController::from_config(client, &config);

    let app = api::routes().with_state(controller.handle()).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr = format!("{}:{}", config.listen_host, config.listen_port);
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    controller.shutdown().await;
    tracing::info!("Robot panel stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutdown signal received");
}
