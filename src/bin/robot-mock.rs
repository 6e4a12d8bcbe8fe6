//! Simulated robot device
//!
//! Serves the robot API backed by a randomized simulation.

use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use robot_panel::config::MockRobotConfig;
use robot_panel::mock;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    robot_panel::init_tracing("robot_panel=info,tower_http=debug");

    tracing::info!("Starting mock robot...");

    let config = MockRobotConfig::load()?;
    tracing::info!("Configuration loaded");

    let (service, app) = mock::build(&config);
    let app = app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(mock::cors_layer(&config)),
    );

    tokio::spawn(async move {
        service.start().await;
    });

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
