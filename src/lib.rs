//! robot-panel - monitoring and control panel for a REST-exposed robot
//!
//! The panel polls the device state on a fixed schedule, forwards operator
//! commands and serves the merged render state. A simulated device that
//! speaks the same API lives in `mock`.

pub mod api;
pub mod config;
pub mod error;
pub mod mock;
pub mod models;
pub mod robot;
pub mod sync;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the fmt subscriber, filtered by `RUST_LOG` or `default_filter`
pub fn init_tracing(default_filter: &str) {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();
}
