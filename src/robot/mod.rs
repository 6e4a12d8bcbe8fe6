//! Robot device API integration
//!
//! - `client`: HTTP client bound to the configured backend

pub mod client;

pub use client::RobotClient;

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::error::TransportError;
use crate::models::{DeviceSnapshot, FanMode};

/// Status of a command request that reached the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandOutcome {
    pub status: u16,
}

impl CommandOutcome {
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl From<StatusCode> for CommandOutcome {
    fn from(status: StatusCode) -> Self {
        Self {
            status: status.as_u16(),
        }
    }
}

/// The four device operations.
///
/// Every call performs exactly one request. Network-level failures are
/// returned as `Err`; non-2xx statuses are not.
#[async_trait]
pub trait DeviceApi: Send + Sync {
    /// `Ok(None)` means the device answered with a non-2xx status
    async fn fetch_state(&self) -> Result<Option<DeviceSnapshot>, TransportError>;

    async fn switch_power(&self) -> Result<CommandOutcome, TransportError>;

    async fn reset(&self) -> Result<CommandOutcome, TransportError>;

    async fn set_fan_config(
        &self,
        mode: FanMode,
        speed: u8,
    ) -> Result<CommandOutcome, TransportError>;
}
