//! Robot device HTTP client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use url::Url;

use super::{CommandOutcome, DeviceApi};
use crate::config::PanelConfig;
use crate::error::TransportError;
use crate::models::{DeviceSnapshot, FanConfigRequest, FanMode};

const STATE_PATH: &str = "/robot";
const SWITCH_PATH: &str = "/robot/switch";
const RESET_PATH: &str = "/robot/reset";
const FAN_PATH: &str = "/robot/fan";

#[derive(Debug, Clone)]
struct Endpoints {
    state: Url,
    switch: Url,
    reset: Url,
    fan: Url,
}

impl Endpoints {
    /// Paths are appended to the base URL verbatim, so a base with a path
    /// prefix (`http://host/api`) keeps it.
    fn new(base_url: &str) -> Result<Self, TransportError> {
        let base = base_url.trim_end_matches('/');
        let endpoint = |path: &str| Url::parse(&format!("{}{}", base, path));

        Ok(Self {
            state: endpoint(STATE_PATH)?,
            switch: endpoint(SWITCH_PATH)?,
            reset: endpoint(RESET_PATH)?,
            fan: endpoint(FAN_PATH)?,
        })
    }
}

/// HTTP client for the robot API.
///
/// The timeout is set on the underlying client, so every request gets the
/// same budget and is aborted when it runs out.
pub struct RobotClient {
    http_client: Client,
    endpoints: Endpoints,
}

impl RobotClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, TransportError> {
        let http_client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            endpoints: Endpoints::new(base_url)?,
        })
    }

    pub fn from_config(config: &PanelConfig) -> Result<Self, TransportError> {
        Self::new(&config.backend_url, config.request_timeout())
    }

    async fn post(
        &self,
        url: &Url,
        body: Option<&FanConfigRequest>,
        action: &str,
    ) -> Result<CommandOutcome, TransportError> {
        let mut request = self.http_client.post(url.clone());
        if let Some(body) = body {
            request = request.header(header::ACCEPT, "application/json").json(body);
        }

        let response = request.send().await.map_err(|e| {
            tracing::error!("[Transport] {} request failed: {}", action, e);
            TransportError::from(e)
        })?;

        let outcome = CommandOutcome::from(response.status());
        if !outcome.is_ok() {
            tracing::error!(
                "[Transport] Failed to {} with status {}",
                action,
                outcome.status
            );
        }

        Ok(outcome)
    }
}

#[async_trait]
impl DeviceApi for RobotClient {
    async fn fetch_state(&self) -> Result<Option<DeviceSnapshot>, TransportError> {
        let response = self
            .http_client
            .get(self.endpoints.state.clone())
            .send()
            .await
            .map_err(|e| {
                tracing::error!("[Transport] State request failed: {}", e);
                TransportError::from(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(
                "[Transport] Failed to retrieve state from API with status {}",
                status.as_u16()
            );
            return Ok(None);
        }

        let snapshot = response.json::<DeviceSnapshot>().await?;
        Ok(Some(snapshot))
    }

    async fn switch_power(&self) -> Result<CommandOutcome, TransportError> {
        self.post(&self.endpoints.switch, None, "switch robot mode")
            .await
    }

    async fn reset(&self) -> Result<CommandOutcome, TransportError> {
        self.post(&self.endpoints.reset, None, "reset robot").await
    }

    async fn set_fan_config(
        &self,
        mode: FanMode,
        speed: u8,
    ) -> Result<CommandOutcome, TransportError> {
        let body = FanConfigRequest::new(mode, speed);
        self.post(&self.endpoints.fan, Some(&body), "set fan configuration")
            .await
    }
}
