//! Snapshot and control state owned by the synchronization loop
//!
//! Nothing here suspends; the controller feeds poll results, user actions and
//! command outcomes in one at a time.

use std::fmt;

use serde::Serialize;

use super::view::PanelView;
use crate::error::TransportError;
use crate::models::{DeviceSnapshot, FanMode};
use crate::robot::CommandOutcome;

pub const DEFAULT_FAN_SPEED: u8 = 50;
pub const MAX_FAN_SPEED: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunningState {
    #[default]
    Unknown,
    Running,
    Stopped,
}

impl RunningState {
    pub fn is_running(self) -> bool {
        self == RunningState::Running
    }

    fn toggled(self) -> Self {
        if self.is_running() {
            RunningState::Stopped
        } else {
            RunningState::Running
        }
    }
}

/// Local user intent, kept apart from the polled snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlState {
    pub running: RunningState,
    pub fan_mode: FanMode,
    pub fan_speed: u8,
}

impl Default for ControlState {
    fn default() -> Self {
        Self {
            running: RunningState::Unknown,
            fan_mode: FanMode::Proportional,
            fan_speed: DEFAULT_FAN_SPEED,
        }
    }
}

impl ControlState {
    pub fn is_running(&self) -> bool {
        self.running.is_running()
    }
}

/// An input event from the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    SetFanMode(FanMode),
    SetFanSpeed(u8),
    SwitchPower,
    Reset,
}

/// A device request, with fan values captured when the action was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceCommand {
    SwitchPower,
    Reset,
    SetFan { mode: FanMode, speed: u8 },
}

impl fmt::Display for DeviceCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceCommand::SwitchPower => f.write_str("switch"),
            DeviceCommand::Reset => f.write_str("reset"),
            DeviceCommand::SetFan { .. } => f.write_str("fan update"),
        }
    }
}

#[derive(Debug, Default)]
pub struct SyncState {
    snapshot: Option<DeviceSnapshot>,
    control: ControlState,
}

impl SyncState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Option<&DeviceSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn control(&self) -> &ControlState {
        &self.control
    }

    /// Merge the result of one poll tick. Returns whether the snapshot was replaced.
    pub fn apply_poll(&mut self, result: Result<Option<DeviceSnapshot>, TransportError>) -> bool {
        match result {
            Ok(Some(snapshot)) => {
                // The running flag is seeded from the first snapshot only
                if self.control.running == RunningState::Unknown {
                    self.control.running = if snapshot.is_running() {
                        RunningState::Running
                    } else {
                        RunningState::Stopped
                    };
                    tracing::debug!("[Sync] Running state seeded as {:?}", self.control.running);
                }

                self.snapshot = Some(snapshot);
                true
            }
            Ok(None) => {
                tracing::debug!("[Sync] No state update this tick");
                false
            }
            Err(e) => {
                tracing::error!("[Sync] Failed to retrieve robot state: {}", e);
                false
            }
        }
    }

    /// Apply a user action to the control state and return the request to send.
    pub fn apply_action(&mut self, action: UserAction) -> DeviceCommand {
        match action {
            UserAction::SetFanMode(mode) => {
                self.control.fan_mode = mode;
                self.fan_command()
            }
            UserAction::SetFanSpeed(speed) => {
                self.control.fan_speed = speed.min(MAX_FAN_SPEED);
                self.fan_command()
            }
            UserAction::SwitchPower => DeviceCommand::SwitchPower,
            UserAction::Reset => DeviceCommand::Reset,
        }
    }

    fn fan_command(&self) -> DeviceCommand {
        DeviceCommand::SetFan {
            mode: self.control.fan_mode,
            speed: self.control.fan_speed,
        }
    }

    /// Apply the response to a command. Failures are logged and never roll
    /// back the control state.
    pub fn apply_outcome(
        &mut self,
        command: DeviceCommand,
        result: Result<CommandOutcome, TransportError>,
    ) {
        match result {
            Ok(outcome) if outcome.is_ok() => match command {
                DeviceCommand::SwitchPower => {
                    self.control.running = self.control.running.toggled();
                    tracing::info!("[Sync] Robot switched, now {:?}", self.control.running);
                }
                DeviceCommand::Reset => {
                    self.control.running = RunningState::Stopped;
                    tracing::info!("[Sync] Robot reset");
                }
                DeviceCommand::SetFan { mode, speed } => {
                    tracing::debug!("[Sync] Fan set to {} ({}%)", mode, speed);
                }
            },
            Ok(outcome) => {
                tracing::warn!(
                    "[Sync] Robot rejected {} request with status {}",
                    command,
                    outcome.status
                );
            }
            Err(e) => {
                tracing::error!("[Sync] Failed to get response on {} request: {}", command, e);
            }
        }
    }

    pub fn view(&self) -> PanelView {
        PanelView::render(self.snapshot.as_ref(), &self.control)
    }
}
