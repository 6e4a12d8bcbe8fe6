//! Render state handed to the presentation layer

use serde::Serialize;

use super::state::{ControlState, RunningState};
use crate::models::{DeviceSnapshot, FanMode, LogLine};

pub const TURN_ON_LABEL: &str = "Turn on";
pub const TURN_OFF_LABEL: &str = "Turn off";

/// Read-only panel state.
///
/// Device fields are `None` until the first successful poll.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelView {
    pub current_temperature: Option<f64>,
    pub current_power_consumption: Option<f64>,
    pub status: Option<String>,
    pub fan_speed: Option<f64>,
    pub uptime: Option<String>,
    pub logs: Vec<LogLine>,
    pub running_state: RunningState,
    pub is_running: bool,
    pub power_button: &'static str,
    pub fan_mode: FanMode,
    pub fan_speed_setting: u8,
    pub fan_speed_editable: bool,
}

impl PanelView {
    pub fn render(snapshot: Option<&DeviceSnapshot>, control: &ControlState) -> Self {
        let is_running = control.is_running();

        Self {
            current_temperature: snapshot.map(|s| s.current_temperature),
            current_power_consumption: snapshot.map(|s| s.current_power_consumption),
            status: snapshot.map(|s| s.status.clone()),
            fan_speed: snapshot.map(|s| s.fan_speed),
            uptime: snapshot.map(|s| s.uptime.clone()),
            logs: snapshot
                .map(|s| s.logs.iter().map(|l| LogLine::from(l.as_str())).collect())
                .unwrap_or_default(),
            running_state: control.running,
            is_running,
            power_button: if is_running {
                TURN_OFF_LABEL
            } else {
                TURN_ON_LABEL
            },
            fan_mode: control.fan_mode,
            fan_speed_setting: control.fan_speed,
            fan_speed_editable: control.fan_mode == FanMode::Static,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LogSeverity;

    #[test]
    fn test_empty_view() {
        let view = PanelView::render(None, &ControlState::default());

        assert_eq!(view.current_temperature, None);
        assert_eq!(view.status, None);
        assert_eq!(view.uptime, None);
        assert!(view.logs.is_empty());
        assert_eq!(view.power_button, TURN_ON_LABEL);
        assert_eq!(view.running_state, RunningState::Unknown);
        assert_eq!(view.fan_mode, FanMode::Proportional);
        assert_eq!(view.fan_speed_setting, 50);
        assert!(!view.fan_speed_editable);
    }

    #[test]
    fn test_view_tags_logs_and_labels_button() {
        let snapshot = DeviceSnapshot {
            current_temperature: 41.0,
            current_power_consumption: 18.0,
            status: "running".to_string(),
            fan_speed: 90.0,
            uptime: "0:10:00".to_string(),
            logs: vec![
                "INFO boot ok".to_string(),
                "WARN low battery".to_string(),
                "ERROR fan stall".to_string(),
            ],
        };
        let control = ControlState {
            running: RunningState::Running,
            fan_mode: FanMode::Static,
            fan_speed: 90,
        };

        let view = PanelView::render(Some(&snapshot), &control);

        assert_eq!(view.power_button, TURN_OFF_LABEL);
        assert!(view.fan_speed_editable);
        assert_eq!(view.status.as_deref(), Some("running"));
        let severities: Vec<_> = view.logs.iter().map(|l| l.severity).collect();
        assert_eq!(
            severities,
            vec![LogSeverity::Neutral, LogSeverity::Warn, LogSeverity::Error]
        );
    }
}
