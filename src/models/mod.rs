//! Data models for the robot panel

use std::fmt;

use serde::{Deserialize, Serialize};

/// Status string the device reports while it is running
pub const RUNNING_STATUS: &str = "running";

// ============================================================================
// Device State Models
// ============================================================================

/// Full device state as returned by `GET /robot`.
///
/// Always replaced as a whole; fields are never merged from a partial response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceSnapshot {
    /// Celsius
    pub current_temperature: f64,
    /// Watts
    pub current_power_consumption: f64,
    pub status: String,
    /// Percent, 0-100. Accepted as an integer or a float.
    pub fan_speed: f64,
    pub uptime: String,
    pub logs: Vec<String>,
}

impl DeviceSnapshot {
    pub fn is_running(&self) -> bool {
        self.status == RUNNING_STATUS
    }
}

// ============================================================================
// Fan Models
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FanMode {
    /// Speed is dictated by the client
    Static,
    /// Speed is computed by the device
    #[default]
    Proportional,
}

impl FanMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FanMode::Static => "static",
            FanMode::Proportional => "proportional",
        }
    }
}

impl fmt::Display for FanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of `POST /robot/fan`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FanConfigRequest {
    pub mode: FanMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<u8>,
}

impl FanConfigRequest {
    /// Proportional mode only forwards the mode; the speed is dropped.
    pub fn new(mode: FanMode, speed: u8) -> Self {
        let value = match mode {
            FanMode::Proportional => None,
            FanMode::Static => Some(speed),
        };

        Self { mode, value }
    }
}

// ============================================================================
// Log Models
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogSeverity {
    Neutral,
    Warn,
    Error,
}

impl LogSeverity {
    /// `ERROR` wins over `WARN` when a line carries both markers.
    pub fn classify(line: &str) -> Self {
        if line.contains("ERROR") {
            LogSeverity::Error
        } else if line.contains("WARN") {
            LogSeverity::Warn
        } else {
            LogSeverity::Neutral
        }
    }
}

/// A device log entry tagged for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogLine {
    pub text: String,
    pub severity: LogSeverity,
}

impl From<&str> for LogLine {
    fn from(text: &str) -> Self {
        Self {
            text: text.to_string(),
            severity: LogSeverity::classify(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_severity_scenario() {
        let logs = ["INFO boot ok", "WARN low battery", "ERROR fan stall"];
        let severities: Vec<_> = logs.iter().map(|l| LogSeverity::classify(l)).collect();

        assert_eq!(
            severities,
            vec![LogSeverity::Neutral, LogSeverity::Warn, LogSeverity::Error]
        );
    }

    #[test]
    fn test_log_severity_error_wins() {
        assert_eq!(
            LogSeverity::classify("WARN: retry failed with ERROR"),
            LogSeverity::Error
        );
        // Markers are case sensitive
        assert_eq!(LogSeverity::classify("warning: lowercase"), LogSeverity::Neutral);
    }

    #[test]
    fn test_fan_body_proportional_drops_speed() {
        for speed in [0, 37, 50, 100] {
            let body = serde_json::to_value(FanConfigRequest::new(FanMode::Proportional, speed))
                .unwrap();
            assert_eq!(body, serde_json::json!({ "mode": "proportional" }));
        }
    }

    #[test]
    fn test_fan_body_static_carries_value() {
        let body = serde_json::to_value(FanConfigRequest::new(FanMode::Static, 37)).unwrap();
        assert_eq!(body, serde_json::json!({ "mode": "static", "value": 37 }));
    }

    #[test]
    fn test_snapshot_deserialize() {
        let snapshot: DeviceSnapshot = serde_json::from_value(serde_json::json!({
            "current_temperature": 31.5,
            "current_power_consumption": 17,
            "status": "running",
            "fan_speed": 85,
            "uptime": "0:01:02.500000",
            "logs": ["WARN: Robot is hot"]
        }))
        .unwrap();

        assert!(snapshot.is_running());
        assert_eq!(snapshot.current_power_consumption, 17.0);
        assert_eq!(snapshot.fan_speed, 85.0);
        assert_eq!(snapshot.logs.len(), 1);
    }

    #[test]
    fn test_snapshot_accepts_fractional_fan_speed() {
        let snapshot: DeviceSnapshot = serde_json::from_value(serde_json::json!({
            "current_temperature": 20,
            "current_power_consumption": 8.0,
            "status": "idle",
            "fan_speed": 42.5,
            "uptime": "0:00:01",
            "logs": []
        }))
        .unwrap();

        assert_eq!(snapshot.fan_speed, 42.5);
        assert!(!snapshot.is_running());
    }

    #[test]
    fn test_snapshot_missing_field_rejected() {
        let result = serde_json::from_value::<DeviceSnapshot>(serde_json::json!({
            "current_temperature": 31.5,
            "status": "idle"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_fan_mode_wire_names() {
        assert_eq!(
            serde_json::from_str::<FanMode>("\"static\"").unwrap(),
            FanMode::Static
        );
        assert_eq!(FanMode::default(), FanMode::Proportional);
        assert_eq!(FanMode::Proportional.to_string(), "proportional");
    }
}
