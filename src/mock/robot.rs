//! Simulated robot state machine

use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;

use crate::config::MockRobotConfig;

const MAX_POWER: f64 = 20.0;
/// Chance per tick that an offline robot comes back
const RECOVERY_CHANCE: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RobotStatus {
    Idle,
    Running,
    Offline,
    Error,
}

impl RobotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RobotStatus::Idle => "idle",
            RobotStatus::Running => "running",
            RobotStatus::Offline => "offline",
            RobotStatus::Error => "error",
        }
    }

    /// Watts drawn in this status, inclusive
    fn power_range(&self) -> (u32, u32) {
        match self {
            RobotStatus::Idle | RobotStatus::Error => (7, 10),
            RobotStatus::Running => (15, 20),
            RobotStatus::Offline => (0, 0),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SimulationParams {
    pub max_fan_cooling: f64,
    pub temperature_min: i32,
    pub temperature_max: i32,
    pub temperature_threshold: f64,
    pub offline_chance: f64,
}

impl From<&MockRobotConfig> for SimulationParams {
    fn from(config: &MockRobotConfig) -> Self {
        Self {
            max_fan_cooling: config.mock_max_fan_cooling,
            temperature_min: config.mock_temperature_min,
            temperature_max: config.mock_temperature_max,
            temperature_threshold: config.mock_temperature_threshold,
            offline_chance: config.mock_offline_chance_threshold,
        }
    }
}

/// Body of `GET /robot` as the device serves it. Fan speed is a whole percentage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RobotState {
    pub current_temperature: f64,
    pub current_power_consumption: f64,
    pub status: String,
    pub fan_speed: u8,
    pub uptime: String,
    pub logs: Vec<String>,
}

pub struct MockRobot {
    params: SimulationParams,
    status: RobotStatus,
    previous_status: RobotStatus,
    current_temperature: f64,
    current_power_consumption: f64,
    fan_speed: u8,
    proportional_fan: bool,
    uptime: Duration,
    started_at: DateTime<Utc>,
    logs: Vec<String>,
}

impl MockRobot {
    pub fn new(params: SimulationParams) -> Self {
        Self {
            params,
            status: RobotStatus::Idle,
            previous_status: RobotStatus::Idle,
            current_temperature: 0.0,
            current_power_consumption: 0.0,
            fan_speed: 0,
            proportional_fan: true,
            uptime: Duration::ZERO,
            started_at: Utc::now(),
            logs: Vec::new(),
        }
    }

    pub fn status(&self) -> RobotStatus {
        self.status
    }

    pub fn snapshot(&self) -> RobotState {
        RobotState {
            current_temperature: self.current_temperature,
            current_power_consumption: self.current_power_consumption,
            status: self.status.as_str().to_string(),
            fan_speed: self.fan_speed,
            uptime: format_uptime(self.uptime),
            logs: self.logs.clone(),
        }
    }

    /// idle <-> running; any other status refuses
    pub fn switch(&mut self) -> bool {
        match self.status {
            RobotStatus::Idle => {
                self.status = RobotStatus::Running;
                true
            }
            RobotStatus::Running => {
                self.status = RobotStatus::Idle;
                true
            }
            other => {
                self.warn(format!(
                    "Unable to switch with current state: '{}'",
                    other.as_str()
                ));
                false
            }
        }
    }

    /// Only an idle or failed robot can be reset. Clears uptime and logs.
    pub fn reset(&mut self) -> bool {
        if !matches!(self.status, RobotStatus::Idle | RobotStatus::Error) {
            self.warn(format!(
                "Unable to reset with current state: '{}'",
                self.status.as_str()
            ));
            return false;
        }

        self.status = RobotStatus::Idle;
        self.uptime = Duration::ZERO;
        self.logs.clear();
        self.started_at = Utc::now();
        true
    }

    pub fn set_fan_speed(&mut self, speed: u8) {
        self.proportional_fan = false;
        self.fan_speed = speed;
        self.warn("Static fan speed has been set, the robot may overheat if set too low".to_string());
    }

    pub fn automate_fan_speed(&mut self) {
        self.proportional_fan = true;
    }

    /// Advance the simulation by one tick of length `delta`.
    pub fn step<R: Rng>(&mut self, delta: Duration, rng: &mut R) {
        let mut logs = Vec::new();
        let mut status = self.status;

        let elapsed = if status == RobotStatus::Offline {
            Duration::ZERO
        } else if self.uptime.is_zero() {
            (Utc::now() - self.started_at).to_std().unwrap_or_default()
        } else {
            delta
        };

        if status == RobotStatus::Offline {
            if rng.gen::<f64>() < RECOVERY_CHANCE {
                status = self.previous_status;
            }
        } else if rng.gen::<f64>() < self.params.offline_chance {
            self.previous_status = status;
            status = RobotStatus::Offline;
            tracing::error!("[MockRobot] Robot is offline");
            logs.push("ERROR: Robot is offline".to_string());
        } else if self.current_temperature >= f64::from(self.params.temperature_max) {
            status = RobotStatus::Error;
            tracing::error!("[MockRobot] Robot overheated");
            logs.push("ERROR: Robot overheated".to_string());
        }

        let (power_min, power_max) = status.power_range();
        let power = f64::from(rng.gen_range(power_min..=power_max));
        let fan_speed = if self.proportional_fan {
            (power / MAX_POWER * 100.0) as u8
        } else {
            self.fan_speed
        };

        let temperature = if status == RobotStatus::Offline {
            0.0
        } else {
            let (lower, upper) = self.temperature_range(status, power);
            let cooling = self.params.max_fan_cooling * f64::from(fan_speed) / 100.0;
            let temperature = f64::from(rng.gen_range(lower..=upper)) - cooling;

            if temperature >= self.params.temperature_threshold {
                let message =
                    "Temperature reaching critical level! Increase fan speed to avoid overheating";
                tracing::warn!("[MockRobot] {}", message);
                logs.push(format!("WARN: {}", message));
            }
            temperature
        };

        self.current_temperature = temperature;
        self.current_power_consumption = power;
        self.status = status;
        self.fan_speed = fan_speed;
        self.uptime += elapsed;
        self.logs.extend(logs);
    }

    /// Raw temperature bounds before fan cooling, scaled by the power draw
    fn temperature_range(&self, status: RobotStatus, power: f64) -> (i32, i32) {
        let (power_min, power_max) = status.power_range();
        let t_min = f64::from(self.params.temperature_min);
        let t_max = f64::from(self.params.temperature_max);

        let lower = t_min.min((f64::from(power_min) / MAX_POWER * power + t_min).floor());
        let upper = (t_max * f64::from(power_max) / MAX_POWER).ceil();

        (lower as i32, upper.max(lower) as i32)
    }

    fn warn(&mut self, message: String) {
        tracing::warn!("[MockRobot] {}", message);
        self.logs.push(format!("WARN: {}", message));
    }
}

/// `H:MM:SS`, with `.ffffff` when there are sub-second parts and a day prefix
/// past 24 hours
pub fn format_uptime(uptime: Duration) -> String {
    let total = uptime.as_secs();
    let days = total / 86_400;
    let hours = (total % 86_400) / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    let micros = uptime.subsec_micros();

    let mut formatted = match days {
        0 => String::new(),
        1 => "1 day, ".to_string(),
        n => format!("{} days, ", n),
    };
    formatted.push_str(&format!("{}:{:02}:{:02}", hours, minutes, seconds));
    if micros > 0 {
        formatted.push_str(&format!(".{:06}", micros));
    }
    formatted
}
