//! RobotService: request validation and the simulation loop

use std::sync::Arc;
use std::time::Duration;

use rand::{rngs::StdRng, SeedableRng};
use tokio::sync::Mutex;
use tokio::time::{interval, MissedTickBehavior};

use super::robot::{MockRobot, RobotState};
use crate::error::AppError;
use crate::models::FanMode;

pub struct RobotService {
    robot: Mutex<MockRobot>,
    tick_interval: Duration,
}

impl RobotService {
    pub fn new(robot: MockRobot, tick_interval: Duration) -> Self {
        Self {
            robot: Mutex::new(robot),
            tick_interval,
        }
    }

    /// Run the simulation loop (runs forever)
    pub async fn start(self: Arc<Self>) {
        tracing::info!(
            "[MockRobot] Starting simulation (interval: {} ms)",
            self.tick_interval.as_millis()
        );

        let mut rng = StdRng::from_entropy();
        let mut timer = interval(self.tick_interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            timer.tick().await;
            self.robot.lock().await.step(self.tick_interval, &mut rng);
        }
    }

    pub async fn switch(&self) -> Result<(), AppError> {
        tracing::info!("[MockRobot] Switching robot mode");
        if self.robot.lock().await.switch() {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Robot cannot be switched on/off from current state".to_string(),
            ))
        }
    }

    pub async fn reset(&self) -> Result<(), AppError> {
        tracing::info!("[MockRobot] Resetting robot");
        if self.robot.lock().await.reset() {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Robot cannot be reset from current state".to_string(),
            ))
        }
    }

    /// `mode` is taken as sent so unknown modes get a descriptive error
    pub async fn switch_fan(&self, mode: &str, value: Option<i64>) -> Result<(), AppError> {
        tracing::info!("[MockRobot] Setting fan configuration");

        if mode == FanMode::Proportional.as_str() {
            self.robot.lock().await.automate_fan_speed();
            tracing::info!("[MockRobot] Fan operation is set to auto");
            Ok(())
        } else if mode == FanMode::Static.as_str() {
            let speed = value
                .and_then(|v| u8::try_from(v).ok())
                .filter(|v| *v <= 100)
                .ok_or_else(|| {
                    let message = "Fan speed out of range (0-100)".to_string();
                    tracing::error!("[MockRobot] {}", message);
                    AppError::BadRequest(message)
                })?;

            self.robot.lock().await.set_fan_speed(speed);
            tracing::info!("[MockRobot] Fan operation is set to static speed at {}%", speed);
            Ok(())
        } else {
            let message = format!("Incorrect fan operation mode: '{}'", mode);
            tracing::error!("[MockRobot] {}", message);
            Err(AppError::BadRequest(message))
        }
    }

    pub async fn get_state(&self) -> RobotState {
        tracing::debug!("[MockRobot] Obtaining robot state");
        self.robot.lock().await.snapshot()
    }
}
