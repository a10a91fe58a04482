// Fixed-rate control loop and process wiring
//
// Two paths run for the lifetime of the process:
// - input: blocking serial reads -> frames -> poses -> filtered pose (published)
// - control: every period, read the latest pose -> solve -> slew limit -> servos
//
// There is no shutdown path. If the serial input stops, the platform holds its
// last pose unless a stale timeout is configured.

use std::time::Instant;

use tokio::time::{MissedTickBehavior, interval};
use tracing::{error, info, warn};

use crate::actuator::{ActuatorDriver, LEG_CHANNELS, ServoDriver, SimulatedPwm};
use crate::config::{PlatformConfig, RuntimeConfig};
use crate::error::RuntimeError;
use crate::input::{InputPipeline, SerialSource};
use crate::messages::{ActuatorAngles, FilteredPose, RuntimeHealth};
use crate::motion::{RateLimiter, solve};
use crate::pose::{PoseReader, pose_channel};

pub struct ControlScheduler<D: ActuatorDriver> {
    config: PlatformConfig,
    reader: PoseReader,
    limiter: RateLimiter,
    driver: D,
    last_pose_at: Option<Instant>,
    health: RuntimeHealth,
}

impl<D: ActuatorDriver> ControlScheduler<D> {
    pub fn new(config: PlatformConfig, reader: PoseReader, driver: D) -> Self {
        let limiter = RateLimiter::new(
            config.max_step_deg,
            ActuatorAngles::splat(config.servo_center_deg),
        );
        Self {
            config,
            reader,
            limiter,
            driver,
            last_pose_at: None,
            health: RuntimeHealth::CmdStale, // Start stale until first pose
        }
    }

    /// Drive every leg to the servo center
    pub fn home(&mut self) {
        let center = ActuatorAngles::splat(self.config.servo_center_deg);
        info!("Homing servos to {}°", self.config.servo_center_deg);
        self.dispatch(&center);
    }

    /// Run one control cycle and return the angles sent to the servos
    pub fn tick(&mut self, now: Instant) -> ActuatorAngles {
        let snapshot = self.reader.snapshot();
        if snapshot.fresh {
            self.last_pose_at = Some(now);
        }

        let pose = self.target_pose(snapshot.pose, now);
        let targets = solve(&pose, &self.config);
        let angles = self.limiter.step(&targets);
        self.dispatch(&angles);
        angles
    }

    /// Pose to track this cycle, including the optional stale watchdog
    fn target_pose(&mut self, pose: FilteredPose, now: Instant) -> FilteredPose {
        let Some(received_at) = self.last_pose_at else {
            // Nothing received yet: the shared pose is still the initial one
            self.set_health(RuntimeHealth::CmdStale);
            return pose;
        };

        match self.config.stale_timeout() {
            Some(timeout) if now.duration_since(received_at) > timeout => {
                self.set_health(RuntimeHealth::CmdStale);
                FilteredPose::neutral()
            }
            _ => {
                self.set_health(RuntimeHealth::Ok);
                pose
            }
        }
    }

    fn set_health(&mut self, health: RuntimeHealth) {
        if self.health == health {
            return;
        }
        match health {
            RuntimeHealth::CmdStale if self.last_pose_at.is_some() => {
                warn!("Pose command stale, returning to neutral")
            }
            RuntimeHealth::CmdStale => {}
            RuntimeHealth::Ok => info!("Receiving pose commands"),
        }
        self.health = health;
    }

    fn dispatch(&mut self, angles: &ActuatorAngles) {
        for (&channel, &angle) in LEG_CHANNELS.iter().zip(angles.0.iter()) {
            if let Err(e) = self.driver.set_angle(channel, angle) {
                warn!("Failed to set servo {} to {:.2}°: {}", channel, angle, e);
            }
        }
    }

    pub fn health(&self) -> RuntimeHealth {
        self.health
    }

    pub fn angles(&self) -> ActuatorAngles {
        self.limiter.current()
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Tick at the configured period forever
    pub async fn run(&mut self) {
        let mut tick = interval(self.config.control_period());
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            let now = tick.tick().await;
            self.tick(now.into_std());
        }
    }
}

pub async fn run(config: RuntimeConfig) -> Result<(), RuntimeError> {
    config.validate()?;
    let platform = config.platform.clone();

    let source = SerialSource::open(&config.serial)?;
    let (publisher, reader) = pose_channel(FilteredPose::neutral());
    let input = InputPipeline::new(platform.low_pass_alpha, publisher);

    // Serial reads block, keep them off the control loop's worker
    let input_task = tokio::task::spawn_blocking(move || input.run(source));
    tokio::spawn(async move {
        match input_task.await {
            Ok(Err(e)) => error!("Input path stopped ({}), holding last pose", e),
            Err(e) => error!("Input task panicked: {}", e),
            Ok(Ok(())) => {}
        }
    });

    let driver = ServoDriver::new(SimulatedPwm::new(), platform.clone());
    let mut scheduler = ControlScheduler::new(platform.clone(), reader, driver);

    info!(
        "Control loop started: {}ms period, alpha {}, max step {}°",
        platform.control_period_ms, platform.low_pass_alpha, platform.max_step_deg
    );
    match platform.stale_timeout_ms {
        Some(ms) => info!("Stale timeout: {}ms", ms),
        None => info!("No stale timeout, last pose is held if input stops"),
    }

    scheduler.home();
    scheduler.run().await;
    Ok(())
}
