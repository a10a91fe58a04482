// Servo driver for the platform legs
//
// Wraps a PWM output and exposes per-channel angle commands.

use tracing::info;

use super::pwm::{PwmOutput, angle_to_duty};
use crate::config::PlatformConfig;
use crate::messages::clamp_servo_angle;

/// PWM channels for the three legs, in mount phase order (0°, 120°, 240°)
pub const LEG_CHANNELS: [u8; 3] = [0, 1, 2];

/// Accepts a clamped angle per channel
pub trait ActuatorDriver {
    type Error: std::error::Error;

    /// `angle` is in degrees within [0, 90]
    fn set_angle(&mut self, channel: u8, angle: f32) -> Result<(), Self::Error>;
}

pub struct ServoDriver<P: PwmOutput> {
    pwm: P,
    config: PlatformConfig,
}

impl<P: PwmOutput> ServoDriver<P> {
    pub fn new(pwm: P, config: PlatformConfig) -> Self {
        info!(
            "Servo driver: pulse {}-{} us, period {} us, duty max {}",
            config.pulse_min_us, config.pulse_max_us, config.pwm_period_us, config.duty_max
        );
        Self { pwm, config }
    }

    pub fn pwm(&self) -> &P {
        &self.pwm
    }
}

impl<P: PwmOutput> ActuatorDriver for ServoDriver<P> {
    type Error = P::Error;

    fn set_angle(&mut self, channel: u8, angle: f32) -> Result<(), P::Error> {
        let duty = angle_to_duty(clamp_servo_angle(angle), &self.config);
        self.pwm.write_duty(channel, duty)
    }
}
