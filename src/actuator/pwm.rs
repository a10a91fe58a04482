// Servo angle -> PWM duty mapping and the duty output primitive
//
// The servos are mounted inverted: a commanded angle `a` is driven as
// physical angle `180 - a`, so 0° gives the longest pulse.

use tracing::debug;

use crate::config::PlatformConfig;
use crate::messages::clamp_servo_angle;

/// Full physical travel of the servo horn in degrees
const SERVO_PHYSICAL_RANGE_DEG: f32 = 180.0;

/// Number of PWM channels wired to actuators
pub const PWM_CHANNELS: usize = 3;

/// Hardware primitive: write a duty command to a PWM channel
pub trait PwmOutput {
    type Error: std::error::Error;

    fn write_duty(&mut self, channel: u8, duty: u32) -> Result<(), Self::Error>;
}

/// Convert an angle in degrees to a quantized duty command
pub fn angle_to_duty(angle: f32, config: &PlatformConfig) -> u32 {
    let physical = SERVO_PHYSICAL_RANGE_DEG - clamp_servo_angle(angle);
    let pulse_us = config.pulse_min_us
        + (physical / SERVO_PHYSICAL_RANGE_DEG) * (config.pulse_max_us - config.pulse_min_us);

    ((pulse_us / config.pwm_period_us) * config.duty_max as f32) as u32
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PwmError {
    #[error("PWM channel {0} is not wired")]
    InvalidChannel(u8),
}

/// PWM sink without hardware: remembers the last duty per channel
#[derive(Debug, Default)]
pub struct SimulatedPwm {
    duties: [Option<u32>; PWM_CHANNELS],
}

impl SimulatedPwm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn duty(&self, channel: u8) -> Option<u32> {
        self.duties.get(channel as usize).copied().flatten()
    }
}

impl PwmOutput for SimulatedPwm {
    type Error = PwmError;

    fn write_duty(&mut self, channel: u8, duty: u32) -> Result<(), PwmError> {
        let slot = self
            .duties
            .get_mut(channel as usize)
            .ok_or(PwmError::InvalidChannel(channel))?;
        debug!("PWM channel {} duty={}", channel, duty);
        *slot = Some(duty);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duty_at_range_ends() {
        let config = PlatformConfig::default();
        // 0° -> physical 180° -> 2500 us
        assert_eq!(angle_to_duty(0.0, &config), 1023);
        // 90° -> physical 90° -> 1500 us
        assert_eq!(angle_to_duty(90.0, &config), 614);
    }

    #[test]
    fn test_duty_at_center_and_midpoint() {
        let config = PlatformConfig::default();
        assert_eq!(angle_to_duty(35.0, &config), 864);
        assert_eq!(angle_to_duty(45.0, &config), 819);
    }

    #[test]
    fn test_out_of_range_angles_are_clamped() {
        let config = PlatformConfig::default();
        assert_eq!(angle_to_duty(-30.0, &config), angle_to_duty(0.0, &config));
        assert_eq!(angle_to_duty(150.0, &config), angle_to_duty(90.0, &config));
    }

    #[test]
    fn test_non_finite_angles_map_to_defined_duty() {
        let config = PlatformConfig::default();
        assert_eq!(angle_to_duty(f32::NAN, &config), angle_to_duty(35.0, &config));
        assert_eq!(angle_to_duty(f32::INFINITY, &config), 614);
        assert_eq!(angle_to_duty(f32::NEG_INFINITY, &config), 1023);
    }

    #[test]
    fn test_duty_decreases_with_angle() {
        let config = PlatformConfig::default();
        let mut prev = angle_to_duty(0.0, &config);
        for a in 1..=90 {
            let duty = angle_to_duty(a as f32, &config);
            assert!(duty <= prev, "inverted mounting: duty must not rise");
            prev = duty;
        }
    }

    #[test]
    fn test_simulated_pwm_rejects_unknown_channel() {
        let mut pwm = SimulatedPwm::new();
        pwm.write_duty(2, 700).unwrap();
        assert_eq!(pwm.duty(2), Some(700));
        assert_eq!(pwm.duty(0), None);
        assert_eq!(pwm.write_duty(3, 700), Err(PwmError::InvalidChannel(3)));
    }
}
