// Platform geometry, filter/limiter tuning, loop timing and serial settings
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// Control loop period (50 Hz)
pub const LOOP_PERIOD_MS: u64 = 20;

// Input smoothing and slew limiting
pub const LOW_PASS_ALPHA: f32 = 0.12;
pub const MAX_SERVO_STEP_DEG: f32 = 1.0; // degrees per control cycle

// Actuator mount phases (degrees), 120° symmetric
pub const MOUNT_PHASES_DEG: [f32; 3] = [0.0, 120.0, 240.0];

// Servo usable range is inverted and asymmetric around the center
pub const SERVO_MIN_ANGLE_DEG: f32 = 0.0;
pub const SERVO_MAX_ANGLE_DEG: f32 = 90.0;
pub const SERVO_CENTER_ANGLE_DEG: f32 = 35.0;

// Scale applied to the normalized pose axes
pub const MAX_ROLL: f32 = 40.0;
pub const MAX_PITCH: f32 = 40.0;
pub const MAX_HEIGHT: f32 = 20.0;

// Servo pulse and PWM carrier (50 Hz, 13-bit duty)
pub const SERVO_MIN_PULSE_US: f32 = 500.0;
pub const SERVO_MAX_PULSE_US: f32 = 2500.0;
pub const PWM_PERIOD_US: f32 = 20_000.0;
pub const PWM_DUTY_MAX: u32 = 8191;

// Serial link: 8N1, no flow control
pub const SERIAL_PORT: &str = "/dev/ttyUSB0";
pub const SERIAL_BAUDRATE: u32 = 115_200;
pub const SERIAL_READ_TIMEOUT_MS: u64 = 20;

/// Tunable constants of the control pipeline.
///
/// Defaults reproduce the reference firmware exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    pub low_pass_alpha: f32,
    pub max_step_deg: f32,
    pub control_period_ms: u64,
    pub mount_phases: [f32; 3],
    pub servo_center_deg: f32,
    pub roll_limit: f32,
    pub pitch_limit: f32,
    pub height_limit: f32,
    pub pulse_min_us: f32,
    pub pulse_max_us: f32,
    pub pwm_period_us: f32,
    pub duty_max: u32,
    /// Return to the neutral pose when no pose arrives for this long.
    /// `None` holds the last pose forever.
    pub stale_timeout_ms: Option<u64>,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            low_pass_alpha: LOW_PASS_ALPHA,
            max_step_deg: MAX_SERVO_STEP_DEG,
            control_period_ms: LOOP_PERIOD_MS,
            mount_phases: MOUNT_PHASES_DEG,
            servo_center_deg: SERVO_CENTER_ANGLE_DEG,
            roll_limit: MAX_ROLL,
            pitch_limit: MAX_PITCH,
            height_limit: MAX_HEIGHT,
            pulse_min_us: SERVO_MIN_PULSE_US,
            pulse_max_us: SERVO_MAX_PULSE_US,
            pwm_period_us: PWM_PERIOD_US,
            duty_max: PWM_DUTY_MAX,
            stale_timeout_ms: None,
        }
    }
}

impl PlatformConfig {
    pub fn control_period(&self) -> Duration {
        Duration::from_millis(self.control_period_ms)
    }

    pub fn stale_timeout(&self) -> Option<Duration> {
        self.stale_timeout_ms.map(Duration::from_millis)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.low_pass_alpha > 0.0 && self.low_pass_alpha <= 1.0) {
            return Err(invalid("low_pass_alpha", "must be in (0, 1]"));
        }
        if !self.max_step_deg.is_finite() || self.max_step_deg <= 0.0 {
            return Err(invalid("max_step_deg", "must be a positive number"));
        }
        if self.control_period_ms == 0 {
            return Err(invalid("control_period_ms", "must be non-zero"));
        }
        if self.mount_phases.iter().any(|p| !p.is_finite()) {
            return Err(invalid("mount_phases", "must be finite"));
        }
        if !(SERVO_MIN_ANGLE_DEG..=SERVO_MAX_ANGLE_DEG).contains(&self.servo_center_deg) {
            return Err(invalid("servo_center_deg", "must be within [0, 90]"));
        }
        for (field, value) in [
            ("roll_limit", self.roll_limit),
            ("pitch_limit", self.pitch_limit),
            ("height_limit", self.height_limit),
        ] {
            if !value.is_finite() {
                return Err(invalid(field, "must be finite"));
            }
        }
        if !(self.pulse_min_us.is_finite() && self.pulse_max_us.is_finite())
            || self.pulse_min_us >= self.pulse_max_us
        {
            return Err(invalid("pulse_min_us", "must be below pulse_max_us"));
        }
        if !self.pwm_period_us.is_finite() || self.pwm_period_us <= 0.0 {
            return Err(invalid("pwm_period_us", "must be positive"));
        }
        if self.duty_max == 0 {
            return Err(invalid("duty_max", "must be non-zero"));
        }
        if self.stale_timeout_ms == Some(0) {
            return Err(invalid("stale_timeout_ms", "must be non-zero when set"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    pub port: String,
    pub baud_rate: u32,
    pub read_timeout_ms: u64,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: SERIAL_PORT.to_string(),
            baud_rate: SERIAL_BAUDRATE,
            read_timeout_ms: SERIAL_READ_TIMEOUT_MS,
        }
    }
}

impl SerialConfig {
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }
}

/// Everything the runtime needs at startup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub platform: PlatformConfig,
    pub serial: SerialConfig,
}

impl RuntimeConfig {
    /// Load a JSON config; fields missing from the file keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.platform.validate()?;
        if self.serial.baud_rate == 0 {
            return Err(invalid("baud_rate", "must be non-zero"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = RuntimeConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.platform.control_period(), Duration::from_millis(20));
        assert_eq!(config.serial.baud_rate, 115_200);
        assert_eq!(config.platform.stale_timeout(), None);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = RuntimeConfig::from_json(
            r#"{ "platform": { "max_step_deg": 2.5 }, "serial": { "port": "/dev/ttyACM1" } }"#,
        )
        .unwrap();
        assert_eq!(config.platform.max_step_deg, 2.5);
        assert_eq!(config.platform.low_pass_alpha, LOW_PASS_ALPHA);
        assert_eq!(config.serial.port, "/dev/ttyACM1");
        assert_eq!(config.serial.baud_rate, SERIAL_BAUDRATE);
    }

    #[test]
    fn test_rejects_bad_alpha() {
        for alpha in [0.0, -0.1, 1.5] {
            let platform = PlatformConfig {
                low_pass_alpha: alpha,
                ..Default::default()
            };
            match platform.validate() {
                Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, "low_pass_alpha"),
                other => panic!("alpha {} should be rejected, got {:?}", alpha, other),
            }
        }

        let platform = PlatformConfig {
            low_pass_alpha: 1.0,
            ..Default::default()
        };
        assert!(platform.validate().is_ok(), "alpha of exactly 1 is allowed");
    }

    #[test]
    fn test_rejects_inverted_pulse_range() {
        let platform = PlatformConfig {
            pulse_min_us: 2500.0,
            pulse_max_us: 500.0,
            ..Default::default()
        };
        assert!(platform.validate().is_err());
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            RuntimeConfig::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
