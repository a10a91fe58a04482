// Value types passed between the input path and the control path

use serde::{Deserialize, Serialize};

use crate::config::{SERVO_CENTER_ANGLE_DEG, SERVO_MAX_ANGLE_DEG, SERVO_MIN_ANGLE_DEG};

// Parsed from one serial frame, consumed immediately by the input filter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoseCommand {
    pub roll: f32,
    pub pitch: f32,
    pub height: f32,
}

impl PoseCommand {
    pub fn new(roll: f32, pitch: f32, height: f32) -> Self {
        Self {
            roll,
            pitch,
            height,
        }
    }
}

/// Smoothed pose shared with the control loop.
/// Default is the neutral pose.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FilteredPose {
    pub roll: f32,
    pub pitch: f32,
    pub height: f32,
}

impl FilteredPose {
    pub fn new(roll: f32, pitch: f32, height: f32) -> Self {
        Self {
            roll,
            pitch,
            height,
        }
    }

    pub fn neutral() -> Self {
        Self::default()
    }
}

/// Commanded servo angles in degrees, one per actuator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActuatorAngles(pub [f32; 3]);

impl ActuatorAngles {
    pub fn splat(angle: f32) -> Self {
        Self([angle; 3])
    }

    pub fn as_array(&self) -> [f32; 3] {
        self.0
    }

    /// Clamp every angle into the servo's usable range
    pub fn clamped(self) -> Self {
        Self(self.0.map(clamp_servo_angle))
    }
}

/// Clamp into the servo range; NaN maps to the servo center
pub fn clamp_servo_angle(angle: f32) -> f32 {
    if angle.is_nan() {
        return SERVO_CENTER_ANGLE_DEG;
    }
    angle.clamp(SERVO_MIN_ANGLE_DEG, SERVO_MAX_ANGLE_DEG)
}

/// Health status reported by the control loop
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum RuntimeHealth {
    Ok,
    CmdStale,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamped_angles() {
        let angles = ActuatorAngles([-12.0, 45.0, 130.0]).clamped();
        assert_eq!(angles.as_array(), [0.0, 45.0, 90.0]);
    }

    #[test]
    fn test_clamp_non_finite() {
        assert_eq!(clamp_servo_angle(f32::NAN), SERVO_CENTER_ANGLE_DEG);
        assert_eq!(clamp_servo_angle(f32::INFINITY), 90.0);
        assert_eq!(clamp_servo_angle(f32::NEG_INFINITY), 0.0);
    }

    #[test]
    fn test_health_serializes_snake_case() {
        let json = serde_json::to_string(&RuntimeHealth::CmdStale).unwrap();
        assert_eq!(json, "\"cmd_stale\"");
    }
}
