// Platform inverse kinematics for the 3-leg rig
// Maps a normalized pose (roll, pitch, height) to per-servo target angles.
//
// This is a linearized single-plane model: each leg's contribution is the
// pose projected onto its mount phase, halved, and offset from the servo
// center. It does not model leg-vector geometry.

use std::f64::consts::PI;

use crate::config::{PlatformConfig, SERVO_MAX_ANGLE_DEG, SERVO_MIN_ANGLE_DEG};
use crate::messages::{ActuatorAngles, FilteredPose};

/// Leg contributions before the center offset
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LegDisplacements(pub [f32; 3]);

impl LegDisplacements {
    pub fn sum(&self) -> f32 {
        self.0.iter().sum()
    }
}

/// Compute the raw leg displacements for a pose
///
/// # Arguments
/// * `pose` - normalized pose, nominally each axis in [-1, 1]
/// * `config` - axis scales and mount phases
pub fn leg_displacements(pose: &FilteredPose, config: &PlatformConfig) -> LegDisplacements {
    LegDisplacements(scaled_legs(pose, config).map(|leg| leg as f32))
}

/// Target servo angles for a pose, clamped to the servo range
pub fn solve(pose: &FilteredPose, config: &PlatformConfig) -> ActuatorAngles {
    let center = config.servo_center_deg as f64;
    let min = SERVO_MIN_ANGLE_DEG as f64;
    let max = SERVO_MAX_ANGLE_DEG as f64;

    // Clamp before narrowing: scaled f32 extremes overflow f32 but not f64
    ActuatorAngles(scaled_legs(pose, config).map(|leg| (center + leg).clamp(min, max) as f32))
}

// Finite f32 inputs times finite f32 scales stay finite in f64
fn scaled_legs(pose: &FilteredPose, config: &PlatformConfig) -> [f64; 3] {
    let roll = pose.roll as f64 * config.roll_limit as f64;
    let pitch = pose.pitch as f64 * config.pitch_limit as f64;
    let height = pose.height as f64 * config.height_limit as f64;

    config.mount_phases.map(|phase_deg| {
        let phase = phase_deg as f64 * (PI / 180.0);
        let leg = height + roll * phase.cos() + pitch * phase.sin();
        leg * 0.5
    })
}
