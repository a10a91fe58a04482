// Exponential smoothing of incoming poses.
//
// Updated once per accepted frame, not on a clock: the effective time
// constant follows the sender's frame rate.

use crate::messages::{FilteredPose, PoseCommand};

pub struct InputFilter {
    alpha: f32,
    state: FilteredPose,
}

impl InputFilter {
    /// `alpha` must be in (0, 1]; the config validates it.
    pub fn new(alpha: f32) -> Self {
        Self::with_state(alpha, FilteredPose::neutral())
    }

    pub fn with_state(alpha: f32, state: FilteredPose) -> Self {
        Self { alpha, state }
    }

    /// Move every axis towards the raw sample by `alpha` of the gap
    pub fn update(&mut self, raw: &PoseCommand) -> FilteredPose {
        self.state = FilteredPose {
            roll: low_pass(self.alpha, self.state.roll, raw.roll),
            pitch: low_pass(self.alpha, self.state.pitch, raw.pitch),
            height: low_pass(self.alpha, self.state.height, raw.height),
        };
        self.state
    }

    pub fn state(&self) -> FilteredPose {
        self.state
    }
}

fn low_pass(alpha: f32, prev: f32, input: f32) -> f32 {
    prev + alpha * (input - prev)
}
