// Slew-rate limiting of commanded servo angles

use crate::messages::ActuatorAngles;

/// Holds the last commanded angles and moves them towards the targets by at
/// most `max_step` degrees per call.
pub struct RateLimiter {
    max_step: f32,
    last: ActuatorAngles,
}

impl RateLimiter {
    pub fn new(max_step: f32, start: ActuatorAngles) -> Self {
        Self {
            max_step,
            last: start.clamped(),
        }
    }

    /// Advance one control cycle towards `targets`
    pub fn step(&mut self, targets: &ActuatorAngles) -> ActuatorAngles {
        let mut next = self.last.0;
        for (last, &target) in next.iter_mut().zip(targets.0.iter()) {
            *last = slew_limit(*last, target, self.max_step);
        }
        self.last = ActuatorAngles(next).clamped();
        self.last
    }

    pub fn current(&self) -> ActuatorAngles {
        self.last
    }
}

// A non-finite target or result leaves the angle where it was
fn slew_limit(prev: f32, target: f32, max_step: f32) -> f32 {
    let diff = (target - prev).clamp(-max_step, max_step);
    let next = prev + diff;
    if next.is_finite() { next } else { prev }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_change_applied_directly() {
        let mut limiter = RateLimiter::new(1.0, ActuatorAngles::splat(35.0));
        let out = limiter.step(&ActuatorAngles([35.5, 34.25, 35.0]));
        assert_eq!(out.as_array(), [35.5, 34.25, 35.0]);
    }

    #[test]
    fn test_large_change_is_bounded() {
        let mut limiter = RateLimiter::new(1.0, ActuatorAngles::splat(35.0));
        let out = limiter.step(&ActuatorAngles([80.0, 0.0, 35.0]));
        assert_eq!(out.as_array(), [36.0, 34.0, 35.0]);
    }

    #[test]
    fn test_converges_within_expected_cycles() {
        let start = 35.0f32;
        let targets = ActuatorAngles([40.5, 20.0, 35.0]);
        let max_step = 1.0f32;
        let mut limiter = RateLimiter::new(max_step, ActuatorAngles::splat(start));

        let cycles = targets
            .0
            .iter()
            .map(|t| ((t - start).abs() / max_step).ceil() as usize)
            .max()
            .unwrap();
        assert_eq!(cycles, 15);

        let mut prev = limiter.current();
        for _ in 0..cycles {
            let out = limiter.step(&targets);
            for i in 0..3 {
                let (p, o, t) = (prev.0[i], out.0[i], targets.0[i]);
                assert!((o - p).abs() <= max_step, "step exceeded on servo {}", i);
                // Monotonic towards the target, never past it
                if t >= start {
                    assert!(o >= p && o <= t);
                } else {
                    assert!(o <= p && o >= t);
                }
            }
            prev = out;
        }
        assert_eq!(limiter.current(), targets);
    }

    #[test]
    fn test_non_finite_target_holds_angle() {
        let mut limiter = RateLimiter::new(1.0, ActuatorAngles::splat(35.0));
        let out = limiter.step(&ActuatorAngles([f32::NAN, f32::INFINITY, 36.0]));
        assert_eq!(out.as_array(), [35.0, 36.0, 36.0]);

        // Still tracks normally afterwards
        let out = limiter.step(&ActuatorAngles([34.5, 36.0, 36.0]));
        assert_eq!(out.as_array(), [34.5, 36.0, 36.0]);
    }

    #[test]
    fn test_stays_in_servo_range() {
        let mut limiter = RateLimiter::new(5.0, ActuatorAngles([1.0, 89.0, 45.0]));
        let out = limiter.step(&ActuatorAngles([-100.0, 200.0, 45.0]));
        assert_eq!(out.as_array(), [0.0, 90.0, 45.0]);
    }
}
