// Actuator output for the platform legs
//
// Provides:
// - The angle-per-channel driver interface used by the control loop
// - Inverted-servo angle -> PWM duty mapping
// - A simulated PWM sink for running without hardware

mod driver;
pub mod pwm;

pub use driver::{ActuatorDriver, LEG_CHANNELS, ServoDriver};
pub use pwm::{PwmError, PwmOutput, SimulatedPwm, angle_to_duty};
