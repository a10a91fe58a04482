// Motion pipeline for the 3-leg platform
//
// Provides:
// - Linearized pose -> servo angle kinematics
// - Per-cycle slew limiting of servo angles

pub mod kinematics;
mod rate_limiter;

pub use kinematics::{LegDisplacements, leg_displacements, solve};
pub use rate_limiter::RateLimiter;
