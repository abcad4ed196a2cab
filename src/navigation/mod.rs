//! Navigation primitives for the reactive controller
//!
//! Direction selection over the proximity ring, the range PID that regulates
//! forward speed, and the mapping from motion intent to wheel speeds.

/// Wheel command mapping.
pub mod controller;
/// Range PID.
pub mod pid;
/// Direction selector.
pub mod planner;

pub use controller::{MotionIntent, MotorCommand, MotorCommandMapper};
pub use pid::{PidState, RangePid, TimeUnit};
pub use planner::{JUMP_STRIDE, RangeDirectionSelector, RankedSensor, SelectorState};
