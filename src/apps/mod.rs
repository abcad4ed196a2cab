//! Behaviour profiles.
//!
//! Each profile decides, for the current mode and this tick's conditions, what
//! the wheels should do and whether to switch mode. The profiles share the
//! same primitives (classifier, selector, heading integrator, range PID); the
//! [`Controller`](crate::Controller) applies the switch and its resets.

/// Find, approach and hold a target.
pub mod chase;
/// Forward drive with discrete turns away from obstacles.
pub mod explore;
/// Potential-field wandering.
pub mod wander;

pub use chase::Chase;
pub use explore::Explore;
pub use wander::Wander;

use crate::config::{ControllerConfig, Profile};
use crate::core::localization::HeadingIntegrator;
use crate::core::perception::{Conditions, ObstacleClassifier};
use crate::core::state::ControllerMode;
use crate::interface::SensorSample;
use crate::navigation::{MotionIntent, RangeDirectionSelector, RangePid};

/// Everything a profile may read or drive during one tick.
pub struct StepContext<'a> {
    /// Active configuration
    pub config: &'a ControllerConfig,
    /// This tick's sanitised inputs
    pub sample: &'a SensorSample,
    /// Classifier verdicts for this tick
    pub conditions: &'a Conditions,
    /// Threshold rules, for predicates not in `conditions`
    pub classifier: &'a ObstacleClassifier,
    /// Direction selector
    pub selector: &'a mut RangeDirectionSelector,
    /// Heading integrator for turn manoeuvres
    pub heading: &'a mut HeadingIntegrator,
    /// Range PID
    pub pid: &'a mut RangePid,
}

/// Outcome of one profile step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Step {
    /// What the wheels should do
    pub intent: MotionIntent,
    /// Mode to switch to, if any
    pub next: Option<ControllerMode>,
    /// Range PID output when the loop ran
    pub pid_output: Option<f32>,
}

impl Step {
    /// Keeps the current mode.
    pub fn stay(intent: MotionIntent) -> Self {
        Step {
            intent,
            next: None,
            pid_output: None,
        }
    }

    /// Requests a switch to `next`.
    pub fn switch(intent: MotionIntent, next: ControllerMode) -> Self {
        Step {
            intent,
            next: Some(next),
            pid_output: None,
        }
    }
}

/// A behaviour profile driving the mode state machine.
pub trait Behaviour {
    /// Profile this behaviour implements.
    fn profile(&self) -> Profile;

    /// Decides this tick's intent and any mode switch.
    fn step(&mut self, mode: ControllerMode, ctx: &mut StepContext<'_>) -> Step;

    /// Called after every transition into Scanning.
    fn on_enter_scanning(&mut self) {}
}

/// Builds the profile named in the configuration.
pub fn behaviour_for(config: &ControllerConfig) -> Box<dyn Behaviour + Send> {
    match config.profile {
        Profile::Explore => Box::new(Explore::new(config.navigation.turn_strategy)),
        Profile::Wander => Box::new(Wander),
        Profile::Chase => Box::new(Chase::new()),
    }
}

/// Modes a profile never enters on its own (only reachable through a restored
/// mode code) fall back to Scanning.
pub(crate) fn unowned_mode(profile: Profile, mode: ControllerMode) -> Step {
    log::warn!("{:?} profile does not drive {} mode, rescanning", profile, mode);
    Step::switch(MotionIntent::Stop, ControllerMode::Scanning)
}
