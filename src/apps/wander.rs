// src/apps/wander.rs
// Potential-field wandering: no discrete turns, the wheels are slowed by
// weighted front readings whenever something is near.

use super::{Behaviour, Step, StepContext, unowned_mode};
use crate::config::Profile;
use crate::core::state::ControllerMode;
use crate::navigation::MotionIntent;

/// Wander profile. Stateless; it only ever runs in Scanning.
#[derive(Clone, Copy, Debug, Default)]
pub struct Wander;

impl Behaviour for Wander {
    fn profile(&self) -> Profile {
        Profile::Wander
    }

    fn step(&mut self, mode: ControllerMode, ctx: &mut StepContext<'_>) -> Step {
        match mode {
            ControllerMode::Scanning if ctx.conditions.obstacle_ahead => {
                Step::stay(MotionIntent::Repel(ctx.sample.frame))
            }
            ControllerMode::Scanning => Step::stay(MotionIntent::Translate(
                ctx.config.speeds.wander_speed as f32,
            )),
            other => unowned_mode(Profile::Wander, other),
        }
    }
}
