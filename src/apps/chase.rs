// src/apps/chase.rs
// Chase a target: spin until both front sensors see it, align, approach under
// range PID, hold position in standby and back off when it comes too close.
//
// Scanning     -> Turning      target detected
// Turning      -> Approaching  alignment turn complete
// Approaching  -> Standby      target in proximity
// Approaching  -> Scanning     tracking lost
// Standby      -> Scanning     target moved out of proximity
// Standby      -> Retreating   target too close
// Retreating   -> Standby      back within safe proximity

use super::{Behaviour, Step, StepContext};
use crate::config::Profile;
use crate::core::localization::TurnDirection;
use crate::core::state::{ControllerMode, TurnGoal};
use crate::navigation::MotionIntent;

/// Chase profile state.
#[derive(Clone, Debug, Default)]
pub struct Chase {
    /// Spin direction for the current scan, chosen on the first scanning tick
    search: Option<TurnDirection>,
    /// Direction of the alignment turn in progress
    aligning: Option<TurnDirection>,
}

impl Chase {
    /// Chase profile with no search direction chosen yet.
    pub fn new() -> Self {
        Self::default()
    }

    fn scan(&mut self, ctx: &mut StepContext<'_>) -> Step {
        let classifier = ctx.classifier;
        let frame = ctx.sample.frame;
        let search = *self.search.get_or_insert_with(|| {
            if classifier.search_direction_clockwise(&frame) {
                TurnDirection::Clockwise
            } else {
                TurnDirection::CounterClockwise
            }
        });

        if !ctx.conditions.target_detected {
            return Step::stay(MotionIntent::Turn(search));
        }

        // counter-rotate against the search spin to cancel the overshoot
        let align = search.reversed();
        let angle = ctx.config.navigation.align_angle.abs();
        ctx.heading.begin(angle * align.sign() as f32, align);
        self.aligning = Some(align);

        let intent = if angle > 0.0 {
            MotionIntent::Turn(align)
        } else {
            MotionIntent::Stop
        };
        Step::switch(
            intent,
            ControllerMode::Turning {
                goal: TurnGoal::Heading,
            },
        )
    }

    fn align(&mut self, ctx: &mut StepContext<'_>) -> Step {
        ctx.heading
            .integrate(ctx.sample.angular_rate_z, ctx.sample.dt_seconds);
        if ctx.heading.target_reached() {
            self.aligning = None;
            return Step::switch(MotionIntent::Stop, ControllerMode::Approaching);
        }
        match self.aligning {
            Some(direction) => Step::stay(MotionIntent::Turn(direction)),
            None => Step::stay(MotionIntent::Stop),
        }
    }

    fn approach(&mut self, ctx: &mut StepContext<'_>) -> Step {
        if ctx.conditions.target_in_proximity {
            return Step::switch(MotionIntent::Stop, ControllerMode::Standby);
        }
        if ctx.conditions.tracking_lost() {
            return Step::switch(MotionIntent::Stop, ControllerMode::Scanning);
        }

        let measured = ctx
            .sample
            .distance_or(ctx.config.thresholds.no_object_distance_mm);
        let speed = ctx.pid.update(
            ctx.config.pid.target_distance_mm,
            measured,
            ctx.sample.dt_seconds,
        );
        Step {
            intent: MotionIntent::Translate(speed),
            next: None,
            pid_output: Some(speed),
        }
    }

    fn standby(&mut self, ctx: &mut StepContext<'_>) -> Step {
        if ctx.conditions.moved_out_of_proximity {
            Step::switch(MotionIntent::Stop, ControllerMode::Scanning)
        } else if ctx.conditions.too_close {
            Step::switch(self.back_off(ctx), ControllerMode::Retreating)
        } else {
            Step::stay(MotionIntent::Stop)
        }
    }

    fn retreat(&mut self, ctx: &mut StepContext<'_>) -> Step {
        if ctx.conditions.target_in_proximity {
            Step::switch(MotionIntent::Stop, ControllerMode::Standby)
        } else {
            Step::stay(self.back_off(ctx))
        }
    }

    fn back_off(&self, ctx: &StepContext<'_>) -> MotionIntent {
        MotionIntent::Translate(-(ctx.config.speeds.move_speed as f32))
    }
}

impl Behaviour for Chase {
    fn profile(&self) -> Profile {
        Profile::Chase
    }

    fn step(&mut self, mode: ControllerMode, ctx: &mut StepContext<'_>) -> Step {
        match mode {
            ControllerMode::Scanning => self.scan(ctx),
            ControllerMode::Turning { .. } => self.align(ctx),
            ControllerMode::Approaching => self.approach(ctx),
            ControllerMode::Standby => self.standby(ctx),
            ControllerMode::Retreating => self.retreat(ctx),
        }
    }

    fn on_enter_scanning(&mut self) {
        self.search = None;
        self.aligning = None;
    }
}
