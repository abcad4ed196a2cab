// src/apps/explore.rs
// Explore the arena: drive forward while the path is clear, turn away when an
// obstacle appears ahead, then drive on.

use std::f32::consts::FRAC_PI_2;

use super::{Behaviour, Step, StepContext, unowned_mode};
use crate::config::{Profile, TurnStrategy};
use crate::core::localization::TurnDirection;
use crate::core::state::{ControllerMode, TurnGoal};
use crate::navigation::MotionIntent;

/// Explore profile state.
#[derive(Clone, Debug)]
pub struct Explore {
    strategy: TurnStrategy,
    /// Direction of the turn in progress
    turning: TurnDirection,
    /// Quarter-turn sweep counter: 0,1 clockwise, 2,3 counter-clockwise
    turn_counter: u8,
    /// Next until-clear turn direction, flipped after every turn
    clear_direction: TurnDirection,
}

impl Explore {
    /// Explore profile using `strategy` for every turn.
    pub fn new(strategy: TurnStrategy) -> Self {
        Explore {
            strategy,
            turning: TurnDirection::Clockwise,
            turn_counter: 0,
            clear_direction: TurnDirection::Clockwise,
        }
    }

    /// Picks goal, target angle and direction for a new turn.
    fn plan_turn(&mut self, ctx: &mut StepContext<'_>) -> (TurnGoal, f32, TurnDirection) {
        match self.strategy {
            TurnStrategy::TargetHeading => {
                let sensor = ctx.selector.select(&ctx.sample.frame);
                let target = ctx.config.navigation.heading_map.angle(sensor);
                (TurnGoal::Heading, target, TurnDirection::from_angle(target))
            }
            TurnStrategy::QuarterTurn => {
                let direction = if self.turn_counter < 2 {
                    TurnDirection::Clockwise
                } else {
                    TurnDirection::CounterClockwise
                };
                (
                    TurnGoal::QuarterTurn,
                    FRAC_PI_2 * direction.sign() as f32,
                    direction,
                )
            }
            TurnStrategy::UntilClear => (TurnGoal::ClearPath, 0.0, self.clear_direction),
        }
    }

    fn finish_turn(&mut self, goal: TurnGoal) {
        match goal {
            TurnGoal::QuarterTurn => self.turn_counter = (self.turn_counter + 1) % 4,
            TurnGoal::ClearPath => self.clear_direction = self.clear_direction.reversed(),
            TurnGoal::Heading => {}
        }
    }
}

impl Behaviour for Explore {
    fn profile(&self) -> Profile {
        Profile::Explore
    }

    fn step(&mut self, mode: ControllerMode, ctx: &mut StepContext<'_>) -> Step {
        let forward = MotionIntent::Translate(ctx.config.speeds.move_speed as f32);

        match mode {
            ControllerMode::Scanning => {
                if !ctx.conditions.obstacle_ahead {
                    return Step::stay(forward);
                }
                let (goal, target, direction) = self.plan_turn(ctx);
                ctx.heading.begin(target, direction);
                self.turning = direction;
                Step::switch(
                    MotionIntent::Turn(direction),
                    ControllerMode::Turning { goal },
                )
            }
            ControllerMode::Turning { goal } => {
                ctx.heading
                    .integrate(ctx.sample.angular_rate_z, ctx.sample.dt_seconds);
                let complete = match goal {
                    TurnGoal::Heading => ctx.heading.target_reached(),
                    TurnGoal::QuarterTurn => ctx.heading.quarter_turn_reached(),
                    TurnGoal::ClearPath => ctx.conditions.path_clear,
                };
                if complete {
                    self.finish_turn(goal);
                    Step::switch(forward, ControllerMode::Scanning)
                } else {
                    Step::stay(MotionIntent::Turn(self.turning))
                }
            }
            other => unowned_mode(Profile::Explore, other),
        }
    }
}
