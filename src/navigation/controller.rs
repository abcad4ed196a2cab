// src/navigation/controller.rs
// Converts a motion intent into a clamped left/right wheel speed pair.
// Saturation at the hardware limit is policy, not an error.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::config::SpeedConfig;
use crate::core::localization::TurnDirection;
use crate::core::perception::ProximityFrame;

/// Differential wheel command, both sides in `[-limit, limit]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotorCommand {
    /// Left wheel speed
    pub left_speed: i16,
    /// Right wheel speed
    pub right_speed: i16,
}

impl MotorCommand {
    /// Both wheels stopped.
    pub const STOP: MotorCommand = MotorCommand {
        left_speed: 0,
        right_speed: 0,
    };

    /// Command from a speed pair.
    pub fn new(left_speed: i16, right_speed: i16) -> Self {
        MotorCommand {
            left_speed,
            right_speed,
        }
    }
}

/// What the active mode wants the wheels to do this tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MotionIntent {
    /// Both wheels stopped.
    Stop,
    /// Spin in place at the configured turn speed.
    Turn(TurnDirection),
    /// Straight line at a signed speed.
    Translate(f32),
    /// Continuous mix: `left = linear + turn_rate`, `right = linear - turn_rate`.
    Drive { turn_rate: f32, linear_speed: f32 },
    /// Potential-field repulsion from the front sensors.
    Repel(ProximityFrame),
}

/// Maps intents to wheel speeds.
#[derive(Clone, Debug)]
pub struct MotorCommandMapper {
    speed_limit: i16,
    turn_speed: i16,
    repulsion_weights: Vector3<f32>,
}

impl MotorCommandMapper {
    /// Mapper clamping to `speeds.speed_limit`.
    pub fn new(speeds: &SpeedConfig, repulsion_weights: [f32; 3]) -> Self {
        MotorCommandMapper {
            speed_limit: speeds.speed_limit.saturating_abs(),
            turn_speed: speeds.turn_speed,
            repulsion_weights: Vector3::from(repulsion_weights),
        }
    }

    /// Wheel command for an intent.
    pub fn map(&self, intent: MotionIntent) -> MotorCommand {
        let (left, right) = match intent {
            MotionIntent::Stop => (0.0, 0.0),
            MotionIntent::Turn(direction) => {
                let speed = (direction.sign() * self.turn_speed) as f32;
                (speed, -speed)
            }
            MotionIntent::Translate(speed) => (speed, speed),
            MotionIntent::Drive {
                turn_rate,
                linear_speed,
            } => (linear_speed + turn_rate, linear_speed - turn_rate),
            MotionIntent::Repel(frame) => self.repulsion(&frame),
        };
        MotorCommand::new(self.clamp(left), self.clamp(right))
    }

    /// Baseline of half the limit per side, minus weighted readings of the
    /// three sensors on that side, closest to the heading first. An obstacle
    /// on the right slows the left wheel, steering away from it.
    fn repulsion(&self, frame: &ProximityFrame) -> (f32, f32) {
        let baseline = self.speed_limit as f32 / 2.0;
        let side = |a: usize, b: usize, c: usize| {
            Vector3::new(frame.get(a) as f32, frame.get(b) as f32, frame.get(c) as f32)
        };
        let right_side = side(0, 1, 2);
        let left_side = side(7, 6, 5);
        (
            baseline - self.repulsion_weights.dot(&right_side),
            baseline - self.repulsion_weights.dot(&left_side),
        )
    }

    fn clamp(&self, speed: f32) -> i16 {
        if speed.is_nan() {
            return 0;
        }
        let limit = self.speed_limit as f32;
        speed.clamp(-limit, limit).round() as i16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapper() -> MotorCommandMapper {
        MotorCommandMapper::new(&SpeedConfig::default(), [8.0, 4.0, 2.0])
    }

    #[test]
    fn turn_spins_in_place() {
        let m = mapper();
        assert_eq!(
            m.map(MotionIntent::Turn(TurnDirection::Clockwise)),
            MotorCommand::new(400, -400)
        );
        assert_eq!(
            m.map(MotionIntent::Turn(TurnDirection::CounterClockwise)),
            MotorCommand::new(-400, 400)
        );
    }

    #[test]
    fn drive_mixes_turn_rate() {
        let cmd = mapper().map(MotionIntent::Drive {
            turn_rate: 100.0,
            linear_speed: 300.0,
        });
        assert_eq!(cmd, MotorCommand::new(400, 200));
    }

    #[test]
    fn repulsion_slows_the_side_away_from_the_obstacle() {
        let frame = ProximityFrame::new([20, 10, 5, 0, 0, 0, 0, 0]);
        let cmd = mapper().map(MotionIntent::Repel(frame));
        // 550 - (160 + 40 + 10)
        assert_eq!(cmd, MotorCommand::new(340, 550));
    }

    #[test]
    fn nan_speed_maps_to_zero() {
        assert_eq!(
            mapper().map(MotionIntent::Translate(f32::NAN)),
            MotorCommand::STOP
        );
    }
}
