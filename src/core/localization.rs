// core/localization.rs

// Tracks how far the robot has actually turned by integrating z-axis angular
// rate samples over elapsed time, and maps a selected ring sensor to the
// heading offset a turn manoeuvre should reach.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, FRAC_PI_8, PI};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::SENSOR_COUNT;

/// Rotation sense of a turn. Clockwise is positive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnDirection {
    /// Positive heading offsets
    Clockwise,
    /// Negative heading offsets
    CounterClockwise,
}

impl TurnDirection {
    /// Direction that turns toward a signed heading offset. Zero maps to clockwise.
    pub fn from_angle(angle: f32) -> Self {
        if angle < 0.0 {
            TurnDirection::CounterClockwise
        } else {
            TurnDirection::Clockwise
        }
    }

    /// `+1` clockwise, `-1` counter-clockwise.
    pub fn sign(self) -> i16 {
        match self {
            TurnDirection::Clockwise => 1,
            TurnDirection::CounterClockwise => -1,
        }
    }

    /// The opposite sense.
    pub fn reversed(self) -> Self {
        match self {
            TurnDirection::Clockwise => TurnDirection::CounterClockwise,
            TurnDirection::CounterClockwise => TurnDirection::Clockwise,
        }
    }
}

/// Stepped mapping from sensor index to target heading offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadingMap {
    /// `i * pi/4 - pi/8`, eight evenly spaced octants.
    Octant,
    /// Fixed table `{pi/8, pi/4, pi/2, 5pi/4, -pi/8, -pi/4, -pi/2, -5pi/4}`.
    Stepped,
}

const STEPPED_TABLE: [f32; SENSOR_COUNT] = [
    FRAC_PI_8,
    FRAC_PI_4,
    FRAC_PI_2,
    5.0 * PI / 4.0,
    -FRAC_PI_8,
    -FRAC_PI_4,
    -FRAC_PI_2,
    -5.0 * PI / 4.0,
];

impl HeadingMap {
    /// Heading offset in radians for a ring sensor index (taken modulo 8).
    pub fn angle(self, sensor: usize) -> f32 {
        let sensor = sensor % SENSOR_COUNT;
        match self {
            HeadingMap::Octant => sensor as f32 * FRAC_PI_4 - FRAC_PI_8,
            HeadingMap::Stepped => STEPPED_TABLE[sensor],
        }
    }
}

/// Accumulated heading for the current turn manoeuvre.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HeadingState {
    /// Angle turned since the manoeuvre started (radians)
    pub current_angle: f32,
    /// Angle the manoeuvre should reach (radians)
    pub target_angle: f32,
    /// Sign of the turn, +1 clockwise, -1 counter-clockwise, 0 when idle
    pub turn_direction: i16,
}

/// Integrates angular rate into `HeadingState`.
#[derive(Clone, Debug)]
pub struct HeadingIntegrator {
    state: HeadingState,
    min_dt: f32,
}

impl HeadingIntegrator {
    /// `min_dt` is the shortest interval a sample may cover, normally one tick.
    pub fn new(min_dt: f32) -> Self {
        HeadingIntegrator {
            state: HeadingState::default(),
            min_dt,
        }
    }

    /// Heading of the current manoeuvre.
    pub fn state(&self) -> &HeadingState {
        &self.state
    }

    /// Starts a manoeuvre toward `target_angle`, turning in `direction`.
    pub fn begin(&mut self, target_angle: f32, direction: TurnDirection) {
        self.state = HeadingState {
            current_angle: 0.0,
            target_angle,
            turn_direction: direction.sign(),
        };
        debug!("Turn started: target={:.3} rad, direction={:?}", target_angle, direction);
    }

    /// Adds one angular-rate sample covering `dt_seconds`.
    pub fn integrate(&mut self, angular_rate_z: f32, dt_seconds: f32) -> f32 {
        let dt = if dt_seconds.is_finite() {
            dt_seconds.max(self.min_dt)
        } else {
            self.min_dt
        };
        let sign = self.state.turn_direction as f32;
        self.state.current_angle += sign * angular_rate_z * dt;
        self.state.current_angle
    }

    /// True once the turned angle has reached the target angle.
    pub fn target_reached(&self) -> bool {
        self.state.current_angle.abs() >= self.state.target_angle.abs()
    }

    /// True once a fixed quarter turn has been covered.
    pub fn quarter_turn_reached(&self) -> bool {
        self.state.current_angle.abs() >= FRAC_PI_2
    }

    /// Ends the manoeuvre.
    pub fn reset(&mut self) {
        self.state = HeadingState::default();
    }
}
