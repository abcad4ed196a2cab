// src/navigation/pid.rs
// Single-axis PID regulating the forward range toward a standoff distance.
// The output is a linear wheel speed clamped to the configured maximum.
//
// There is no integral anti-windup: a long-standing error grows the integral
// without bound and only the output clamp limits the command.

use serde::{Deserialize, Serialize};

use crate::config::PidConfig;

/// Unit `dt` is expressed in when it enters the integral and derivative terms.
/// Gains are tuned against one unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeUnit {
    /// Gains tuned per second
    Seconds,
    /// Gains tuned per millisecond
    Milliseconds,
}

impl TimeUnit {
    /// Converts seconds into this unit.
    pub fn from_seconds(self, seconds: f32) -> f32 {
        match self {
            TimeUnit::Seconds => seconds,
            TimeUnit::Milliseconds => seconds * 1000.0,
        }
    }
}

/// Running terms of the loop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PidState {
    /// Accumulated error times dt
    pub integral: f32,
    /// Error of the previous update
    pub last_error: f32,
}

/// Range PID with immutable gains.
#[derive(Clone, Debug)]
pub struct RangePid {
    kp: f32,
    ki: f32,
    kd: f32,
    max_output: f32,
    time_unit: TimeUnit,
    nominal_dt: f32,
    state: PidState,
    primed: bool,
}

impl RangePid {
    /// `nominal_dt` (seconds) replaces unusable elapsed times.
    pub fn new(config: &PidConfig, max_output: f32, nominal_dt: f32) -> Self {
        RangePid {
            kp: config.kp,
            ki: config.ki,
            kd: config.kd,
            max_output: max_output.abs(),
            time_unit: config.time_unit,
            nominal_dt,
            state: PidState::default(),
            primed: false,
        }
    }

    /// Running terms.
    pub fn state(&self) -> &PidState {
        &self.state
    }

    /// One control step. Positive output drives forward, i.e. the robot
    /// speeds up as the measured distance grows past the target.
    pub fn update(&mut self, target_distance: f32, measured_distance: f32, dt_seconds: f32) -> f32 {
        // first sample after a reset has no meaningful elapsed time
        let dt_seconds = if !self.primed || !dt_seconds.is_finite() || dt_seconds <= 0.0 {
            self.nominal_dt
        } else {
            dt_seconds
        };
        let dt = self.time_unit.from_seconds(dt_seconds);

        let error = -(target_distance - measured_distance);
        self.state.integral += error * dt;
        let derivative = (error - self.state.last_error) / dt;

        let output = self.kp * error + self.ki * self.state.integral + self.kd * derivative;
        self.state.last_error = error;
        self.primed = true;

        output.clamp(-self.max_output, self.max_output)
    }

    /// Clears history; the next update uses the nominal dt.
    pub fn reset(&mut self) {
        self.state = PidState::default();
        self.primed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn pid(kp: f32, ki: f32, kd: f32) -> RangePid {
        let config = PidConfig {
            kp,
            ki,
            kd,
            ..PidConfig::default()
        };
        RangePid::new(&config, 1000.0, 0.05)
    }

    #[test]
    fn proportional_sign_convention() {
        let mut p = pid(2.0, 0.0, 0.0);
        assert_relative_eq!(p.update(20.0, 70.0, 0.05), 100.0);
        assert_relative_eq!(p.update(20.0, 10.0, 0.05), -20.0);
    }

    #[test]
    fn zero_dt_uses_nominal_tick() {
        let mut p = pid(0.0, 1.0, 0.0);
        p.update(0.0, 10.0, 0.05);
        p.update(0.0, 10.0, 0.0);
        assert_relative_eq!(p.state().integral, 1.0);
    }

    #[test]
    fn milliseconds_scale_the_integral() {
        let config = PidConfig {
            kp: 0.0,
            ki: 1.0,
            kd: 0.0,
            time_unit: TimeUnit::Milliseconds,
            ..PidConfig::default()
        };
        let mut p = RangePid::new(&config, 1.0e6, 0.05);
        p.update(0.0, 2.0, 0.05);
        assert_relative_eq!(p.state().integral, 100.0);
    }

    #[test]
    fn reset_zeroes_state() {
        let mut p = pid(1.0, 1.0, 1.0);
        p.update(20.0, 500.0, 0.05);
        p.reset();
        assert_eq!(*p.state(), PidState::default());
    }
}
