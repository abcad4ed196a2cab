// src/config.rs
// Controller configuration: thresholds, gains, speeds and behaviour selection.
// Every tunable the controller reads lives here and is passed in at construction.

use std::f32::consts::PI;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::localization::HeadingMap;
use crate::navigation::pid::TimeUnit;
use crate::{NavError, Result};

/// Number of sensors on the proximity ring.
pub const SENSOR_COUNT: usize = 8;

/// Behaviour profile run by the mode state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Profile {
    /// Drive forward, turn away from obstacles.
    Explore,
    /// Potential-field obstacle avoidance without discrete turns.
    Wander,
    /// Find a target, approach it and hold a standoff distance.
    Chase,
}

/// How the explore profile decides when a turn is finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnStrategy {
    /// Turn to the heading of the selected sensor.
    TargetHeading,
    /// Fixed 90 degree turns, direction alternating in pairs.
    QuarterTurn,
    /// Turn until the path ahead is clear, flipping direction every turn.
    UntilClear,
}

/// Top-level controller configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Behaviour profile
    pub profile: Profile,
    /// Host tick period in milliseconds
    pub tick_period_ms: u64,
    /// Classifier thresholds
    pub thresholds: ThresholdConfig,
    /// Range PID gains
    pub pid: PidConfig,
    /// Wheel speed limits
    pub speeds: SpeedConfig,
    /// Turn and selection behaviour
    pub navigation: NavigationConfig,
}

/// Proximity and range thresholds used by the obstacle classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    /// Front-set reading above which an obstacle is ahead
    pub obstacle_threshold: u16,
    /// Front-set reading below which the path counts as clear again
    pub release_threshold: u16,
    /// Sensor indices checked for obstacles
    pub front_set: Vec<usize>,
    /// Reading both front sensors must exceed for a target to be detected
    pub range_threshold: u16,
    /// Reading at which the target counts as reached
    pub target_proximity_threshold: u16,
    /// Multiple of the target threshold that counts as too close (> 1)
    pub inner_ratio: f32,
    /// Multiple of the target threshold the target must fall below to count as gone (< 1)
    pub outer_ratio: f32,
    /// Distance substituted when the range sensor reports nothing (mm)
    pub no_object_distance_mm: i32,
}

/// Gains and set point for the range PID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PidConfig {
    /// Proportional gain
    pub kp: f32,
    /// Integral gain
    pub ki: f32,
    /// Derivative gain
    pub kd: f32,
    /// Standoff distance to hold (mm)
    pub target_distance_mm: f32,
    /// Unit `dt` is expressed in when fed to the loop
    pub time_unit: TimeUnit,
}

/// Wheel speeds, all in motor steps per second.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedConfig {
    /// Hardware saturation limit
    pub speed_limit: i16,
    /// Wheel speed while spinning in place
    pub turn_speed: i16,
    /// Forward (and back-off) speed
    pub move_speed: i16,
    /// Clamp applied to the PID output
    pub pid_max_speed: f32,
    /// Forward speed of the wander profile when nothing is near
    pub wander_speed: i16,
}

/// Turning and direction selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// How explore turns end
    pub turn_strategy: TurnStrategy,
    /// Sensor index to heading offset
    pub heading_map: HeadingMap,
    /// Restart the jump sequence every time scanning is re-entered
    pub reset_selector_on_entry: bool,
    /// Counter-rotation applied after the chase profile detects its target (radians)
    pub align_angle: f32,
    /// Repulsion weights, closest sensor first
    pub repulsion_weights: [f32; 3],
}

impl Default for ControllerConfig {
    fn default() -> Self {
        ControllerConfig {
            profile: Profile::Explore,
            tick_period_ms: 50,
            thresholds: ThresholdConfig::default(),
            pid: PidConfig::default(),
            speeds: SpeedConfig::default(),
            navigation: NavigationConfig::default(),
        }
    }
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        ThresholdConfig {
            obstacle_threshold: 300,
            release_threshold: 210,
            front_set: vec![0, 1, 6, 7],
            range_threshold: 70,
            target_proximity_threshold: 400,
            inner_ratio: 1.5,
            outer_ratio: 0.7,
            no_object_distance_mm: 2000,
        }
    }
}

impl Default for PidConfig {
    fn default() -> Self {
        PidConfig {
            kp: 1.5,
            ki: 2.0,
            kd: 1.5,
            target_distance_mm: 20.0,
            time_unit: TimeUnit::Seconds,
        }
    }
}

impl Default for SpeedConfig {
    fn default() -> Self {
        SpeedConfig {
            speed_limit: 1100,
            turn_speed: 400,
            move_speed: 600,
            pid_max_speed: 1000.0,
            wander_speed: 880,
        }
    }
}

impl Default for NavigationConfig {
    fn default() -> Self {
        NavigationConfig {
            turn_strategy: TurnStrategy::TargetHeading,
            heading_map: HeadingMap::Octant,
            reset_selector_on_entry: false,
            align_angle: 0.0,
            repulsion_weights: [8.0, 4.0, 2.0],
        }
    }
}

impl ThresholdConfig {
    /// Reading above which a standing-by robot backs away.
    pub fn inner_threshold(&self) -> f32 {
        self.target_proximity_threshold as f32 * self.inner_ratio
    }

    /// Reading both front sensors must drop below for the target to count as gone.
    pub fn outer_threshold(&self) -> f32 {
        self.target_proximity_threshold as f32 * self.outer_ratio
    }
}

impl ControllerConfig {
    /// Parses a YAML document, filling missing fields with defaults, and validates it.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: ControllerConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a YAML configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let config: ControllerConfig = serde_yaml::from_reader(file)?;
        config.validate()?;
        log::info!("Loaded {:?} profile configuration", config.profile);
        Ok(config)
    }

    /// Tick period in seconds.
    pub fn tick_seconds(&self) -> f32 {
        self.tick_period_ms as f32 / 1000.0
    }

    /// Checks cross-field constraints serde cannot express.
    pub fn validate(&self) -> Result<()> {
        let t = &self.thresholds;
        if t.release_threshold >= t.obstacle_threshold {
            return Err(NavError::Config(format!(
                "release threshold {} must be below obstacle threshold {}",
                t.release_threshold, t.obstacle_threshold
            )));
        }
        if t.front_set.is_empty() {
            return Err(NavError::Config("front sensor set is empty".to_string()));
        }
        if let Some(&index) = t.front_set.iter().find(|&&i| i >= SENSOR_COUNT) {
            return Err(NavError::Config(format!("front sensor index {index} out of range")));
        }
        if t.inner_ratio <= 1.0 {
            return Err(NavError::Config(format!(
                "inner ratio {} must be greater than 1",
                t.inner_ratio
            )));
        }
        if t.outer_ratio <= 0.0 || t.outer_ratio >= 1.0 {
            return Err(NavError::Config(format!(
                "outer ratio {} must lie in (0, 1)",
                t.outer_ratio
            )));
        }
        if self.tick_period_ms == 0 {
            return Err(NavError::Config("tick period must be non-zero".to_string()));
        }

        let s = &self.speeds;
        if s.speed_limit <= 0 {
            return Err(NavError::Config("speed limit must be positive".to_string()));
        }
        for (name, speed) in [
            ("turn", s.turn_speed),
            ("move", s.move_speed),
            ("wander", s.wander_speed),
        ] {
            if speed < 0 || speed > s.speed_limit {
                return Err(NavError::Config(format!(
                    "{name} speed {speed} outside 0..={}",
                    s.speed_limit
                )));
            }
        }
        if s.pid_max_speed.is_nan() || s.pid_max_speed <= 0.0 {
            return Err(NavError::Config("PID max speed must be positive".to_string()));
        }
        if self.navigation.align_angle.abs() > PI {
            return Err(NavError::Config(format!(
                "align angle {} exceeds half a turn",
                self.navigation.align_angle
            )));
        }

        Ok(())
    }
}
