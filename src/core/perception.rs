// core/perception.rs

// Turns a proximity frame (and optionally a range reading) into the boolean
// conditions the mode state machine switches on: obstacle ahead, path clear,
// target detected, target in proximity, target too close, target moved out.
// Every predicate is pure; thresholds come from `ThresholdConfig`.

use serde::{Deserialize, Serialize};

use crate::config::{SENSOR_COUNT, ThresholdConfig};

/// Front-right sensor of the ring.
pub const FRONT_RIGHT: usize = 0;
/// Front-left sensor of the ring.
pub const FRONT_LEFT: usize = 7;

/// One reading per ring sensor, index 0 (front-right) round to 7 (front-left).
/// Higher values mean a closer object.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProximityFrame(pub [u16; SENSOR_COUNT]);

impl ProximityFrame {
    /// Wraps raw readings.
    pub fn new(values: [u16; SENSOR_COUNT]) -> Self {
        ProximityFrame(values)
    }

    /// Reading of one sensor. Indices outside the ring read as zero.
    pub fn get(&self, index: usize) -> u16 {
        self.0.get(index).copied().unwrap_or(0)
    }

    /// All eight readings.
    pub fn values(&self) -> &[u16; SENSOR_COUNT] {
        &self.0
    }

    fn front_pair(&self) -> (f32, f32) {
        (self.get(FRONT_RIGHT) as f32, self.get(FRONT_LEFT) as f32)
    }
}

/// Which way the robot is moving relative to the target. Selects the
/// comparator of `target_in_proximity` so the band stays centred.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApproachDirection {
    /// Closing on the target
    Toward,
    /// Backing away from it
    Away,
}

/// Snapshot of every condition for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Conditions {
    /// Front set above the obstacle threshold
    pub obstacle_ahead: bool,
    /// Front set below the release threshold
    pub path_clear: bool,
    /// Both front sensors above the range threshold
    pub target_detected: bool,
    /// Front pair inside the proximity threshold
    pub target_in_proximity: bool,
    /// Front pair above the inner threshold
    pub too_close: bool,
    /// Front pair below the outer threshold
    pub moved_out_of_proximity: bool,
}

impl Conditions {
    /// Target no longer seen by both front sensors.
    pub fn tracking_lost(&self) -> bool {
        !self.target_detected
    }
}

/// Hysteretic threshold rules over the proximity ring.
#[derive(Clone, Debug)]
pub struct ObstacleClassifier {
    thresholds: ThresholdConfig,
}

impl ObstacleClassifier {
    /// Classifier over `thresholds`.
    pub fn new(thresholds: ThresholdConfig) -> Self {
        ObstacleClassifier { thresholds }
    }

    /// Thresholds in use.
    pub fn thresholds(&self) -> &ThresholdConfig {
        &self.thresholds
    }

    /// Evaluates every predicate for the given frame.
    pub fn classify(&self, frame: &ProximityFrame, direction: ApproachDirection) -> Conditions {
        Conditions {
            obstacle_ahead: self.obstacle_ahead(frame),
            path_clear: self.path_clear(frame),
            target_detected: self.target_detected(frame),
            target_in_proximity: self.target_in_proximity(frame, direction),
            too_close: self.too_close(frame),
            moved_out_of_proximity: self.moved_out_of_proximity(frame),
        }
    }

    /// Any front-set sensor above the obstacle threshold.
    pub fn obstacle_ahead(&self, frame: &ProximityFrame) -> bool {
        self.any_front_above(frame, self.thresholds.obstacle_threshold)
    }

    /// No front-set sensor above the (lower) release threshold.
    pub fn path_clear(&self, frame: &ProximityFrame) -> bool {
        !self.any_front_above(frame, self.thresholds.release_threshold)
    }

    /// Both front sensors above the range threshold.
    pub fn target_detected(&self, frame: &ProximityFrame) -> bool {
        let thr = self.thresholds.range_threshold;
        frame.get(FRONT_RIGHT) > thr && frame.get(FRONT_LEFT) > thr
    }

    /// Toward the target either front sensor crossing upward counts; moving
    /// away both must have dropped back below the threshold.
    pub fn target_in_proximity(&self, frame: &ProximityFrame, direction: ApproachDirection) -> bool {
        let thr = self.thresholds.target_proximity_threshold as f32;
        let (right, left) = frame.front_pair();
        match direction {
            ApproachDirection::Toward => right > thr || left > thr,
            ApproachDirection::Away => right < thr && left < thr,
        }
    }

    /// Either front sensor above the inner threshold.
    pub fn too_close(&self, frame: &ProximityFrame) -> bool {
        let thr = self.thresholds.inner_threshold();
        let (right, left) = frame.front_pair();
        right > thr || left > thr
    }

    /// Both front sensors below the outer threshold.
    pub fn moved_out_of_proximity(&self, frame: &ProximityFrame) -> bool {
        let thr = self.thresholds.outer_threshold();
        let (right, left) = frame.front_pair();
        right < thr && left < thr
    }

    /// Clockwise if anything on the right half (sensors 0..3) is within range.
    pub fn search_direction_clockwise(&self, frame: &ProximityFrame) -> bool {
        (0..4).any(|i| frame.get(i) > self.thresholds.range_threshold)
    }

    fn any_front_above(&self, frame: &ProximityFrame, threshold: u16) -> bool {
        self.thresholds
            .front_set
            .iter()
            .any(|&i| frame.get(i) > threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> ObstacleClassifier {
        ObstacleClassifier::new(ThresholdConfig::default())
    }

    #[test]
    fn uniform_low_frame_is_clear() {
        let frame = ProximityFrame::new([50; 8]);
        let c = classifier();
        assert!(!c.obstacle_ahead(&frame));
        assert!(c.path_clear(&frame));
    }

    #[test]
    fn single_front_sensor_triggers_obstacle() {
        let frame = ProximityFrame::new([0, 0, 0, 0, 0, 0, 320, 0]);
        assert!(classifier().obstacle_ahead(&frame));
    }

    #[test]
    fn rear_sensor_is_outside_front_set() {
        let frame = ProximityFrame::new([0, 0, 0, 900, 0, 0, 0, 0]);
        assert!(!classifier().obstacle_ahead(&frame));
    }

    #[test]
    fn band_reading_is_neither_obstacle_nor_clear() {
        let frame = ProximityFrame::new([250, 0, 0, 0, 0, 0, 0, 0]);
        let c = classifier();
        assert!(!c.obstacle_ahead(&frame));
        assert!(!c.path_clear(&frame));
    }

    #[test]
    fn comparator_follows_motion_direction() {
        let c = classifier();
        let near = ProximityFrame::new([450, 0, 0, 0, 0, 0, 0, 350]);
        assert!(c.target_in_proximity(&near, ApproachDirection::Toward));
        assert!(!c.target_in_proximity(&near, ApproachDirection::Away));

        let backed_off = ProximityFrame::new([390, 0, 0, 0, 0, 0, 0, 350]);
        assert!(c.target_in_proximity(&backed_off, ApproachDirection::Away));
    }

    #[test]
    fn inner_and_outer_bands() {
        let c = classifier();
        assert!(c.too_close(&ProximityFrame::new([601, 0, 0, 0, 0, 0, 0, 0])));
        assert!(!c.too_close(&ProximityFrame::new([599, 0, 0, 0, 0, 0, 0, 599])));
        assert!(c.moved_out_of_proximity(&ProximityFrame::new([100, 0, 0, 0, 0, 0, 0, 279])));
        assert!(!c.moved_out_of_proximity(&ProximityFrame::new([100, 0, 0, 0, 0, 0, 0, 300])));
    }

    #[test]
    fn search_direction_uses_right_half() {
        let c = classifier();
        assert!(c.search_direction_clockwise(&ProximityFrame::new([0, 0, 80, 0, 0, 0, 0, 0])));
        assert!(!c.search_direction_clockwise(&ProximityFrame::new([0, 0, 0, 0, 80, 0, 0, 0])));
    }
}
