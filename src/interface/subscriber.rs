// src/interface/subscriber.rs
// Samples every input the controller needs for one tick and replaces
// unusable values with safe defaults instead of failing the tick.

use log::{debug, warn};

use super::Platform;
use crate::config::SENSOR_COUNT;
use crate::core::perception::ProximityFrame;

/// Inputs for one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SensorSample {
    /// Ring readings
    pub frame: ProximityFrame,
    /// Forward range (mm); `None` when absent or invalid
    pub distance_mm: Option<i32>,
    /// Z-axis angular rate (rad/s)
    pub angular_rate_z: f32,
    /// Elapsed time since the previous tick (s), never negative
    pub dt_seconds: f32,
}

impl SensorSample {
    /// Reads the ring, range sensor, gyro and timer once each.
    /// `tick_seconds` replaces a negative or non-finite elapsed time.
    pub fn read<P: Platform + ?Sized>(platform: &mut P, tick_seconds: f32) -> Self {
        let mut values = [0u16; SENSOR_COUNT];
        for (index, value) in values.iter_mut().enumerate() {
            *value = platform.read_proximity(index);
        }

        let distance_mm = match platform.read_distance_mm() {
            Some(mm) if mm >= 0 => Some(mm),
            Some(mm) => {
                debug!("Discarding invalid range reading {} mm", mm);
                None
            }
            None => None,
        };

        let angular_rate_z = match platform.read_angular_rate_z() {
            rate if rate.is_finite() => rate,
            rate => {
                warn!("Discarding non-finite angular rate {}", rate);
                0.0
            }
        };

        let elapsed = platform.elapsed_seconds_since_last_call();
        let dt_seconds = if elapsed.is_finite() && elapsed >= 0.0 {
            elapsed
        } else {
            warn!("Elapsed time {} unusable, substituting one tick", elapsed);
            tick_seconds
        };

        SensorSample {
            frame: ProximityFrame::new(values),
            distance_mm,
            angular_rate_z,
            dt_seconds,
        }
    }

    /// Range to regulate on, with `no_object_mm` standing in for a missing reading.
    pub fn distance_or(&self, no_object_mm: i32) -> f32 {
        self.distance_mm.unwrap_or(no_object_mm) as f32
    }
}
