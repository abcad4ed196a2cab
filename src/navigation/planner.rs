// src/navigation/planner.rs
// Picks the next direction of interest from the proximity ring using a
// fixed-stride jump over the intensity ranking.

use serde::{Deserialize, Serialize};

use crate::config::SENSOR_COUNT;
use crate::core::perception::ProximityFrame;

/// Stride of the jump sequence over the sorted ranking. Coprime with the ring
/// size, so repeated selections cycle through all eight ranks.
pub const JUMP_STRIDE: usize = 3;

/// Cursor into the ranking, persisted across selections.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorState {
    /// Rank returned by the last selection
    pub select_count: usize,
}

/// A ring sensor and its reading.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RankedSensor {
    /// Reading
    pub value: u16,
    /// Ring index
    pub sensor_no: usize,
}

/// Direction selector over the ranked proximity ring.
#[derive(Clone, Debug, Default)]
pub struct RangeDirectionSelector {
    state: SelectorState,
}

impl RangeDirectionSelector {
    /// Selector at rank 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cursor.
    pub fn state(&self) -> SelectorState {
        self.state
    }

    /// Sensors sorted by descending reading. Ties keep ring order.
    pub fn ranking(frame: &ProximityFrame) -> [RankedSensor; SENSOR_COUNT] {
        let mut ranked = [RankedSensor {
            value: 0,
            sensor_no: 0,
        }; SENSOR_COUNT];
        for (sensor_no, &value) in frame.values().iter().enumerate() {
            ranked[sensor_no] = RankedSensor { value, sensor_no };
        }
        // slice::sort_by is stable
        ranked.sort_by(|a, b| b.value.cmp(&a.value));
        ranked
    }

    /// Advances the cursor by the stride and returns the sensor at that rank.
    pub fn select(&mut self, frame: &ProximityFrame) -> usize {
        let ranked = Self::ranking(frame);
        self.state.select_count = (self.state.select_count + JUMP_STRIDE) % SENSOR_COUNT;
        let chosen = ranked[self.state.select_count].sensor_no;
        log::debug!(
            "Selected sensor {} at rank {}",
            chosen,
            self.state.select_count
        );
        chosen
    }

    /// Returns the cursor to rank 0.
    pub fn reset(&mut self) {
        self.state = SelectorState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranking_is_descending_and_stable() {
        let frame = ProximityFrame::new([10, 90, 10, 50, 90, 0, 10, 5]);
        let order: Vec<usize> = RangeDirectionSelector::ranking(&frame)
            .iter()
            .map(|r| r.sensor_no)
            .collect();
        assert_eq!(order, vec![1, 4, 3, 0, 2, 6, 7, 5]);
    }

    #[test]
    fn first_selection_lands_on_rank_three() {
        let frame = ProximityFrame::new([80, 70, 60, 50, 40, 30, 20, 10]);
        let mut selector = RangeDirectionSelector::new();
        assert_eq!(selector.select(&frame), 3);
        assert_eq!(selector.state().select_count, 3);
    }

    #[test]
    fn reset_restarts_the_sequence() {
        let frame = ProximityFrame::new([80, 70, 60, 50, 40, 30, 20, 10]);
        let mut selector = RangeDirectionSelector::new();
        selector.select(&frame);
        selector.select(&frame);
        selector.reset();
        assert_eq!(selector.select(&frame), 3);
    }
}
