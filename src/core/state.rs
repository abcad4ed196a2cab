// core/state.rs

// Owns the controller's discrete mode. Behaviour profiles decide *when* to
// switch; this module applies the switch, works out which entry/exit resets
// it implies, and latches the fail-safe halt when a restored mode code does
// not name any mode.

use std::fmt;

use log::{error, info};
use serde::{Deserialize, Serialize};

use crate::NavError;

/// How a turn manoeuvre decides it is finished.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum TurnGoal {
    /// Heading integrator reaches its target angle.
    Heading,
    /// Heading integrator covers a quarter turn.
    QuarterTurn,
    /// Front set drops below the release threshold.
    ClearPath,
}

/// Controller mode. Mode-local data travels with the variant.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum ControllerMode {
    /// Looking for an obstacle or target
    Scanning,
    /// Turning in place until `goal` is met
    Turning {
        /// Completion rule of the turn
        goal: TurnGoal,
    },
    /// Closing on a target under range PID
    Approaching,
    /// Holding position near the target
    Standby,
    /// Backing away from a target that came too close
    Retreating,
}

impl ControllerMode {
    /// Integer code used by hosts that persist or display the mode.
    pub fn code(&self) -> u8 {
        match self {
            ControllerMode::Scanning => 0,
            ControllerMode::Approaching => 1,
            ControllerMode::Standby => 2,
            ControllerMode::Retreating => 3,
            ControllerMode::Turning { .. } => 4,
        }
    }

    /// Lower-case mode name.
    pub fn name(&self) -> &'static str {
        match self {
            ControllerMode::Scanning => "scanning",
            ControllerMode::Turning { .. } => "turning",
            ControllerMode::Approaching => "approaching",
            ControllerMode::Standby => "standby",
            ControllerMode::Retreating => "retreating",
        }
    }

    /// Same variant, ignoring mode-local data.
    pub fn same_kind(&self, other: &ControllerMode) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    fn owns_range_loop(&self) -> bool {
        matches!(self, ControllerMode::Approaching | ControllerMode::Retreating)
    }
}

impl Default for ControllerMode {
    fn default() -> Self {
        ControllerMode::Scanning
    }
}

impl fmt::Display for ControllerMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl TryFrom<u8> for ControllerMode {
    type Error = NavError;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(ControllerMode::Scanning),
            1 => Ok(ControllerMode::Approaching),
            2 => Ok(ControllerMode::Standby),
            3 => Ok(ControllerMode::Retreating),
            4 => Ok(ControllerMode::Turning {
                goal: TurnGoal::Heading,
            }),
            _ => Err(NavError::InvalidMode { raw }),
        }
    }
}

/// Internal logic fault: a mode code outside the enumerated set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaultRecord {
    /// Offending mode code
    pub raw_mode: u8,
    /// Selector cursor when the fault latched
    pub sub_state: u8,
}

/// Result of applying a mode switch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transition {
    /// Mode left
    pub from: ControllerMode,
    /// Mode entered
    pub to: ControllerMode,
    /// Range PID must be zeroed
    pub reset_pid: bool,
    /// Heading state must be zeroed
    pub reset_heading: bool,
    /// Scanning was entered
    pub entered_scanning: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum FaultLatch {
    Clear,
    Pending(FaultRecord),
    Halted(FaultRecord),
}

/// Mode holder with the fail-safe latch.
#[derive(Clone, Debug)]
pub struct ModeStateMachine {
    mode: ControllerMode,
    latch: FaultLatch,
}

impl ModeStateMachine {
    /// Starts in Scanning.
    pub fn new() -> Self {
        ModeStateMachine {
            mode: ControllerMode::Scanning,
            latch: FaultLatch::Clear,
        }
    }

    /// Current mode.
    pub fn mode(&self) -> ControllerMode {
        self.mode
    }

    /// Switches to `next`. Returns `None` when `next` is the current variant
    /// (mode-local data is still updated).
    pub fn transition(&mut self, next: ControllerMode) -> Option<Transition> {
        let from = self.mode;
        self.mode = next;
        if from.same_kind(&next) {
            return None;
        }

        let entered_scanning = matches!(next, ControllerMode::Scanning);
        let transition = Transition {
            from,
            to: next,
            reset_pid: entered_scanning || from.owns_range_loop(),
            reset_heading: entered_scanning
                || from.owns_range_loop()
                || matches!(from, ControllerMode::Turning { .. }),
            entered_scanning,
        };
        info!("Transitioned {} -> {}", from, next);
        Some(transition)
    }

    /// Restores a mode from its integer code. An unknown code latches a
    /// fault that the next tick reports and halts on.
    pub fn restore(&mut self, raw: u8, sub_state: u8) -> crate::Result<()> {
        match ControllerMode::try_from(raw) {
            Ok(mode) => {
                self.mode = mode;
                Ok(())
            }
            Err(err) => {
                error!("State not identified. Mode: {}, sub-state: {}", raw, sub_state);
                self.latch = FaultLatch::Pending(FaultRecord {
                    raw_mode: raw,
                    sub_state,
                });
                Err(err)
            }
        }
    }

    /// Hands out a pending fault exactly once and enters the halt.
    pub fn take_pending_fault(&mut self) -> Option<FaultRecord> {
        match self.latch {
            FaultLatch::Pending(record) => {
                self.latch = FaultLatch::Halted(record);
                Some(record)
            }
            _ => None,
        }
    }

    /// True from the moment a fault latches until `reset`.
    pub fn is_halted(&self) -> bool {
        !matches!(self.latch, FaultLatch::Clear)
    }

    /// Latched fault, if any.
    pub fn fault(&self) -> Option<FaultRecord> {
        match self.latch {
            FaultLatch::Clear => None,
            FaultLatch::Pending(record) | FaultLatch::Halted(record) => Some(record),
        }
    }

    /// Clears any fault and returns to Scanning.
    pub fn reset(&mut self) {
        self.mode = ControllerMode::Scanning;
        self.latch = FaultLatch::Clear;
        info!("Mode state machine reset");
    }
}

impl Default for ModeStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

// Current Functionality:
// - Five modes as a sum type with integer codes for hosts.
// - Entry/exit resets: PID on entering Scanning or leaving Approaching/Retreating,
//   heading on entering Scanning or leaving Turning/Approaching/Retreating.
// - Unknown restored codes latch a fault reported once, then halt until reset.

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_through_try_from() {
        for raw in 0..5u8 {
            assert_eq!(ControllerMode::try_from(raw).unwrap().code(), raw);
        }
        assert!(matches!(
            ControllerMode::try_from(99),
            Err(NavError::InvalidMode { raw: 99 })
        ));
    }

    #[test]
    fn leaving_range_loop_modes_resets_pid_and_heading() {
        let mut machine = ModeStateMachine::new();
        machine.transition(ControllerMode::Approaching);
        let t = machine.transition(ControllerMode::Standby).unwrap();
        assert!(t.reset_pid && t.reset_heading);
        assert!(!t.entered_scanning);

        machine.transition(ControllerMode::Retreating);
        let t = machine.transition(ControllerMode::Standby).unwrap();
        assert!(t.reset_pid && t.reset_heading);
    }

    #[test]
    fn leaving_turning_resets_heading_only() {
        let mut machine = ModeStateMachine::new();
        let t = machine
            .transition(ControllerMode::Turning { goal: TurnGoal::Heading })
            .unwrap();
        assert!(!t.reset_pid && !t.reset_heading);

        let t = machine.transition(ControllerMode::Approaching).unwrap();
        assert!(!t.reset_pid);
        assert!(t.reset_heading);
    }

    #[test]
    fn entering_scanning_resets_both() {
        let mut machine = ModeStateMachine::new();
        machine.transition(ControllerMode::Standby);
        let t = machine.transition(ControllerMode::Scanning).unwrap();
        assert!(t.reset_pid && t.reset_heading && t.entered_scanning);
    }

    #[test]
    fn same_variant_is_not_a_transition() {
        let mut machine = ModeStateMachine::new();
        machine.transition(ControllerMode::Turning { goal: TurnGoal::Heading });
        assert!(
            machine
                .transition(ControllerMode::Turning { goal: TurnGoal::ClearPath })
                .is_none()
        );
        assert_eq!(
            machine.mode(),
            ControllerMode::Turning { goal: TurnGoal::ClearPath }
        );
    }

    #[test]
    fn fault_is_reported_once_then_halts() {
        let mut machine = ModeStateMachine::new();
        assert!(machine.restore(99, 3).is_err());
        assert!(machine.is_halted());
        assert_eq!(
            machine.take_pending_fault(),
            Some(FaultRecord { raw_mode: 99, sub_state: 3 })
        );
        assert_eq!(machine.take_pending_fault(), None);
        assert!(machine.is_halted());

        machine.reset();
        assert!(!machine.is_halted());
        assert_eq!(machine.mode(), ControllerMode::Scanning);
    }
}
