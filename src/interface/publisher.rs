// src/interface/publisher.rs
// Observation hook: the controller reports mode, key scalars, transitions and
// faults here. Formatting and transport are left to the consumer.

use log::{debug, error, info};

use crate::core::localization::HeadingState;
use crate::core::state::{ControllerMode, FaultRecord};
use crate::navigation::MotorCommand;

/// Scalars describing one completed tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickReport {
    /// Tick number, starting at 1
    pub tick: u64,
    /// Mode after the tick
    pub mode: ControllerMode,
    /// Command written to the wheels
    pub command: MotorCommand,
    /// Heading manoeuvre state
    pub heading: HeadingState,
    /// Forward range, if valid
    pub distance_mm: Option<i32>,
    /// Set on ticks where the range PID ran
    pub pid_output: Option<f32>,
}

/// Something worth reporting.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Observation {
    /// One completed tick
    Tick(TickReport),
    /// Mode switch
    Transition {
        /// Mode left
        from: ControllerMode,
        /// Mode entered
        to: ControllerMode,
    },
    /// Fault reported on the tick it halted
    Fault(FaultRecord),
}

/// Consumer of observations.
pub trait Observer {
    /// Receives one observation.
    fn observe(&mut self, observation: &Observation);
}

/// Forwards observations to the `log` facade. Installed by default.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogObserver;

impl Observer for LogObserver {
    fn observe(&mut self, observation: &Observation) {
        match observation {
            Observation::Tick(report) => debug!(
                "tick={} mode={} left={} right={} angle={:.3}/{:.3} distance={:?} pid={:?}",
                report.tick,
                report.mode,
                report.command.left_speed,
                report.command.right_speed,
                report.heading.current_angle,
                report.heading.target_angle,
                report.distance_mm,
                report.pid_output,
            ),
            Observation::Transition { from, to } => info!("Mode {} -> {}", from, to),
            Observation::Fault(record) => error!(
                "ERROR: State not identified. Mode: {}, sub-state: {}",
                record.raw_mode, record.sub_state
            ),
        }
    }
}

impl<F> Observer for F
where
    F: FnMut(&Observation),
{
    fn observe(&mut self, observation: &Observation) {
        self(observation)
    }
}
