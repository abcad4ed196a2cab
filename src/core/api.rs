// core/api.rs

// The host-facing surface: one owned controller context and a single `tick()`
// that runs sample -> classify -> decide -> act to completion. All state the
// sub-components need lives in this struct; nothing is process-wide.

use log::{error, info, trace};

use crate::Result;
use crate::apps::{Behaviour, StepContext, behaviour_for};
use crate::config::ControllerConfig;
use crate::core::localization::{HeadingIntegrator, HeadingState};
use crate::core::perception::{ApproachDirection, ObstacleClassifier};
use crate::core::state::{ControllerMode, FaultRecord, ModeStateMachine};
use crate::interface::{LogObserver, Observation, Observer, Platform, SensorSample, TickReport};
use crate::navigation::{
    MotorCommand, MotorCommandMapper, PidState, RangeDirectionSelector, RangePid, SelectorState,
};

/// Reactive navigation controller.
pub struct Controller {
    config: ControllerConfig,
    machine: ModeStateMachine,
    classifier: ObstacleClassifier,
    selector: RangeDirectionSelector,
    heading: HeadingIntegrator,
    pid: RangePid,
    mapper: MotorCommandMapper,
    behaviour: Box<dyn Behaviour + Send>,
    observer: Box<dyn Observer + Send>,
    last_command: MotorCommand,
    ticks: u64,
}

impl Controller {
    /// Validates the configuration and builds a controller in Scanning mode.
    pub fn new(config: ControllerConfig) -> Result<Self> {
        config.validate()?;

        let tick = config.tick_seconds();
        let controller = Controller {
            machine: ModeStateMachine::new(),
            classifier: ObstacleClassifier::new(config.thresholds.clone()),
            selector: RangeDirectionSelector::new(),
            heading: HeadingIntegrator::new(tick),
            pid: RangePid::new(&config.pid, config.speeds.pid_max_speed, tick),
            mapper: MotorCommandMapper::new(&config.speeds, config.navigation.repulsion_weights),
            behaviour: behaviour_for(&config),
            observer: Box::new(LogObserver),
            last_command: MotorCommand::STOP,
            ticks: 0,
            config,
        };
        info!(
            "Controller ready: {:?} profile, {} ms tick",
            controller.config.profile, controller.config.tick_period_ms
        );
        Ok(controller)
    }

    /// Replaces the observation hook.
    pub fn with_observer(mut self, observer: Box<dyn Observer + Send>) -> Self {
        self.observer = observer;
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Current mode.
    pub fn mode(&self) -> ControllerMode {
        self.machine.mode()
    }

    /// Heading of the current turn manoeuvre.
    pub fn heading(&self) -> &HeadingState {
        self.heading.state()
    }

    /// Running terms of the range PID.
    pub fn pid_state(&self) -> &PidState {
        self.pid.state()
    }

    /// Selector cursor.
    pub fn selector_state(&self) -> SelectorState {
        self.selector.state()
    }

    /// Wheel command issued by the most recent tick.
    pub fn last_command(&self) -> MotorCommand {
        self.last_command
    }

    /// Ticks run since construction.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// True while a fault keeps the wheels stopped.
    pub fn is_halted(&self) -> bool {
        self.machine.is_halted()
    }

    /// Latched fault, if any.
    pub fn fault(&self) -> Option<FaultRecord> {
        self.machine.fault()
    }

    /// Restores a mode from its integer code. Unknown codes are an internal
    /// logic error: the next tick reports a fault and the controller halts.
    pub fn restore_mode(&mut self, raw: u8) -> Result<()> {
        let sub_state = self.selector.state().select_count as u8;
        self.machine.restore(raw, sub_state)?;
        self.pid.reset();
        self.heading.reset();
        Ok(())
    }

    /// Returns every component to its start-up state and clears any halt.
    pub fn reset(&mut self) {
        self.machine.reset();
        self.selector.reset();
        self.heading.reset();
        self.pid.reset();
        self.behaviour = behaviour_for(&self.config);
        self.last_command = MotorCommand::STOP;
        info!("Controller reset");
    }

    /// Runs one full read -> decide -> act cycle.
    pub fn tick<P: Platform + ?Sized>(&mut self, platform: &mut P) {
        self.ticks += 1;

        if let Some(record) = self.machine.take_pending_fault() {
            error!(
                "Halting: mode {} is not a controller mode (sub-state {})",
                record.raw_mode, record.sub_state
            );
            self.observer.observe(&Observation::Fault(record));
            self.command(platform, MotorCommand::STOP);
            return;
        }
        if self.machine.is_halted() {
            self.command(platform, MotorCommand::STOP);
            return;
        }

        let sample = SensorSample::read(platform, self.config.tick_seconds());
        let mode = self.machine.mode();
        let direction = match mode {
            ControllerMode::Retreating => ApproachDirection::Away,
            _ => ApproachDirection::Toward,
        };
        let conditions = self.classifier.classify(&sample.frame, direction);
        trace!("tick {}: {} {:?}", self.ticks, mode, conditions);

        let step = {
            let mut ctx = StepContext {
                config: &self.config,
                sample: &sample,
                conditions: &conditions,
                classifier: &self.classifier,
                selector: &mut self.selector,
                heading: &mut self.heading,
                pid: &mut self.pid,
            };
            self.behaviour.step(mode, &mut ctx)
        };

        if let Some(next) = step.next {
            self.switch_mode(next);
        }

        let command = self.mapper.map(step.intent);
        self.command(platform, command);

        self.observer.observe(&Observation::Tick(TickReport {
            tick: self.ticks,
            mode: self.machine.mode(),
            command,
            heading: *self.heading.state(),
            distance_mm: sample.distance_mm,
            pid_output: step.pid_output,
        }));
    }

    fn switch_mode(&mut self, next: ControllerMode) {
        let Some(transition) = self.machine.transition(next) else {
            return;
        };
        if transition.reset_pid {
            self.pid.reset();
        }
        if transition.reset_heading {
            self.heading.reset();
        }
        if transition.entered_scanning {
            if self.config.navigation.reset_selector_on_entry {
                self.selector.reset();
            }
            self.behaviour.on_enter_scanning();
        }
        self.observer.observe(&Observation::Transition {
            from: transition.from,
            to: transition.to,
        });
    }

    fn command<P: Platform + ?Sized>(&mut self, platform: &mut P, command: MotorCommand) {
        platform.set_wheel_speeds(command.left_speed, command.right_speed);
        self.last_command = command;
    }
}
