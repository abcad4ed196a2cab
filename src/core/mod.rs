// core/mod.rs

// Declares the controller core: perception (obstacle classification),
// localization (heading integration), state (mode machine) and the api that
// ties them into one tick.

/// Controller context and tick.
pub mod api;
/// Heading integration.
pub mod localization;
/// Obstacle and target classification.
pub mod perception;
/// Modes and the fault latch.
pub mod state;

pub use api::Controller;
pub use localization::{HeadingIntegrator, HeadingMap, HeadingState, TurnDirection};
pub use perception::{ApproachDirection, Conditions, ObstacleClassifier, ProximityFrame};
pub use state::{ControllerMode, FaultRecord, ModeStateMachine, Transition, TurnGoal};
