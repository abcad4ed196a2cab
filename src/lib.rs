//! proxnav - reactive navigation for small proximity-ring robots
//!
//! A finite-state controller for an 8-sensor proximity ring, a z-axis gyro and
//! an optional forward range sensor driving a differential pair of wheels.
//! The host calls [`Controller::tick`] once per fixed period; each tick samples
//! the [`Platform`], classifies the readings against hysteretic thresholds,
//! lets the active behaviour profile decide on a mode switch, and writes a
//! clamped wheel command.

#![warn(missing_docs)]
#![warn(unused_extern_crates)]

/// Behaviour profiles.
pub mod apps;
/// Configuration.
pub mod config;
/// Controller core.
pub mod core;
/// Hardware seam and observation hook.
pub mod interface;
/// Selector, PID and wheel mapping.
pub mod navigation;

use thiserror::Error;

// Re-export commonly used items for easier access
pub use crate::config::{ControllerConfig, Profile, TurnStrategy};
pub use crate::core::{Controller, ControllerMode, FaultRecord, ProximityFrame, TurnDirection};
pub use crate::interface::{LogObserver, Observation, Observer, Platform, TickReport};
pub use crate::navigation::{MotorCommand, RangePid};

/// Errors raised while configuring or restoring the controller.
/// The tick path itself never fails.
#[derive(Debug, Error)]
pub enum NavError {
    /// Configuration failed validation
    #[error("configuration error: {0}")]
    Config(String),
    /// Configuration file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Configuration file is not valid YAML for `ControllerConfig`
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// Mode code outside the enumerated set
    #[error("mode code {raw} does not name a controller mode")]
    InvalidMode {
        /// Offending code
        raw: u8,
    },
}

/// Result type used across the crate.
pub type Result<T> = std::result::Result<T, NavError>;
