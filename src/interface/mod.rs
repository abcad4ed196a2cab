//! Boundary between the controller and the robot it runs on.
//!
//! The host supplies a [`Platform`] implementation wrapping its sensor drivers,
//! gyro, timer and motor outputs. The controller samples it once per tick
//! through [`SensorSample`] and reports what it did through an [`Observer`].

/// Observation hook.
pub mod publisher;
/// Per-tick input sampling.
pub mod subscriber;

pub use publisher::{LogObserver, Observation, Observer, TickReport};
pub use subscriber::SensorSample;

/// Hardware capabilities the controller consumes.
///
/// Implementations do no validation of their own; the controller sanitises
/// every input and clamps every output.
pub trait Platform {
    /// Intensity of ring sensor `sensor_index` (0..=7). Higher is closer.
    fn read_proximity(&mut self, sensor_index: usize) -> u16;

    /// Forward range in millimetres, `None` when the sensor has no return.
    fn read_distance_mm(&mut self) -> Option<i32>;

    /// Z-axis angular rate in radians per second.
    fn read_angular_rate_z(&mut self) -> f32;

    /// Seconds since the previous call. Restarts the timer.
    fn elapsed_seconds_since_last_call(&mut self) -> f32;

    /// Applies an already clamped wheel command.
    fn set_wheel_speeds(&mut self, left: i16, right: i16);
}

impl<P: Platform + ?Sized> Platform for &mut P {
    fn read_proximity(&mut self, sensor_index: usize) -> u16 {
        (**self).read_proximity(sensor_index)
    }

    fn read_distance_mm(&mut self) -> Option<i32> {
        (**self).read_distance_mm()
    }

    fn read_angular_rate_z(&mut self) -> f32 {
        (**self).read_angular_rate_z()
    }

    fn elapsed_seconds_since_last_call(&mut self) -> f32 {
        (**self).elapsed_seconds_since_last_call()
    }

    fn set_wheel_speeds(&mut self, left: i16, right: i16) {
        (**self).set_wheel_speeds(left, right)
    }
}
