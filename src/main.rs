// src/main.rs
// Demo host: runs the controller against a small kinematic simulation of a
// proximity-ring robot in a square arena, one tick per configured period.
//
// Usage: proxnav [config.yaml] [ticks]

use std::error::Error;
use std::f32::consts::{FRAC_PI_2, PI};
use std::time::Duration;

use log::info;
use proxnav::{Controller, ControllerConfig, Platform};

/// Ring sensor bearings, radians clockwise from straight ahead.
const SENSOR_BEARINGS: [f32; 8] = [0.30, 0.80, FRAC_PI_2, 2.62, -2.62, -FRAC_PI_2, -0.80, -0.30];
/// Millimetres travelled per motor step.
const MM_PER_STEP: f32 = 0.13;
/// Distance between the wheels (mm).
const WHEEL_BASE_MM: f32 = 53.0;
/// Robot radius (mm).
const BODY_RADIUS_MM: f32 = 37.0;

/// Robot in a square arena with walls at 0 and `size` on both axes.
struct SimRobot {
    size: f32,
    x: f32,
    y: f32,
    /// Heading, radians counter-clockwise from +x
    theta: f32,
    left: i16,
    right: i16,
    tick_seconds: f32,
}

impl SimRobot {
    fn new(size: f32, tick_seconds: f32) -> Self {
        SimRobot {
            size,
            x: size / 2.0,
            y: size / 3.0,
            theta: 0.4,
            left: 0,
            right: 0,
            tick_seconds,
        }
    }

    /// Range from the body edge to the nearest wall along a bearing.
    fn ray(&self, bearing_cw: f32) -> f32 {
        let angle = self.theta - bearing_cw;
        let (dx, dy) = (angle.cos(), angle.sin());
        let mut best = f32::INFINITY;
        for (d, origin) in [(dx, self.x), (dy, self.y)] {
            if d > 1e-6 {
                best = best.min((self.size - origin) / d);
            } else if d < -1e-6 {
                best = best.min(-origin / d);
            }
        }
        (best - BODY_RADIUS_MM).max(0.0)
    }

    /// Clockwise yaw rate in rad/s from the current wheel speeds.
    fn yaw_rate_cw(&self) -> f32 {
        (self.left as f32 - self.right as f32) * MM_PER_STEP / WHEEL_BASE_MM
    }

    fn advance(&mut self) {
        let dt = self.tick_seconds;
        let v = (self.left as f32 + self.right as f32) / 2.0 * MM_PER_STEP;
        self.theta = (self.theta - self.yaw_rate_cw() * dt).rem_euclid(2.0 * PI);
        let margin = BODY_RADIUS_MM;
        self.x = (self.x + v * self.theta.cos() * dt).clamp(margin, self.size - margin);
        self.y = (self.y + v * self.theta.sin() * dt).clamp(margin, self.size - margin);
    }
}

impl Platform for SimRobot {
    fn read_proximity(&mut self, sensor_index: usize) -> u16 {
        let range = self.ray(SENSOR_BEARINGS[sensor_index % 8]);
        (3500.0 / (1.0 + (range / 15.0).powi(2))) as u16
    }

    fn read_distance_mm(&mut self) -> Option<i32> {
        let range = self.ray(0.0);
        (range < 2000.0).then_some(range as i32)
    }

    fn read_angular_rate_z(&mut self) -> f32 {
        // gyro z is counter-clockwise positive
        -self.yaw_rate_cw()
    }

    fn elapsed_seconds_since_last_call(&mut self) -> f32 {
        self.tick_seconds
    }

    fn set_wheel_speeds(&mut self, left: i16, right: i16) {
        self.left = left;
        self.right = right;
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    // Initialize logging for debugging
    env_logger::init();
    info!("Starting proxnav demo...");

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => ControllerConfig::load(&path)?,
        None => ControllerConfig::default(),
    };
    let ticks: u64 = match args.next() {
        Some(n) => n.parse()?,
        None => 200,
    };

    let period = Duration::from_millis(config.tick_period_ms);
    let mut robot = SimRobot::new(600.0, config.tick_seconds());
    let mut controller = Controller::new(config)?;

    for _ in 0..ticks {
        controller.tick(&mut robot);
        robot.advance();
        std::thread::sleep(period);
    }

    info!(
        "Demo completed after {} ticks in {} mode at ({:.0}, {:.0}) mm",
        controller.ticks(),
        controller.mode(),
        robot.x,
        robot.y
    );
    Ok(())
}
