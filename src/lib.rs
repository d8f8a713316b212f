#![no_std]

//! Gyro Space - gyro aiming transforms for handheld motion controllers
//!
//! This library turns raw angular rates from a controller's gyroscope into
//! per-frame camera deltas, compensating for how the controller is held
//! relative to gravity. It provides a gravity estimator that fuses
//! accelerometer and gyroscope samples, and three aim spaces with a dynamic
//! selector on top.
//!
//! # Features
//!
//! - Local space: controller-relative, with yaw-to-roll coupling compensation
//! - Player space: gravity-aligned yaw/roll blending with yaw relaxation
//! - World space: projection onto gravity and gravity-orthogonal axes
//! - Dynamic orientation: automatic Player/World selection from tilt
//! - Complementary-filter gravity estimation
//! - Faulty samples never interrupt the frame loop: they are substituted and
//!   reported as [`Diagnostic`]s
//! - `#![no_std]` compatible, no allocation
//!
//! Enable the `log` feature to emit a `log::debug!` record for every
//! substituted input, and `serde` to serialize the settings types.
//!
//! # Quick Start
//!
//! ```rust
//! use nalgebra::Vector3;
//! use gyro_space::{GravityTracker, GyroRates, GyroSpace, Sensitivity};
//!
//! let mut tracker = GravityTracker::new();
//! let mut engine = GyroSpace::new();
//!
//! // Once per input frame
//! let accelerometer = Vector3::new(0.0, 1.0, 0.05); // g
//! let gyroscope = Vector3::new(-3.0, 12.0, 1.5);    // deg/s about the body axes (x, y, z)
//! tracker.update_with_rate(accelerometer, gyroscope, 0.008, 0.05);
//!
//! let rates = GyroRates::from_body_axes(gyroscope);
//! let aim = engine.world(rates, tracker.gravity(), Sensitivity::uniform(1.5));
//! let (camera_yaw, camera_pitch) = (aim.delta.x, aim.delta.y);
//! # let _ = (camera_yaw, camera_pitch);
//! ```

/// Diagnostic output for substituted inputs, compiled out unless the `log`
/// feature is enabled.
macro_rules! debug_log {
    ($($arg:tt)*) => {{
        #[cfg(feature = "log")]
        log::debug!($($arg)*);
        #[cfg(not(feature = "log"))]
        let _ = format_args!($($arg)*);
    }};
}

mod dynamic;
pub mod error;
pub mod gravity;
pub mod math;
mod space;
pub mod tilt;
mod types;

// Re-export all public types and functions
pub use dynamic::DYNAMIC_PLAYER_THRESHOLD;
pub use error::{Diagnostic, DiagnosticCounts};
pub use gravity::{GravityTracker, default_gravity};
pub use math::{DEG_TO_RAD, EPSILON, RAD_TO_DEG, Vector3Ext};
pub use space::{GyroSpace, LOCAL_DAMPING};
pub use tilt::{TILT_EXPONENT, TILT_SMOOTHING, TiltSmoother, tilt_target};
pub use types::*;
