//! Gravity direction estimation from accelerometer and gyroscope samples
//!
//! [`GravityTracker`] holds a single normalized gravity vector in controller
//! coordinates. It starts level, `(0, 1, 0)`, and is moved either by a leaky
//! complementary filter ([`GravityTracker::update`]) or by hand
//! ([`GravityTracker::set`], [`GravityTracker::reset`]).
//!
//! # Example
//! ```
//! use nalgebra::Vector3;
//! use gyro_space::GravityTracker;
//!
//! let mut tracker = GravityTracker::new();
//!
//! // Controller tipped onto its side: the accelerometer pulls the estimate over
//! for _ in 0..200 {
//!     tracker.update(Vector3::new(1.0, 0.0, 0.0), Vector3::zeros(), 0.05);
//! }
//! assert!(tracker.gravity().x > 0.99);
//! ```

use nalgebra::Vector3;

use crate::error::{Diagnostic, DiagnosticCounts};
use crate::math::{Vector3Ext, lerp};

/// Gravity with the controller held level
pub fn default_gravity() -> Vector3<f32> {
    Vector3::new(0.0, 1.0, 0.0)
}

/// Caller-owned gravity estimate.
///
/// Each controller (or split-screen player) gets its own tracker. Rejected
/// inputs never disturb the estimate; they are returned as a [`Diagnostic`]
/// and counted in [`GravityTracker::diagnostics`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravityTracker {
    /// Current normalized gravity direction
    gravity: Vector3<f32>,
    diagnostics: DiagnosticCounts,
}

impl GravityTracker {
    /// Create a tracker at the default gravity `(0, 1, 0)`
    pub fn new() -> Self {
        Self {
            gravity: default_gravity(),
            diagnostics: DiagnosticCounts::default(),
        }
    }

    /// Fuse one accelerometer sample and one gyroscope rotation into the estimate.
    ///
    /// The previous estimate is rotated to first order by `gyro_rotation`
    /// (radians for this frame), then pulled towards the normalized
    /// accelerometer reading by `fusion_factor`. Typical factors are 0.02 to 0.10.
    ///
    /// Both vectors are in controller body axes: `x` lateral (pitch), `y`
    /// vertical (yaw) and `z` longitudinal (roll). [`GyroRates::body_axes`]
    /// produces the gyroscope vector in this order.
    ///
    /// # Arguments
    /// * `accelerometer` - Accelerometer reading, any scale
    /// * `gyro_rotation` - Rotation since the last update in radians
    /// * `fusion_factor` - Accelerometer weight in `[0, 1]`
    ///
    /// # Returns
    /// `None` when the sample was fused. A NaN or infinite component or an
    /// out-of-range factor leaves the estimate untouched; a degenerate blend
    /// resets it to the default.
    ///
    /// [`GyroRates::body_axes`]: crate::GyroRates::body_axes
    pub fn update(
        &mut self,
        accelerometer: Vector3<f32>,
        gyro_rotation: Vector3<f32>,
        fusion_factor: f32,
    ) -> Option<Diagnostic> {
        if fusion_factor.is_nan()
            || accelerometer.has_non_finite()
            || gyro_rotation.has_non_finite()
        {
            debug_log!("gravity update rejected: non-finite input");
            return self.report(Diagnostic::NanInput);
        }
        if !(0.0..=1.0).contains(&fusion_factor) {
            debug_log!("gravity update rejected: fusion factor {} outside [0, 1]", fusion_factor);
            return self.report(Diagnostic::InvalidRange);
        }

        let accelerometer = accelerometer.safe_normalize();
        let rotated = self.gravity + gyro_rotation.cross(&self.gravity);
        let blended = lerp(&rotated, &accelerometer, fusion_factor).safe_normalize();

        if blended.has_non_finite() || blended.is_near_zero() {
            debug_log!("gravity update degenerate, resetting to default");
            self.gravity = default_gravity();
            return self.report(Diagnostic::DegenerateVector);
        }

        self.gravity = blended;
        None
    }

    /// Same as [`update`](Self::update) but takes the gyroscope as a rate.
    ///
    /// # Arguments
    /// * `accelerometer` - Accelerometer reading, any scale
    /// * `gyroscope` - Angular rate in degrees per second about the body axes
    ///   `(x, y, z)`, that is `(pitch, yaw, roll)`
    /// * `delta_time` - Time since the last update in seconds
    /// * `fusion_factor` - Accelerometer weight in `[0, 1]`
    pub fn update_with_rate(
        &mut self,
        accelerometer: Vector3<f32>,
        gyroscope: Vector3<f32>,
        delta_time: f32,
        fusion_factor: f32,
    ) -> Option<Diagnostic> {
        if delta_time.is_nan() {
            debug_log!("gravity update rejected: NaN delta time");
            return self.report(Diagnostic::NanInput);
        }
        if delta_time < 0.0 {
            debug_log!("gravity update rejected: negative delta time {}", delta_time);
            return self.report(Diagnostic::InvalidRange);
        }
        self.update(accelerometer, gyroscope.deg_to_rad() * delta_time, fusion_factor)
    }

    /// Replace the estimate with the normalized `(x, y, z)`.
    ///
    /// A NaN or infinite component resets the estimate to the default. A
    /// vector shorter than [`EPSILON`](crate::EPSILON) keeps the previous
    /// estimate.
    pub fn set(&mut self, x: f32, y: f32, z: f32) -> Option<Diagnostic> {
        let gravity = Vector3::new(x, y, z);
        if gravity.has_non_finite() {
            debug_log!("gravity set with non-finite vector, resetting to default");
            self.gravity = default_gravity();
            return self.report(Diagnostic::NanInput);
        }

        let normalized = gravity.safe_normalize();
        if normalized.is_near_zero() {
            debug_log!("gravity set with near-zero vector, keeping previous value");
            return self.report(Diagnostic::DegenerateVector);
        }

        self.gravity = normalized;
        None
    }

    /// Restore the default gravity `(0, 1, 0)`
    pub fn reset(&mut self) {
        self.gravity = default_gravity();
    }

    /// Current normalized gravity direction
    pub fn gravity(&self) -> Vector3<f32> {
        self.gravity
    }

    /// Counts of rejected inputs since creation or the last clear
    pub fn diagnostics(&self) -> DiagnosticCounts {
        self.diagnostics
    }

    pub fn clear_diagnostics(&mut self) {
        self.diagnostics = DiagnosticCounts::default();
    }

    fn report(&mut self, diagnostic: Diagnostic) -> Option<Diagnostic> {
        self.diagnostics.record(diagnostic);
        Some(diagnostic)
    }
}

impl Default for GravityTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GyroRates;

    const TOLERANCE: f32 = 1e-6;

    #[test]
    fn test_new_tracker_is_level() {
        let tracker = GravityTracker::new();
        assert_eq!(tracker.gravity(), default_gravity());
        assert_eq!(tracker.diagnostics().total(), 0);
    }

    #[test]
    fn test_update_pulls_towards_accelerometer() {
        let mut tracker = GravityTracker::new();
        let result = tracker.update(Vector3::new(0.0, 0.0, 9.81), Vector3::zeros(), 0.1);
        assert_eq!(result, None);

        let gravity = tracker.gravity();
        assert!((gravity.length() - 1.0).abs() < TOLERANCE);
        assert!(gravity.z > 0.0);
        assert!(gravity.y > gravity.z);
    }

    #[test]
    fn test_update_full_fusion_snaps_to_accelerometer() {
        let mut tracker = GravityTracker::new();
        tracker.update(Vector3::new(0.0, 0.0, -2.0), Vector3::zeros(), 1.0);
        assert!((tracker.gravity() - Vector3::new(0.0, 0.0, -1.0)).length() < TOLERANCE);
    }

    #[test]
    fn test_update_rotates_with_gyroscope() {
        let mut tracker = GravityTracker::new();
        // Zero fusion factor: gyroscope integration only
        tracker.update(Vector3::zeros(), Vector3::new(0.0, 0.0, 0.1), 0.0);

        // cross((0, 0, 0.1), (0, 1, 0)) = (-0.1, 0, 0)
        let gravity = tracker.gravity();
        assert!(gravity.x < 0.0);
        assert!((gravity.length() - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_yaw_about_gravity_keeps_level() {
        let mut tracker = GravityTracker::new();
        let yaw_only = GyroRates::new(90.0, 0.0, 0.0);

        // One second of pure yaw at 250Hz with no accelerometer correction
        for _ in 0..250 {
            let rotation = yaw_only.body_axes();
            let result = tracker.update_with_rate(Vector3::zeros(), rotation, 0.004, 0.0);
            assert_eq!(result, None);
        }
        assert_eq!(tracker.gravity(), default_gravity());
    }

    #[test]
    fn test_pitch_tips_gravity_forward() {
        let mut tracker = GravityTracker::new();
        let pitch_only = GyroRates::new(0.0, 90.0, 0.0);

        for _ in 0..250 {
            tracker.update_with_rate(Vector3::zeros(), pitch_only.body_axes(), 0.004, 0.0);
        }
        // A quarter turn about the lateral axis lays the controller flat
        assert!(tracker.gravity().y.abs() < 0.1);
        assert!(tracker.gravity().z > 0.9);
    }

    #[test]
    fn test_update_rejects_invalid_factor() {
        let mut tracker = GravityTracker::new();
        tracker.set(0.0, 0.0, 1.0);
        let before = tracker.gravity();

        let result = tracker.update(Vector3::new(1.0, 0.0, 0.0), Vector3::zeros(), 1.3);
        assert_eq!(result, Some(Diagnostic::InvalidRange));
        let result = tracker.update(Vector3::new(1.0, 0.0, 0.0), Vector3::zeros(), -0.1);
        assert_eq!(result, Some(Diagnostic::InvalidRange));

        assert_eq!(tracker.gravity(), before);
        assert_eq!(tracker.diagnostics().invalid_range, 2);
    }

    #[test]
    fn test_update_rejects_nan() {
        let mut tracker = GravityTracker::new();
        let before = tracker.gravity();

        let result = tracker.update(Vector3::new(f32::NAN, 0.0, 0.0), Vector3::zeros(), 0.1);
        assert_eq!(result, Some(Diagnostic::NanInput));
        let result = tracker.update(Vector3::y(), Vector3::new(0.0, f32::NAN, 0.0), 0.1);
        assert_eq!(result, Some(Diagnostic::NanInput));
        let result = tracker.update(Vector3::y(), Vector3::zeros(), f32::NAN);
        assert_eq!(result, Some(Diagnostic::NanInput));

        assert_eq!(tracker.gravity(), before);
        assert_eq!(tracker.diagnostics().nan_input, 3);
    }

    #[test]
    fn test_update_rejects_infinite() {
        let mut tracker = GravityTracker::new();

        let result = tracker.update(Vector3::new(f32::INFINITY, 0.0, 0.0), Vector3::zeros(), 0.1);
        assert_eq!(result, Some(Diagnostic::NanInput));
        let result = tracker.update_with_rate(Vector3::y(), Vector3::y(), f32::INFINITY, 0.1);
        assert_eq!(result, Some(Diagnostic::NanInput));
        assert_eq!(tracker.gravity(), default_gravity());

        // A finite rotation large enough to overflow the first-order step
        tracker.set(0.0, 0.6, 0.8);
        let result = tracker.update(Vector3::y(), Vector3::new(0.0, f32::MAX, -f32::MAX), 0.5);
        assert_eq!(result, Some(Diagnostic::DegenerateVector));
        assert_eq!(tracker.gravity(), default_gravity());
    }

    #[test]
    fn test_set_large_and_infinite() {
        let mut tracker = GravityTracker::new();
        assert_eq!(tracker.set(1e20, 0.0, 0.0), None);
        assert_eq!(tracker.gravity(), Vector3::new(1.0, 0.0, 0.0));

        assert_eq!(tracker.set(f32::INFINITY, 0.0, 0.0), Some(Diagnostic::NanInput));
        assert_eq!(tracker.gravity(), default_gravity());

        // The estimate stays usable afterwards
        assert_eq!(tracker.update(Vector3::z(), Vector3::zeros(), 1.0), None);
        assert!((tracker.gravity() - Vector3::z()).length() < TOLERANCE);
    }

    #[test]
    fn test_update_degenerate_blend_resets() {
        let mut tracker = GravityTracker::new();
        tracker.set(1.0, 0.0, 0.0);

        // Full fusion towards a zero accelerometer leaves nothing to normalize
        let result = tracker.update(Vector3::zeros(), Vector3::zeros(), 1.0);
        assert_eq!(result, Some(Diagnostic::DegenerateVector));
        assert_eq!(tracker.gravity(), default_gravity());
    }

    #[test]
    fn test_update_with_rate_converts_degrees() {
        let mut by_rate = GravityTracker::new();
        let mut by_rotation = GravityTracker::new();

        by_rate.update_with_rate(Vector3::y(), Vector3::new(0.0, 0.0, 90.0), 0.01, 0.0);
        by_rotation.update(
            Vector3::y(),
            Vector3::new(0.0, 0.0, 90.0 * crate::math::DEG_TO_RAD * 0.01),
            0.0,
        );

        assert!((by_rate.gravity() - by_rotation.gravity()).length() < TOLERANCE);
    }

    #[test]
    fn test_update_with_rate_rejects_bad_delta_time() {
        let mut tracker = GravityTracker::new();
        assert_eq!(
            tracker.update_with_rate(Vector3::y(), Vector3::zeros(), -0.01, 0.1),
            Some(Diagnostic::InvalidRange)
        );
        assert_eq!(
            tracker.update_with_rate(Vector3::y(), Vector3::zeros(), f32::NAN, 0.1),
            Some(Diagnostic::NanInput)
        );
        assert_eq!(tracker.gravity(), default_gravity());
    }

    #[test]
    fn test_set_normalizes() {
        let mut tracker = GravityTracker::new();
        assert_eq!(tracker.set(0.0, 3.0, 4.0), None);
        assert!((tracker.gravity() - Vector3::new(0.0, 0.6, 0.8)).length() < TOLERANCE);
    }

    #[test]
    fn test_set_zero_keeps_previous() {
        let mut tracker = GravityTracker::new();
        tracker.set(1.0, 0.0, 0.0);
        assert_eq!(tracker.set(0.0, 0.0, 0.0), Some(Diagnostic::DegenerateVector));
        assert_eq!(tracker.gravity(), Vector3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_set_nan_resets_to_default() {
        let mut tracker = GravityTracker::new();
        tracker.set(1.0, 0.0, 0.0);
        assert_eq!(tracker.set(f32::NAN, 0.0, 0.0), Some(Diagnostic::NanInput));
        assert_eq!(tracker.gravity(), default_gravity());
    }

    #[test]
    fn test_reset_and_clear() {
        let mut tracker = GravityTracker::new();
        tracker.set(0.0, 0.0, 1.0);
        tracker.set(0.0, 0.0, 0.0);
        tracker.reset();

        assert_eq!(tracker.gravity(), default_gravity());
        assert_eq!(tracker.diagnostics().degenerate_vector, 1);

        tracker.clear_diagnostics();
        assert_eq!(tracker.diagnostics().total(), 0);
    }
}
