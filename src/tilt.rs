//! Smoothed tilt factor shared by the gravity-aware transforms

use nalgebra::Vector3;

/// Fraction of the remaining gap closed on every advance
pub const TILT_SMOOTHING: f32 = 0.1;

/// Exponent applied to `|gravity.y|` before smoothing
pub const TILT_EXPONENT: f32 = 0.75;

/// Initial smoothed value: controller assumed upright
const INITIAL_TILT: f32 = 1.0;

/// How upright the controller is, in `[0, 1]`, for a normalized gravity vector.
///
/// 1 when gravity runs along the controller's Y axis (held upright), 0 when it
/// is perpendicular (held flat).
pub fn tilt_target(gravity: &Vector3<f32>) -> f32 {
    let upright = libm::fabsf(gravity.y).clamp(0.0, 1.0);
    libm::powf(upright, TILT_EXPONENT)
}

/// Exponentially smoothed tilt factor.
///
/// Each transform family owns one of these so that compensation fades in and
/// out over several frames instead of snapping. With a fixed target the value
/// approaches it monotonically: the gap shrinks by `1 - TILT_SMOOTHING` per call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TiltSmoother {
    value: f32,
}

impl TiltSmoother {
    pub fn new() -> Self {
        Self {
            value: INITIAL_TILT,
        }
    }

    /// Move one step towards `target` (clamped to `[0, 1]`) and return the new value.
    ///
    /// A NaN target leaves the value where it is.
    pub fn advance(&mut self, target: f32) -> f32 {
        if target.is_nan() {
            return self.value;
        }
        let target = target.clamp(0.0, 1.0);
        self.value += (target - self.value) * TILT_SMOOTHING;
        self.value
    }

    /// Current smoothed value
    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn reset(&mut self) {
        self.value = INITIAL_TILT;
    }
}

impl Default for TiltSmoother {
    fn default() -> Self {
        Self::new()
    }
}
