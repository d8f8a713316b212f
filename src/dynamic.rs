//! Dynamic orientation: pick Player or World space from the current tilt

use nalgebra::Vector3;

use crate::gravity::GravityTracker;
use crate::space::GyroSpace;
use crate::tilt::tilt_target;
use crate::types::{AimDelta, GyroRates, Sensitivity, SpaceSelection};

/// `gravity.y` above which [`SpaceSelection::Auto`] picks Player space
pub const DYNAMIC_PLAYER_THRESHOLD: f32 = 0.5;

impl GyroSpace {
    /// Transform using the tracker's gravity, choosing the space automatically.
    ///
    /// The yaw and roll inputs are pre-blended by the dynamic tilt factor so
    /// that holding the controller flat moves roll into the yaw channel. The
    /// blended rates then go through Player space when the controller is
    /// upright (`gravity.y > 0.5`) and World space otherwise, unless
    /// [`GyroSpaceSettings::selection`](crate::GyroSpaceSettings::selection)
    /// forces one of them. Sensitivities are applied once, by the chosen
    /// transform.
    ///
    /// # Example
    /// ```
    /// use gyro_space::{GravityTracker, GyroRates, GyroSpace, Sensitivity};
    ///
    /// let tracker = GravityTracker::new();
    /// let mut engine = GyroSpace::new();
    ///
    /// let aim = engine.dynamic(GyroRates::new(10.0, 5.0, 3.0), &tracker, Sensitivity::default());
    /// assert!(aim.is_clean());
    /// ```
    pub fn dynamic(
        &mut self,
        rates: GyroRates,
        tracker: &GravityTracker,
        sensitivity: Sensitivity,
    ) -> AimDelta {
        self.dynamic_with_gravity(rates, tracker.gravity(), sensitivity)
    }

    /// [`dynamic`](Self::dynamic) with an explicit gravity vector
    pub fn dynamic_with_gravity(
        &mut self,
        rates: GyroRates,
        gravity: Vector3<f32>,
        sensitivity: Sensitivity,
    ) -> AimDelta {
        if rates.has_nan() || sensitivity.has_nan() {
            return self.reject_nan("dynamic");
        }

        let (gravity, diagnostic) = self.sanitize_gravity(gravity);
        let tilt = self.dynamic_tilt.advance(tilt_target(&gravity));

        let blended = GyroRates::new(
            tilt * rates.yaw + (1.0 - tilt) * rates.roll,
            rates.pitch,
            tilt * rates.roll + (1.0 - tilt) * rates.yaw,
        );

        let aim = if self.selects_world(&gravity) {
            self.world(blended, gravity, sensitivity)
        } else {
            self.player(blended, gravity, sensitivity)
        };

        AimDelta::new(aim.delta, diagnostic.or(aim.diagnostic))
    }

    fn selects_world(&self, gravity: &Vector3<f32>) -> bool {
        match self.settings().selection {
            SpaceSelection::Auto => gravity.y <= DYNAMIC_PLAYER_THRESHOLD,
            SpaceSelection::Player => false,
            SpaceSelection::World => true,
        }
    }
}
