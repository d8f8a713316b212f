//! Local, Player and World space gyro transforms

use nalgebra::Vector3;

use crate::error::{Diagnostic, DiagnosticCounts};
use crate::gravity::default_gravity;
use crate::math::{Vector3Ext, gravity_basis, identity, lerp_scalar, transform_vector};
use crate::tilt::{TiltSmoother, tilt_target};
use crate::types::{
    AimDelta, AimSpace, DEFAULT_YAW_RELAXATION, GyroRates, GyroSpaceSettings, PlayerBasis,
    Sensitivity,
};

/// Tilt target for Local space, which has no gravity input
pub const LOCAL_DAMPING: f32 = 0.7;

/// Gyro space transform engine
///
/// Converts raw yaw/pitch/roll rates into per-frame aim deltas. Each
/// transform family keeps its own smoothed tilt factor, so one engine per
/// controller carries all state between frames. Inputs are never rejected
/// with an error: NaN rates produce a zero delta and degenerate gravity is
/// replaced by `(0, 1, 0)`, with the fault reported on the returned
/// [`AimDelta`].
///
/// # Example
/// ```
/// use nalgebra::Vector3;
/// use gyro_space::{GyroRates, GyroSpace, Sensitivity};
///
/// let mut engine = GyroSpace::new();
/// let rates = GyroRates::new(10.0, 5.0, 3.0);
///
/// let aim = engine.world(rates, Vector3::new(0.0, 1.0, 0.0), Sensitivity::default());
/// assert!(aim.is_clean());
/// assert!((aim.delta.x - 10.0).abs() < 1e-4); // held level, world yaw is the yaw rate
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GyroSpace {
    settings: GyroSpaceSettings,
    local_tilt: TiltSmoother,
    player_tilt: TiltSmoother,
    world_tilt: TiltSmoother,
    pub(crate) dynamic_tilt: TiltSmoother,
    diagnostics: DiagnosticCounts,
}

impl GyroSpace {
    /// Create an engine with default settings
    pub fn new() -> Self {
        Self::with_settings(GyroSpaceSettings::default())
    }

    /// Create an engine with the specified settings
    pub fn with_settings(settings: GyroSpaceSettings) -> Self {
        Self {
            settings,
            local_tilt: TiltSmoother::new(),
            player_tilt: TiltSmoother::new(),
            world_tilt: TiltSmoother::new(),
            dynamic_tilt: TiltSmoother::new(),
            diagnostics: DiagnosticCounts::default(),
        }
    }

    pub fn settings(&self) -> GyroSpaceSettings {
        self.settings
    }

    pub fn set_settings(&mut self, settings: GyroSpaceSettings) {
        self.settings = settings;
    }

    /// Return every smoothed tilt factor to its initial value
    pub fn reset(&mut self) {
        self.local_tilt.reset();
        self.player_tilt.reset();
        self.world_tilt.reset();
        self.dynamic_tilt.reset();
    }

    pub fn local_tilt(&self) -> f32 {
        self.local_tilt.value()
    }

    pub fn player_tilt(&self) -> f32 {
        self.player_tilt.value()
    }

    pub fn world_tilt(&self) -> f32 {
        self.world_tilt.value()
    }

    pub fn dynamic_tilt(&self) -> f32 {
        self.dynamic_tilt.value()
    }

    /// Counts of substituted inputs since creation or the last clear
    pub fn diagnostics(&self) -> DiagnosticCounts {
        self.diagnostics
    }

    pub fn clear_diagnostics(&mut self) {
        self.diagnostics = DiagnosticCounts::default();
    }

    /// Dispatch to the transform for `space`
    pub fn transform(
        &mut self,
        space: AimSpace,
        rates: GyroRates,
        gravity: Vector3<f32>,
        sensitivity: Sensitivity,
    ) -> AimDelta {
        match space {
            AimSpace::Local { coupling_factor } => self.local(rates, sensitivity, coupling_factor),
            AimSpace::Player => self.player(rates, gravity, sensitivity),
            AimSpace::World => self.world(rates, gravity, sensitivity),
        }
    }

    /// Transform to Local space (the controller's own axes).
    ///
    /// Roll is corrected for the roll that pure yaw motion bleeds into it,
    /// `roll * roll_sensitivity - yaw * coupling_factor`, and that corrected
    /// roll is taken out of the yaw channel. Pitch and roll fade between raw
    /// and sensitivity-scaled values by the local tilt factor, which settles
    /// at [`LOCAL_DAMPING`]. The roll channel is inverted.
    ///
    /// # Arguments
    /// * `rates` - Raw gyro rates in degrees per second
    /// * `sensitivity` - Per-axis multipliers
    /// * `coupling_factor` - Yaw-to-roll bleed compensation, typically 0.075
    pub fn local(
        &mut self,
        rates: GyroRates,
        sensitivity: Sensitivity,
        coupling_factor: f32,
    ) -> AimDelta {
        if rates.has_nan() || sensitivity.has_nan() || coupling_factor.is_nan() {
            return self.reject_nan("local");
        }

        let GyroRates { yaw, pitch, roll } = rates;
        let adjusted_roll = roll * sensitivity.roll - yaw * coupling_factor;
        let blend = self.local_tilt.advance(LOCAL_DAMPING);

        let raw = Vector3::new(
            yaw * sensitivity.yaw - adjusted_roll,
            lerp_scalar(pitch, pitch * sensitivity.pitch, blend),
            lerp_scalar(roll, roll * sensitivity.roll, blend),
        );

        let mut local = transform_vector(&identity(), &raw);
        local.z = -local.z;

        AimDelta::new(local, None)
    }

    /// Transform to Player space (gravity-aligned player frame).
    ///
    /// Yaw and roll are blended by the smoothed tilt factor: held upright the
    /// yaw rate drives the yaw channel, held flat the roll rate does. The yaw
    /// channel then interpolates between the gravity-projected world yaw and
    /// that blended local yaw by
    /// [`yaw_relaxation`](GyroSpaceSettings::yaw_relaxation). Roll is inverted
    /// before the configured [`PlayerBasis`] is applied.
    ///
    /// # Arguments
    /// * `rates` - Raw gyro rates in degrees per second
    /// * `gravity` - Gravity direction in controller axes; near-zero or
    ///   non-finite uses `(0, 1, 0)`
    /// * `sensitivity` - Per-axis multipliers
    pub fn player(
        &mut self,
        rates: GyroRates,
        gravity: Vector3<f32>,
        sensitivity: Sensitivity,
    ) -> AimDelta {
        if rates.has_nan() || sensitivity.has_nan() {
            return self.reject_nan("player");
        }

        let (gravity, mut diagnostic) = self.sanitize_gravity(gravity);
        let relaxation = self.yaw_relaxation(&mut diagnostic);
        let tilt = self.player_tilt.advance(tilt_target(&gravity));

        let yaw = rates.yaw * sensitivity.yaw;
        let pitch = rates.pitch * sensitivity.pitch;
        let roll = rates.roll * sensitivity.roll;

        let local_yaw = tilt * yaw + (1.0 - tilt) * roll;
        let world_yaw = gravity.y * yaw + gravity.z * roll;
        let blended_yaw = lerp_scalar(world_yaw, local_yaw, relaxation);
        let blended_roll = -(tilt * roll + (1.0 - tilt) * yaw);

        let basis = match self.settings.player_basis {
            PlayerBasis::Identity => identity(),
            PlayerBasis::Gravity => gravity_basis(&gravity),
        };
        let player = transform_vector(&basis, &Vector3::new(blended_yaw, pitch, blended_roll));

        AimDelta::new(player, diagnostic)
    }

    /// Transform to World space (fixed world-up frame).
    ///
    /// Builds `(pitch, -yaw, -blended_roll)` in controller axes and projects
    /// it onto gravity (yaw channel, negated) and onto the pitch and roll
    /// axes with their gravity-parallel parts removed. The result does not
    /// depend on how the controller is rolled about world-down.
    ///
    /// # Arguments
    /// * `rates` - Raw gyro rates in degrees per second
    /// * `gravity` - Gravity direction in controller axes; near-zero or
    ///   non-finite uses `(0, 1, 0)`
    /// * `sensitivity` - Per-axis multipliers
    pub fn world(
        &mut self,
        rates: GyroRates,
        gravity: Vector3<f32>,
        sensitivity: Sensitivity,
    ) -> AimDelta {
        if rates.has_nan() || sensitivity.has_nan() {
            return self.reject_nan("world");
        }

        let (gravity, diagnostic) = self.sanitize_gravity(gravity);
        let tilt = self.world_tilt.advance(tilt_target(&gravity));

        let yaw = rates.yaw * sensitivity.yaw;
        let roll = rates.roll * sensitivity.roll;
        let raw = Vector3::new(
            rates.pitch * sensitivity.pitch,
            -yaw,
            -(tilt * roll + (1.0 - tilt) * yaw),
        );

        let pitch_axis = remove_gravity_component(Vector3::x(), &gravity);
        let roll_axis = remove_gravity_component(Vector3::z(), &gravity);

        let world = Vector3::new(
            -raw.dot(&gravity),
            raw.dot(&pitch_axis),
            raw.dot(&roll_axis),
        );

        AimDelta::new(world, diagnostic)
    }

    /// Normalized gravity, or the default when it has no usable direction
    pub(crate) fn sanitize_gravity(
        &mut self,
        gravity: Vector3<f32>,
    ) -> (Vector3<f32>, Option<Diagnostic>) {
        if gravity.has_non_finite() {
            debug_log!("gravity is not finite, using default");
            return (default_gravity(), self.report(Diagnostic::NanInput));
        }
        let normalized = gravity.safe_normalize();
        if normalized.is_near_zero() {
            debug_log!("gravity is near zero, using default");
            return (default_gravity(), self.report(Diagnostic::DegenerateVector));
        }
        (normalized, None)
    }

    pub(crate) fn reject_nan(&mut self, space: &str) -> AimDelta {
        debug_log!("{} transform rejected: NaN input", space);
        AimDelta::new(Vector3::zeros(), self.report(Diagnostic::NanInput))
    }

    fn yaw_relaxation(&mut self, diagnostic: &mut Option<Diagnostic>) -> f32 {
        let relaxation = self.settings.yaw_relaxation;
        if (0.0..=1.0).contains(&relaxation) {
            return relaxation;
        }
        debug_log!("yaw relaxation {} outside [0, 1], using default", relaxation);
        self.diagnostics.record(Diagnostic::InvalidRange);
        diagnostic.get_or_insert(Diagnostic::InvalidRange);
        DEFAULT_YAW_RELAXATION
    }

    fn report(&mut self, diagnostic: Diagnostic) -> Option<Diagnostic> {
        self.diagnostics.record(diagnostic);
        Some(diagnostic)
    }
}

impl Default for GyroSpace {
    fn default() -> Self {
        Self::new()
    }
}

/// `axis` with its component along `gravity` removed, normalized when possible
fn remove_gravity_component(axis: Vector3<f32>, gravity: &Vector3<f32>) -> Vector3<f32> {
    let projected = axis - gravity * gravity.dot(&axis);
    if projected.is_near_zero() {
        projected
    } else {
        projected.safe_normalize()
    }
}
