//! Core types and configuration for the gyro space transforms

use nalgebra::Vector3;

use crate::error::Diagnostic;

/// Default yaw-to-roll coupling used for Local space
pub const DEFAULT_COUPLING_FACTOR: f32 = 0.075;

/// Default interpolation between world yaw (0) and tilt-blended local yaw (1)
pub const DEFAULT_YAW_RELAXATION: f32 = 0.5;

/// Raw angular rates from the controller in degrees per second.
///
/// Converting from a plain vector reads it in channel order: `x` is yaw,
/// `y` is pitch and `z` is roll. Sensor readings about the controller's own
/// axes go through [`GyroRates::from_body_axes`] instead, which is the order
/// [`GravityTracker`](crate::GravityTracker) expects.
///
/// # Example
/// ```
/// use nalgebra::Vector3;
/// use gyro_space::GyroRates;
///
/// let rates = GyroRates::from(Vector3::new(10.0, 5.0, 3.0));
/// assert_eq!(rates.yaw, 10.0);
/// assert_eq!(rates.roll, 3.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GyroRates {
    /// Rotation about the controller's vertical axis
    pub yaw: f32,
    /// Rotation about the controller's lateral axis
    pub pitch: f32,
    /// Rotation about the controller's longitudinal axis
    pub roll: f32,
}

impl GyroRates {
    pub fn new(yaw: f32, pitch: f32, roll: f32) -> Self {
        Self { yaw, pitch, roll }
    }

    /// Rates from an angular velocity about the controller axes:
    /// `x` (lateral) is pitch, `y` (vertical) is yaw and `z` (longitudinal) is roll.
    pub fn from_body_axes(angular_rate: Vector3<f32>) -> Self {
        Self::new(angular_rate.y, angular_rate.x, angular_rate.z)
    }

    /// Inverse of [`from_body_axes`](Self::from_body_axes): `(pitch, yaw, roll)`
    pub fn body_axes(&self) -> Vector3<f32> {
        Vector3::new(self.pitch, self.yaw, self.roll)
    }

    pub fn has_nan(&self) -> bool {
        self.yaw.is_nan() || self.pitch.is_nan() || self.roll.is_nan()
    }
}

impl From<Vector3<f32>> for GyroRates {
    fn from(v: Vector3<f32>) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

/// Per-axis sensitivity multipliers.
///
/// Supplied fresh with every transform call; nothing here is persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sensitivity {
    pub yaw: f32,
    pub pitch: f32,
    pub roll: f32,
}

impl Sensitivity {
    pub fn new(yaw: f32, pitch: f32, roll: f32) -> Self {
        Self { yaw, pitch, roll }
    }

    /// Same multiplier on every axis
    pub fn uniform(value: f32) -> Self {
        Self::new(value, value, value)
    }

    pub fn has_nan(&self) -> bool {
        self.yaw.is_nan() || self.pitch.is_nan() || self.roll.is_nan()
    }
}

impl Default for Sensitivity {
    fn default() -> Self {
        Self::uniform(1.0)
    }
}

/// Orientation basis applied as the last step of Player space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlayerBasis {
    /// Pass the blended delta through unchanged
    #[default]
    Identity,
    /// Re-express the blended delta in a basis whose up axis is gravity
    Gravity,
}

/// How the dynamic transform picks between Player and World space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpaceSelection {
    /// Player space while `gravity.y > 0.5`, World space otherwise
    #[default]
    Auto,
    /// Always Player space
    Player,
    /// Always World space
    World,
}

/// Target aim space for [`GyroSpace::transform`](crate::GyroSpace::transform).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AimSpace {
    /// Controller body axes, with yaw-to-roll coupling compensation
    Local { coupling_factor: f32 },
    /// Gravity-aligned player frame
    Player,
    /// Fixed world-up frame
    World,
}

impl Default for AimSpace {
    fn default() -> Self {
        AimSpace::Local {
            coupling_factor: DEFAULT_COUPLING_FACTOR,
        }
    }
}

/// Engine settings
///
/// # Example
/// ```
/// use gyro_space::{GyroSpace, GyroSpaceSettings, PlayerBasis};
///
/// let settings = GyroSpaceSettings {
///     yaw_relaxation: 0.8,
///     player_basis: PlayerBasis::Gravity,
///     ..Default::default()
/// };
/// let engine = GyroSpace::with_settings(settings);
/// assert_eq!(engine.settings().yaw_relaxation, 0.8);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GyroSpaceSettings {
    /// Player space yaw interpolation in `[0, 1]`
    ///
    /// 0 uses the gravity-projected world yaw, 1 uses the tilt-blended local
    /// yaw. Values outside the range fall back to
    /// [`DEFAULT_YAW_RELAXATION`] for that call.
    pub yaw_relaxation: f32,
    /// Basis applied to the final Player space delta
    pub player_basis: PlayerBasis,
    /// Mode selection used by the dynamic transform
    pub selection: SpaceSelection,
}

impl Default for GyroSpaceSettings {
    fn default() -> Self {
        Self {
            yaw_relaxation: DEFAULT_YAW_RELAXATION,
            player_basis: PlayerBasis::default(),
            selection: SpaceSelection::default(),
        }
    }
}

/// Per-frame aim delta plus the first diagnostic raised while producing it.
///
/// `delta` is always usable: when an input was rejected it holds the
/// substituted result (a zero vector for NaN rates).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AimDelta {
    /// Output `(x, y, z)` delta
    pub delta: Vector3<f32>,
    /// First fault detected during this call, if any
    pub diagnostic: Option<Diagnostic>,
}

impl AimDelta {
    pub fn new(delta: Vector3<f32>, diagnostic: Option<Diagnostic>) -> Self {
        Self { delta, diagnostic }
    }

    /// True if no input had to be substituted
    pub fn is_clean(&self) -> bool {
        self.diagnostic.is_none()
    }
}
