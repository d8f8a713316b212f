//! Vector and matrix primitives for the gyro space transforms

use nalgebra::{Matrix4, Vector3, Vector4};

/// Magnitude below which a vector is treated as having no direction
pub const EPSILON: f32 = 1e-5;

/// Mathematical constants
pub const DEG_TO_RAD: f32 = core::f32::consts::PI / 180.0;
pub const RAD_TO_DEG: f32 = 180.0 / core::f32::consts::PI;

/// Extension trait for Vector3 operations
pub trait Vector3Ext {
    /// Length of the vector
    fn length(&self) -> f32;

    /// Normalize the vector, returning the zero vector if its length is below
    /// [`EPSILON`] or infinite
    fn safe_normalize(&self) -> Vector3<f32>;

    /// True if every component's absolute value is below [`EPSILON`]
    fn is_near_zero(&self) -> bool;

    /// True if any component is NaN
    fn has_nan(&self) -> bool;

    /// True if any component is NaN or infinite
    fn has_non_finite(&self) -> bool;

    /// Convert degrees to radians
    fn deg_to_rad(&self) -> Vector3<f32>;

    /// Convert radians to degrees
    fn rad_to_deg(&self) -> Vector3<f32>;
}

impl Vector3Ext for Vector3<f32> {
    fn length(&self) -> f32 {
        if self.has_nan() {
            return f32::NAN;
        }
        let scale = max_component(self);
        if scale.is_infinite() {
            return f32::INFINITY;
        }
        if scale <= SQUARE_SAFE_LIMIT {
            return libm::sqrtf(self.x * self.x + self.y * self.y + self.z * self.z);
        }
        // Scaled by the largest component so squaring cannot overflow
        let unit = *self / scale;
        scale * libm::sqrtf(unit.x * unit.x + unit.y * unit.y + unit.z * unit.z)
    }

    fn safe_normalize(&self) -> Vector3<f32> {
        let length = self.length();
        if length < EPSILON || length.is_infinite() {
            return Vector3::zeros();
        }
        // Already unit length: rescaling would only perturb the last bit
        if libm::fabsf(length - 1.0) <= 4.0 * f32::EPSILON {
            return *self;
        }
        if length <= SQUARE_SAFE_LIMIT {
            return *self * (1.0 / length);
        }
        let scale = max_component(self);
        (*self / scale) * (scale / length)
    }

    fn is_near_zero(&self) -> bool {
        !self.has_nan() && max_component(self) < EPSILON
    }

    fn has_nan(&self) -> bool {
        self.x.is_nan() || self.y.is_nan() || self.z.is_nan()
    }

    fn has_non_finite(&self) -> bool {
        !(self.x.is_finite() && self.y.is_finite() && self.z.is_finite())
    }

    fn deg_to_rad(&self) -> Vector3<f32> {
        *self * DEG_TO_RAD
    }

    fn rad_to_deg(&self) -> Vector3<f32> {
        *self * RAD_TO_DEG
    }
}

/// Largest component magnitude whose square stays well inside `f32` range
const SQUARE_SAFE_LIMIT: f32 = 1e18;

fn max_component(v: &Vector3<f32>) -> f32 {
    libm::fabsf(v.x).max(libm::fabsf(v.y)).max(libm::fabsf(v.z))
}

/// Linear interpolation `a + (b - a) * t`. `t` is not clamped.
pub fn lerp(a: &Vector3<f32>, b: &Vector3<f32>, t: f32) -> Vector3<f32> {
    a + (b - a) * t
}

/// Scalar counterpart of [`lerp`]
pub fn lerp_scalar(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Reflects `v` about the plane with unit normal `normal`
pub fn reflect(v: &Vector3<f32>, normal: &Vector3<f32>) -> Vector3<f32> {
    v - normal * (2.0 * v.dot(normal))
}

/// 4x4 identity basis
pub fn identity() -> Matrix4<f32> {
    Matrix4::identity()
}

/// Builds an orthonormal basis whose second row is `gravity`.
///
/// Rows are `right`, `gravity`, `forward`, with `right` perpendicular to
/// gravity and the reference axis (+Z, or +X when gravity is nearly parallel
/// to Z). `gravity` must already be normalized. For the default gravity
/// `(0, 1, 0)` the result is the identity.
pub fn gravity_basis(gravity: &Vector3<f32>) -> Matrix4<f32> {
    let reference = if libm::fabsf(gravity.z) < 0.999 {
        Vector3::z()
    } else {
        Vector3::x()
    };
    let right = gravity.cross(&reference).safe_normalize();
    let forward = right.cross(gravity);

    #[rustfmt::skip]
    let basis = Matrix4::new(
        right.x,   right.y,   right.z,   0.0,
        gravity.x, gravity.y, gravity.z, 0.0,
        forward.x, forward.y, forward.z, 0.0,
        0.0,       0.0,       0.0,       1.0,
    );
    basis
}

/// Multiplies a row-major basis by a vector with an implicit homogeneous 1.
///
/// Component `i` of the result is `sum_j m[j][i] * v[j] + m[3][i]`.
pub fn transform_vector(matrix: &Matrix4<f32>, vector: &Vector3<f32>) -> Vector3<f32> {
    let homogeneous = matrix.transpose() * Vector4::new(vector.x, vector.y, vector.z, 1.0);
    Vector3::new(homogeneous.x, homogeneous.y, homogeneous.z)
}
