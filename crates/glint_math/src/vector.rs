//! Direction vectors that can never be zero.

use crate::GeometryError;
use glam::DVec3;
use std::ops::Neg;

/// A displacement in 3D space with a well-defined direction.
///
/// Every constructor rejects the zero vector, so `normalize` is total and a
/// `Vector` can always be used as a ray or normal direction.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Vector(DVec3);

impl Vector {
    pub const X: Vector = Vector(DVec3::X);
    pub const Y: Vector = Vector(DVec3::Y);
    pub const Z: Vector = Vector(DVec3::Z);

    /// Create a vector from components.
    pub fn new(x: f64, y: f64, z: f64) -> Result<Self, GeometryError> {
        Self::try_from_dvec3(DVec3::new(x, y, z))
    }

    /// Wrap a raw `DVec3`, rejecting zero and non-finite input.
    pub fn try_from_dvec3(v: DVec3) -> Result<Self, GeometryError> {
        if !v.is_finite() {
            return Err(GeometryError::NonFiniteVector);
        }
        if v == DVec3::ZERO {
            return Err(GeometryError::ZeroVector);
        }
        Ok(Self(v))
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.0.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.0.y
    }

    #[inline]
    pub fn z(&self) -> f64 {
        self.0.z
    }

    /// The underlying components.
    #[inline]
    pub fn to_dvec3(self) -> DVec3 {
        self.0
    }

    /// Vector sum. Fails if the two vectors cancel out.
    pub fn checked_add(&self, other: &Vector) -> Result<Vector, GeometryError> {
        Self::try_from_dvec3(self.0 + other.0)
    }

    /// Vector difference. Fails if the two vectors are equal.
    pub fn checked_sub(&self, other: &Vector) -> Result<Vector, GeometryError> {
        Self::try_from_dvec3(self.0 - other.0)
    }

    /// Multiply by a scalar. Fails for a zero scale factor.
    pub fn scale(&self, factor: f64) -> Result<Vector, GeometryError> {
        Self::try_from_dvec3(self.0 * factor)
    }

    #[inline]
    pub fn dot(&self, other: &Vector) -> f64 {
        self.0.dot(other.0)
    }

    /// Cross product. Fails when the vectors are parallel.
    pub fn cross(&self, other: &Vector) -> Result<Vector, GeometryError> {
        Self::try_from_dvec3(self.0.cross(other.0))
    }

    #[inline]
    pub fn length_squared(&self) -> f64 {
        self.0.length_squared()
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.0.length()
    }

    /// Unit vector with the same direction.
    ///
    /// Scales by the largest component first so the length neither
    /// overflows nor underflows.
    pub fn normalize(&self) -> Vector {
        let scaled = self.0 / self.0.abs().max_element();
        Vector(scaled / scaled.length())
    }

    /// Some unit vector orthogonal to this one.
    pub fn any_orthogonal(&self) -> Vector {
        Vector(self.normalize().0.any_orthonormal_vector())
    }
}

impl Neg for Vector {
    type Output = Vector;

    fn neg(self) -> Vector {
        Vector(-self.0)
    }
}

impl TryFrom<DVec3> for Vector {
    type Error = GeometryError;

    fn try_from(v: DVec3) -> Result<Self, Self::Error> {
        Self::try_from_dvec3(v)
    }
}

impl From<Vector> for DVec3 {
    fn from(v: Vector) -> Self {
        v.0
    }
}
