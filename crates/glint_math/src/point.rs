//! Positions in 3D space.

use crate::{GeometryError, Vector};
use glam::DVec3;
use std::ops::Add;

/// A location in 3D space. Unlike [`Vector`], any coordinates are allowed.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Point(DVec3);

impl Point {
    pub const ORIGIN: Point = Point(DVec3::ZERO);

    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self(DVec3::new(x, y, z))
    }

    #[inline]
    pub const fn from_dvec3(v: DVec3) -> Self {
        Self(v)
    }

    #[inline]
    pub fn to_dvec3(self) -> DVec3 {
        self.0
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

    /// Displacement from `other` to `self`. Fails if the points coincide.
    pub fn subtract(&self, other: &Point) -> Result<Vector, GeometryError> {
        Vector::try_from_dvec3(self.0 - other.0)
    }

    pub fn distance_squared(&self, other: &Point) -> f64 {
        self.0.distance_squared(other.0)
    }

    pub fn distance(&self, other: &Point) -> f64 {
        self.0.distance(other.0)
    }

    pub fn is_finite(&self) -> bool {
        self.0.is_finite()
    }
}

impl Add<Vector> for Point {
    type Output = Point;

    #[inline]
    fn add(self, v: Vector) -> Point {
        Point(self.0 + v.to_dvec3())
    }
}

impl From<DVec3> for Point {
    fn from(v: DVec3) -> Self {
        Self(v)
    }
}

impl From<Point> for DVec3 {
    fn from(p: Point) -> Self {
        p.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_point_subtract() {
        let p1 = Point::new(1.0, 2.0, 3.0);
        let p2 = Point::new(2.0, 3.0, 4.0);

        assert_eq!(p2.subtract(&p1).unwrap(), Vector::new(1.0, 1.0, 1.0).unwrap());
        assert_eq!(p1.subtract(&p1), Err(GeometryError::ZeroVector));
    }

    #[test]
    fn test_point_add_vector() {
        let p = Point::new(1.0, 2.0, 3.0);
        let v = Vector::new(-1.0, -2.0, -3.0).unwrap();
        assert_eq!(p + v, Point::ORIGIN);
    }

    #[test]
    fn test_distance() {
        let p1 = Point::new(1.0, 2.0, 3.0);
        let p2 = Point::new(1.0, 5.0, 7.0);
        assert_eq!(p1.distance_squared(&p2), 25.0);
        assert_eq!(p1.distance(&p2), 5.0);
    }

    #[test]
    fn test_subtract_then_add_round_trip() {
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..200 {
            let p = Point::new(
                rng.gen_range(-50.0..50.0),
                rng.gen_range(-50.0..50.0),
                rng.gen_range(-50.0..50.0),
            );
            let q = Point::new(
                rng.gen_range(-50.0..50.0),
                rng.gen_range(-50.0..50.0),
                rng.gen_range(-50.0..50.0),
            );
            let Ok(v) = p.subtract(&q) else {
                continue;
            };
            assert!((q + v).distance(&p) < 1e-9);
        }
    }
}
