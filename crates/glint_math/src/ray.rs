use crate::tolerance::{align_zero, is_zero};
use crate::{Point, Vector};

/// A half-line starting at `origin` and travelling along a unit `direction`.
///
/// Rays are unidirectional: only non-negative parameters are meaningful.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    origin: Point,
    direction: Vector,
}

impl Ray {
    /// Create a new ray. The direction is normalized.
    pub fn new(origin: Point, direction: Vector) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Create a ray whose origin is pushed `delta` along `normal`, onto the
    /// side of the surface that `direction` heads towards.
    ///
    /// Used for secondary rays so they do not re-hit the surface they start on.
    /// A direction tangent to the surface leaves the origin untouched.
    pub fn offset(point: Point, direction: Vector, normal: &Vector, delta: f64) -> Self {
        let nd = align_zero(normal.dot(&direction));
        let origin = if nd == 0.0 {
            point
        } else {
            let shift = if nd > 0.0 { delta } else { -delta };
            Point::from_dvec3(point.to_dvec3() + normal.to_dvec3() * shift)
        };
        Self::new(origin, direction)
    }

    #[inline]
    pub fn origin(&self) -> Point {
        self.origin
    }

    #[inline]
    pub fn direction(&self) -> Vector {
        self.direction
    }

    /// Get the point along the ray at parameter `t >= 0`.
    ///
    /// A zero parameter returns the origin exactly.
    pub fn point_at(&self, t: f64) -> Point {
        debug_assert!(t >= 0.0, "ray parameter must be non-negative, got {t}");
        if is_zero(t) {
            return self.origin;
        }
        Point::from_dvec3(self.origin.to_dvec3() + self.direction.to_dvec3() * t)
    }

    /// The item whose point lies closest to the ray origin.
    pub fn closest_by<T, I, F>(&self, items: I, point_of: F) -> Option<T>
    where
        I: IntoIterator<Item = T>,
        F: Fn(&T) -> Point,
    {
        items
            .into_iter()
            .map(|item| (self.origin.distance_squared(&point_of(&item)), item))
            .min_by(|(a, _), (b, _)| a.total_cmp(b))
            .map(|(_, item)| item)
    }

    /// The point closest to the ray origin.
    pub fn closest_point(&self, points: &[Point]) -> Option<Point> {
        self.closest_by(points.iter().copied(), |p| *p)
    }
}
