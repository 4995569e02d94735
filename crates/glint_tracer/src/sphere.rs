//! Sphere primitive for ray tracing.

use crate::Surface;
use glint_math::tolerance::align_zero;
use glint_math::{Aabb, GeometryError, Point, Ray, Vector};

/// A sphere primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    center: Point,
    radius: f64,
    bbox: Aabb,
}

impl Sphere {
    /// Create a new sphere. The radius must be positive and finite.
    pub fn new(center: Point, radius: f64) -> Result<Self, GeometryError> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(GeometryError::NonPositiveRadius(radius));
        }

        let c = center.to_dvec3();
        let bbox = Aabb::from_points((c - radius).into(), (c + radius).into());

        Ok(Self {
            center,
            radius,
            bbox,
        })
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl Surface for Sphere {
    fn normal_at(&self, point: &Point) -> Vector {
        match point.subtract(&self.center) {
            Ok(outward) => outward.normalize(),
            // The center is never on the surface; any direction will do
            Err(_) => Vector::Z,
        }
    }

    /// Geometric (projection) method.
    ///
    /// `tm` is the projection of the origin-to-center vector on the ray and `d`
    /// the distance from the center to the ray's line. Hits are returned
    /// nearest first.
    fn intersect(&self, ray: &Ray, max_distance: f64) -> Vec<Point> {
        let (tm, d) = match self.center.subtract(&ray.origin()) {
            // Ray starts at the center
            Err(_) => (0.0, 0.0),
            Ok(u) => {
                let tm = align_zero(ray.direction().dot(&u));
                let d = align_zero((u.length_squared() - tm * tm).max(0.0).sqrt());
                (tm, d)
            }
        };

        // Tangent or passing by
        if align_zero(d - self.radius) >= 0.0 {
            return Vec::new();
        }

        let th = (self.radius * self.radius - d * d).sqrt();
        let near = align_zero(tm - th);
        let far = align_zero(tm + th);

        [near, far]
            .into_iter()
            .filter(|&t| t > 0.0 && align_zero(t - max_distance) <= 0.0)
            .map(|t| ray.point_at(t))
            .collect()
    }

    fn bounding_box(&self) -> Option<Aabb> {
        Some(self.bbox)
    }
}
