//! Infinite plane primitive.

use crate::Surface;
use glint_math::tolerance::{align_zero, is_zero};
use glint_math::{Aabb, GeometryError, Point, Ray, Vector};

/// A plane in point-normal form.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    point: Point,
    /// Unit normal
    normal: Vector,
}

impl Plane {
    /// Create a plane through `point` orthogonal to `normal`.
    pub fn new(point: Point, normal: Vector) -> Self {
        Self {
            point,
            normal: normal.normalize(),
        }
    }

    /// Create the plane through three non-collinear points.
    ///
    /// Coincident or collinear points give `CollinearPoints`; non-finite
    /// coordinates are reported as such.
    pub fn from_points(p1: Point, p2: Point, p3: Point) -> Result<Self, GeometryError> {
        let v1 = p2.subtract(&p1).map_err(collinear)?;
        let v2 = p3.subtract(&p1).map_err(collinear)?;
        let normal = v1.cross(&v2).map_err(collinear)?;
        Ok(Self::new(p1, normal))
    }

    pub fn point(&self) -> Point {
        self.point
    }

    pub fn normal(&self) -> Vector {
        self.normal
    }

    /// Ray parameter at which the ray crosses the plane.
    ///
    /// `None` when the ray is parallel to the plane, starts on it, or the
    /// crossing lies behind the origin or beyond `max_distance`.
    pub(crate) fn hit_distance(&self, ray: &Ray, max_distance: f64) -> Option<f64> {
        let nv = self.normal.dot(&ray.direction());
        if is_zero(nv) {
            return None;
        }

        // Ray starting at the plane's own point
        let to_plane = self.point.subtract(&ray.origin()).ok()?;

        let t = align_zero(self.normal.dot(&to_plane) / nv);
        if t <= 0.0 || align_zero(t - max_distance) > 0.0 {
            return None;
        }
        Some(t)
    }
}

/// A vanishing edge or normal means the points do not span a plane.
fn collinear(err: GeometryError) -> GeometryError {
    match err {
        GeometryError::ZeroVector => GeometryError::CollinearPoints,
        other => other,
    }
}

impl Surface for Plane {
    fn normal_at(&self, _point: &Point) -> Vector {
        self.normal
    }

    fn intersect(&self, ray: &Ray, max_distance: f64) -> Vec<Point> {
        let Some(t) = self.hit_distance(ray, max_distance) else {
            return Vec::new();
        };

        let hit = ray.point_at(t);
        if !hit.is_finite() {
            log::trace!("plane hit at t={t} overflowed, falling back to ray origin");
            return vec![ray.origin()];
        }
        vec![hit]
    }

    fn bounding_box(&self) -> Option<Aabb> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xy_plane() -> Plane {
        Plane::new(Point::new(0.0, 0.0, 1.0), Vector::Z)
    }

    #[test]
    fn test_from_points() {
        let plane = Plane::from_points(
            Point::new(1.0, 0.0, 0.0),
            Point::new(0.0, 1.0, 0.0),
            Point::new(0.0, 0.0, 1.0),
        )
        .unwrap();

        let n = plane.normal_at(&Point::new(1.0, 0.0, 0.0));
        assert!((n.length() - 1.0).abs() < 1e-12);
        let expected = 1.0 / 3f64.sqrt();
        assert!((n.x().abs() - expected).abs() < 1e-12);
        assert!((n.y().abs() - expected).abs() < 1e-12);
        assert!((n.z().abs() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_from_points_degenerate() {
        // Two identical points
        let p = Point::new(1.0, 2.0, 3.0);
        assert_eq!(
            Plane::from_points(p, p, Point::ORIGIN),
            Err(GeometryError::CollinearPoints)
        );

        // All on one line
        assert_eq!(
            Plane::from_points(
                Point::new(1.0, 1.0, 1.0),
                Point::new(2.0, 2.0, 2.0),
                Point::new(3.0, 3.0, 3.0),
            ),
            Err(GeometryError::CollinearPoints)
        );
    }

    #[test]
    fn test_from_points_non_finite() {
        assert_eq!(
            Plane::from_points(
                Point::new(f64::NAN, 0.0, 0.0),
                Point::new(0.0, 1.0, 0.0),
                Point::new(0.0, 0.0, 1.0),
            ),
            Err(GeometryError::NonFiniteVector)
        );
        assert_eq!(
            Plane::from_points(
                Point::ORIGIN,
                Point::new(0.0, 1.0, 0.0),
                Point::new(f64::INFINITY, 0.0, 1.0),
            ),
            Err(GeometryError::NonFiniteVector)
        );
    }

    #[test]
    fn test_intersect_crossing() {
        let ray = Ray::new(Point::new(1.0, 2.0, 0.0), Vector::new(0.0, 0.0, 1.0).unwrap());
        assert_eq!(xy_plane().intersect(&ray, f64::INFINITY), vec![Point::new(1.0, 2.0, 1.0)]);

        // Plane beyond max distance
        assert!(xy_plane().intersect(&ray, 0.5).is_empty());
    }

    #[test]
    fn test_intersect_pointing_away() {
        let ray = Ray::new(Point::new(1.0, 2.0, 0.0), -Vector::Z);
        assert!(xy_plane().intersect(&ray, f64::INFINITY).is_empty());
    }

    #[test]
    fn test_intersect_parallel() {
        // Parallel, off the plane
        let ray = Ray::new(Point::new(0.0, 0.0, 2.0), Vector::X);
        assert!(xy_plane().intersect(&ray, f64::INFINITY).is_empty());

        // Parallel and lying in the plane
        let ray = Ray::new(Point::new(0.0, 3.0, 1.0), Vector::X);
        assert!(xy_plane().intersect(&ray, f64::INFINITY).is_empty());
    }

    #[test]
    fn test_intersect_origin_on_plane() {
        // Starting on the plane, leaving it
        let ray = Ray::new(Point::new(4.0, 4.0, 1.0), Vector::new(1.0, 0.0, 1.0).unwrap());
        assert!(xy_plane().intersect(&ray, f64::INFINITY).is_empty());

        // Starting exactly at the plane's defining point
        let ray = Ray::new(Point::new(0.0, 0.0, 1.0), Vector::Z);
        assert!(xy_plane().intersect(&ray, f64::INFINITY).is_empty());
    }

    #[test]
    fn test_unbounded() {
        assert!(xy_plane().bounding_box().is_none());
    }
}
