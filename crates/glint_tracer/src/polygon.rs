//! Convex planar polygons and triangles.

use crate::{Plane, Surface};
use glint_math::tolerance::{align_zero, is_zero};
use glint_math::{Aabb, GeometryError, Point, Ray, Vector};

/// A convex polygon. Vertices are ordered along the edge path and all lie on
/// one plane.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<Point>,
    plane: Plane,
    bbox: Aabb,
}

impl Polygon {
    /// Create a polygon from its ordered vertices.
    ///
    /// Fails if there are fewer than three vertices, if consecutive vertices
    /// coincide (last to first included), if a vertex is off the plane of the
    /// first three, or if the edges do not all turn the same way.
    pub fn new(vertices: Vec<Point>) -> Result<Self, GeometryError> {
        let n = vertices.len();
        if n < 3 {
            return Err(GeometryError::TooFewVertices(n));
        }

        for i in 0..n {
            let j = (i + 1) % n;
            if vertices[i] == vertices[j] {
                return Err(GeometryError::CoincidentVertices(i, j));
            }
        }

        let plane = Plane::from_points(vertices[0], vertices[1], vertices[2])?;
        let normal = plane.normal().to_dvec3();
        let v0 = vertices[0].to_dvec3();

        if let Some(i) = (3..n).find(|&i| !is_zero((vertices[i].to_dvec3() - v0).dot(normal))) {
            return Err(GeometryError::NonCoplanar(i));
        }

        // Turn direction at every vertex must share one sign
        let mut winding = 0.0;
        for i in 0..n {
            let prev = vertices[(i + n - 1) % n].to_dvec3();
            let here = vertices[i].to_dvec3();
            let next = vertices[(i + 1) % n].to_dvec3();

            let turn = align_zero((here - prev).cross(next - here).dot(normal));
            if turn == 0.0 || (winding != 0.0 && turn.signum() != winding) {
                return Err(GeometryError::NonConvex(i));
            }
            winding = turn.signum();
        }

        let bbox = Aabb::enclosing(&vertices).unwrap_or(Aabb::EMPTY);

        Ok(Self {
            vertices,
            plane,
            bbox,
        })
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    pub fn plane(&self) -> &Plane {
        &self.plane
    }
}

impl Surface for Polygon {
    fn normal_at(&self, _point: &Point) -> Vector {
        self.plane.normal()
    }

    /// Hit the carrier plane, then keep the point only if it lies strictly
    /// on the same side of every edge. Edges and vertices count as outside.
    fn intersect(&self, ray: &Ray, max_distance: f64) -> Vec<Point> {
        let Some(t) = self.plane.hit_distance(ray, max_distance) else {
            return Vec::new();
        };
        let hit = ray.point_at(t);
        let p = hit.to_dvec3();
        let normal = self.plane.normal().to_dvec3();

        let n = self.vertices.len();
        let mut side = 0.0;
        for i in 0..n {
            let a = self.vertices[i].to_dvec3();
            let b = self.vertices[(i + 1) % n].to_dvec3();

            let s = align_zero((b - a).cross(p - a).dot(normal));
            if s == 0.0 || (side != 0.0 && s.signum() != side) {
                return Vec::new();
            }
            side = s.signum();
        }

        vec![hit]
    }

    fn bounding_box(&self) -> Option<Aabb> {
        Some(self.bbox)
    }
}

/// A triangle, the three-vertex polygon.
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle(Polygon);

impl Triangle {
    pub fn new(a: Point, b: Point, c: Point) -> Result<Self, GeometryError> {
        Polygon::new(vec![a, b, c]).map(Self)
    }

    pub fn vertices(&self) -> &[Point] {
        self.0.vertices()
    }
}

impl Surface for Triangle {
    fn normal_at(&self, point: &Point) -> Vector {
        self.0.normal_at(point)
    }

    fn intersect(&self, ray: &Ray, max_distance: f64) -> Vec<Point> {
        self.0.intersect(ray, max_distance)
    }

    fn bounding_box(&self) -> Option<Aabb> {
        self.0.bounding_box()
    }
}
