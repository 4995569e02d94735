//! Infinite tube and finite cylinder primitives.

use crate::{Plane, Surface};
use glint_math::tolerance::{align_zero, is_zero};
use glint_math::{Aabb, DVec3, GeometryError, Point, Ray, Vector};

/// An infinite circular tube around an axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Tube {
    axis: Ray,
    radius: f64,
}

impl Tube {
    pub fn new(axis: Ray, radius: f64) -> Result<Self, GeometryError> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(GeometryError::NonPositiveRadius(radius));
        }
        Ok(Self { axis, radius })
    }

    pub fn axis(&self) -> Ray {
        self.axis
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Ray parameters of the wall crossings, nearest first.
    ///
    /// Solves `a·t² + b·t + c = 0` built from the ray direction and the
    /// origin offset with their axial components removed. Works on raw
    /// vectors so vanishing components never need a `Vector`.
    pub(crate) fn roots(&self, ray: &Ray, max_distance: f64) -> Vec<f64> {
        let va = self.axis.direction().to_dvec3();
        let v = ray.direction().to_dvec3();

        let v_va = align_zero(v.dot(va));
        let v_perp = if v_va == 0.0 { v } else { v - va * v_va };
        let a = v_perp.length_squared();
        // Parallel to the axis
        if is_zero(a) {
            return Vec::new();
        }

        let dp = ray.origin().to_dvec3() - self.axis.origin().to_dvec3();
        let r2 = self.radius * self.radius;
        let (b, c) = if dp == DVec3::ZERO {
            (0.0, -r2)
        } else {
            let dp_va = align_zero(dp.dot(va));
            let dp_perp = if dp_va == 0.0 { dp } else { dp - va * dp_va };
            (2.0 * v_perp.dot(dp_perp), dp_perp.length_squared() - r2)
        };

        let discriminant = align_zero(b * b - 4.0 * a * c);
        if discriminant <= 0.0 {
            return Vec::new();
        }

        let sqrt_d = discriminant.sqrt();
        let near = align_zero((-b - sqrt_d) / (2.0 * a));
        let far = align_zero((-b + sqrt_d) / (2.0 * a));

        [near, far]
            .into_iter()
            .filter(|&t| t > 0.0 && align_zero(t - max_distance) <= 0.0)
            .collect()
    }

    /// Signed distance of the point's projection along the axis.
    fn axial_offset(&self, point: &Point) -> f64 {
        (point.to_dvec3() - self.axis.origin().to_dvec3()).dot(self.axis.direction().to_dvec3())
    }
}

impl Surface for Tube {
    fn normal_at(&self, point: &Point) -> Vector {
        let va = self.axis.direction().to_dvec3();
        let foot = self.axis.origin().to_dvec3() + va * self.axial_offset(point);

        match Vector::try_from_dvec3(point.to_dvec3() - foot) {
            Ok(radial) => radial.normalize(),
            Err(_) => {
                log::debug!("tube normal requested on the axis at {point:?}");
                self.axis.direction().any_orthogonal()
            }
        }
    }

    fn intersect(&self, ray: &Ray, max_distance: f64) -> Vec<Point> {
        self.roots(ray, max_distance)
            .into_iter()
            .map(|t| ray.point_at(t))
            .collect()
    }

    fn bounding_box(&self) -> Option<Aabb> {
        None
    }
}

/// A tube cut to `height` along its axis and closed by two disks.
///
/// The base disk is centered on the axis origin, the top disk `height`
/// further along the axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Cylinder {
    tube: Tube,
    height: f64,
    base: Plane,
    top: Plane,
    bbox: Aabb,
}

impl Cylinder {
    pub fn new(axis: Ray, radius: f64, height: f64) -> Result<Self, GeometryError> {
        if !(height.is_finite() && height > 0.0) {
            return Err(GeometryError::NonPositiveHeight(height));
        }
        let tube = Tube::new(axis, radius)?;

        let va = axis.direction().to_dvec3();
        let base_center = axis.origin().to_dvec3();
        let top_center = base_center + va * height;

        // Disk extent along each world axis
        let extent = DVec3::new(
            radius * (1.0 - va.x * va.x).max(0.0).sqrt(),
            radius * (1.0 - va.y * va.y).max(0.0).sqrt(),
            radius * (1.0 - va.z * va.z).max(0.0).sqrt(),
        );
        let bbox = Aabb::from_points(
            (base_center.min(top_center) - extent).into(),
            (base_center.max(top_center) + extent).into(),
        );

        Ok(Self {
            base: Plane::new(axis.origin(), axis.direction()),
            top: Plane::new(top_center.into(), axis.direction()),
            tube,
            height,
            bbox,
        })
    }

    pub fn tube(&self) -> &Tube {
        &self.tube
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Cap hit, if the ray crosses the cap plane inside the disk.
    fn cap_hit(&self, cap: &Plane, ray: &Ray, max_distance: f64) -> Option<(f64, Point)> {
        let t = cap.hit_distance(ray, max_distance)?;
        let point = ray.point_at(t);
        let center = cap.point();

        let inside = point == center
            || align_zero(point.distance_squared(&center) - self.tube.radius.powi(2)) < 0.0;
        inside.then_some((t, point))
    }
}

impl Surface for Cylinder {
    fn normal_at(&self, point: &Point) -> Vector {
        let s = self.tube.axial_offset(point);
        if is_zero(s) {
            -self.tube.axis.direction()
        } else if is_zero(s - self.height) {
            self.tube.axis.direction()
        } else {
            self.tube.normal_at(point)
        }
    }

    fn intersect(&self, ray: &Ray, max_distance: f64) -> Vec<Point> {
        let mut hits: Vec<(f64, Point)> = self
            .tube
            .roots(ray, max_distance)
            .into_iter()
            .map(|t| (t, ray.point_at(t)))
            .filter(|(_, p)| {
                let s = align_zero(self.tube.axial_offset(p));
                s > 0.0 && align_zero(s - self.height) < 0.0
            })
            .collect();

        hits.extend(self.cap_hit(&self.base, ray, max_distance));
        hits.extend(self.cap_hit(&self.top, ray, max_distance));

        hits.sort_by(|(a, _), (b, _)| a.total_cmp(b));
        hits.into_iter().map(|(_, p)| p).collect()
    }

    fn bounding_box(&self) -> Option<Aabb> {
        Some(self.bbox)
    }
}
