//! Intersectable trait, GeoPoint and the Geometries aggregate.

use crate::Geometry;
use glint_math::{Aabb, Point, Ray};

/// A point where a ray meets a surface, together with that surface.
///
/// The geometry is borrowed from the scene; a GeoPoint never owns it.
#[derive(Debug, Clone, Copy)]
pub struct GeoPoint<'a> {
    /// Surface that was hit
    pub geometry: &'a Geometry,
    /// Point of intersection
    pub point: Point,
}

impl<'a> GeoPoint<'a> {
    pub fn new(geometry: &'a Geometry, point: Point) -> Self {
        Self { geometry, point }
    }
}

impl PartialEq for GeoPoint<'_> {
    /// Same surface instance (by identity) and same point.
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.geometry, other.geometry) && self.point == other.point
    }
}

/// Trait for anything a ray can be tested against.
pub trait Intersectable: Send + Sync {
    /// Exact intersection test, skipping the bounding box.
    ///
    /// Returns every point along the ray with `0 < t <= max_distance`.
    fn intersect_exact<'a>(&'a self, ray: &Ray, max_distance: f64) -> Vec<GeoPoint<'a>>;

    /// Axis-aligned bounds of this object. `None` means unbounded, so no
    /// culling is possible.
    fn bounding_box(&self) -> Option<Aabb>;

    /// Intersect the ray, first rejecting it cheaply if it misses the bounds.
    fn find_intersections<'a>(&'a self, ray: &Ray, max_distance: f64) -> Vec<GeoPoint<'a>> {
        if let Some(bbox) = self.bounding_box() {
            if !bbox.hit(ray) {
                return Vec::new();
            }
        }
        self.intersect_exact(ray, max_distance)
    }
}

/// The hit closest to the ray origin.
pub fn closest_hit<'a>(ray: &Ray, hits: Vec<GeoPoint<'a>>) -> Option<GeoPoint<'a>> {
    ray.closest_by(hits, |gp| gp.point)
}

/// An ordered collection of intersectable objects, itself intersectable.
///
/// The bounding box is the union of the children's boxes. Once an unbounded
/// child is added the whole aggregate is unbounded.
pub struct Geometries {
    objects: Vec<Box<dyn Intersectable>>,
    bbox: Aabb,
}

impl Geometries {
    /// Create a new empty aggregate.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            bbox: Aabb::EMPTY,
        }
    }

    /// Add an object to the aggregate.
    pub fn add(&mut self, object: impl Intersectable + 'static) {
        self.add_boxed(Box::new(object));
    }

    /// Add an already boxed object.
    pub fn add_boxed(&mut self, object: Box<dyn Intersectable>) {
        let child = object.bounding_box().unwrap_or(Aabb::UNIVERSE);
        self.bbox = Aabb::surrounding(&self.bbox, &child);
        self.objects.push(object);
    }

    /// Add several objects at once.
    pub fn add_all<I>(&mut self, objects: I)
    where
        I: IntoIterator<Item = Box<dyn Intersectable>>,
    {
        for object in objects {
            self.add_boxed(object);
        }
    }

    /// Get the number of direct children.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the aggregate is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Default for Geometries {
    fn default() -> Self {
        Self::new()
    }
}

impl Intersectable for Geometries {
    fn intersect_exact<'a>(&'a self, ray: &Ray, max_distance: f64) -> Vec<GeoPoint<'a>> {
        self.objects
            .iter()
            .flat_map(|object| object.find_intersections(ray, max_distance))
            .collect()
    }

    fn bounding_box(&self) -> Option<Aabb> {
        if self.bbox.is_unbounded() {
            None
        } else {
            Some(self.bbox)
        }
    }
}
