//! Surface trait, the closed set of primitive shapes, and shaded geometry.

use crate::hittable::{GeoPoint, Intersectable};
use crate::{Cylinder, Material, Plane, Polygon, Sphere, Triangle, Tube};
use glint_math::{Aabb, Color, Point, Ray, Vector};

/// Geometric behaviour shared by every primitive.
pub trait Surface {
    /// Unit normal at a point on the surface.
    fn normal_at(&self, point: &Point) -> Vector;

    /// Points where the ray meets the surface with `0 < t <= max_distance`,
    /// nearest first. Empty if there are none.
    fn intersect(&self, ray: &Ray, max_distance: f64) -> Vec<Point>;

    /// Axis-aligned bounds, `None` when the surface is unbounded.
    fn bounding_box(&self) -> Option<Aabb>;
}

/// One of the supported primitives.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Plane(Plane),
    Sphere(Sphere),
    Triangle(Triangle),
    Polygon(Polygon),
    Tube(Tube),
    Cylinder(Cylinder),
}

impl Shape {
    fn as_surface(&self) -> &dyn Surface {
        match self {
            Shape::Plane(s) => s,
            Shape::Sphere(s) => s,
            Shape::Triangle(s) => s,
            Shape::Polygon(s) => s,
            Shape::Tube(s) => s,
            Shape::Cylinder(s) => s,
        }
    }
}

impl Surface for Shape {
    fn normal_at(&self, point: &Point) -> Vector {
        self.as_surface().normal_at(point)
    }

    fn intersect(&self, ray: &Ray, max_distance: f64) -> Vec<Point> {
        self.as_surface().intersect(ray, max_distance)
    }

    fn bounding_box(&self) -> Option<Aabb> {
        self.as_surface().bounding_box()
    }
}

macro_rules! shape_from {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for Shape {
                fn from(shape: $variant) -> Self {
                    Shape::$variant(shape)
                }
            }
        )*
    };
}

shape_from!(Plane, Sphere, Triangle, Polygon, Tube, Cylinder);

/// A shape with its appearance: emitted light and material.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    shape: Shape,
    emission: Color,
    material: Material,
}

impl Geometry {
    /// Wrap a shape with no emission and the default material.
    pub fn new(shape: impl Into<Shape>) -> Self {
        Self {
            shape: shape.into(),
            emission: Color::BLACK,
            material: Material::default(),
        }
    }

    pub fn with_emission(mut self, emission: Color) -> Self {
        self.emission = emission;
        self
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn emission(&self) -> Color {
        self.emission
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn normal_at(&self, point: &Point) -> Vector {
        self.shape.normal_at(point)
    }
}

impl Intersectable for Geometry {
    fn intersect_exact<'a>(&'a self, ray: &Ray, max_distance: f64) -> Vec<GeoPoint<'a>> {
        self.shape
            .intersect(ray, max_distance)
            .into_iter()
            .map(|point| GeoPoint::new(self, point))
            .collect()
    }

    fn bounding_box(&self) -> Option<Aabb> {
        self.shape.bounding_box()
    }
}
