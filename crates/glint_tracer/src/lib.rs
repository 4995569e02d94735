//! glint tracer - recursive Whitted-style ray tracing
//!
//! Exact analytic ray/surface intersection for planes, spheres, polygons,
//! tubes and cylinders behind an axis-aligned bounding box filter, shaded
//! with Phong local lighting, shadows through transparent surfaces, and
//! recursive reflection and refraction with optional jittered soft sampling.
//!
//! A thin pinhole [`Camera`] and a parallel bucket [`render`] driver are
//! included to exercise the tracer end to end.

mod camera;
mod hittable;
mod light;
mod material;
mod plane;
mod polygon;
mod render;
mod sampling;
mod scene;
mod shape;
mod sphere;
mod tracer;
mod tube;

pub use camera::Camera;
pub use hittable::{closest_hit, GeoPoint, Geometries, Intersectable};
pub use light::{AmbientLight, DirectionalLight, LightSource, PointLight, SpotLight};
pub use material::{Material, MaterialBuilder};
pub use plane::Plane;
pub use polygon::{Polygon, Triangle};
pub use render::{
    color_to_rgba, generate_buckets, linear_to_gamma, render, render_bucket, render_pixel,
    render_with_progress, Bucket, BucketResult, ImageBuffer, Progress, RenderSettings,
    DEFAULT_BUCKET_SIZE,
};
pub use sampling::{soft_rays, JitterGrid};
pub use scene::{Scene, SceneBuilder};
pub use shape::{Geometry, Shape, Surface};
pub use sphere::Sphere;
pub use tracer::{RayTracer, TracerConfig};
pub use tube::{Cylinder, Tube};

/// Re-export the math types the tracer API is built on
pub use glint_math::{Aabb, Coefficients, Color, GeometryError, Point, Ray, Vector};
