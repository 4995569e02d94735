//! Recursive Whitted-style shading.
//!
//! Each traced ray finds its closest hit and combines:
//! - Local effects: emission plus Phong diffuse and specular from every light
//!   that reaches the point, attenuated by whatever transparent surfaces sit
//!   in between
//! - Global effects: recursive reflection and refraction, optionally spread
//!   into jittered bundles for glossy and blurry surfaces
//!
//! Recursion stops at a fixed depth or once the accumulated attenuation
//! becomes negligible.

use crate::hittable::{closest_hit, GeoPoint, Intersectable};
use crate::light::LightSource;
use crate::sampling::{soft_rays, JitterGrid};
use crate::Scene;
use glint_math::tolerance::{align_zero, check_sign};
use glint_math::{Coefficients, Color, GeometryError, Point, Ray, Vector};
use rand::RngCore;

/// Tracer configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct TracerConfig {
    /// Maximum recursion depth for reflection and refraction
    pub max_depth: u32,
    /// Attenuation below which a contribution is ignored
    pub min_k: f64,
    /// Offset of secondary ray origins from the surface
    pub delta: f64,
    /// Rays per glossy or diffuse bundle, rounded up to a square grid.
    /// 0 or 1 disables soft sampling.
    pub soft_samples: u32,
}

impl Default for TracerConfig {
    fn default() -> Self {
        Self {
            max_depth: 10,
            min_k: 0.001,
            delta: 0.1,
            soft_samples: 16,
        }
    }
}

impl TracerConfig {
    pub fn validate(&self) -> Result<(), GeometryError> {
        if self.max_depth == 0 {
            return Err(GeometryError::InvalidConfig("max_depth must be at least 1"));
        }
        if !(self.min_k.is_finite() && self.min_k >= 0.0) {
            return Err(GeometryError::InvalidConfig("min_k must be finite and non-negative"));
        }
        if !(self.delta.is_finite() && self.delta > 0.0) {
            return Err(GeometryError::InvalidConfig("delta must be finite and positive"));
        }
        Ok(())
    }
}

/// Computes the color seen along rays through an immutable scene.
///
/// Holds no mutable state; share it freely between threads and hand each
/// thread its own random number generator.
pub struct RayTracer<'s> {
    scene: &'s Scene,
    config: TracerConfig,
    grid: JitterGrid,
}

impl<'s> RayTracer<'s> {
    /// Create a tracer with the default configuration.
    pub fn new(scene: &'s Scene) -> Self {
        let config = TracerConfig::default();
        Self {
            scene,
            grid: JitterGrid::for_sample_count(config.soft_samples),
            config,
        }
    }

    pub fn with_config(scene: &'s Scene, config: TracerConfig) -> Result<Self, GeometryError> {
        config.validate()?;
        Ok(Self {
            scene,
            grid: JitterGrid::for_sample_count(config.soft_samples),
            config,
        })
    }

    pub fn scene(&self) -> &'s Scene {
        self.scene
    }

    pub fn config(&self) -> &TracerConfig {
        &self.config
    }

    /// Color seen along a primary ray.
    ///
    /// Background if nothing is hit. Otherwise the shaded color of the
    /// closest hit plus the scene's ambient light.
    pub fn trace_ray(&self, ray: &Ray, rng: &mut dyn RngCore) -> Color {
        match self.find_closest(ray) {
            Some(gp) => {
                self.calc_color(&gp, ray, self.config.max_depth, Coefficients::ONE, rng)
                    + self.scene.ambient().intensity()
            }
            None => self.scene.background(),
        }
    }

    /// Average color of a bundle of primary rays. Black for an empty bundle.
    pub fn trace_rays(&self, rays: &[Ray], rng: &mut dyn RngCore) -> Color {
        if rays.is_empty() {
            return Color::BLACK;
        }
        let mut total = Color::BLACK;
        for ray in rays {
            total += self.trace_ray(ray, rng);
        }
        total / rays.len() as f64
    }

    /// Color at a hit point, `level` recursion steps from the cut-off and
    /// with accumulated attenuation `k`.
    pub fn calc_color(
        &self,
        gp: &GeoPoint<'_>,
        ray: &Ray,
        level: u32,
        k: Coefficients,
        rng: &mut dyn RngCore,
    ) -> Color {
        if level == 0 {
            return Color::BLACK;
        }
        self.local_effects(gp, ray, k) + self.global_effects(gp, ray, level, k, rng)
    }

    fn find_closest(&self, ray: &Ray) -> Option<GeoPoint<'s>> {
        let hits = self.scene.geometries().find_intersections(ray, f64::INFINITY);
        closest_hit(ray, hits)
    }

    fn local_effects(&self, gp: &GeoPoint<'_>, ray: &Ray, k: Coefficients) -> Color {
        let geometry = gp.geometry;
        let mut color = geometry.emission();

        let v = ray.direction();
        let n = geometry.normal_at(&gp.point);
        let nv = align_zero(n.dot(&v));
        // Grazing view sees no lighting
        if nv == 0.0 {
            return color;
        }

        let material = geometry.material();
        for light in self.scene.lights() {
            // Positional light sitting on the point
            let Some(l) = light.direction_to(&gp.point) else {
                continue;
            };
            let nl = align_zero(n.dot(&l));
            if !check_sign(nl, nv) {
                continue;
            }

            let ktr = self.transparency(gp.point, light, l, n);
            if (ktr * k).below(self.config.min_k) {
                continue;
            }

            let intensity = light.intensity_at(&gp.point) * ktr;
            let diffuse = material.kd() * nl.abs();

            let r = l.to_dvec3() - n.to_dvec3() * (2.0 * nl);
            let highlight = (-v.to_dvec3()).dot(r).max(0.0).powf(material.shininess());
            let specular = material.ks() * highlight;

            color += intensity * (diffuse + specular);
        }
        color
    }

    /// Fraction of the light that reaches `point`: the product of the
    /// transparency of everything between the point and the light.
    fn transparency(&self, point: Point, light: &LightSource, l: Vector, n: Vector) -> Coefficients {
        let shadow_ray = Ray::offset(point, -l, &n, self.config.delta);
        let max_distance = light.distance_to(&point);

        self.scene
            .geometries()
            .find_intersections(&shadow_ray, max_distance)
            .iter()
            .fold(Coefficients::ONE, |ktr, hit| ktr * hit.geometry.material().kt())
    }

    fn global_effects(
        &self,
        gp: &GeoPoint<'_>,
        ray: &Ray,
        level: u32,
        k: Coefficients,
        rng: &mut dyn RngCore,
    ) -> Color {
        let material = gp.geometry.material();
        let n = gp.geometry.normal_at(&gp.point);
        let d = ray.direction();
        let traveled = ray.origin().distance(&gp.point);

        let mut color = Color::BLACK;

        let kr = material.kr();
        let kkr = k * kr;
        if !kkr.below(self.config.min_k) {
            let reflected = d.to_dvec3() - n.to_dvec3() * (2.0 * d.dot(&n));
            match Vector::try_from_dvec3(reflected) {
                Ok(r) => {
                    let ideal = Ray::offset(gp.point, r, &n, self.config.delta);
                    let rays = soft_rays(&ideal, &n, material.glossiness(), traveled, &self.grid, rng);
                    color += self.average_secondary(&rays, level - 1, kkr, rng) * kr;
                }
                Err(e) => log::debug!("skipping reflection at {:?}: {e}", gp.point),
            }
        }

        let kt = material.kt();
        let kkt = k * kt;
        if !kkt.below(self.config.min_k) {
            let ideal = Ray::offset(gp.point, d, &n, self.config.delta);
            let rays = soft_rays(&ideal, &n, material.diffusiveness(), traveled, &self.grid, rng);
            color += self.average_secondary(&rays, level - 1, kkt, rng) * kt;
        }

        color
    }

    /// Mean color over secondary rays. Rays that escape the scene add black.
    fn average_secondary(
        &self,
        rays: &[Ray],
        level: u32,
        k: Coefficients,
        rng: &mut dyn RngCore,
    ) -> Color {
        if rays.is_empty() {
            return Color::BLACK;
        }
        let mut total = Color::BLACK;
        for ray in rays {
            if let Some(gp) = self.find_closest(ray) {
                total += self.calc_color(&gp, ray, level, k, rng);
            }
        }
        total / rays.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AmbientLight, Geometry, Material, Plane, PointLight, Sphere};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn close(a: Color, b: Color) -> bool {
        (a.to_dvec3() - b.to_dvec3()).abs().max_element() < 1e-9
    }

    fn matte_floor() -> Geometry {
        Geometry::new(Plane::new(Point::ORIGIN, Vector::Z))
            .with_material(Material::builder().kd(1.0).build().unwrap())
    }

    fn light_above() -> PointLight {
        PointLight::new(Color::WHITE, Point::new(0.0, 0.0, 10.0))
    }

    fn down_at_origin() -> Ray {
        Ray::new(Point::new(0.0, 0.0, 2.0), -Vector::Z)
    }

    #[test]
    fn test_config_validation() {
        assert!(TracerConfig::default().validate().is_ok());

        let config = TracerConfig {
            max_depth: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = TracerConfig {
            delta: -0.1,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let scene = Scene::builder("empty").build();
        let config = TracerConfig {
            min_k: f64::NAN,
            ..Default::default()
        };
        assert!(RayTracer::with_config(&scene, config).is_err());
    }

    #[test]
    fn test_miss_returns_background() {
        let scene = Scene::builder("empty")
            .background(Color::new(0.1, 0.2, 0.3))
            .ambient(AmbientLight::new(Color::WHITE, 0.5))
            .build();
        let tracer = RayTracer::new(&scene);
        let mut rng = StdRng::seed_from_u64(0);

        assert_eq!(tracer.trace_ray(&down_at_origin(), &mut rng), Color::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn test_level_zero_is_black() {
        let scene = Scene::builder("emitter")
            .geometry(matte_floor().with_emission(Color::WHITE))
            .build();
        let tracer = RayTracer::new(&scene);
        let mut rng = StdRng::seed_from_u64(0);

        let geometry = &matte_floor();
        let gp = GeoPoint::new(geometry, Point::ORIGIN);
        let color = tracer.calc_color(&gp, &down_at_origin(), 0, Coefficients::ONE, &mut rng);
        assert_eq!(color, Color::BLACK);
    }

    #[test]
    fn test_direct_light() {
        let scene = Scene::builder("lit floor")
            .geometry(matte_floor())
            .light(light_above())
            .build();
        let tracer = RayTracer::new(&scene);
        let mut rng = StdRng::seed_from_u64(0);

        // kD · |n·l| · I with the light straight above
        assert!(close(tracer.trace_ray(&down_at_origin(), &mut rng), Color::WHITE));
    }

    #[test]
    fn test_light_on_the_other_side() {
        let scene = Scene::builder("lit from below")
            .geometry(matte_floor())
            .light(PointLight::new(Color::WHITE, Point::new(0.0, 0.0, -10.0)))
            .build();
        let tracer = RayTracer::new(&scene);
        let mut rng = StdRng::seed_from_u64(0);

        assert_eq!(tracer.trace_ray(&down_at_origin(), &mut rng), Color::BLACK);
    }

    #[test]
    fn test_light_at_the_hit_point_is_ignored() {
        let scene = Scene::builder("light on floor")
            .geometry(matte_floor())
            .light(PointLight::new(Color::WHITE, Point::ORIGIN))
            .build();
        let tracer = RayTracer::new(&scene);
        let mut rng = StdRng::seed_from_u64(0);

        assert_eq!(tracer.trace_ray(&down_at_origin(), &mut rng), Color::BLACK);
    }

    #[test]
    fn test_opaque_blocker_casts_shadow() {
        let scene = Scene::builder("shadow")
            .geometry(matte_floor())
            .geometry(Geometry::new(Sphere::new(Point::new(0.0, 0.0, 5.0), 1.0).unwrap()))
            .light(light_above())
            .build();
        let tracer = RayTracer::new(&scene);
        let mut rng = StdRng::seed_from_u64(0);

        assert_eq!(tracer.trace_ray(&down_at_origin(), &mut rng), Color::BLACK);
    }

    #[test]
    fn test_transparent_blocker_dims_light() {
        let glass = Material::builder().kt(0.5).build().unwrap();
        let scene = Scene::builder("soft shadow")
            .geometry(matte_floor())
            .geometry(
                Geometry::new(Sphere::new(Point::new(0.0, 0.0, 5.0), 1.0).unwrap())
                    .with_material(glass),
            )
            .light(light_above())
            .build();
        let tracer = RayTracer::new(&scene);
        let mut rng = StdRng::seed_from_u64(0);

        // Shadow ray crosses the sphere twice
        assert!(close(tracer.trace_ray(&down_at_origin(), &mut rng), Color::gray(0.25)));
    }

    #[test]
    fn test_specular_highlight() {
        let shiny = Material::builder().ks(1.0).shininess(10.0).build().unwrap();
        let scene = Scene::builder("highlight")
            .geometry(Geometry::new(Plane::new(Point::ORIGIN, Vector::Z)).with_material(shiny))
            .light(light_above())
            .build();
        let tracer = RayTracer::new(&scene);
        let mut rng = StdRng::seed_from_u64(0);

        // Viewer on the mirror direction of the light
        assert!(close(tracer.trace_ray(&down_at_origin(), &mut rng), Color::WHITE));
    }

    #[test]
    fn test_ambient_added_once() {
        let mirror = Material::builder().kr(1.0).build().unwrap();
        let scene = Scene::builder("ambient")
            .ambient(AmbientLight::new(Color::WHITE, 0.2))
            .geometry(Geometry::new(Plane::new(Point::ORIGIN, Vector::Z)).with_material(mirror.clone()))
            .geometry(
                Geometry::new(Plane::new(Point::new(0.0, 0.0, 4.0), -Vector::Z))
                    .with_material(mirror),
            )
            .build();
        let tracer = RayTracer::new(&scene);
        let mut rng = StdRng::seed_from_u64(0);

        assert!(close(tracer.trace_ray(&down_at_origin(), &mut rng), Color::gray(0.2)));
    }

    #[test]
    fn test_escaping_reflection_is_black() {
        let mirror = Material::builder().kr(1.0).build().unwrap();
        let scene = Scene::builder("mirror")
            .background(Color::new(1.0, 0.0, 0.0))
            .geometry(Geometry::new(Plane::new(Point::ORIGIN, Vector::Z)).with_material(mirror))
            .build();
        let tracer = RayTracer::new(&scene);
        let mut rng = StdRng::seed_from_u64(0);

        assert_eq!(tracer.trace_ray(&down_at_origin(), &mut rng), Color::BLACK);
    }

    #[test]
    fn test_mirror_recursion_depth() {
        let mirror = Material::builder().kr(1.0).build().unwrap();
        let glow = Color::gray(0.1);
        let scene = Scene::builder("hall of mirrors")
            .geometry(
                Geometry::new(Plane::new(Point::ORIGIN, Vector::Z))
                    .with_material(mirror.clone())
                    .with_emission(glow),
            )
            .geometry(
                Geometry::new(Plane::new(Point::new(0.0, 0.0, 4.0), -Vector::Z))
                    .with_material(mirror)
                    .with_emission(glow),
            )
            .build();
        let config = TracerConfig {
            max_depth: 3,
            ..Default::default()
        };
        let tracer = RayTracer::with_config(&scene, config).unwrap();
        let mut rng = StdRng::seed_from_u64(0);

        // One emission per bounce, three bounces
        assert!(close(tracer.trace_ray(&down_at_origin(), &mut rng), Color::gray(0.3)));
    }

    #[test]
    fn test_lossless_surfaces_terminate() {
        let lossless = Material::builder().kr(1.0).kt(1.0).build().unwrap();
        let scene = Scene::builder("lossless")
            .geometry(
                Geometry::new(Plane::new(Point::ORIGIN, Vector::Z))
                    .with_material(lossless.clone())
                    .with_emission(Color::gray(0.1)),
            )
            .geometry(
                Geometry::new(Plane::new(Point::new(0.0, 0.0, 4.0), -Vector::Z))
                    .with_material(lossless)
                    .with_emission(Color::gray(0.1)),
            )
            .build();
        let tracer = RayTracer::new(&scene);
        let mut rng = StdRng::seed_from_u64(0);

        let color = tracer.trace_ray(&down_at_origin(), &mut rng);
        assert!(color.is_finite());
        assert!(color.r() >= 0.1);
    }

    fn glass_over_emitter(glass: Material) -> Scene {
        Scene::builder("glass pane")
            .geometry(Geometry::new(Plane::new(Point::ORIGIN, Vector::Z)).with_material(glass))
            .geometry(
                Geometry::new(Plane::new(Point::new(0.0, 0.0, -5.0), Vector::Z))
                    .with_emission(Color::WHITE),
            )
            .build()
    }

    #[test]
    fn test_refraction_passes_light_through() {
        let scene = glass_over_emitter(Material::builder().kt(0.5).build().unwrap());
        let tracer = RayTracer::new(&scene);
        let mut rng = StdRng::seed_from_u64(0);

        // Straight through the pane onto the emitter, scaled by kT
        assert!(close(tracer.trace_ray(&down_at_origin(), &mut rng), Color::gray(0.5)));
    }

    #[test]
    fn test_diffuse_refraction_averages_traced_rays() {
        let frosted = Material::builder().kt(0.5).diffusiveness(0.2).build().unwrap();
        let scene = glass_over_emitter(frosted);
        let tracer = RayTracer::new(&scene);
        let ray = Ray::new(Point::new(0.0, 0.0, 2.0), Vector::new(1.0, 0.0, -2.0).unwrap());

        // Every jittered ray still lands on the emitter
        let a = tracer.trace_ray(&ray, &mut StdRng::seed_from_u64(5));
        assert!(close(a, Color::gray(0.5)));

        let b = tracer.trace_ray(&ray, &mut StdRng::seed_from_u64(5));
        assert_eq!(a, b);
    }

    #[test]
    fn test_glossy_reflection_averages_traced_rays() {
        let glossy = Material::builder().kr(1.0).glossiness(0.1).build().unwrap();
        let scene = Scene::builder("glossy")
            .geometry(Geometry::new(Plane::new(Point::ORIGIN, Vector::Z)).with_material(glossy))
            .geometry(
                Geometry::new(Plane::new(Point::new(0.0, 0.0, 5.0), -Vector::Z))
                    .with_emission(Color::WHITE),
            )
            .build();
        let tracer = RayTracer::new(&scene);
        let ray = Ray::new(Point::new(0.0, 0.0, 2.0), Vector::new(1.0, 0.0, -1.0).unwrap());

        // Every jittered ray reaches the emitter
        let a = tracer.trace_ray(&ray, &mut StdRng::seed_from_u64(11));
        assert!(close(a, Color::WHITE));

        let b = tracer.trace_ray(&ray, &mut StdRng::seed_from_u64(11));
        assert_eq!(a, b);
    }

    #[test]
    fn test_trace_rays_average() {
        let scene = Scene::builder("half")
            .background(Color::WHITE)
            .geometry(matte_floor())
            .build();
        let tracer = RayTracer::new(&scene);
        let mut rng = StdRng::seed_from_u64(0);

        let rays = [down_at_origin(), Ray::new(Point::new(0.0, 0.0, 2.0), Vector::Z)];
        assert!(close(tracer.trace_rays(&rays, &mut rng), Color::gray(0.5)));
        assert_eq!(tracer.trace_rays(&[], &mut rng), Color::BLACK);
    }
}
