//! Simple ray tracer example.
//!
//! Renders a small scene with every primitive type and saves it as PNG.

use anyhow::{Context, Result};
use glint_tracer::{
    render, AmbientLight, Camera, Coefficients, Color, Cylinder, DirectionalLight,
    Geometries, Geometry, ImageBuffer, Material, Plane, Point, PointLight, Polygon, Ray,
    RayTracer, RenderSettings, Scene, Sphere, SpotLight, TracerConfig, Triangle, Tube, Vector,
};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let scene = build_scene()?;

    let camera = Camera::new(Point::new(0.0, 2.0, 12.0), -Vector::Z, Vector::Y)?
        .with_distance(10.0)?
        .with_view_plane(12.0, 9.0)?;

    let tracer = RayTracer::with_config(
        &scene,
        TracerConfig {
            soft_samples: 9,
            ..Default::default()
        },
    )?;

    let settings = RenderSettings::default()
        .with_resolution(800, 600)
        .with_samples(4)
        .with_seed(7);

    let image = render(&camera, &tracer, &settings)?;

    let filename = "output.png";
    save_png(&image, filename)?;
    log::info!("Saved to {filename}");
    Ok(())
}

fn build_scene() -> Result<Scene> {
    let floor = Material::builder()
        .kd(0.5)
        .ks(0.2)
        .kr(0.2)
        .shininess(30.0)
        .glossiness(0.05)
        .build()?;
    let glass = Material::builder()
        .kd(0.1)
        .ks(0.8)
        .kt(0.7)
        .shininess(200.0)
        .diffusiveness(0.02)
        .build()?;
    let matte = Material::builder().kd(0.7).ks(0.3).shininess(20.0).build()?;
    let mirror = Material::builder().kd(0.1).kr(0.8).build()?;

    // Small group so the aggregate's bounding box can cull it
    let mut props = Geometries::new();
    props.add(
        Geometry::new(Sphere::new(Point::new(-3.0, 1.0, 0.0), 1.0)?)
            .with_emission(Color::new(0.3, 0.05, 0.05))
            .with_material(glass),
    );
    props.add(
        Geometry::new(Cylinder::new(Ray::new(Point::new(3.0, 0.0, 0.0), Vector::Y), 0.8, 2.5)?)
            .with_emission(Color::new(0.05, 0.2, 0.05))
            .with_material(matte.clone()),
    );
    props.add(
        Geometry::new(Triangle::new(
            Point::new(-1.0, 0.0, -1.0),
            Point::new(1.0, 0.0, -1.0),
            Point::new(0.0, 2.0, -1.5),
        )?)
        .with_emission(Color::new(0.05, 0.05, 0.3))
        .with_material(matte),
    );

    let back_mirror = Polygon::new(vec![
        Point::new(-6.0, 0.0, -6.0),
        Point::new(6.0, 0.0, -6.0),
        Point::new(6.0, 6.0, -6.0),
        Point::new(-6.0, 6.0, -6.0),
    ])?;

    let scene = Scene::builder("showcase")
        .background(Color::new(0.05, 0.05, 0.1))
        .ambient(AmbientLight::new(Color::WHITE, Coefficients::splat(0.05)))
        .geometry(Geometry::new(Plane::new(Point::ORIGIN, Vector::Y)).with_material(floor))
        .geometry(Geometry::new(back_mirror).with_material(mirror))
        .geometry(
            Geometry::new(Tube::new(Ray::new(Point::new(0.0, 8.0, -4.0), Vector::X), 0.3)?)
                .with_emission(Color::gray(0.1)),
        )
        .geometry(props)
        .light(
            SpotLight::new(Color::new(0.9, 0.8, 0.6), Point::new(-4.0, 6.0, 4.0), Vector::new(1.0, -1.0, -1.0)?)
                .with_attenuation(1.0, 0.01, 0.002)?,
        )
        .light(
            PointLight::new(Color::gray(0.4), Point::new(4.0, 5.0, 3.0))
                .with_attenuation(1.0, 0.02, 0.0)?,
        )
        .light(DirectionalLight::new(Color::gray(0.2), Vector::new(0.0, -1.0, -0.5)?))
        .build();

    Ok(scene)
}

fn save_png(image: &ImageBuffer, filename: &str) -> Result<()> {
    let rgba = image::RgbaImage::from_raw(image.width, image.height, image.to_rgba())
        .context("image buffer size does not match its resolution")?;
    rgba.save(filename).with_context(|| format!("writing {filename}"))?;
    Ok(())
}
