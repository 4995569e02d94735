//! Scene description: geometry, lights and background.

use crate::hittable::{Geometries, Intersectable};
use crate::light::{AmbientLight, LightSource};
use glint_math::Color;

/// Everything a render needs to know about the world.
///
/// Built once through [`SceneBuilder`] and never mutated afterwards.
pub struct Scene {
    name: String,
    background: Color,
    ambient: AmbientLight,
    geometries: Geometries,
    lights: Vec<LightSource>,
}

impl Scene {
    pub fn builder(name: impl Into<String>) -> SceneBuilder {
        SceneBuilder {
            scene: Scene {
                name: name.into(),
                background: Color::BLACK,
                ambient: AmbientLight::NONE,
                geometries: Geometries::new(),
                lights: Vec::new(),
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Color of rays that leave the scene.
    pub fn background(&self) -> Color {
        self.background
    }

    pub fn ambient(&self) -> AmbientLight {
        self.ambient
    }

    pub fn geometries(&self) -> &Geometries {
        &self.geometries
    }

    pub fn lights(&self) -> &[LightSource] {
        &self.lights
    }
}

/// Consuming builder for [`Scene`].
pub struct SceneBuilder {
    scene: Scene,
}

impl SceneBuilder {
    pub fn background(mut self, background: Color) -> Self {
        self.scene.background = background;
        self
    }

    pub fn ambient(mut self, ambient: AmbientLight) -> Self {
        self.scene.ambient = ambient;
        self
    }

    /// Add a geometry, or a whole aggregate of them.
    pub fn geometry(mut self, object: impl Intersectable + 'static) -> Self {
        self.scene.geometries.add(object);
        self
    }

    pub fn light(mut self, light: impl Into<LightSource>) -> Self {
        self.scene.lights.push(light.into());
        self
    }

    /// Freeze the scene.
    pub fn build(self) -> Scene {
        let scene = self.scene;
        log::info!(
            "Scene '{}': {} objects, {} lights",
            scene.name,
            scene.geometries.len(),
            scene.lights.len()
        );
        scene
    }
}
