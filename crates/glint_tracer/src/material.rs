//! Surface material coefficients for the Phong model.

use glint_math::{Coefficients, GeometryError};

/// How a surface reflects, transmits and scatters light.
///
/// Every coefficient defaults to zero, giving a black, opaque, non-reflective
/// surface. Build non-default materials through [`Material::builder`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Material {
    kd: Coefficients,
    ks: Coefficients,
    kt: Coefficients,
    kr: Coefficients,
    shininess: f64,
    glossiness: f64,
    diffusiveness: f64,
}

impl Material {
    pub fn builder() -> MaterialBuilder {
        MaterialBuilder::default()
    }

    /// Diffuse reflection.
    pub fn kd(&self) -> Coefficients {
        self.kd
    }

    /// Specular highlight.
    pub fn ks(&self) -> Coefficients {
        self.ks
    }

    /// Transparency, also the shadow attenuation factor.
    pub fn kt(&self) -> Coefficients {
        self.kt
    }

    /// Mirror reflection.
    pub fn kr(&self) -> Coefficients {
        self.kr
    }

    /// Phong exponent.
    pub fn shininess(&self) -> f64 {
        self.shininess
    }

    /// Spread of reflected rays. Zero gives a perfect mirror.
    pub fn glossiness(&self) -> f64 {
        self.glossiness
    }

    /// Spread of refracted rays. Zero gives clear transparency.
    pub fn diffusiveness(&self) -> f64 {
        self.diffusiveness
    }
}

/// Consuming builder for [`Material`], validated on `build`.
#[derive(Debug, Clone, Default)]
pub struct MaterialBuilder {
    material: Material,
}

impl MaterialBuilder {
    pub fn kd(mut self, kd: impl Into<Coefficients>) -> Self {
        self.material.kd = kd.into();
        self
    }

    pub fn ks(mut self, ks: impl Into<Coefficients>) -> Self {
        self.material.ks = ks.into();
        self
    }

    pub fn kt(mut self, kt: impl Into<Coefficients>) -> Self {
        self.material.kt = kt.into();
        self
    }

    pub fn kr(mut self, kr: impl Into<Coefficients>) -> Self {
        self.material.kr = kr.into();
        self
    }

    pub fn shininess(mut self, shininess: f64) -> Self {
        self.material.shininess = shininess;
        self
    }

    pub fn glossiness(mut self, glossiness: f64) -> Self {
        self.material.glossiness = glossiness;
        self
    }

    pub fn diffusiveness(mut self, diffusiveness: f64) -> Self {
        self.material.diffusiveness = diffusiveness;
        self
    }

    /// Check every value is finite and non-negative.
    pub fn build(self) -> Result<Material, GeometryError> {
        let m = self.material;

        let coefficients = [(m.kd, "kD"), (m.ks, "kS"), (m.kt, "kT"), (m.kr, "kR")];
        if let Some((_, name)) = coefficients.into_iter().find(|(k, _)| !k.is_valid()) {
            return Err(GeometryError::InvalidMaterial(name));
        }

        let scalars = [
            (m.shininess, "shininess"),
            (m.glossiness, "glossiness"),
            (m.diffusiveness, "diffusiveness"),
        ];
        if let Some((_, name)) = scalars.into_iter().find(|(v, _)| !(v.is_finite() && *v >= 0.0)) {
            return Err(GeometryError::InvalidMaterial(name));
        }

        Ok(m)
    }
}
