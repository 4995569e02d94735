//! Light sources: ambient, directional, point and spot.

use glint_math::tolerance::align_zero;
use glint_math::{Coefficients, Color, GeometryError, Point, Vector};

/// Constant light added once to every primary hit.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AmbientLight {
    intensity: Color,
}

impl AmbientLight {
    /// No ambient light at all.
    pub const NONE: AmbientLight = AmbientLight {
        intensity: Color::BLACK,
    };

    /// Ambient light of intensity `ia` scaled by `ka`.
    pub fn new(ia: Color, ka: impl Into<Coefficients>) -> Self {
        Self {
            intensity: ia * ka.into(),
        }
    }

    pub fn intensity(&self) -> Color {
        self.intensity
    }
}

/// Light from an infinitely distant source: one direction, no falloff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    intensity: Color,
    direction: Vector,
}

impl DirectionalLight {
    pub fn new(intensity: Color, direction: Vector) -> Self {
        Self {
            intensity,
            direction: direction.normalize(),
        }
    }
}

/// Distance falloff `kc + kl·d + kq·d²`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Attenuation {
    kc: f64,
    kl: f64,
    kq: f64,
}

impl Attenuation {
    const NONE: Attenuation = Attenuation {
        kc: 1.0,
        kl: 0.0,
        kq: 0.0,
    };

    fn new(kc: f64, kl: f64, kq: f64) -> Result<Self, GeometryError> {
        if [kc, kl, kq].iter().any(|k| !(k.is_finite() && *k >= 0.0)) {
            return Err(GeometryError::InvalidLight(
                "attenuation factors must be finite and non-negative",
            ));
        }
        if kc + kl + kq <= 0.0 {
            return Err(GeometryError::InvalidLight("attenuation factors are all zero"));
        }
        Ok(Self { kc, kl, kq })
    }

    fn factor(&self, distance: f64) -> f64 {
        self.kc + self.kl * distance + self.kq * distance * distance
    }
}

/// Omnidirectional light at a position, dimming with distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    intensity: Color,
    position: Point,
    attenuation: Attenuation,
}

impl PointLight {
    pub fn new(intensity: Color, position: Point) -> Self {
        Self {
            intensity,
            position,
            attenuation: Attenuation::NONE,
        }
    }

    /// Set the constant, linear and quadratic falloff factors.
    ///
    /// All must be finite and non-negative, and at least one positive.
    pub fn with_attenuation(mut self, kc: f64, kl: f64, kq: f64) -> Result<Self, GeometryError> {
        self.attenuation = Attenuation::new(kc, kl, kq)?;
        Ok(self)
    }

    pub fn position(&self) -> Point {
        self.position
    }

    fn intensity_at(&self, point: &Point) -> Color {
        let d = self.position.distance(point);
        self.intensity / self.attenuation.factor(d)
    }

    fn direction_to(&self, point: &Point) -> Option<Vector> {
        point.subtract(&self.position).ok().map(|l| l.normalize())
    }
}

/// A point light shining mainly along one direction.
///
/// Intensity is the point light's, scaled by the cosine between the spot
/// direction and the direction to the lit point (zero behind the spot).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotLight {
    light: PointLight,
    direction: Vector,
}

impl SpotLight {
    pub fn new(intensity: Color, position: Point, direction: Vector) -> Self {
        Self {
            light: PointLight::new(intensity, position),
            direction: direction.normalize(),
        }
    }

    pub fn with_attenuation(mut self, kc: f64, kl: f64, kq: f64) -> Result<Self, GeometryError> {
        self.light = self.light.with_attenuation(kc, kl, kq)?;
        Ok(self)
    }

    fn intensity_at(&self, point: &Point) -> Color {
        match self.light.direction_to(point) {
            Some(l) => self.light.intensity_at(point) * self.direction.dot(&l).max(0.0),
            None => Color::BLACK,
        }
    }
}

/// Any light that illuminates individual points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightSource {
    Directional(DirectionalLight),
    Point(PointLight),
    Spot(SpotLight),
}

impl LightSource {
    /// Intensity arriving at `point`.
    pub fn intensity_at(&self, point: &Point) -> Color {
        match self {
            LightSource::Directional(light) => light.intensity,
            LightSource::Point(light) => light.intensity_at(point),
            LightSource::Spot(light) => light.intensity_at(point),
        }
    }

    /// Unit direction from the light towards `point`.
    ///
    /// `None` when a positional light sits exactly on the point.
    pub fn direction_to(&self, point: &Point) -> Option<Vector> {
        match self {
            LightSource::Directional(light) => Some(light.direction),
            LightSource::Point(light) => light.direction_to(point),
            LightSource::Spot(spot) => spot.light.direction_to(point),
        }
    }

    /// Distance from the light to `point`. Infinite for directional lights.
    pub fn distance_to(&self, point: &Point) -> f64 {
        match self {
            LightSource::Directional(_) => f64::INFINITY,
            LightSource::Point(light) => align_zero(light.position.distance(point)),
            LightSource::Spot(spot) => align_zero(spot.light.position.distance(point)),
        }
    }
}

impl From<DirectionalLight> for LightSource {
    fn from(light: DirectionalLight) -> Self {
        LightSource::Directional(light)
    }
}

impl From<PointLight> for LightSource {
    fn from(light: PointLight) -> Self {
        LightSource::Point(light)
    }
}

impl From<SpotLight> for LightSource {
    fn from(light: SpotLight) -> Self {
        LightSource::Spot(light)
    }
}
