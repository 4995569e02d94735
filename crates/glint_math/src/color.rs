//! Light intensities and per-channel coefficients.

use glam::DVec3;
use std::ops::{Add, AddAssign, Div, Mul};

/// RGB light intensity.
///
/// Channels are non-negative but unbounded above while light accumulates;
/// clamping happens only when a pixel is written out.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Color(DVec3);

impl Color {
    pub const BLACK: Color = Color(DVec3::ZERO);
    pub const WHITE: Color = Color(DVec3::ONE);

    /// Create a color. Negative channels are clamped to zero.
    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self(DVec3::new(r, g, b).max(DVec3::ZERO))
    }

    /// Same intensity on every channel.
    pub fn gray(intensity: f64) -> Self {
        Self::new(intensity, intensity, intensity)
    }

    #[inline]
    pub fn r(&self) -> f64 {
        self.0.x
    }

    #[inline]
    pub fn g(&self) -> f64 {
        self.0.y
    }

    #[inline]
    pub fn b(&self) -> f64 {
        self.0.z
    }

    pub fn to_dvec3(self) -> DVec3 {
        self.0
    }

    pub fn is_finite(&self) -> bool {
        self.0.is_finite()
    }
}

impl Add for Color {
    type Output = Color;

    fn add(self, other: Color) -> Color {
        Color(self.0 + other.0)
    }
}

impl AddAssign for Color {
    fn add_assign(&mut self, other: Color) {
        self.0 += other.0;
    }
}

impl Mul<f64> for Color {
    type Output = Color;

    fn mul(self, s: f64) -> Color {
        Color((self.0 * s).max(DVec3::ZERO))
    }
}

impl Mul<Coefficients> for Color {
    type Output = Color;

    fn mul(self, k: Coefficients) -> Color {
        Color(self.0 * k.0)
    }
}

impl Div<f64> for Color {
    type Output = Color;

    fn div(self, s: f64) -> Color {
        Color((self.0 / s).max(DVec3::ZERO))
    }
}

/// Per-channel multipliers for diffuse, specular, transparency and
/// reflectivity, and for the cumulative attenuation of a recursive trace.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Coefficients(DVec3);

impl Coefficients {
    pub const ZERO: Coefficients = Coefficients(DVec3::ZERO);
    pub const ONE: Coefficients = Coefficients(DVec3::ONE);

    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self(DVec3::new(r, g, b))
    }

    pub const fn splat(k: f64) -> Self {
        Self(DVec3::splat(k))
    }

    pub fn to_dvec3(self) -> DVec3 {
        self.0
    }

    /// True when every channel is below `epsilon`.
    pub fn below(&self, epsilon: f64) -> bool {
        self.0.x < epsilon && self.0.y < epsilon && self.0.z < epsilon
    }

    pub fn is_zero(&self) -> bool {
        self.0 == DVec3::ZERO
    }

    /// True when every channel is finite and non-negative.
    pub fn is_valid(&self) -> bool {
        self.0.is_finite() && self.0.min_element() >= 0.0
    }
}

impl From<f64> for Coefficients {
    fn from(k: f64) -> Self {
        Self::splat(k)
    }
}

impl Mul for Coefficients {
    type Output = Coefficients;

    fn mul(self, other: Coefficients) -> Coefficients {
        Coefficients(self.0 * other.0)
    }
}

impl Mul<f64> for Coefficients {
    type Output = Coefficients;

    fn mul(self, s: f64) -> Coefficients {
        Coefficients(self.0 * s)
    }
}

impl Add for Coefficients {
    type Output = Coefficients;

    fn add(self, other: Coefficients) -> Coefficients {
        Coefficients(self.0 + other.0)
    }
}
