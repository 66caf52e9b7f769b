//! RGB colors.
//!
//! Components are nominally in [0, 1], but shading sums and reflection
//! contributions may exceed that range mid-computation. Arithmetic therefore
//! never clamps; values are only clamped once, at pixel emission. Range
//! checking happens at the construction boundary via [`Color::try_new`].

use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Sub, SubAssign};

use crate::error::SceneError;

/// An RGB color with `f64` channels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    /// Red channel.
    pub r: f64,
    /// Green channel.
    pub g: f64,
    /// Blue channel.
    pub b: f64,
}

impl Color {
    /// Black, the zero of color addition and the renderer's background.
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    /// Builds a color without range checking.
    ///
    /// Intermediate shading values legitimately leave [0, 1]; use
    /// [`try_new`](Self::try_new) where the nominal range is a precondition.
    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Builds a color, requiring every channel to be in [0, 1].
    pub fn try_new(r: f64, g: f64, b: f64) -> Result<Self, SceneError> {
        for (name, value) in [("red", r), ("green", g), ("blue", b)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(SceneError::Construction(format!(
                    "{name} component must be in [0, 1], got {value}"
                )));
            }
        }
        Ok(Self { r, g, b })
    }

    /// Copy of this color with every channel clamped into [min, max].
    pub fn clamped(self, min: f64, max: f64) -> Self {
        Self {
            r: self.r.clamp(min, max),
            g: self.g.clamp(min, max),
            b: self.b.clamp(min, max),
        }
    }
}

impl Add for Color {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl AddAssign for Color {
    fn add_assign(&mut self, rhs: Self) {
        self.r += rhs.r;
        self.g += rhs.g;
        self.b += rhs.b;
    }
}

impl Sub for Color {
    type Output = Self;

    fn sub(mut self, rhs: Self) -> Self {
        self -= rhs;
        self
    }
}

impl SubAssign for Color {
    fn sub_assign(&mut self, rhs: Self) {
        self.r -= rhs.r;
        self.g -= rhs.g;
        self.b -= rhs.b;
    }
}

/// Component-wise product, used to filter light through a surface color.
impl Mul for Color {
    type Output = Self;

    fn mul(mut self, rhs: Self) -> Self {
        self *= rhs;
        self
    }
}

impl MulAssign for Color {
    fn mul_assign(&mut self, rhs: Self) {
        self.r *= rhs.r;
        self.g *= rhs.g;
        self.b *= rhs.b;
    }
}

impl Mul<f64> for Color {
    type Output = Self;

    fn mul(mut self, scalar: f64) -> Self {
        self *= scalar;
        self
    }
}

impl Mul<Color> for f64 {
    type Output = Color;

    fn mul(self, color: Color) -> Color {
        color * self
    }
}

impl MulAssign<f64> for Color {
    fn mul_assign(&mut self, scalar: f64) {
        self.r *= scalar;
        self.g *= scalar;
        self.b *= scalar;
    }
}

impl Div<f64> for Color {
    type Output = Self;

    fn div(mut self, scalar: f64) -> Self {
        self /= scalar;
        self
    }
}

impl DivAssign<f64> for Color {
    fn div_assign(&mut self, scalar: f64) {
        self.r /= scalar;
        self.g /= scalar;
        self.b /= scalar;
    }
}

impl fmt::Display for Color {
    /// Formats in the scene-description literal form, `(r, g, b)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.r, self.g, self.b)
    }
}
