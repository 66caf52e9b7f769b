//! Infinite plane primitive.

use crate::color::Color;
use crate::error::{check_direction, check_reflectivity, SceneError};
use crate::ray::Ray;
use crate::shape::Shape;
use crate::vector::Vec3;

/// Infinite plane described by its signed distance from the origin and a
/// surface normal: the points P with `P·N + dist = 0`.
#[derive(Debug, Clone)]
pub struct InfPlane {
    dist: f64,
    normal: Vec3,
    color: Color,
    reflectivity: f64,
}

impl InfPlane {
    /// Creates a plane. The normal is normalized here and must be nonzero;
    /// reflectivity must be in [0, 1].
    pub fn new(
        color: Color,
        dist: f64,
        normal: Vec3,
        reflectivity: f64,
    ) -> Result<Self, SceneError> {
        check_direction("plane surface normal", normal)?;
        check_reflectivity(reflectivity)?;
        Ok(Self {
            dist,
            normal: normal.normalized(),
            color,
            reflectivity,
        })
    }

    /// Signed distance of this plane from the origin.
    pub fn dist(&self) -> f64 {
        self.dist
    }
}

impl Shape for InfPlane {
    /// For a ray `P + D·t` the intersection time is
    /// `t = −(P·N + dist) / (D·N)`; a zero denominator means the ray runs
    /// parallel to the plane and misses.
    fn intersection(&self, ray: &Ray) -> Option<f64> {
        let denom = ray.dir.dot(self.normal);
        if denom == 0.0 {
            return None;
        }
        let t = -(ray.origin.dot(self.normal) + self.dist) / denom;
        if t < 0.0 {
            return None;
        }
        Some(t)
    }

    /// The same at every point of the plane; `point` is not inspected.
    fn surface_normal(&self, _point: Vec3) -> Vec3 {
        self.normal
    }

    fn color(&self) -> Color {
        self.color
    }

    fn reflectivity(&self) -> f64 {
        self.reflectivity
    }
}
