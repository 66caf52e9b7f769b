//! Rays.
//!
//! A ray is a half-line `r(t) = origin + t * dir`, parametrized by a
//! non-negative "time" t. Primary rays come from the camera; secondary rays
//! (shadow probes, mirror bounces) start on surfaces and carry a small bias
//! so they cannot immediately re-hit the surface that spawned them.

use crate::vector::Vec3;

/// Offset applied along a reflected direction before re-tracing, so a
/// bounced ray starts just off the surface it left.
const REFLECT_BIAS: f64 = 1e-4;

/// Ray with an origin point and a direction vector.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Starting point of the ray.
    pub origin: Vec3,
    /// Direction of the ray; unit length unless built with
    /// [`unnormalized`](Ray::unnormalized).
    pub dir: Vec3,
}

impl Ray {
    /// Creates a ray, normalizing the direction.
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self {
            origin,
            dir: dir.normalized(),
        }
    }

    /// Creates a ray keeping the direction exactly as given.
    ///
    /// Used where the direction's length is itself meaningful, e.g. when a
    /// ray is projected into a plane and its t-values must stay comparable
    /// with the original parametrization.
    pub fn unnormalized(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir }
    }

    /// Position along the ray at time `t`, which must be non-negative.
    pub fn at(&self, t: f64) -> Vec3 {
        debug_assert!(t >= 0.0);
        self.origin + self.dir * t
    }

    /// The mirror ray produced when this ray strikes `point` on a surface
    /// with normal `normal`.
    ///
    /// The reflected direction is `d + 2·proj(−d, n)`; the returned ray
    /// starts at `point` nudged along that direction by a small bias.
    pub fn reflect(&self, point: Vec3, normal: Vec3) -> Ray {
        let dir = self.dir + (-self.dir).proj(normal) * 2.0;
        Ray::new(point + dir * REFLECT_BIAS, dir)
    }
}
