//! Finite cylinder primitive.
//!
//! The cylinder is an open tube: it has a radius, an axis, and a height,
//! but no end caps.

use crate::color::Color;
use crate::error::{check_direction, check_reflectivity, SceneError};
use crate::ray::Ray;
use crate::shape::Shape;
use crate::sphere::Sphere;
use crate::vector::Vec3;

/// Cylinder defined by a center, a radius, a (normalized) long axis, and a
/// height measured along that axis.
#[derive(Debug, Clone)]
pub struct Cylinder {
    center: Vec3,
    axis: Vec3,
    height: f64,
    color: Color,
    reflectivity: f64,
    /// The cylinder's circular cross-section in the plane perpendicular to
    /// the axis, precomputed so intersection can reuse the sphere roots.
    section: Sphere,
}

impl Cylinder {
    /// Creates a cylinder. Radius and height must be positive, the axis
    /// nonzero (it is normalized here), and reflectivity in [0, 1].
    pub fn new(
        color: Color,
        radius: f64,
        center: Vec3,
        axis: Vec3,
        height: f64,
        reflectivity: f64,
    ) -> Result<Self, SceneError> {
        if radius <= 0.0 {
            return Err(SceneError::Construction(format!(
                "cylinder radius must be positive, got {radius}"
            )));
        }
        if height <= 0.0 {
            return Err(SceneError::Construction(format!(
                "cylinder height must be positive, got {height}"
            )));
        }
        check_direction("cylinder axis", axis)?;
        check_reflectivity(reflectivity)?;

        let axis = axis.normalized();
        let section = Sphere::new(color, radius, center - center.proj(axis), reflectivity)?;
        Ok(Self {
            center,
            axis,
            height,
            color,
            reflectivity,
            section,
        })
    }

    /// Height of this cylinder.
    pub fn height(&self) -> f64 {
        self.height
    }
}

impl Shape for Cylinder {
    /// Splits the ray into components parallel and perpendicular to the
    /// axis. The perpendicular part is intersected against the circular
    /// cross-section (a sphere in the perpendicular plane); each root is
    /// then accepted only if the hit point's displacement along the axis
    /// stays within ±height/2. The nearest root that passes the height
    /// check is the hit.
    fn intersection(&self, ray: &Ray) -> Option<f64> {
        let p_par = ray.origin.proj(self.axis);
        let d_par = ray.dir.proj(self.axis);

        // t-values are preserved because the flattened ray keeps the
        // original parametrization (its direction is not re-normalized).
        let flat = Ray::unnormalized(ray.origin - p_par, ray.dir - d_par);
        let (t1, t2) = self.section.intersections(&flat);

        let c_par = self.center - self.section.center();
        let half = self.height / 2.0;
        for t in [t1, t2].into_iter().flatten() {
            let axial = p_par + d_par * t - c_par;
            if axial.magnitude_squared() < half * half {
                return Some(t);
            }
        }
        None
    }

    /// The axis-perpendicular component of (point − center), normalized.
    fn surface_normal(&self, point: Vec3) -> Vec3 {
        let v = point - self.center;
        (v - v.proj(self.axis)).normalized()
    }

    fn color(&self) -> Color {
        self.color
    }

    fn reflectivity(&self) -> f64 {
        self.reflectivity
    }
}
