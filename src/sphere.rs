//! Sphere primitive.

use crate::color::Color;
use crate::error::{check_reflectivity, SceneError};
use crate::ray::Ray;
use crate::shape::Shape;
use crate::vector::Vec3;

/// Sphere defined by a center and a radius.
#[derive(Debug, Clone)]
pub struct Sphere {
    center: Vec3,
    radius: f64,
    color: Color,
    reflectivity: f64,
}

impl Sphere {
    /// Creates a sphere. The radius must be positive and the reflectivity
    /// in [0, 1].
    pub fn new(
        color: Color,
        radius: f64,
        center: Vec3,
        reflectivity: f64,
    ) -> Result<Self, SceneError> {
        if radius <= 0.0 {
            return Err(SceneError::Construction(format!(
                "sphere radius must be positive, got {radius}"
            )));
        }
        check_reflectivity(reflectivity)?;
        Ok(Self {
            center,
            radius,
            color,
            reflectivity,
        })
    }

    /// Center of this sphere.
    pub fn center(&self) -> Vec3 {
        self.center
    }

    /// Radius of this sphere.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Both intersection times of `ray` with this sphere, ascending.
    ///
    /// A ray meets a sphere at zero, one, or two points. Negative times
    /// count as misses and are dropped, so the surviving roots are packed
    /// left: `(None, None)` is a clean miss, `(Some(t), None)` a tangent
    /// graze or a single forward hit, `(Some(t1), Some(t2))` a full pass
    /// through with `t1 < t2`.
    ///
    /// The times solve `a·t² + b·t + c = 0` where `P + D·t` is the ray,
    /// `a = D·D`, `b = 2(P·D − D·C)`, and
    /// `c = P·P + C·C − 2(P·C) − r²`.
    pub fn intersections(&self, ray: &Ray) -> (Option<f64>, Option<f64>) {
        let p = ray.origin;
        let d = ray.dir;
        let center = self.center;

        let a = d.dot(d);
        let b = 2.0 * (p.dot(d) - d.dot(center));
        let c = p.dot(p) + center.dot(center) - 2.0 * p.dot(center) - self.radius * self.radius;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return (None, None);
        }
        if discriminant == 0.0 {
            let t = -b / (2.0 * a);
            return if t < 0.0 { (None, None) } else { (Some(t), None) };
        }

        let sqrt_d = discriminant.sqrt();
        let u = (-b + sqrt_d) / (2.0 * a);
        let v = (-b - sqrt_d) / (2.0 * a);
        let (t1, t2) = if u < v { (u, v) } else { (v, u) };

        if t2 < 0.0 {
            (None, None)
        } else if t1 < 0.0 {
            (Some(t2), None)
        } else {
            (Some(t1), Some(t2))
        }
    }
}

impl Shape for Sphere {
    fn intersection(&self, ray: &Ray) -> Option<f64> {
        self.intersections(ray).0
    }

    fn surface_normal(&self, point: Vec3) -> Vec3 {
        (point - self.center).normalized()
    }

    fn color(&self) -> Color {
        self.color
    }

    fn reflectivity(&self) -> f64 {
        self.reflectivity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_sphere() -> Sphere {
        Sphere::new(Color::new(0.5, 0.5, 0.5), 1.0, Vec3::zero(), 0.0).unwrap()
    }

    #[test]
    fn construction_preconditions() {
        let gray = Color::new(0.5, 0.5, 0.5);
        assert!(Sphere::new(gray, 0.0, Vec3::zero(), 0.0).is_err());
        assert!(Sphere::new(gray, -2.0, Vec3::zero(), 0.0).is_err());
        assert!(Sphere::new(gray, 1.0, Vec3::zero(), 1.5).is_err());
        assert!(Sphere::new(gray, 1.0, Vec3::zero(), -0.1).is_err());
        assert!(Sphere::new(gray, 1.0, Vec3::zero(), 1.0).is_ok());
    }

    #[test]
    fn ray_through_center_hits_twice_symmetrically() {
        let s = unit_sphere();
        let r = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));

        let (t1, t2) = s.intersections(&r);
        assert_eq!(t1, Some(4.0));
        assert_eq!(t2, Some(6.0));
        // Symmetric about the center's projection at t = 5.
        assert_eq!(s.intersection(&r), Some(4.0));
    }

    #[test]
    fn tangent_ray_grazes_once() {
        let s = unit_sphere();
        let r = Ray::new(Vec3::new(1.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(s.intersections(&r), (Some(5.0), None));
    }

    #[test]
    fn wide_ray_misses() {
        let s = unit_sphere();
        let r = Ray::new(Vec3::new(2.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(s.intersections(&r), (None, None));
        assert_eq!(s.intersection(&r), None);
    }

    #[test]
    fn sphere_behind_ray_misses() {
        let s = unit_sphere();
        let r = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(s.intersections(&r), (None, None));
    }

    #[test]
    fn ray_from_inside_hits_the_far_wall() {
        let s = unit_sphere();
        let r = Ray::new(Vec3::zero(), Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(s.intersections(&r), (Some(1.0), None));
        assert_eq!(s.intersection(&r), Some(1.0));
    }

    #[test]
    fn intersection_from_several_directions() {
        // This sphere's surface passes through the origin.
        let s = Sphere::new(
            Color::new(0.4, 0.5, 0.6),
            2f64.sqrt(),
            Vec3::new(1.0, 1.0, 0.0),
            0.0,
        )
        .unwrap();

        for origin in [
            Vec3::new(-5.0, 0.0, 0.0),
            Vec3::new(0.0, -5.0, 0.0),
            Vec3::new(-5.0, -5.0, 0.0),
        ] {
            let r = Ray::new(origin, -origin);
            let t = s.intersection(&r).unwrap();
            assert!((t - origin.magnitude()).abs() < 1e-9);
        }
    }

    #[test]
    fn surface_normal_points_outward() {
        let s = unit_sphere();
        assert_eq!(
            s.surface_normal(Vec3::new(0.0, 0.0, 1.0)),
            Vec3::new(0.0, 0.0, 1.0)
        );
        let n = s.surface_normal(Vec3::new(1.0, 1.0, 0.0).normalized());
        assert!((n.magnitude() - 1.0).abs() < 1e-12);
        assert!(n[0] > 0.0 && n[1] > 0.0);
    }
}
