//! Scene assembly, ray shading, and the render loop.
//!
//! A scene is built once (shapes and lights added incrementally) and then
//! queried read-only while rendering. Every query method takes `&self`, so
//! mutation during a render cannot compile; nothing else is needed to keep
//! the parallel render loop safe.

use std::io::{self, Write};
use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use rayon::prelude::*;

use crate::camera::Camera;
use crate::color::Color;
use crate::light::{AreaLight, PointLight, SpotLight};
use crate::output::{self, Frame};
use crate::ray::Ray;
use crate::shape::Shape;
use crate::vector::Vec3;

/// Hard cap on mirror-reflection recursion depth.
pub const MAX_REFLECT: u32 = 10;

/// Offset along the surface normal for shadow-ray origins, so a surface
/// cannot occlude itself at its own intersection point.
const SHADOW_BIAS: f64 = 1e-5;

/// Color of rays that escape the scene.
const BACKGROUND: Color = Color::BLACK;

/// A renderable scene: shapes, lights, and a shadow switch.
#[derive(Debug, Default)]
pub struct Scene {
    shapes: Vec<Box<dyn Shape>>,
    point_lights: Vec<PointLight>,
    spot_lights: Vec<SpotLight>,
    shadows: bool,
}

impl Scene {
    /// Creates an empty scene, with or without shadow casting.
    pub fn new(shadows: bool) -> Self {
        Self {
            shadows,
            ..Self::default()
        }
    }

    /// Whether shadow rays are cast while shading.
    pub fn shadows(&self) -> bool {
        self.shadows
    }

    /// Adds a shape to the scene, which takes ownership of it.
    pub fn add_shape(&mut self, shape: Box<dyn Shape>) {
        self.shapes.push(shape);
    }

    /// Adds a point light to the scene.
    pub fn add_point_light(&mut self, light: PointLight) {
        self.point_lights.push(light);
    }

    /// Adds a spotlight to the scene.
    pub fn add_spot_light(&mut self, light: SpotLight) {
        self.spot_lights.push(light);
    }

    /// Adds an area light by expanding it into this scene's point-light
    /// collection; the scene never tracks it as a separate light kind.
    pub fn add_area_light(&mut self, light: AreaLight) {
        for sub in light.into_lights() {
            self.add_point_light(sub);
        }
    }

    /// Number of shapes in the scene.
    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    /// Number of point lights, counting those expanded from area lights.
    pub fn point_light_count(&self) -> usize {
        self.point_lights.len()
    }

    /// Number of spotlights.
    pub fn spot_light_count(&self) -> usize {
        self.spot_lights.len()
    }

    /// Finds the shape with the earliest strictly-positive intersection
    /// time along `ray`, together with that time.
    ///
    /// Shapes are scanned linearly; a tie goes to the shape added first,
    /// so results are deterministic for a fixed scene.
    pub fn find_closest_shape(&self, ray: &Ray) -> Option<(&dyn Shape, f64)> {
        let mut closest: Option<(&dyn Shape, f64)> = None;
        for shape in &self.shapes {
            if let Some(t) = shape.intersection(ray) {
                if t > 0.0 && closest.map_or(true, |(_, best)| t < best) {
                    closest = Some((shape.as_ref(), t));
                }
            }
        }
        closest
    }

    /// Whether anything blocks `ray` strictly before `max_t`.
    fn occluded(&self, ray: &Ray, max_t: f64) -> bool {
        self.find_closest_shape(ray).is_some_and(|(_, t)| t < max_t)
    }

    /// One light's Lambertian contribution at a surface point, or black if
    /// the light is shadowed or behind the surface.
    fn direct_light(
        &self,
        surface_color: Color,
        point: Vec3,
        normal: Vec3,
        light_position: Vec3,
        light_color: Color,
    ) -> Color {
        let l = (light_position - point).normalized();
        let l_dot_n = l.dot(normal);

        if self.shadows {
            // The probe starts just off the surface. Only a blocker lying
            // strictly between the surface and the light shadows it; a
            // shape beyond the light does not.
            let start = point + normal * SHADOW_BIAS;
            let to_light = Ray::new(start, l);
            if self.occluded(&to_light, (light_position - start).magnitude()) {
                return Color::BLACK;
            }
        }

        if l_dot_n > 0.0 {
            light_color * surface_color * l_dot_n
        } else {
            // Light behind the surface contributes nothing.
            Color::BLACK
        }
    }

    /// Determines the color seen along `ray`.
    ///
    /// Finds the nearest shape, sums the Lambertian contributions of every
    /// point light and in-cone spotlight there, and, on reflective
    /// surfaces, adds the mirror bounce traced recursively while `depth`
    /// is below [`MAX_REFLECT`]. Rays that hit nothing are background
    /// colored.
    pub fn trace_ray(&self, ray: &Ray, depth: u32) -> Color {
        let Some((shape, t)) = self.find_closest_shape(ray) else {
            return BACKGROUND;
        };

        let point = ray.at(t);
        let normal = shape.surface_normal(point);

        let mut color = Color::BLACK;

        for light in &self.point_lights {
            color += self.direct_light(shape.color(), point, normal, light.position, light.color);
        }

        for light in &self.spot_lights {
            // A point outside the spotlight's cone gets nothing from it.
            let l = (light.position() - point).normalized();
            if light.direction().dot(-l).acos() > light.angle() {
                continue;
            }
            color +=
                self.direct_light(shape.color(), point, normal, light.position(), light.color());
        }

        if shape.reflectivity() > 0.0 && depth < MAX_REFLECT {
            let bounce = ray.reflect(point, normal);
            color += self.trace_ray(&bounce, depth + 1) * shape.reflectivity();
        }

        color
    }

    /// Renders a width-by-height frame through `camera`.
    ///
    /// Rows are traced in parallel against the shared read-only scene;
    /// collecting preserves row order, so the frame is identical under any
    /// thread schedule.
    pub fn render(&self, camera: &Camera, width: u32, height: u32) -> Frame {
        info!(
            "rendering {}x{} on {} threads",
            width,
            height,
            rayon::current_num_threads()
        );
        let started = Instant::now();
        let bar = ProgressBar::new(u64::from(height));
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{bar:40} {pos}/{len} ETA: {eta}")
                .unwrap(),
        );

        let rows: Vec<Vec<Color>> = (0..height)
            .into_par_iter()
            .map(|y| {
                let row = (0..width)
                    .map(|x| {
                        let ray = camera.ray_for_pixel(x, y, width, height);
                        self.trace_ray(&ray, 0)
                    })
                    .collect();
                bar.inc(1);
                row
            })
            .collect();

        bar.finish_and_clear();
        info!("rendered in {:.2?}", started.elapsed());

        Frame::from_rows(width, height, rows)
    }

    /// Renders the scene and writes it to `out` as a plain (P3) PPM image.
    pub fn render_ppm<W: Write>(
        &self,
        camera: &Camera,
        width: u32,
        height: u32,
        out: &mut W,
    ) -> io::Result<()> {
        let frame = self.render(camera, width, height);
        output::write_ppm(&frame, out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plane::InfPlane;
    use crate::sphere::Sphere;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    /// Two shapes, two lights, no shadows.
    fn fixture() -> Scene {
        let mut scene = Scene::new(false);
        scene.add_shape(Box::new(
            Sphere::new(
                Color::new(0.1, 0.3, 0.5),
                2.0,
                Vec3::new(1.0, 3.0, 5.0),
                0.0,
            )
            .unwrap(),
        ));
        scene.add_shape(Box::new(
            InfPlane::new(
                Color::new(0.2, 0.4, 0.6),
                2.0,
                Vec3::new(2.0, 4.0, 6.0),
                0.0,
            )
            .unwrap(),
        ));
        scene.add_point_light(PointLight::new(
            Color::new(0.1, 0.3, 0.5),
            Vec3::new(1.0, 2.0, 3.0),
        ));
        scene.add_point_light(PointLight::new(
            Color::new(0.2, 0.4, 0.6),
            Vec3::new(4.0, 5.0, 6.0),
        ));
        scene
    }

    #[test]
    fn closest_shape_minimizes_intersection_time() {
        let scene = fixture();

        let r = Ray::new(Vec3::new(1.0, 3.0, 10.0), Vec3::new(0.0, 0.0, -1.0));
        let (_, t) = scene.find_closest_shape(&r).unwrap();
        assert!(close(t, 3.0));

        let r = Ray::new(Vec3::new(-2.0, 3.0, 5.0), Vec3::new(1.0, 0.0, 0.0));
        let (_, t) = scene.find_closest_shape(&r).unwrap();
        assert!(close(t, 1.0));
    }

    #[test]
    fn closest_shape_ignores_insertion_order() {
        let near = Sphere::new(Color::new(1.0, 0.0, 0.0), 1.0, Vec3::new(0.0, 0.0, 5.0), 0.0)
            .unwrap();
        let far = Sphere::new(Color::new(0.0, 1.0, 0.0), 1.0, Vec3::new(0.0, 0.0, 9.0), 0.0)
            .unwrap();
        let r = Ray::new(Vec3::zero(), Vec3::new(0.0, 0.0, 1.0));

        for (a, b) in [(near.clone(), far.clone()), (far, near)] {
            let mut scene = Scene::new(false);
            scene.add_shape(Box::new(a));
            scene.add_shape(Box::new(b));
            let (shape, t) = scene.find_closest_shape(&r).unwrap();
            assert!(close(t, 4.0));
            assert_eq!(shape.color(), Color::new(1.0, 0.0, 0.0));
        }
    }

    #[test]
    fn missed_rays_are_background_colored() {
        let scene = fixture();
        let r = Ray::new(Vec3::new(1.0, 3.0, 10.0), Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(scene.trace_ray(&r, 0), Color::BLACK);
    }

    #[test]
    fn lambertian_shading_sums_both_lights() {
        let scene = fixture();
        let r = Ray::new(Vec3::new(1.0, 3.0, -10.0), Vec3::new(0.0, 0.0, 1.0));
        let c = scene.trace_ray(&r, 0);
        assert!(close(c.r, 0.051537615489350617));
        assert!(close(c.g, 0.2352538705067326));
        assert!(close(c.b, 0.55114876505214583));
    }

    /// Floor at y = 0, a light straight above the origin, and a ray that
    /// hits the floor at the origin.
    fn shadow_fixture(shadows: bool, occluder_center: Vec3) -> (Scene, Ray) {
        let mut scene = Scene::new(shadows);
        scene.add_shape(Box::new(
            InfPlane::new(Color::new(0.5, 0.5, 0.5), 0.0, Vec3::new(0.0, 1.0, 0.0), 0.0)
                .unwrap(),
        ));
        scene.add_shape(Box::new(
            Sphere::new(Color::new(0.9, 0.9, 0.9), 1.0, occluder_center, 0.0).unwrap(),
        ));
        scene.add_point_light(PointLight::new(
            Color::new(0.8, 0.8, 0.8),
            Vec3::new(0.0, 10.0, 0.0),
        ));
        let ray = Ray::new(Vec3::new(0.0, 4.0, 4.0), Vec3::new(0.0, -1.0, -1.0));
        (scene, ray)
    }

    #[test]
    fn occluder_between_surface_and_light_blocks_it() {
        let (scene, ray) = shadow_fixture(true, Vec3::new(0.0, 5.0, 0.0));
        assert_eq!(scene.trace_ray(&ray, 0), Color::BLACK);
    }

    #[test]
    fn shadows_off_ignores_the_occluder() {
        let (scene, ray) = shadow_fixture(false, Vec3::new(0.0, 5.0, 0.0));
        let c = scene.trace_ray(&ray, 0);
        assert!(c.r > 0.0);
        // L is the surface normal here, so the term is light * surface.
        assert!(close(c.r, 0.8 * 0.5));
    }

    #[test]
    fn occluder_beyond_light_does_not_shadow() {
        // The sphere is along the shadow ray but farther than the light
        // itself; the chosen behavior is that it casts no shadow.
        let (scene, ray) = shadow_fixture(true, Vec3::new(0.0, 20.0, 0.0));
        let c = scene.trace_ray(&ray, 0);
        assert!(close(c.r, 0.8 * 0.5));
    }

    #[test]
    fn spotlight_contributes_only_inside_its_cone() {
        let floor = || {
            InfPlane::new(Color::new(0.5, 0.5, 0.5), 0.0, Vec3::new(0.0, 1.0, 0.0), 0.0)
                .unwrap()
        };
        let ray = Ray::new(Vec3::new(0.0, 4.0, 4.0), Vec3::new(0.0, -1.0, -1.0));

        // Aimed straight down at the hit point: inside the cone.
        let mut lit = Scene::new(false);
        lit.add_shape(Box::new(floor()));
        lit.add_spot_light(
            SpotLight::new(
                Color::new(0.8, 0.8, 0.8),
                Vec3::new(0.0, 10.0, 0.0),
                Vec3::new(0.0, -1.0, 0.0),
                0.3,
            )
            .unwrap(),
        );
        let c = lit.trace_ray(&ray, 0);
        assert!(close(c.g, 0.8 * 0.5));

        // Aimed sideways: the hit point falls outside the cone.
        let mut unlit = Scene::new(false);
        unlit.add_shape(Box::new(floor()));
        unlit.add_spot_light(
            SpotLight::new(
                Color::new(0.8, 0.8, 0.8),
                Vec3::new(0.0, 10.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                0.3,
            )
            .unwrap(),
        );
        assert_eq!(unlit.trace_ray(&ray, 0), Color::BLACK);
    }

    #[test]
    fn area_light_expands_into_point_lights() {
        let mut scene = Scene::new(false);
        assert_eq!(scene.point_light_count(), 0);
        scene.add_area_light(
            AreaLight::new(
                Color::new(0.8, 0.8, 0.8),
                Vec3::new(0.0, 4.0, 1.0),
                Vec3::new(0.0, -1.0, 0.0),
                Vec3::new(0.0, 0.0, 1.0),
                0.1,
                0.1,
                0.6,
                0.6,
            )
            .unwrap(),
        );
        assert!(scene.point_light_count() > 1);
        assert_eq!(scene.spot_light_count(), 0);
    }

    #[test]
    fn reflection_adds_the_bounced_color() {
        // A lit sphere hangs above a floor; making the floor a mirror must
        // brighten a pixel whose bounce sees the sphere. The primary ray
        // comes in at 45 degrees so that only its reflection reaches the
        // sphere.
        let build = |reflectivity: f64| {
            let mut scene = Scene::new(false);
            scene.add_shape(Box::new(
                InfPlane::new(
                    Color::new(0.2, 0.2, 0.2),
                    0.0,
                    Vec3::new(0.0, 1.0, 0.0),
                    reflectivity,
                )
                .unwrap(),
            ));
            scene.add_shape(Box::new(
                Sphere::new(Color::new(1.0, 0.0, 0.0), 0.75, Vec3::new(0.0, 2.0, 0.0), 0.0)
                    .unwrap(),
            ));
            scene.add_point_light(PointLight::new(
                Color::new(0.8, 0.8, 0.8),
                Vec3::new(-2.0, 0.5, 2.0),
            ));
            scene
        };
        // Hits the floor at (1, 0, 0); the bounce leaves toward the sphere.
        let ray = Ray::new(Vec3::new(3.0, 2.0, 0.0), Vec3::new(-1.0, -1.0, 0.0));

        let matte = build(0.0).trace_ray(&ray, 0);
        let mirrored = build(0.5).trace_ray(&ray, 0);
        assert!(matte.r > 0.0);
        assert!(mirrored.r > matte.r);
    }

    #[test]
    fn reflection_recursion_terminates() {
        // Two facing mirrors bounce a ray forever; the depth cap must cut
        // the recursion off.
        let mut scene = Scene::new(false);
        scene.add_shape(Box::new(
            InfPlane::new(Color::BLACK, 0.0, Vec3::new(0.0, 1.0, 0.0), 1.0).unwrap(),
        ));
        scene.add_shape(Box::new(
            InfPlane::new(Color::BLACK, 4.0, Vec3::new(0.0, -1.0, 0.0), 1.0).unwrap(),
        ));

        let ray = Ray::new(Vec3::new(0.0, 2.0, 0.0), Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(scene.trace_ray(&ray, 0), Color::BLACK);
        // Entering at the cap must not recurse at all.
        assert_eq!(scene.trace_ray(&ray, MAX_REFLECT), Color::BLACK);
    }
}
