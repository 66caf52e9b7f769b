//! Light sources.
//!
//! Point lights are the only kind the renderer shades directly. Spotlights
//! are point lights with a cone restriction, and an area light is purely a
//! construction-time device: it expands into a grid of point lights and is
//! never seen by the scene as a light kind of its own.

use std::f64::consts::PI;

use crate::color::Color;
use crate::error::{check_direction, SceneError};
use crate::vector::Vec3;

/// Omnidirectional light at a point.
#[derive(Debug, Clone, Copy)]
pub struct PointLight {
    /// Position of the light.
    pub position: Vec3,
    /// Color (and, informally, intensity) of the light.
    pub color: Color,
}

impl PointLight {
    /// Creates a point light.
    pub fn new(color: Color, position: Vec3) -> Self {
        Self { position, color }
    }
}

/// Point light restricted to a cone of directions.
#[derive(Debug, Clone, Copy)]
pub struct SpotLight {
    position: Vec3,
    color: Color,
    dir: Vec3,
    angle: f64,
}

impl SpotLight {
    /// Creates a spotlight aimed along `direction` (normalized here, must
    /// be nonzero) with the given cone half-angle in radians, which must be
    /// in (0, π].
    pub fn new(
        color: Color,
        position: Vec3,
        direction: Vec3,
        angle: f64,
    ) -> Result<Self, SceneError> {
        check_direction("spotlight direction", direction)?;
        if angle <= 0.0 || angle > PI {
            return Err(SceneError::Construction(format!(
                "spotlight cone angle must be in (0, pi], got {angle}"
            )));
        }
        Ok(Self {
            position,
            color,
            dir: direction.normalized(),
            angle,
        })
    }

    /// Position of the light.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Color of the light.
    pub fn color(&self) -> Color {
        self.color
    }

    /// Normalized direction the cone points in.
    pub fn direction(&self) -> Vec3 {
        self.dir
    }

    /// Cone half-angle in radians.
    pub fn angle(&self) -> f64 {
        self.angle
    }
}

/// Rectangular light patch, approximated as a grid of point lights.
///
/// The grid lies in the plane through `center` perpendicular to `normal`,
/// tiled every `vertical_spacing` along one local axis and every
/// `horizontal_spacing` along the other. Each generated light carries the
/// parent color divided by the number of lights, so the patch as a whole
/// emits the parent color.
#[derive(Debug, Clone)]
pub struct AreaLight {
    lights: Vec<PointLight>,
}

impl AreaLight {
    /// Creates an area light and expands it into its point-light grid.
    ///
    /// The local axes are `uhat = normalize(up_hint × normal)` and
    /// `vhat = normalize(normal × uhat)`; lights are placed at
    /// `center + u·uhat + v·vhat` for `u` over [−height/2, height/2] and
    /// `v` over [−width/2, width/2]. Spacings must be positive and
    /// strictly smaller than the dimension they step across.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        color: Color,
        center: Vec3,
        normal: Vec3,
        up_hint: Vec3,
        horizontal_spacing: f64,
        vertical_spacing: f64,
        width: f64,
        height: f64,
    ) -> Result<Self, SceneError> {
        for (name, spacing, limit) in [
            ("horizontal", horizontal_spacing, width),
            ("vertical", vertical_spacing, height),
        ] {
            if spacing <= 0.0 {
                return Err(SceneError::Construction(format!(
                    "area light {name} spacing must be positive, got {spacing}"
                )));
            }
            if spacing >= limit {
                return Err(SceneError::Construction(format!(
                    "area light {name} spacing ({spacing}) must be smaller than \
                     the corresponding dimension ({limit})"
                )));
            }
        }
        check_direction("area light surface normal", normal)?;
        check_direction("area light up direction", up_hint)?;

        let normal = normal.normalized();
        let uhat = up_hint.cross(normal);
        if uhat.is_zero() {
            return Err(SceneError::Construction(
                "area light up direction must not be parallel to its normal".into(),
            ));
        }
        let uhat = uhat.normalized();
        let vhat = normal.cross(uhat).normalized();

        let mut positions = Vec::new();
        let mut u = -height / 2.0;
        while u <= height / 2.0 {
            let mut v = -width / 2.0;
            while v <= width / 2.0 {
                positions.push(center + uhat * u + vhat * v);
                v += horizontal_spacing;
            }
            u += vertical_spacing;
        }

        // Divide by the count actually generated, so the sub-light colors
        // sum back to the parent color exactly.
        let share = color / positions.len() as f64;
        Ok(Self {
            lights: positions
                .into_iter()
                .map(|p| PointLight::new(share, p))
                .collect(),
        })
    }

    /// The generated point lights.
    pub fn lights(&self) -> &[PointLight] {
        &self.lights
    }

    /// Consumes the area light, yielding its point lights.
    pub fn into_lights(self) -> Vec<PointLight> {
        self.lights
    }
}
