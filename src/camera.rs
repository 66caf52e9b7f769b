//! Camera and per-pixel ray generation.

use std::f64::consts::PI;

use crate::ray::Ray;
use crate::vector::Vec3;

/// Default vertical field of view: 60 degrees.
pub const DEFAULT_FOV: f64 = PI / 3.0;

/// Pinhole camera with a look-at orientation.
///
/// The orthonormal viewing basis (`dir`, `up`, `right`) is computed once at
/// construction from the position, a look-at point, and an up hint; rays are
/// then generated per pixel against that basis.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pos: Vec3,
    dir: Vec3,
    up: Vec3,
    right: Vec3,
    fov: f64,
    /// Distance from the camera to the image plane, derived from the field
    /// of view so the viewport is one unit tall.
    dist: f64,
}

impl Camera {
    /// Camera at `position` aimed at `look_at`, with the default field of
    /// view.
    ///
    /// `up_hint` picks one of the many possible camera orientations; it need
    /// not be orthogonal to the view direction.
    pub fn new(position: Vec3, look_at: Vec3, up_hint: Vec3) -> Self {
        Self::with_fov(position, look_at, up_hint, DEFAULT_FOV)
    }

    /// Camera with an explicit vertical field of view in radians.
    pub fn with_fov(position: Vec3, look_at: Vec3, up_hint: Vec3, fov: f64) -> Self {
        let dir = (look_at - position).normalized();
        let right = dir.cross(up_hint).normalized();
        let up = right.cross(dir).normalized();
        Self {
            pos: position,
            dir,
            up,
            right,
            fov,
            dist: 0.5 / (fov / 2.0).tan(),
        }
    }

    /// Camera position in the scene.
    pub fn position(&self) -> Vec3 {
        self.pos
    }

    /// Vertical field of view in radians.
    pub fn fov(&self) -> f64 {
        self.fov
    }

    /// Ray from the camera through pixel (x, y) of a width-by-height image.
    ///
    /// Pixel (0, 0) is the top-left corner and y grows downward. Both image
    /// axes are scaled by the height, so the vertical field of view stays
    /// fixed for any aspect ratio: wider images see more of the scene to
    /// the sides instead of stretching it.
    pub fn ray_for_pixel(&self, x: u32, y: u32, width: u32, height: u32) -> Ray {
        let center_x = f64::from(width) / f64::from(height) / 2.0;
        let span = f64::from(height) - 1.0;
        let pixel_dir = self.dir * self.dist
            + self.up * (0.5 - f64::from(y) / span)
            + self.right * (f64::from(x) / span - center_x);
        Ray::new(self.pos, pixel_dir)
    }
}
