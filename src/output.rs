//! Rendered frames and image emission.
//!
//! The renderer produces a [`Frame`] of linear `f64` colors. Emission
//! scales each channel by the maximum color value, clamps it into range,
//! and writes either a plain-text PPM (P3) stream or an 8-bit PNG file.
//! Clamping happens here and nowhere earlier: shading is free to produce
//! out-of-range values mid-computation.

use std::io::{self, Write};
use std::path::Path;

use image::{ImageBuffer, Rgb};
use log::info;

use crate::color::Color;

/// Largest channel value in emitted images.
pub const COLOR_MAX: u32 = 255;

/// A rendered image: row-major pixels, top row first.
#[derive(Debug, Clone)]
pub struct Frame {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl Frame {
    /// Assembles a frame from per-row pixel vectors, top row first.
    pub fn from_rows(width: u32, height: u32, rows: Vec<Vec<Color>>) -> Self {
        debug_assert_eq!(rows.len(), height as usize);
        let pixels: Vec<Color> = rows.into_iter().flatten().collect();
        debug_assert_eq!(pixels.len(), width as usize * height as usize);
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The pixel at (x, y), with (0, 0) the top-left corner.
    pub fn pixel(&self, x: u32, y: u32) -> Color {
        self.pixels[y as usize * self.width as usize + x as usize]
    }
}

/// Scales a pixel into emission range: each channel times [`COLOR_MAX`],
/// clamped into [0, COLOR_MAX].
fn emission_channels(pixel: Color) -> (i32, i32, i32) {
    let max = f64::from(COLOR_MAX);
    let c = (pixel * max).clamped(0.0, max);
    (c.r as i32, c.g as i32, c.b as i32)
}

/// Writes `frame` to `out` as a plain (P3) PPM image.
///
/// The stream is a `P3 <width> <height> <max>` header line followed by one
/// `R G B` integer triplet per pixel, row-major, top to bottom. The output
/// is a pure function of the frame, byte for byte.
pub fn write_ppm<W: Write>(frame: &Frame, out: &mut W) -> io::Result<()> {
    writeln!(out, "P3 {} {} {}", frame.width(), frame.height(), COLOR_MAX)?;
    for y in 0..frame.height() {
        for x in 0..frame.width() {
            let (r, g, b) = emission_channels(frame.pixel(x, y));
            writeln!(out, "{} {} {}", r, g, b)?;
        }
    }
    Ok(())
}

/// Saves `frame` as an 8-bit PNG file.
pub fn save_png(frame: &Frame, path: &Path) -> image::ImageResult<()> {
    let img: ImageBuffer<Rgb<u8>, Vec<u8>> =
        ImageBuffer::from_fn(frame.width(), frame.height(), |x, y| {
            let (r, g, b) = emission_channels(frame.pixel(x, y));
            Rgb([r as u8, g as u8, b as u8])
        });
    img.save(path)?;
    info!("image saved as {}", path.display());
    Ok(())
}
