//! Scene-description reader.
//!
//! The format is token oriented. Each record opens with a type keyword and
//! carries whitespace-separated fields in a fixed per-type order:
//!
//! ```text
//! # a red sphere over a gray floor
//! sphere (1, 0, 0) 0.5 <-1.2, 0.5, 0> 0.3
//! plane (0.5, 0.5, 0.5) 0 <0, 1, 0>
//! light (0.8, 0.8, 0.8) <-10, 10, 5>
//! camera <-1.5, 1, 3> <-0.3, 0.5, 0> <0, 1, 0>
//! end
//! ```
//!
//! Vector literals are `<x, y, z>` and color literals `(r, g, b)`, both
//! whitespace-insensitive inside the brackets; color components must be in
//! [0, 1]. Comment lines start with `# ` (the `#` is its own token).
//! Reading stops at the `end` keyword or end of input. Unrecognized
//! keywords and malformed literals are fatal, reported with the offending
//! line and token.

use crate::camera::Camera;
use crate::color::Color;
use crate::cylinder::Cylinder;
use crate::error::SceneError;
use crate::light::{AreaLight, PointLight, SpotLight};
use crate::plane::InfPlane;
use crate::scene::Scene;
use crate::sphere::Sphere;
use crate::vector::Vec3;

/// Everything a scene description yields: the populated scene plus the
/// camera to render it with.
#[derive(Debug)]
pub struct SceneDescription {
    /// The populated scene.
    pub scene: Scene,
    /// The camera given by the description's `camera` record.
    pub camera: Camera,
}

/// Parses a complete scene description.
///
/// Record fields, in order:
///
/// | keyword     | fields                                                               |
/// |-------------|----------------------------------------------------------------------|
/// | `sphere`    | color, radius, center, \[reflectivity\]                              |
/// | `plane`     | color, distance from origin, normal, \[reflectivity\]                |
/// | `cylinder`  | color, radius, center, axis, height, reflectivity                    |
/// | `light`     | color, position                                                      |
/// | `spotlight` | color, position, look-at point, cone angle (radians)                 |
/// | `arealight` | color, center, normal, up, h-spacing, v-spacing, width, height       |
/// | `camera`    | position, look-at point, up direction                                |
pub fn parse_scene(text: &str, shadows: bool) -> Result<SceneDescription, SceneError> {
    let mut reader = Reader::new(text);
    let mut scene = Scene::new(shadows);
    let mut camera = None;

    while let Some(keyword) = reader.word() {
        match keyword.as_str() {
            "sphere" => {
                let color = reader.color()?;
                let radius = reader.number()?;
                let center = reader.vector()?;
                let reflectivity = reader.trailing_reflectivity()?;
                scene.add_shape(Box::new(Sphere::new(color, radius, center, reflectivity)?));
            }
            "plane" => {
                let color = reader.color()?;
                let dist = reader.number()?;
                let normal = reader.vector()?;
                let reflectivity = reader.trailing_reflectivity()?;
                scene.add_shape(Box::new(InfPlane::new(color, dist, normal, reflectivity)?));
            }
            "cylinder" => {
                let color = reader.color()?;
                let radius = reader.number()?;
                let center = reader.vector()?;
                let axis = reader.vector()?;
                let height = reader.number()?;
                let reflectivity = reader.number()?;
                scene.add_shape(Box::new(Cylinder::new(
                    color,
                    radius,
                    center,
                    axis,
                    height,
                    reflectivity,
                )?));
            }
            "light" => {
                let color = reader.color()?;
                let position = reader.vector()?;
                scene.add_point_light(PointLight::new(color, position));
            }
            "spotlight" => {
                let color = reader.color()?;
                let position = reader.vector()?;
                let look_at = reader.vector()?;
                let angle = reader.number()?;
                scene.add_spot_light(SpotLight::new(color, position, look_at - position, angle)?);
            }
            "arealight" => {
                let color = reader.color()?;
                let center = reader.vector()?;
                let normal = reader.vector()?;
                let up = reader.vector()?;
                let horizontal_spacing = reader.number()?;
                let vertical_spacing = reader.number()?;
                let width = reader.number()?;
                let height = reader.number()?;
                scene.add_area_light(AreaLight::new(
                    color,
                    center,
                    normal,
                    up,
                    horizontal_spacing,
                    vertical_spacing,
                    width,
                    height,
                )?);
            }
            "camera" => {
                let position = reader.vector()?;
                let look_at = reader.vector()?;
                let up = reader.vector()?;
                camera = Some(Camera::new(position, look_at, up));
            }
            "end" => break,
            "#" => reader.skip_line(),
            other => {
                return Err(reader.err(format!(
                    "\"{other}\" is not a recognized scene description type"
                )))
            }
        }
    }

    match camera {
        Some(camera) => Ok(SceneDescription { scene, camera }),
        None => Err(reader.err("scene description has no camera")),
    }
}

/// Character-level cursor over the scene text.
struct Reader {
    chars: Vec<char>,
    pos: usize,
    line: usize,
}

impl Reader {
    fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
            line: 1,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn skip_line(&mut self) {
        while let Some(c) = self.bump() {
            if c == '\n' {
                break;
            }
        }
    }

    fn err(&self, message: impl Into<String>) -> SceneError {
        SceneError::Parse {
            line: self.line,
            message: message.into(),
        }
    }

    /// Next whitespace-delimited token, or `None` at end of input.
    fn word(&mut self) -> Option<String> {
        self.skip_whitespace();
        let mut word = String::new();
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                break;
            }
            word.push(c);
            self.bump();
        }
        if word.is_empty() {
            None
        } else {
            Some(word)
        }
    }

    fn number(&mut self) -> Result<f64, SceneError> {
        self.skip_whitespace();
        let mut token = String::new();
        while let Some(c) = self.peek() {
            if !(c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E')) {
                break;
            }
            token.push(c);
            self.bump();
        }
        if token.is_empty() {
            let found = self
                .peek()
                .map_or_else(|| "end of input".to_string(), |c| format!("'{c}'"));
            return Err(self.err(format!("expected a number, found {found}")));
        }
        token
            .parse()
            .map_err(|_| self.err(format!("\"{token}\" is not a number")))
    }

    fn expect(&mut self, expected: char) -> Result<(), SceneError> {
        self.skip_whitespace();
        match self.bump() {
            Some(c) if c == expected => Ok(()),
            Some(c) => Err(self.err(format!("expected '{expected}', found '{c}'"))),
            None => Err(self.err(format!("expected '{expected}', found end of input"))),
        }
    }

    /// Vector literal `<x, y, z>`.
    fn vector(&mut self) -> Result<Vec3, SceneError> {
        self.expect('<')?;
        let x = self.number()?;
        self.expect(',')?;
        let y = self.number()?;
        self.expect(',')?;
        let z = self.number()?;
        self.expect('>')?;
        Ok(Vec3::new(x, y, z))
    }

    /// Color literal `(r, g, b)`, range-checked into [0, 1].
    fn color(&mut self) -> Result<Color, SceneError> {
        self.expect('(')?;
        let r = self.number()?;
        self.expect(',')?;
        let g = self.number()?;
        self.expect(',')?;
        let b = self.number()?;
        self.expect(')')?;
        Color::try_new(r, g, b)
    }

    /// Optional trailing reflectivity: present when the next token starts
    /// numerically, 0 otherwise.
    fn trailing_reflectivity(&mut self) -> Result<f64, SceneError> {
        self.skip_whitespace();
        match self.peek() {
            Some(c) if c.is_ascii_digit() || matches!(c, '-' | '+' | '.') => self.number(),
            _ => Ok(0.0),
        }
    }
}
