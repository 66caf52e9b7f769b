//! Errors surfaced while loading a scene.
//!
//! Rendering itself never fails: tracing is pure arithmetic, and numeric
//! degeneracies (zero-length normals, division by zero) deliberately
//! propagate as NaN/Inf pixels instead of errors. Everything that *can* fail
//! happens before the first ray is cast and lands here.

use std::error::Error;
use std::fmt;

use crate::vector::Vec3;

/// Error building a scene from a textual description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// A scene entity was constructed with parameters that violate its
    /// preconditions: non-positive radius or height, light spacing as wide
    /// as the light itself, a color component outside [0, 1], a zero-length
    /// vector where a direction is required.
    Construction(String),

    /// The scene text itself is malformed: a broken `<x, y, z>` or
    /// `(r, g, b)` literal, or an unrecognized record keyword.
    Parse {
        /// 1-based line at which the reader gave up.
        line: usize,
        /// What was expected or found.
        message: String,
    },
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::Construction(what) => write!(f, "invalid scene entity: {what}"),
            SceneError::Parse { line, message } => {
                write!(f, "scene description error at line {line}: {message}")
            }
        }
    }
}

impl Error for SceneError {}

pub(crate) fn check_reflectivity(value: f64) -> Result<(), SceneError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(SceneError::Construction(format!(
            "reflectivity must be in [0, 1], got {value}"
        )));
    }
    Ok(())
}

pub(crate) fn check_direction(name: &str, value: Vec3) -> Result<(), SceneError> {
    if value.is_zero() {
        return Err(SceneError::Construction(format!(
            "{name} must not be the zero vector"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_context() {
        let err = SceneError::Parse {
            line: 7,
            message: "expected '>', found ';'".into(),
        };
        assert_eq!(
            err.to_string(),
            "scene description error at line 7: expected '>', found ';'"
        );

        let err = SceneError::Construction("sphere radius must be positive, got -2".into());
        assert!(err.to_string().contains("sphere radius"));
    }
}
