//! Typed operators produced from sanitized effect nodes.

use std::path::Path;

use serde_json::Value;

use crate::foundation::core::{Direction, Vec2};
use crate::foundation::error::{ShotError, ShotResult};
use crate::graph::parse::ParsedNode;
use crate::graph::registry::OperatorClass;

/// One color operation in a look chain.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type")]
pub enum ColorOperator {
    FileTransform {
        src: String,
        ccc_id: Option<String>,
        interpolation: Option<String>,
        direction: Direction,
    },
    ColorSpaceTransform {
        src: String,
        dst: String,
    },
    DisplayViewTransform {
        src: String,
        display: String,
        view: String,
        direction: Direction,
    },
    CdlTransform {
        offset: [f64; 3],
        power: [f64; 3],
        slope: [f64; 3],
        sat: f64,
        description: Option<String>,
        id: Option<String>,
        direction: Direction,
    },
}

impl ColorOperator {
    pub fn class(&self) -> OperatorClass {
        match self {
            Self::FileTransform { .. } => OperatorClass::FileTransform,
            Self::ColorSpaceTransform { .. } => OperatorClass::ColorSpaceTransform,
            Self::DisplayViewTransform { .. } => OperatorClass::DisplayViewTransform,
            Self::CdlTransform { .. } => OperatorClass::CdlTransform,
        }
    }

    /// Path of the LUT/CDL file backing this operator, if any.
    pub fn file_path(&self) -> Option<&Path> {
        match self {
            Self::FileTransform { src, .. } if !src.is_empty() => Some(Path::new(src)),
            _ => None,
        }
    }

    pub fn direction(&self) -> Direction {
        match self {
            Self::FileTransform { direction, .. }
            | Self::DisplayViewTransform { direction, .. }
            | Self::CdlTransform { direction, .. } => *direction,
            Self::ColorSpaceTransform { .. } => Direction::Forward,
        }
    }

    pub fn from_node(node: &ParsedNode) -> ShotResult<Self> {
        match node.class {
            OperatorClass::FileTransform => Ok(Self::FileTransform {
                src: node.required_str("src")?,
                ccc_id: node.optional_str("ccc_id")?,
                interpolation: node.optional_str("interpolation")?,
                direction: node.direction()?,
            }),
            OperatorClass::ColorSpaceTransform => Ok(Self::ColorSpaceTransform {
                src: node.required_str("src")?,
                dst: node.required_str("dst")?,
            }),
            OperatorClass::DisplayViewTransform => Ok(Self::DisplayViewTransform {
                src: node.required_str("src")?,
                display: node.required_str("display")?,
                view: node.required_str("view")?,
                direction: node.direction()?,
            }),
            // Engine defaults: identity slope/power, zero offset, unit saturation.
            OperatorClass::CdlTransform => Ok(Self::CdlTransform {
                offset: node.vec3("offset")?.unwrap_or([0.0; 3]),
                power: node.vec3("power")?.unwrap_or([1.0; 3]),
                slope: node.vec3("slope")?.unwrap_or([1.0; 3]),
                sat: node.number("sat")?.unwrap_or(1.0),
                description: node.optional_str("description")?,
                id: node.optional_str("id")?,
                direction: node.direction()?,
            }),
            OperatorClass::RepoTransform => Err(ShotError::misconfigured(
                node.node_ref(),
                "geometry node used as a color operator",
            )),
        }
    }
}

/// A single reprojection step: translate, then scale and rotate about `center`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GeometryOperator {
    pub translate: Vec2,
    /// Degrees, counter-clockwise positive.
    pub rotate: f64,
    pub scale: Vec2,
    pub center: Vec2,
}

impl Default for GeometryOperator {
    fn default() -> Self {
        Self {
            translate: Vec2::ZERO,
            rotate: 0.0,
            scale: Vec2::new(1.0, 1.0),
            center: Vec2::ZERO,
        }
    }
}

impl GeometryOperator {
    pub fn from_node(node: &ParsedNode) -> ShotResult<Self> {
        if node.class != OperatorClass::RepoTransform {
            return Err(ShotError::misconfigured(
                node.node_ref(),
                "color node used as a geometry operator",
            ));
        }
        let base = Self::default();
        Ok(Self {
            translate: node.vec2("translate")?.unwrap_or(base.translate),
            rotate: node.number("rotate")?.unwrap_or(base.rotate),
            scale: node.vec2("scale")?.unwrap_or(base.scale),
            center: node.vec2("center")?.unwrap_or(base.center),
        })
    }
}

/// Truthiness of a loosely typed direction flag.
pub(crate) fn direction_from_value(v: &Value) -> Option<Direction> {
    match v {
        Value::Null => Some(Direction::Forward),
        Value::Bool(b) => Some(Direction::from_flag(*b)),
        Value::Number(n) => n.as_f64().map(|f| Direction::from_flag(f != 0.0)),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "" | "forward" | "transform_dir_forward" | "0" | "false" => Some(Direction::Forward),
            "inverse" | "transform_dir_inverse" | "1" | "true" => Some(Direction::Inverse),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/graph/operators.rs"]
mod tests;
