//! Closed registry of recognized effect classes and their attribute schemas.

use crate::foundation::core::Family;

/// Every effect class the parser understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum OperatorClass {
    FileTransform,
    ColorSpaceTransform,
    DisplayViewTransform,
    CdlTransform,
    RepoTransform,
}

/// Authoring-tool attribute names mapped onto canonical ones.
pub const ATTRIBUTE_ALIASES: &[(&str, &str)] = &[
    ("in_colorspace", "src"),
    ("out_colorspace", "dst"),
    ("file", "src"),
    ("saturation", "sat"),
    ("cccid", "ccc_id"),
    ("cccId", "ccc_id"),
];

const ENGINE_PREFIX: &str = "OCIO";
const CLASS_SUFFIX: &str = "Transform";

impl OperatorClass {
    /// Canonical class name.
    pub fn name(self) -> &'static str {
        match self {
            Self::FileTransform => "FileTransform",
            Self::ColorSpaceTransform => "ColorSpaceTransform",
            Self::DisplayViewTransform => "DisplayViewTransform",
            Self::CdlTransform => "CDLTransform",
            Self::RepoTransform => "RepoTransform",
        }
    }

    pub fn family(self) -> Family {
        match self {
            Self::RepoTransform => Family::Geometry,
            _ => Family::Color,
        }
    }

    /// Canonical attributes retained for this class; anything else is discarded.
    pub fn attributes(self) -> &'static [&'static str] {
        match self {
            Self::FileTransform => &["src", "ccc_id", "interpolation", "direction"],
            Self::ColorSpaceTransform => &["src", "dst"],
            Self::DisplayViewTransform => &["src", "display", "view", "direction"],
            Self::CdlTransform => &[
                "offset",
                "power",
                "slope",
                "sat",
                "description",
                "id",
                "direction",
            ],
            Self::RepoTransform => &["translate", "rotate", "scale", "center"],
        }
    }

    pub fn accepts(self, attribute: &str) -> bool {
        self.attributes().contains(&attribute)
    }

    /// Resolve an authored class name, e.g. `OCIOFileTransform` or `Transform`.
    pub fn lookup(class_name: &str) -> Option<Self> {
        match normalize_class_name(class_name).as_str() {
            "File" => Some(Self::FileTransform),
            "ColorSpace" => Some(Self::ColorSpaceTransform),
            "DisplayView" | "Display" => Some(Self::DisplayViewTransform),
            "CDL" => Some(Self::CdlTransform),
            "Repo" | "" => Some(Self::RepoTransform),
            _ => None,
        }
    }
}

/// Strip the engine prefix and the class suffix, leaving the class stem.
pub fn normalize_class_name(class_name: &str) -> String {
    let trimmed = class_name.trim();
    let stem = trimmed.strip_prefix(ENGINE_PREFIX).unwrap_or(trimmed);
    let stem = stem.strip_suffix(CLASS_SUFFIX).unwrap_or(stem);
    stem.to_owned()
}

/// Canonical name for `key`, applying [`ATTRIBUTE_ALIASES`].
pub fn canonical_attribute(key: &str) -> &str {
    ATTRIBUTE_ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(key)
}

pub fn is_alias(key: &str) -> bool {
    ATTRIBUTE_ALIASES.iter().any(|(alias, _)| *alias == key)
}

#[cfg(test)]
#[path = "../../tests/unit/graph/registry.rs"]
mod tests;
