use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_yaml::Value;

use crate::color::yaml;
use crate::foundation::error::{ShotError, ShotResult};

/// Read-only snapshot of an OCIO base configuration.
///
/// Only the fields the compiler reads are extracted; the original text is kept so the
/// derived config can be produced by editing it in place.
#[derive(Clone, Debug, PartialEq)]
pub struct BaseConfig {
    /// Absolute path of the config file.
    pub path: PathBuf,
    pub text: String,
    /// Declared search path entries, unresolved.
    pub search_paths: Vec<String>,
    pub active_displays: Vec<String>,
    pub active_views: Vec<String>,
    pub description: Option<String>,
    pub environment: BTreeMap<String, String>,
    /// Display names in declaration order.
    pub displays: Vec<String>,
    pub colorspaces: Vec<String>,
    pub looks: Vec<String>,
    pub roles: Vec<String>,
}

impl BaseConfig {
    #[tracing::instrument]
    pub fn load(path: &Path) -> ShotResult<Self> {
        if !path.is_file() {
            return Err(ShotError::missing_config(format!(
                "base color config '{}' does not exist",
                path.display()
            )));
        }
        let abs = std::fs::canonicalize(path)
            .map_err(|e| ShotError::io(format!("resolve '{}': {e}", path.display())))?;
        let text = std::fs::read_to_string(&abs)
            .map_err(|e| ShotError::io(format!("read '{}': {e}", abs.display())))?;
        Self::from_text(text, abs)
    }

    pub fn from_text(text: impl Into<String>, path: impl Into<PathBuf>) -> ShotResult<Self> {
        let text = text.into();
        let path = path.into();
        let doc = yaml::parse(&text).map_err(|e| {
            ShotError::parse(format!(
                "base color config '{}' is not valid YAML: {e}",
                path.display()
            ))
        })?;
        if !doc.is_mapping() {
            return Err(ShotError::parse(format!(
                "base color config '{}' is not a mapping",
                path.display()
            )));
        }

        let search_paths = match doc.get("search_path").map(yaml::untag) {
            Some(Value::Sequence(_)) => doc
                .get("search_path")
                .map(yaml::string_list)
                .unwrap_or_default(),
            Some(v) => yaml::scalar(v)
                .map(|s| yaml::split_list(&s, ':'))
                .unwrap_or_default(),
            None => Vec::new(),
        };

        let environment: BTreeMap<String, String> = doc
            .get("environment")
            .and_then(Value::as_mapping)
            .map(|m| {
                m.iter()
                    .filter_map(|(k, v)| {
                        Some((yaml::scalar(k)?, yaml::scalar(v).unwrap_or_default()))
                    })
                    .collect()
            })
            .unwrap_or_default();

        let keys_of = |key: &str| -> Vec<String> {
            doc.get(key)
                .and_then(Value::as_mapping)
                .map(|m| m.keys().filter_map(yaml::scalar).collect())
                .unwrap_or_default()
        };
        let names_of = |key: &str| -> Vec<String> {
            doc.get(key)
                .and_then(Value::as_sequence)
                .map(|items| items.iter().filter_map(|i| yaml::field(i, "name")).collect())
                .unwrap_or_default()
        };

        let mut colorspaces = names_of("colorspaces");
        colorspaces.extend(names_of("display_colorspaces"));

        Ok(Self {
            search_paths,
            active_displays: doc
                .get("active_displays")
                .map(yaml::string_list)
                .unwrap_or_default(),
            active_views: doc
                .get("active_views")
                .map(yaml::string_list)
                .unwrap_or_default(),
            description: doc.get("description").and_then(yaml::scalar),
            environment,
            displays: keys_of("displays"),
            colorspaces,
            looks: names_of("looks"),
            roles: keys_of("roles"),
            path,
            text,
        })
    }

    /// Directory relative search paths and operator sources resolve against.
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }

    /// Display the new view is attached to: first active display, else first display.
    pub fn target_display(&self) -> Option<&str> {
        self.active_displays
            .first()
            .or_else(|| self.displays.first())
            .map(String::as_str)
    }

    pub fn has_colorspace(&self, name: &str) -> bool {
        self.colorspaces.iter().any(|c| c == name) || self.roles.iter().any(|r| r == name)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/color/config.rs"]
mod tests;
