//! Structural checks on an assembled config, run before anything is written.

use std::collections::{BTreeMap, BTreeSet};

use serde_yaml::Value;

use crate::color::yaml;
use crate::foundation::error::{ShotError, ShotResult};

const TRANSFORM_KEYS: &[&str] = &[
    "to_reference",
    "from_reference",
    "to_scene_reference",
    "from_scene_reference",
    "to_display_reference",
    "from_display_reference",
    "transform",
    "inverse_transform",
];

struct Catalog {
    colorspaces: BTreeSet<String>,
    roles: BTreeSet<String>,
    looks: BTreeSet<String>,
    /// display -> view names
    displays: BTreeMap<String, BTreeSet<String>>,
}

impl Catalog {
    fn knows_space(&self, name: &str) -> bool {
        self.colorspaces.contains(name) || self.roles.contains(name)
    }
}

fn fail(msg: impl Into<String>) -> ShotError {
    ShotError::invalid_pipeline(msg)
}

fn entries<'a>(doc: &'a Value, key: &str) -> impl Iterator<Item = &'a Value> {
    doc.get(key)
        .and_then(Value::as_sequence)
        .into_iter()
        .flatten()
}

/// Validate the textual config produced by the compiler.
pub fn validate_config_text(text: &str) -> ShotResult<()> {
    let doc = yaml::parse(text).map_err(|e| fail(format!("derived config is not valid YAML: {e}")))?;
    if doc.get("ocio_profile_version").and_then(yaml::scalar).is_none() {
        return Err(fail("ocio_profile_version is missing"));
    }

    let mut colorspaces = BTreeSet::new();
    for cs in entries(&doc, "colorspaces").chain(entries(&doc, "display_colorspaces")) {
        let name = yaml::field(cs, "name").unwrap_or_default();
        if name.trim().is_empty() {
            return Err(fail("colorspace without a name"));
        }
        if !colorspaces.insert(name.clone()) {
            return Err(fail(format!("duplicate colorspace '{name}'")));
        }
    }

    let role_map: Vec<(String, String)> = doc
        .get("roles")
        .and_then(Value::as_mapping)
        .map(|m| {
            m.iter()
                .filter_map(|(k, v)| Some((yaml::scalar(k)?, yaml::scalar(v)?)))
                .collect()
        })
        .unwrap_or_default();
    for (role, target) in &role_map {
        if !colorspaces.contains(target) {
            return Err(fail(format!(
                "role '{role}' points at unknown colorspace '{target}'"
            )));
        }
    }

    let mut looks = BTreeSet::new();
    for look in entries(&doc, "looks") {
        let name = yaml::field(look, "name").unwrap_or_default();
        if name.trim().is_empty() || !looks.insert(name.clone()) {
            return Err(fail(format!("look name '{name}' is empty or duplicated")));
        }
    }

    let mut displays = BTreeMap::new();
    if let Some(m) = doc.get("displays").and_then(Value::as_mapping) {
        for (display, views) in m {
            let Some(display) = yaml::scalar(display) else {
                continue;
            };
            let mut names = BTreeSet::new();
            for view in yaml::untag(views).as_sequence().into_iter().flatten() {
                match yaml::untag(view) {
                    Value::Sequence(_) => names.extend(yaml::string_list(view)),
                    _ => names.extend(yaml::field(view, "name")),
                }
            }
            displays.insert(display, names);
        }
    }

    let catalog = Catalog {
        colorspaces,
        roles: role_map.into_iter().map(|(r, _)| r).collect(),
        looks,
        displays,
    };

    for look in entries(&doc, "looks") {
        let name = yaml::field(look, "name").unwrap_or_default();
        match yaml::field(look, "process_space") {
            Some(ps) if catalog.knows_space(&ps) => {}
            Some(ps) => {
                return Err(fail(format!(
                    "look '{name}' uses unknown process space '{ps}'"
                )));
            }
            None => return Err(fail(format!("look '{name}' has no process space"))),
        }
        check_transforms(look, &catalog)?;
    }

    if let Some(m) = doc.get("displays").and_then(Value::as_mapping) {
        for (display, views) in m {
            let display = yaml::scalar(display).unwrap_or_default();
            for view in yaml::untag(views).as_sequence().into_iter().flatten() {
                check_view(&display, view, &catalog)?;
            }
        }
    }

    for cs in entries(&doc, "colorspaces").chain(entries(&doc, "display_colorspaces")) {
        check_transforms(cs, &catalog)?;
    }
    Ok(())
}

fn check_view(display: &str, view: &Value, catalog: &Catalog) -> ShotResult<()> {
    if yaml::untag(view).is_sequence() {
        return Ok(());
    }
    let name = yaml::field(view, "name").unwrap_or_default();
    if let Some(cs) = yaml::field(view, "colorspace")
        && !catalog.knows_space(&cs)
    {
        return Err(fail(format!(
            "view '{display}/{name}' uses unknown colorspace '{cs}'"
        )));
    }
    if let Some(looks) = yaml::field(view, "looks") {
        for look in yaml::split_list(&looks, ',') {
            let look = look.trim_start_matches(['+', '-']);
            if !catalog.looks.contains(look) {
                return Err(fail(format!(
                    "view '{display}/{name}' references unknown look '{look}'"
                )));
            }
        }
    }
    Ok(())
}

fn check_transforms(owner: &Value, catalog: &Catalog) -> ShotResult<()> {
    let owner = yaml::untag(owner);
    for key in TRANSFORM_KEYS {
        if let Some(t) = owner.get(*key) {
            check_transform(t, catalog)?;
        }
    }
    Ok(())
}

fn check_transform(t: &Value, catalog: &Catalog) -> ShotResult<()> {
    let tag = yaml::tag_name(t).unwrap_or_default();
    match tag.as_str() {
        "GroupTransform" => {
            let children = yaml::untag(t).get("children").and_then(Value::as_sequence);
            for child in children.into_iter().flatten() {
                check_transform(child, catalog)?;
            }
        }
        "ColorSpaceTransform" => {
            for key in ["src", "dst"] {
                let name = yaml::field(t, key).unwrap_or_default();
                if !catalog.knows_space(&name) {
                    return Err(fail(format!(
                        "ColorSpaceTransform {key} '{name}' is not a known colorspace"
                    )));
                }
            }
        }
        "DisplayViewTransform" => {
            let src = yaml::field(t, "src").unwrap_or_default();
            if !catalog.knows_space(&src) {
                return Err(fail(format!(
                    "DisplayViewTransform src '{src}' is not a known colorspace"
                )));
            }
            let display = yaml::field(t, "display").unwrap_or_default();
            let view = yaml::field(t, "view").unwrap_or_default();
            let known = catalog
                .displays
                .get(&display)
                .is_some_and(|views| views.contains(&view));
            if !known {
                return Err(fail(format!(
                    "DisplayViewTransform refers to unknown display/view '{display}/{view}'"
                )));
            }
        }
        "FileTransform" => {
            if yaml::field(t, "src").is_none_or(|s| s.trim().is_empty()) {
                return Err(fail("FileTransform without a source"));
            }
        }
        "CDLTransform" => {
            for key in ["slope", "offset", "power"] {
                if let Some(v) = yaml::untag(t).get(key)
                    && v.as_sequence().is_none_or(|s| s.len() != 3)
                {
                    return Err(fail(format!("CDLTransform {key} must have three values")));
                }
            }
        }
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/color/validate.rs"]
mod tests;
