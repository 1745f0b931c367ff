use std::path::Path;

use serde_json::{Map, Value};

use crate::foundation::core::{Direction, Family, Vec2};
use crate::foundation::error::{NodeRef, ShotError, ShotResult};
use crate::graph::node::{EffectNode, decode_nodes};
use crate::graph::operators::{ColorOperator, GeometryOperator, direction_from_value};
use crate::graph::registry::{OperatorClass, canonical_attribute, is_alias};

/// A node whose class is resolved and whose attributes are aliased and filtered
/// down to the class schema.
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedNode {
    pub class: OperatorClass,
    /// Class name as authored.
    pub class_name: String,
    pub track_index: i64,
    pub attributes: Map<String, Value>,
}

impl ParsedNode {
    /// Sanitize a raw node against `class`'s schema.
    pub fn sanitize(node: &EffectNode, class: OperatorClass) -> ShotResult<Self> {
        let node_ref = node.node_ref();
        let mut attributes = Map::new();

        // Canonical keys first so they take precedence over aliases.
        for (key, value) in node.attributes.iter().filter(|(k, _)| !is_alias(k)) {
            check_cdl_source(class, key, &node_ref)?;
            if class.accepts(key) {
                attributes.insert(key.clone(), expand_scale(key, value));
            }
        }
        for (key, value) in node.attributes.iter().filter(|(k, _)| is_alias(k)) {
            let canonical = canonical_attribute(key);
            check_cdl_source(class, canonical, &node_ref.attr(key.as_str()))?;
            if class.accepts(canonical) && !attributes.contains_key(canonical) {
                attributes.insert(canonical.to_owned(), value.clone());
            }
        }

        Ok(Self {
            class,
            class_name: node.class_name.clone(),
            track_index: node.track_index,
            attributes,
        })
    }

    pub fn node_ref(&self) -> NodeRef {
        NodeRef::new(self.class_name.clone(), Some(self.track_index))
    }

    pub fn family(&self) -> Family {
        self.class.family()
    }

    fn mistyped(&self, key: &str, expected: &str) -> ShotError {
        ShotError::misconfigured(self.node_ref().attr(key), format!("expected {expected}"))
    }

    pub(crate) fn optional_str(&self, key: &str) -> ShotResult<Option<String>> {
        match self.attributes.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            // Nuke exports some ids as numbers.
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(_) => Err(self.mistyped(key, "a string")),
        }
    }

    pub(crate) fn required_str(&self, key: &str) -> ShotResult<String> {
        match self.optional_str(key)? {
            Some(s) if !s.trim().is_empty() => Ok(s),
            _ => Err(ShotError::misconfigured(
                self.node_ref().attr(key),
                "required attribute is missing or empty",
            )),
        }
    }

    pub(crate) fn number(&self, key: &str) -> ShotResult<Option<f64>> {
        match self.attributes.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(v) => v
                .as_f64()
                .filter(|f| f.is_finite())
                .map(Some)
                .ok_or_else(|| self.mistyped(key, "a finite number")),
        }
    }

    fn numbers<const N: usize>(&self, key: &str) -> ShotResult<Option<[f64; N]>> {
        let Some(v) = self.attributes.get(key) else {
            return Ok(None);
        };
        if v.is_null() {
            return Ok(None);
        }
        let expected = || self.mistyped(key, &format!("an array of {N} finite numbers"));
        let items = v.as_array().ok_or_else(expected)?;
        if items.len() != N {
            return Err(expected());
        }
        let mut out = [0.0; N];
        for (slot, item) in out.iter_mut().zip(items) {
            *slot = item.as_f64().filter(|f| f.is_finite()).ok_or_else(expected)?;
        }
        Ok(Some(out))
    }

    pub(crate) fn vec2(&self, key: &str) -> ShotResult<Option<Vec2>> {
        Ok(self.numbers::<2>(key)?.map(|[x, y]| Vec2::new(x, y)))
    }

    pub(crate) fn vec3(&self, key: &str) -> ShotResult<Option<[f64; 3]>> {
        self.numbers::<3>(key)
    }

    pub(crate) fn direction(&self) -> ShotResult<Direction> {
        match self.attributes.get("direction") {
            None => Ok(Direction::Forward),
            Some(v) => direction_from_value(v)
                .ok_or_else(|| self.mistyped("direction", "a boolean, number or direction name")),
        }
    }
}

/// A CDL carrying a source key is rejected whatever the value, empty or null included.
fn check_cdl_source(class: OperatorClass, canonical: &str, node: &NodeRef) -> ShotResult<()> {
    if class == OperatorClass::CdlTransform && canonical == "src" {
        let node = if node.attribute.is_some() {
            node.clone()
        } else {
            node.attr("src")
        };
        return Err(ShotError::misconfigured(
            node,
            "CDL transforms must not carry a source path; use a FileTransform for CDL files",
        ));
    }
    Ok(())
}

fn expand_scale(key: &str, value: &Value) -> Value {
    if key == "scale"
        && let Some(s) = value.as_f64()
    {
        return Value::Array(vec![Value::from(s), Value::from(s)]);
    }
    value.clone()
}

/// Recoverable per-node problem recorded while parsing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedNode {
    pub node: NodeRef,
    pub reason: String,
}

/// Sanitized effect graph: color and geometry nodes, each ordered by track index.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EffectGraph {
    pub color_nodes: Vec<ParsedNode>,
    pub repo_nodes: Vec<ParsedNode>,
    /// Nodes dropped because they were incomplete or of an unknown class.
    pub skipped: Vec<SkippedNode>,
}

impl EffectGraph {
    pub fn from_path(path: &Path) -> ShotResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ShotError::parse(format!("failed to read effect file '{}': {e}", path.display()))
        })?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> ShotResult<Self> {
        let doc: Value = serde_json::from_str(text)
            .map_err(|e| ShotError::parse(format!("effect file is not valid JSON: {e}")))?;
        Self::from_value(&doc)
    }

    #[tracing::instrument(skip(doc))]
    pub fn from_value(doc: &Value) -> ShotResult<Self> {
        let mut graph = Self::default();
        let mut color: Vec<(EffectNode, OperatorClass)> = Vec::new();
        let mut repo: Vec<(EffectNode, OperatorClass)> = Vec::new();

        for decoded in decode_nodes(doc)? {
            let node = match decoded {
                Ok(node) => node,
                Err(ShotError::InvalidEffectFile { node, reason }) => {
                    tracing::warn!(%node, %reason, "skipping incomplete effect node");
                    graph.skipped.push(SkippedNode { node, reason });
                    continue;
                }
                Err(e) => return Err(e),
            };
            let Some(class) = OperatorClass::lookup(&node.class_name) else {
                tracing::debug!(class = %node.class_name, "dropping unrecognized effect class");
                graph.skipped.push(SkippedNode {
                    node: node.node_ref(),
                    reason: "unrecognized class".to_owned(),
                });
                continue;
            };
            match class.family() {
                Family::Color => color.push((node, class)),
                Family::Geometry => repo.push((node, class)),
            }
        }

        // `sort_by_key` is stable: equal indices keep input order.
        color.sort_by_key(|(n, _)| (n.track_index, n.position));
        repo.sort_by_key(|(n, _)| (n.track_index, n.position));

        graph.color_nodes = color
            .iter()
            .map(|(n, c)| ParsedNode::sanitize(n, *c))
            .collect::<ShotResult<_>>()?;
        graph.repo_nodes = repo
            .iter()
            .map(|(n, c)| ParsedNode::sanitize(n, *c))
            .collect::<ShotResult<_>>()?;

        tracing::debug!(
            color = graph.color_nodes.len(),
            geometry = graph.repo_nodes.len(),
            skipped = graph.skipped.len(),
            "parsed effect graph"
        );
        Ok(graph)
    }

    pub fn nodes(&self, family: Family) -> &[ParsedNode] {
        match family {
            Family::Color => &self.color_nodes,
            Family::Geometry => &self.repo_nodes,
        }
    }

    /// Fail when a family the caller depends on ended up empty.
    pub fn require(&self, family: Family) -> ShotResult<()> {
        if !self.nodes(family).is_empty() {
            return Ok(());
        }
        let (node, cause) = match self.skipped.first() {
            Some(s) => (s.node.clone(), format!(" (first skipped node: {})", s.reason)),
            None => (NodeRef::default(), String::new()),
        };
        Err(ShotError::invalid_effect(
            node,
            format!("no valid {family} nodes remain{cause}"),
        ))
    }

    pub fn color_operators(&self) -> ShotResult<Vec<ColorOperator>> {
        self.color_nodes.iter().map(ColorOperator::from_node).collect()
    }

    pub fn geometry_operators(&self) -> ShotResult<Vec<GeometryOperator>> {
        self.repo_nodes
            .iter()
            .map(GeometryOperator::from_node)
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/graph/parse.rs"]
mod tests;
