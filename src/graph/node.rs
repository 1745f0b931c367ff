use serde_json::{Map, Value};

use crate::foundation::error::{NodeRef, ShotError, ShotResult};

pub const CLASS_KEY: &str = "class";
pub const INDEX_KEY: &str = "subTrackIndex";
pub const DATA_KEY: &str = "node";

/// Raw effect node as found in the effect file. Consumed once by the parser.
#[derive(Clone, Debug, PartialEq)]
pub struct EffectNode {
    pub class_name: String,
    pub track_index: i64,
    pub attributes: Map<String, Value>,
    /// Position in the input, used to keep sorting stable across equal indices.
    pub position: usize,
}

impl EffectNode {
    pub fn node_ref(&self) -> NodeRef {
        NodeRef::new(self.class_name.clone(), Some(self.track_index))
    }

    /// Decode one node object. Missing keys are reported against this node only.
    pub fn from_value(value: &Value, position: usize) -> ShotResult<Self> {
        let Some(obj) = value.as_object() else {
            return Err(ShotError::invalid_effect(
                NodeRef::default(),
                format!("entry #{position} is not an object"),
            ));
        };

        let class_name = obj.get(CLASS_KEY).and_then(Value::as_str);
        let track_index = obj.get(INDEX_KEY).and_then(as_integer);
        let node = NodeRef::new(class_name.unwrap_or_default(), track_index);

        let Some(class_name) = class_name else {
            return Err(ShotError::invalid_effect(
                node.attr(CLASS_KEY),
                format!("missing '{CLASS_KEY}'"),
            ));
        };
        let Some(track_index) = track_index else {
            return Err(ShotError::invalid_effect(
                node.attr(INDEX_KEY),
                format!("missing or non-integer '{INDEX_KEY}'"),
            ));
        };
        let Some(attributes) = obj.get(DATA_KEY).and_then(Value::as_object) else {
            return Err(ShotError::invalid_effect(
                node.attr(DATA_KEY),
                format!("missing '{DATA_KEY}' attribute object"),
            ));
        };

        Ok(Self {
            class_name: class_name.to_owned(),
            track_index,
            attributes: attributes.clone(),
            position,
        })
    }
}

fn as_integer(v: &Value) -> Option<i64> {
    if let Some(i) = v.as_i64() {
        return Some(i);
    }
    v.as_f64()
        .filter(|f| f.is_finite() && f.fract() == 0.0)
        .map(|f| f as i64)
}

/// Split a decoded effect document into per-node decode results.
///
/// Objects contribute their object-typed values (other values such as
/// `assignTo` strings are skipped); arrays contribute every element.
pub fn decode_nodes(doc: &Value) -> ShotResult<Vec<ShotResult<EffectNode>>> {
    match doc {
        Value::Object(map) => Ok(map
            .values()
            .filter(|v| v.is_object())
            .enumerate()
            .map(|(pos, v)| EffectNode::from_value(v, pos))
            .collect()),
        Value::Array(items) => Ok(items
            .iter()
            .enumerate()
            .map(|(pos, v)| EffectNode::from_value(v, pos))
            .collect()),
        _ => Err(ShotError::parse(
            "effect document must be a JSON object or array of nodes",
        )),
    }
}
