use super::*;
use crate::graph::parse::EffectGraph;
use serde_json::json;

fn single(class: &str, node: Value) -> ParsedNode {
    let doc = json!([{"class": class, "subTrackIndex": 0, "node": node}]);
    let graph = EffectGraph::from_value(&doc).unwrap();
    graph
        .color_nodes
        .into_iter()
        .chain(graph.repo_nodes)
        .next()
        .unwrap()
}

#[test]
fn file_transform_direction_follows_truthiness() {
    let node = single("OCIOFileTransform", json!({"file": "a.cube", "direction": 1}));
    let op = ColorOperator::from_node(&node).unwrap();
    assert_eq!(op.direction(), Direction::Inverse);
    assert_eq!(op.file_path(), Some(Path::new("a.cube")));

    let node = single("OCIOFileTransform", json!({"file": "a.cube", "direction": 0}));
    assert_eq!(
        ColorOperator::from_node(&node).unwrap().direction(),
        Direction::Forward
    );
}

#[test]
fn cdl_uses_engine_defaults_for_optional_fields() {
    let node = single("OCIOCDLTransform", json!({"slope": [1.2, 1.1, 1.0]}));
    match ColorOperator::from_node(&node).unwrap() {
        ColorOperator::CdlTransform {
            offset,
            power,
            slope,
            sat,
            ..
        } => {
            assert_eq!(offset, [0.0; 3]);
            assert_eq!(power, [1.0; 3]);
            assert_eq!(slope, [1.2, 1.1, 1.0]);
            assert_eq!(sat, 1.0);
        }
        other => panic!("unexpected operator {other:?}"),
    }
}

#[test]
fn missing_required_color_field_names_the_attribute() {
    let node = single("OCIOColorSpace", json!({"in_colorspace": "ACES - ACEScg"}));
    match ColorOperator::from_node(&node) {
        Err(ShotError::MisconfiguredNode { node, .. }) => {
            assert_eq!(node.attribute.as_deref(), Some("dst"));
        }
        other => panic!("expected MisconfiguredNode, got {other:?}"),
    }
}

#[test]
fn mistyped_vectors_are_rejected() {
    let node = single("Transform", json!({"translate": [1.0]}));
    assert!(matches!(
        GeometryOperator::from_node(&node),
        Err(ShotError::MisconfiguredNode { .. })
    ));
}

#[test]
fn geometry_defaults_are_identity() {
    let node = single("Transform", json!({}));
    assert_eq!(
        GeometryOperator::from_node(&node).unwrap(),
        GeometryOperator::default()
    );
}

#[test]
fn scalar_and_vector_scale_parse_identically() {
    let a = GeometryOperator::from_node(&single("Transform", json!({"scale": 2.0}))).unwrap();
    let b =
        GeometryOperator::from_node(&single("Transform", json!({"scale": [2.0, 2.0]}))).unwrap();
    assert_eq!(a, b);
}

#[test]
fn direction_strings_are_understood() {
    assert_eq!(
        direction_from_value(&json!("inverse")),
        Some(Direction::Inverse)
    );
    assert_eq!(
        direction_from_value(&json!("TRANSFORM_DIR_FORWARD")),
        Some(Direction::Forward)
    );
    assert_eq!(direction_from_value(&json!(true)), Some(Direction::Inverse));
    assert_eq!(direction_from_value(&json!("sideways")), None);
}
