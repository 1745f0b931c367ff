use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(ShotError::parse("x").to_string().contains("parse failure:"));
    assert!(
        ShotError::missing_config("x")
            .to_string()
            .contains("missing configuration:")
    );
    assert!(
        ShotError::missing_dimensions("x")
            .to_string()
            .contains("missing dimensions:")
    );
    assert!(
        ShotError::invalid_pipeline("x")
            .to_string()
            .contains("invalid color pipeline:")
    );
    assert!(ShotError::io("x").to_string().contains("io error:"));
}

#[test]
fn node_errors_name_class_track_and_attribute() {
    let node = NodeRef::new("OCIOCDLTransform", Some(3)).attr("src");
    let msg = ShotError::misconfigured(node, "CDL must not carry a source path").to_string();
    assert!(msg.contains("misconfigured node:"));
    assert!(msg.contains("class 'OCIOCDLTransform'"));
    assert!(msg.contains("track 3"));
    assert!(msg.contains("attribute 'src'"));
}

#[test]
fn node_ref_without_index_says_missing() {
    let msg = ShotError::invalid_effect(NodeRef::new("", None), "missing 'class'").to_string();
    assert!(msg.contains("class '<unknown>'"));
    assert!(msg.contains("track <missing>"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ShotError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
