use super::*;

#[test]
fn engine_prefixed_names_resolve() {
    assert_eq!(
        OperatorClass::lookup("OCIOFileTransform"),
        Some(OperatorClass::FileTransform)
    );
    assert_eq!(
        OperatorClass::lookup("OCIOColorSpace"),
        Some(OperatorClass::ColorSpaceTransform)
    );
    assert_eq!(
        OperatorClass::lookup("OCIOCDLTransform"),
        Some(OperatorClass::CdlTransform)
    );
    assert_eq!(
        OperatorClass::lookup("OCIODisplay"),
        Some(OperatorClass::DisplayViewTransform)
    );
    assert_eq!(
        OperatorClass::lookup("DisplayViewTransform"),
        Some(OperatorClass::DisplayViewTransform)
    );
}

#[test]
fn plain_transform_is_a_repo_transform() {
    assert_eq!(
        OperatorClass::lookup("Transform"),
        Some(OperatorClass::RepoTransform)
    );
    assert_eq!(
        OperatorClass::lookup("RepoTransform"),
        Some(OperatorClass::RepoTransform)
    );
    assert_eq!(OperatorClass::RepoTransform.family(), Family::Geometry);
}

#[test]
fn unknown_classes_are_rejected() {
    assert_eq!(OperatorClass::lookup("Grade"), None);
    assert_eq!(OperatorClass::lookup("OCIOLookTransform"), None);
}

#[test]
fn aliases_map_to_canonical_names() {
    assert_eq!(canonical_attribute("in_colorspace"), "src");
    assert_eq!(canonical_attribute("out_colorspace"), "dst");
    assert_eq!(canonical_attribute("file"), "src");
    assert_eq!(canonical_attribute("saturation"), "sat");
    assert_eq!(canonical_attribute("translate"), "translate");
    assert!(is_alias("file"));
    assert!(!is_alias("src"));
}

#[test]
fn cdl_schema_has_no_source_path() {
    assert!(!OperatorClass::CdlTransform.accepts("src"));
    assert!(OperatorClass::CdlTransform.accepts("sat"));
    assert!(OperatorClass::FileTransform.accepts("src"));
}
