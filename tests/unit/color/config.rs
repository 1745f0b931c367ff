use super::*;

const V1: &str = r#"ocio_profile_version: 1

search_path: luts:grades
description: Show config

roles:
  scene_linear: ACES - ACEScg

displays:
  ACES:
    - !<View> {name: sRGB, colorspace: Output - sRGB}
  Review:
    - !<View> {name: Rec.709, colorspace: Output - Rec.709}

active_displays: []
active_views: [sRGB, Rec.709]

colorspaces:
  - !<ColorSpace>
    name: ACES - ACEScg
    family: ACES
  - !<ColorSpace>
    name: Output - sRGB
"#;

#[test]
fn reads_the_fields_the_compiler_needs() {
    let cfg = BaseConfig::from_text(V1, "/show/config.ocio").unwrap();
    assert_eq!(cfg.search_paths, vec!["luts", "grades"]);
    assert_eq!(cfg.description.as_deref(), Some("Show config"));
    assert_eq!(cfg.displays, vec!["ACES", "Review"]);
    assert_eq!(cfg.active_views, vec!["sRGB", "Rec.709"]);
    assert_eq!(cfg.colorspaces, vec!["ACES - ACEScg", "Output - sRGB"]);
    assert_eq!(cfg.roles, vec!["scene_linear"]);
    assert_eq!(cfg.dir(), Path::new("/show"));
}

#[test]
fn target_display_falls_back_to_first_display() {
    let cfg = BaseConfig::from_text(V1, "/show/config.ocio").unwrap();
    assert_eq!(cfg.target_display(), Some("ACES"));

    let text = V1.replace("active_displays: []", "active_displays: [Review]");
    let cfg = BaseConfig::from_text(text, "/show/config.ocio").unwrap();
    assert_eq!(cfg.target_display(), Some("Review"));
}

#[test]
fn list_search_paths_and_environment_are_read() {
    let text = "ocio_profile_version: 2\nsearch_path:\n  - luts\n  - /abs/cdl\nenvironment:\n  SHOT: sh010\n";
    let cfg = BaseConfig::from_text(text, "/show/config.ocio").unwrap();
    assert_eq!(cfg.search_paths, vec!["luts", "/abs/cdl"]);
    assert_eq!(cfg.environment.get("SHOT").map(String::as_str), Some("sh010"));
}

#[test]
fn roles_count_as_colorspaces() {
    let cfg = BaseConfig::from_text(V1, "/show/config.ocio").unwrap();
    assert!(cfg.has_colorspace("scene_linear"));
    assert!(cfg.has_colorspace("Output - sRGB"));
    assert!(!cfg.has_colorspace("Output - P3"));
}

#[test]
fn invalid_yaml_is_a_parse_failure() {
    assert!(matches!(
        BaseConfig::from_text("a: [1, 2", "/x/config.ocio"),
        Err(ShotError::Parse(_))
    ));
    assert!(matches!(
        BaseConfig::from_text("- a\n- b\n", "/x/config.ocio"),
        Err(ShotError::Parse(_))
    ));
}

#[test]
fn missing_file_is_missing_configuration() {
    assert!(matches!(
        BaseConfig::load(Path::new("/definitely/not/here/config.ocio")),
        Err(ShotError::MissingConfiguration(_))
    ));
}
