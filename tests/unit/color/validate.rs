use super::*;

const VALID: &str = r#"ocio_profile_version: 1
roles:
  scene_linear: lin
displays:
  ACES:
    - !<View> {name: sRGB, colorspace: out, looks: shot}
looks:
  - !<Look>
    name: shot
    process_space: scene_linear
    transform: !<ColorSpaceTransform> {src: lin, dst: shot}
colorspaces:
  - !<ColorSpace>
    name: lin
  - !<ColorSpace>
    name: out
  - !<ColorSpace>
    name: shot
    from_reference: !<GroupTransform>
      children:
        - !<FileTransform> {src: a.cube}
        - !<DisplayViewTransform> {src: lin, display: ACES, view: sRGB}
        - !<CDLTransform> {slope: [1.0, 1.0, 1.0], sat: 1.0}
"#;

fn rejects(text: &str, needle: &str) {
    match validate_config_text(text) {
        Err(ShotError::InvalidColorPipeline(msg)) => {
            assert!(msg.contains(needle), "{msg:?} does not mention {needle:?}")
        }
        other => panic!("expected InvalidColorPipeline, got {other:?}"),
    }
}

#[test]
fn accepts_a_consistent_config() {
    validate_config_text(VALID).unwrap();
}

#[test]
fn profile_version_is_required() {
    rejects(&VALID.replace("ocio_profile_version: 1\n", ""), "ocio_profile_version");
}

#[test]
fn duplicate_colorspaces_are_rejected() {
    rejects(&VALID.replace("name: out", "name: lin"), "duplicate colorspace 'lin'");
}

#[test]
fn unknown_process_space_is_rejected() {
    rejects(
        &VALID.replace("process_space: scene_linear", "process_space: nope"),
        "unknown process space 'nope'",
    );
}

#[test]
fn views_must_reference_known_looks_and_spaces() {
    rejects(&VALID.replace("looks: shot}", "looks: other}"), "unknown look 'other'");
    rejects(&VALID.replace("colorspace: out,", "colorspace: gone,"), "unknown colorspace 'gone'");
}

#[test]
fn nested_transforms_are_checked() {
    rejects(
        &VALID.replace("view: sRGB}", "view: Log}"),
        "unknown display/view 'ACES/Log'",
    );
    rejects(&VALID.replace("{src: a.cube}", "{src: \"\"}"), "FileTransform");
    rejects(&VALID.replace("[1.0, 1.0, 1.0]", "[1.0, 1.0]"), "three values");
}

#[test]
fn roles_must_target_colorspaces() {
    rejects(&VALID.replace("scene_linear: lin", "scene_linear: gone"), "role 'scene_linear'");
}
