use super::*;
use pretty_assertions::assert_eq;

const BASE: &str = "ocio_profile_version: 1

# shared LUT folders
search_path: luts:grades
strictparsing: true

displays:
  ACES:
    - !<View> {name: sRGB, colorspace: Output - sRGB}
  Film:
    - !<View> {name: Log, colorspace: ACES - ACEScc}

active_views: [sRGB]

looks: []

colorspaces:
  - !<ColorSpace>
    name: ACES - ACEScg
    description: |
      Linear AP1

      scene referred
  - !<ColorSpace>
    name: Output - sRGB
";

#[test]
fn render_round_trips_byte_for_byte() {
    assert_eq!(ConfigDocument::parse(BASE).render(), BASE);
    let crlf = "a: 1\r\nb: 2\r\n";
    assert_eq!(ConfigDocument::parse(crlf).render(), crlf);
}

#[test]
fn blocks_span_indented_lines_and_exclude_trailing_blanks() {
    let doc = ConfigDocument::parse(BASE);
    let range = doc.block("colorspaces").unwrap();
    assert_eq!(doc.lines()[range.start], "colorspaces:");
    assert_eq!(doc.lines()[range.end - 1], "    name: Output - sRGB");

    let range = doc.block("search_path").unwrap();
    assert_eq!(range.len(), 1);
    assert_eq!(doc.inline_value("search_path"), Some("luts:grades"));
    assert!(doc.block("roles").is_none());
}

#[test]
fn set_block_only_touches_that_block() {
    let mut doc = ConfigDocument::parse(BASE);
    doc.set_block("active_views", vec!["active_views: [shot, sRGB]".to_owned()]);
    let out = doc.render();
    assert_eq!(out, BASE.replace("active_views: [sRGB]", "active_views: [shot, sRGB]"));
}

#[test]
fn missing_blocks_are_appended_before_final_newline() {
    let mut doc = ConfigDocument::parse("a: 1\n");
    doc.set_block("b", vec!["b: 2".to_owned()]);
    assert_eq!(doc.render(), "a: 1\n\nb: 2\n");
}

#[test]
fn entries_extend_empty_inline_lists() {
    let mut doc = ConfigDocument::parse(BASE);
    assert!(doc.append_entries("looks", vec!["  - !<Look>".to_owned(), "    name: x".to_owned()]));
    let out = doc.render();
    assert!(out.contains("looks:\n  - !<Look>\n    name: x\n\ncolorspaces:"));
}

#[test]
fn entries_are_appended_after_the_last_item() {
    let mut doc = ConfigDocument::parse(BASE);
    assert_eq!(doc.entry_indent("colorspaces"), "  ");
    assert!(doc.append_entries("colorspaces", vec!["  - !<ColorSpace>".to_owned()]));
    assert!(doc.render().ends_with("    name: Output - sRGB\n  - !<ColorSpace>\n"));
}

#[test]
fn nested_entries_land_under_the_named_display() {
    let mut doc = ConfigDocument::parse(BASE);
    assert!(doc.append_nested_entry("displays", "ACES", "!<View> {name: shot}"));
    let out = doc.render();
    assert!(out.contains(
        "  ACES:\n    - !<View> {name: sRGB, colorspace: Output - sRGB}\n    - !<View> {name: shot}\n  Film:"
    ));
}

#[test]
fn nested_entries_create_missing_children() {
    let mut doc = ConfigDocument::parse(BASE);
    assert!(doc.append_nested_entry("displays", "Review", "!<View> {name: shot}"));
    let out = doc.render();
    assert!(out.contains(
        "    - !<View> {name: Log, colorspace: ACES - ACEScc}\n  Review:\n    - !<View> {name: shot}\n"
    ));
}

#[test]
fn inline_lists_with_items_are_not_extended() {
    let mut doc = ConfigDocument::parse("looks: [a]\n");
    assert!(!doc.append_entries("looks", vec!["  - b".to_owned()]));
}

#[test]
fn nested_entries_follow_indentless_view_lists() {
    let base = "displays:\n  ACES:\n  - !<View> {name: sRGB, colorspace: Output - sRGB}\n  - !<View>\n    name: Raw\n    colorspace: Raw\n  Film:\n  - !<View> {name: Log, colorspace: Log}\n";
    let mut doc = ConfigDocument::parse(base);
    assert!(doc.append_nested_entry("displays", "ACES", "!<View> {name: shot}"));
    assert_eq!(
        doc.render(),
        base.replace(
            "    colorspace: Raw\n  Film:",
            "    colorspace: Raw\n  - !<View> {name: shot}\n  Film:"
        )
    );
}

#[test]
fn nested_flow_sequences_are_extended_in_place() {
    let mut doc =
        ConfigDocument::parse("displays:\n  ACES: [!<View> {name: sRGB}]  # main\n  Film: []\n");
    assert!(doc.append_nested_entry("displays", "ACES", "!<View> {name: shot}"));
    assert!(doc.append_nested_entry("displays", "Film", "!<View> {name: shot}"));
    assert_eq!(
        doc.render(),
        "displays:\n  ACES: [!<View> {name: sRGB}, !<View> {name: shot}]  # main\n  Film: [!<View> {name: shot}]\n"
    );
}

#[test]
fn nested_inline_mappings_are_not_extended() {
    let mut doc = ConfigDocument::parse("displays:\n  ACES: {sRGB: x}\n");
    assert!(!doc.append_nested_entry("displays", "ACES", "!<View> {name: shot}"));
    assert_eq!(doc.render(), "displays:\n  ACES: {sRGB: x}\n");
}
