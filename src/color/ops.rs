//! YAML rendering of color operators as OCIO transforms.

use crate::color::yaml::{number, quote};
use crate::foundation::core::Direction;
use crate::graph::operators::ColorOperator;

fn vec3(v: &[f64; 3]) -> String {
    format!("[{}, {}, {}]", number(v[0]), number(v[1]), number(v[2]))
}

fn push_direction(fields: &mut Vec<String>, direction: Direction) {
    if direction.is_inverse() {
        fields.push("direction: inverse".to_owned());
    }
}

fn push_opt(fields: &mut Vec<String>, key: &str, value: &Option<String>) {
    if let Some(v) = value {
        fields.push(format!("{key}: {}", quote(v)));
    }
}

/// Single-line flow form, e.g. `!<ColorSpaceTransform> {src: a, dst: b}`.
pub fn render_transform(op: &ColorOperator) -> String {
    let mut fields = Vec::new();
    match op {
        ColorOperator::FileTransform {
            src,
            ccc_id,
            interpolation,
            direction,
        } => {
            fields.push(format!("src: {}", quote(src)));
            push_opt(&mut fields, "cccid", ccc_id);
            push_opt(&mut fields, "interpolation", interpolation);
            push_direction(&mut fields, *direction);
        }
        ColorOperator::ColorSpaceTransform { src, dst } => {
            fields.push(format!("src: {}", quote(src)));
            fields.push(format!("dst: {}", quote(dst)));
        }
        ColorOperator::DisplayViewTransform {
            src,
            display,
            view,
            direction,
        } => {
            fields.push(format!("src: {}", quote(src)));
            fields.push(format!("display: {}", quote(display)));
            fields.push(format!("view: {}", quote(view)));
            push_direction(&mut fields, *direction);
        }
        ColorOperator::CdlTransform {
            offset,
            power,
            slope,
            sat,
            description,
            id,
            direction,
        } => {
            push_opt(&mut fields, "name", id);
            push_opt(&mut fields, "description", description);
            fields.push(format!("slope: {}", vec3(slope)));
            fields.push(format!("offset: {}", vec3(offset)));
            fields.push(format!("power: {}", vec3(power)));
            fields.push(format!("sat: {}", number(*sat)));
            push_direction(&mut fields, *direction);
        }
    }
    format!("!<{}> {{{}}}", op.class().name(), fields.join(", "))
}

/// `from_reference` value lines for a colorspace wrapping `ops` in a group, indented
/// by `indent`. The first line is the key line itself.
pub fn group_transform(ops: &[ColorOperator], indent: &str) -> Vec<String> {
    if ops.is_empty() {
        return vec![format!("{indent}from_reference: !<GroupTransform> {{children: []}}")];
    }
    let mut lines = vec![
        format!("{indent}from_reference: !<GroupTransform>"),
        format!("{indent}  children:"),
    ];
    lines.extend(
        ops.iter()
            .map(|op| format!("{indent}    - {}", render_transform(op))),
    );
    lines
}
