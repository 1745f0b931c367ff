//! Small helpers for reading and emitting OCIO-flavoured YAML.

use serde_yaml::Value;

/// Parse OCIO YAML. Verbatim tags (`!<ColorSpace>`) are rewritten as local tags
/// (`!ColorSpace`) first so they survive as [`Value::Tagged`].
pub(crate) fn parse(text: &str) -> Result<Value, serde_yaml::Error> {
    serde_yaml::from_str(&localize_tags(text))
}

fn localize_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("!<") {
        let after = &rest[start + 2..];
        match after.find('>') {
            Some(end) if after[..end].chars().all(|c| c.is_ascii_alphanumeric() || c == '_') => {
                out.push_str(&rest[..start]);
                out.push('!');
                out.push_str(&after[..end]);
                rest = &after[end + 1..];
            }
            _ => {
                out.push_str(&rest[..start + 2]);
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Strip an OCIO type tag (`!<ColorSpace>`) and return the tagged value.
pub(crate) fn untag(v: &Value) -> &Value {
    match v {
        Value::Tagged(t) => &t.value,
        other => other,
    }
}

/// Tag name without the leading `!` or verbatim brackets.
pub(crate) fn tag_name(v: &Value) -> Option<String> {
    match v {
        Value::Tagged(t) => Some(
            t.tag
                .to_string()
                .trim_start_matches('!')
                .trim_start_matches('<')
                .trim_end_matches('>')
                .to_owned(),
        ),
        _ => None,
    }
}

pub(crate) fn scalar(v: &Value) -> Option<String> {
    match untag(v) {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub(crate) fn field(v: &Value, key: &str) -> Option<String> {
    untag(v).get(key).and_then(scalar)
}

/// A sequence of scalars, or a single comma separated scalar.
pub(crate) fn string_list(v: &Value) -> Vec<String> {
    match untag(v) {
        Value::Sequence(items) => items.iter().filter_map(scalar).collect(),
        other => scalar(other)
            .map(|s| split_list(&s, ','))
            .unwrap_or_default(),
    }
}

pub(crate) fn split_list(s: &str, sep: char) -> Vec<String> {
    s.split(sep)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Emit `s` as a plain scalar when that is unambiguous, double-quoted otherwise.
pub(crate) fn quote(s: &str) -> String {
    const RESERVED: &[&str] = &[
        "true", "false", "yes", "no", "on", "off", "y", "n", "null", "~",
    ];
    let plain = s
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '/' || c == '$')
        && !s.ends_with(' ')
        && !s.contains(": ")
        && !s.contains(" #")
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || " _-./+()$".contains(c))
        && !RESERVED.contains(&s.to_ascii_lowercase().as_str());
    if plain {
        s.to_owned()
    } else {
        serde_json::Value::String(s.to_owned()).to_string()
    }
}

pub(crate) fn number(v: f64) -> String {
    format!("{v:?}")
}

pub(crate) fn flow_list<'a>(items: impl IntoIterator<Item = &'a str>) -> String {
    let items: Vec<String> = items.into_iter().map(quote).collect();
    format!("[{}]", items.join(", "))
}
