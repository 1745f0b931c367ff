//! Search path resolution for derived configs.

use std::path::{Path, PathBuf};

use crate::color::config::BaseConfig;
use crate::color::document::ConfigDocument;
use crate::color::yaml;
use crate::graph::operators::ColorOperator;

/// Resolve `entry` against `base_dir` to the directory it contributes, if it exists.
///
/// Files contribute their parent directory, directories themselves.
pub fn resolve_entry(base_dir: &Path, entry: &Path) -> Option<PathBuf> {
    let joined = if entry.is_absolute() {
        entry.to_path_buf()
    } else {
        base_dir.join(entry)
    };
    let abs = std::fs::canonicalize(&joined).ok()?;
    if abs.is_file() {
        abs.parent().map(Path::to_path_buf)
    } else if abs.is_dir() {
        Some(abs)
    } else {
        None
    }
}

/// Union of the base config's search path and the directories of file-backed
/// operators, deduplicated in first-seen order. Missing paths are dropped.
pub fn resolve_search_paths(base: &BaseConfig, operators: &[ColorOperator]) -> Vec<PathBuf> {
    let declared = base.search_paths.iter().map(PathBuf::from);
    let sources = operators
        .iter()
        .filter_map(ColorOperator::file_path)
        .map(Path::to_path_buf);

    let mut out: Vec<PathBuf> = Vec::new();
    for entry in declared.chain(sources) {
        match resolve_entry(base.dir(), &entry) {
            Some(dir) if !out.contains(&dir) => out.push(dir),
            Some(_) => {}
            None => tracing::debug!(path = %entry.display(), "dropping missing search path"),
        }
    }
    out
}

/// Rewrite file-backed operators whose source exists to the bare file name, which the
/// engine then finds through the search path.
pub fn materialize(base_dir: &Path, op: &ColorOperator) -> ColorOperator {
    let ColorOperator::FileTransform {
        src,
        ccc_id,
        interpolation,
        direction,
    } = op
    else {
        return op.clone();
    };
    let path = Path::new(src);
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    };
    match (joined.is_file(), path.file_name()) {
        (true, Some(name)) => ColorOperator::FileTransform {
            src: name.to_string_lossy().into_owned(),
            ccc_id: ccc_id.clone(),
            interpolation: interpolation.clone(),
            direction: *direction,
        },
        _ => op.clone(),
    }
}

/// Replace the `search_path` block of `text` with `paths`.
///
/// A block written as a YAML list stays a list; otherwise the entries are joined with
/// `:`. Every other line of `text` is left untouched.
pub fn rewrite_search_path(text: &str, paths: &[PathBuf]) -> String {
    let mut doc = ConfigDocument::parse(text);
    let entries: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();

    let as_list = doc.block("search_path").is_some_and(|r| r.len() > 1)
        && doc.inline_value("search_path").is_none();
    let lines = if as_list {
        let indent = doc.entry_indent("search_path");
        std::iter::once("search_path:".to_owned())
            .chain(entries.iter().map(|e| format!("{indent}- {}", yaml::quote(e))))
            .collect()
    } else {
        vec![format!("search_path: {}", yaml::quote(&entries.join(":")))]
    };
    doc.set_block("search_path", lines);
    doc.render()
}

#[cfg(test)]
#[path = "../../tests/unit/color/search_path.rs"]
mod tests;
