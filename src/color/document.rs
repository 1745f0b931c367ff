//! Line-oriented editing of a config's textual form.
//!
//! Only the top-level blocks that are explicitly touched change; every other line
//! (comments and formatting included) is carried through byte for byte.

use std::ops::Range;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigDocument {
    lines: Vec<String>,
}

impl ConfigDocument {
    pub fn parse(text: &str) -> Self {
        Self {
            lines: text.split('\n').map(str::to_owned).collect(),
        }
    }

    pub fn render(&self) -> String {
        self.lines.join("\n")
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Line range of the top-level block starting with `key:`, without trailing blanks.
    pub fn block(&self, key: &str) -> Option<Range<usize>> {
        let start = self.lines.iter().position(|l| is_key_line(l, key))?;
        let mut end = start + 1;
        while end < self.lines.len() && is_continuation(&self.lines[end]) {
            end += 1;
        }
        while end > start + 1 && self.lines[end - 1].trim().is_empty() {
            end -= 1;
        }
        Some(start..end)
    }

    /// Inline value of a block's key line (`key: value`), if any.
    pub fn inline_value(&self, key: &str) -> Option<&str> {
        let range = self.block(key)?;
        let value = self.lines[range.start][key.len() + 1..].trim();
        let value = strip_comment(value);
        (!value.is_empty()).then_some(value)
    }

    /// Replace the block for `key`, or append it at the end of the document.
    pub fn set_block(&mut self, key: &str, new_lines: Vec<String>) {
        match self.block(key) {
            Some(range) => {
                self.lines.splice(range, new_lines);
            }
            None => self.append_block(new_lines),
        }
    }

    fn append_block(&mut self, new_lines: Vec<String>) {
        // Keep the final newline (an empty last element) where it is.
        let at = match self.lines.last() {
            Some(last) if last.is_empty() => self.lines.len() - 1,
            _ => self.lines.len(),
        };
        let mut block = Vec::with_capacity(new_lines.len() + 1);
        if at > 0 && !self.lines[at - 1].trim().is_empty() {
            block.push(String::new());
        }
        block.extend(new_lines);
        self.lines.splice(at..at, block);
    }

    /// Append list entries to the block for `key`, creating it when absent.
    ///
    /// Returns `false` when the block holds a non-empty inline value that cannot be
    /// extended line-wise.
    pub fn append_entries(&mut self, key: &str, entries: Vec<String>) -> bool {
        let Some(range) = self.block(key) else {
            let mut lines = vec![format!("{key}:")];
            lines.extend(entries);
            self.append_block(lines);
            return true;
        };
        match self.inline_value(key) {
            None => {
                self.lines.splice(range.end..range.end, entries);
                true
            }
            Some("[]") | Some("{}") => {
                let mut lines = vec![format!("{key}:")];
                lines.extend(entries);
                self.lines.splice(range, lines);
                true
            }
            Some(_) => false,
        }
    }

    /// Indentation used by list entries in the block for `key` (`"  "` when unknown).
    pub fn entry_indent(&self, key: &str) -> String {
        self.block(key)
            .and_then(|range| {
                self.lines[range.start + 1..range.end]
                    .iter()
                    .find(|l| l.trim_start().starts_with("- "))
                    .map(|l| leading_ws(l).to_owned())
            })
            .unwrap_or_else(|| "  ".to_owned())
    }

    /// Insert `entry` (a single list line, without indentation) under the nested key
    /// `child` of the top-level block `key`. The child is created when missing.
    ///
    /// Returns `false` when the parent block or the child's inline value cannot be
    /// extended line-wise. A child written as a one-line flow sequence is extended in place.
    pub fn append_nested_entry(&mut self, key: &str, child: &str, entry: &str) -> bool {
        let Some(range) = self.block(key) else {
            return self.append_entries(
                key,
                vec![format!("  {child}:"), format!("    - {entry}")],
            );
        };
        if self.inline_value(key).is_some() {
            return self.append_entries(
                key,
                vec![format!("  {child}:"), format!("    - {entry}")],
            );
        }

        let child_line =
            (range.start + 1..range.end).find(|&i| nested_value(&self.lines[i], child).is_some());
        let Some(child_line) = child_line else {
            let indent = self
                .lines
                .get(range.start + 1..range.end)
                .and_then(|ls| ls.iter().find(|l| !l.trim().is_empty()))
                .map(|l| leading_ws(l).to_owned())
                .unwrap_or_else(|| "  ".to_owned());
            let lines = vec![
                format!("{indent}{child}:"),
                format!("{indent}  - {entry}"),
            ];
            self.lines.splice(range.end..range.end, lines);
            return true;
        };

        let inline = nested_value(&self.lines[child_line], child)
            .filter(|(_, value)| !value.is_empty())
            .map(|(offset, value)| (offset, value.to_owned()));
        if let Some((offset, value)) = inline {
            // Only a single-line flow sequence can be extended in place.
            if !(value.starts_with('[') && value.ends_with(']')) {
                return false;
            }
            let sep = if value[1..value.len() - 1].trim().is_empty() {
                ""
            } else {
                ", "
            };
            self.lines[child_line].insert_str(offset + value.len() - 1, &format!("{sep}{entry}"));
            return true;
        }

        let parent_indent = leading_ws(&self.lines[child_line]).len();
        let mut end = child_line + 1;
        while end < range.end && is_child_line(&self.lines[end], parent_indent) {
            end += 1;
        }
        while end > child_line + 1 && self.lines[end - 1].trim().is_empty() {
            end -= 1;
        }
        let indent = self.lines[child_line + 1..end]
            .iter()
            .find(|l| l.trim_start().starts_with("- "))
            .map(|l| leading_ws(l).to_owned())
            .unwrap_or_else(|| " ".repeat(parent_indent + 2));
        self.lines.insert(end, format!("{indent}- {entry}"));
        true
    }
}

fn is_key_line(line: &str, key: &str) -> bool {
    line.strip_prefix(key).is_some_and(|rest| rest.starts_with(':'))
}

/// Comment-free value of a nested `key:` line and its byte offset in `line`.
fn nested_value<'a>(line: &'a str, key: &str) -> Option<(usize, &'a str)> {
    let indent = leading_ws(line).len();
    if indent == 0 {
        return None;
    }
    let trimmed = &line[indent..];
    [key.to_owned(), format!("\"{key}\""), format!("'{key}'")]
        .iter()
        .find(|k| is_key_line(trimmed, k))
        .map(|k| {
            let rest = &trimmed[k.len() + 1..];
            let offset = indent + k.len() + 1 + (rest.len() - rest.trim_start().len());
            (offset, strip_comment(rest.trim()))
        })
}

/// Lines belonging to a nested key at `parent_indent`, including indentless list items.
fn is_child_line(line: &str, parent_indent: usize) -> bool {
    let indent = leading_ws(line).len();
    line.trim().is_empty()
        || indent > parent_indent
        || (indent == parent_indent && (line[indent..].starts_with("- ") || line.trim() == "-"))
}

fn is_continuation(line: &str) -> bool {
    line.trim().is_empty()
        || line.starts_with(' ')
        || line.starts_with('\t')
        || line.starts_with("- ")
        || line == "-"
}

fn leading_ws(line: &str) -> &str {
    &line[..line.len() - line.trim_start().len()]
}

fn strip_comment(value: &str) -> &str {
    if value.starts_with('#') {
        return "";
    }
    match value.find(" #") {
        Some(i) => value[..i].trim_end(),
        None => value,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/color/document.rs"]
mod tests;
