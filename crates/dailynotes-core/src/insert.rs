use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::todo::{format_groups, is_todo_heading, section_heading_re, TodoGroup};

fn checklist_prefix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*- \[").expect("regex"))
}

/// Where migrated lines go inside a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertionPoint {
    pub heading_line: usize,
    pub line: usize,
    /// A blank line is emitted first so the new block is set apart from
    /// checklist items already in the section.
    pub needs_separator: bool,
}

/// Finds the insertion point after the existing checklist run of the
/// `## To do` section. `None` when the note has no such heading.
pub fn find_insertion_point(lines: &[&str]) -> Option<InsertionPoint> {
    let heading_line = lines.iter().position(|line| is_todo_heading(line))?;
    let mut line = heading_line + 1;

    while line < lines.len() && lines[line].trim().is_empty() {
        line += 1;
    }

    while line < lines.len() {
        let current = lines[line];
        if section_heading_re().is_match(current) {
            break;
        }
        if current.trim().is_empty() || !checklist_prefix_re().is_match(current) {
            break;
        }
        line += 1;
    }

    let needs_separator = line > heading_line + 1 && !lines[line - 1].trim().is_empty();
    Some(InsertionPoint {
        heading_line,
        line,
        needs_separator,
    })
}

/// Splices rendered groups into `content`. Returns `None` when the note has no
/// `## To do` heading; the content is then left as is.
pub fn insert_groups(
    content: &str,
    groups: &[TodoGroup],
    source_date: NaiveDate,
) -> Option<String> {
    let lines: Vec<&str> = content.split('\n').collect();
    let point = find_insertion_point(&lines)?;

    let rendered = format_groups(groups, source_date);
    if rendered.is_empty() {
        return Some(content.to_string());
    }

    let mut block: Vec<String> = Vec::with_capacity(rendered.len() + 1);
    if point.needs_separator {
        block.push(String::new());
    }
    block.extend(rendered);

    let mut out: Vec<String> = Vec::with_capacity(lines.len() + block.len());
    out.extend(lines[..point.line].iter().map(|line| line.to_string()));
    out.extend(block);
    out.extend(lines[point.line..].iter().map(|line| line.to_string()));
    Some(out.join("\n"))
}
