//! Checklist parsing for the `## To do` section of a daily note.
//!
//! Items are grouped by top-level entry: an unindented item opens a group and
//! every indented item after it belongs to that group. Groups migrate as a
//! whole.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoItem {
    /// 0-based line index in the source text.
    pub line_number: usize,
    /// Count of leading whitespace characters.
    pub indent: usize,
    pub completed: bool,
    pub text: String,
    pub original_line: String,
}

/// A top-level item followed by its indented sub-items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoGroup {
    items: Vec<TodoItem>,
}

impl TodoGroup {
    pub fn items(&self) -> &[TodoItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True when any item, at any depth, is still open.
    pub fn needs_migration(&self) -> bool {
        self.items.iter().any(|item| !item.completed)
    }
}

pub(crate) fn todo_heading_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^##\s+To\s+do\s*$").expect("regex"))
}

pub(crate) fn section_heading_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^##\s+").expect("regex"))
}

fn todo_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\s*)- \[([ xX])\] (.+)$").expect("regex"))
}

fn provenance_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\(from \d{4}-\d{2}-\d{2}\)").expect("regex"))
}

pub fn is_todo_heading(line: &str) -> bool {
    todo_heading_re().is_match(line)
}

/// Parses a single checklist line. Returns `None` for anything else.
pub fn parse_todo_line(line_number: usize, line: &str) -> Option<TodoItem> {
    let caps = todo_line_re().captures(line)?;
    let indent = caps.get(1).map(|m| m.as_str().chars().count()).unwrap_or(0);
    let completed = caps
        .get(2)
        .map(|m| m.as_str().eq_ignore_ascii_case("x"))
        .unwrap_or(false);
    let text = caps.get(3)?.as_str().to_string();
    Some(TodoItem {
        line_number,
        indent,
        completed,
        text,
        original_line: line.to_string(),
    })
}

/// Extracts the checklist items of the `## To do` section, in source order.
/// A note without that heading yields no items.
pub fn parse_todo_section(content: &str) -> Vec<TodoItem> {
    let mut todos = Vec::new();
    let mut in_section = false;

    for (idx, line) in content.split('\n').enumerate() {
        if is_todo_heading(line) {
            in_section = true;
            continue;
        }
        if !in_section {
            continue;
        }
        if section_heading_re().is_match(line) {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }
        if let Some(item) = parse_todo_line(idx, line) {
            todos.push(item);
        }
    }
    todos
}

/// Splits items into groups at every unindented item. An indented item seen
/// before any top-level one opens a group of its own.
pub fn group_by_hierarchy(todos: Vec<TodoItem>) -> Vec<TodoGroup> {
    let mut groups = Vec::new();
    let mut current: Vec<TodoItem> = Vec::new();

    for todo in todos {
        if todo.indent == 0 && !current.is_empty() {
            groups.push(TodoGroup {
                items: std::mem::take(&mut current),
            });
        }
        current.push(todo);
    }
    if !current.is_empty() {
        groups.push(TodoGroup { items: current });
    }
    groups
}

/// Parses, groups and keeps only the groups with open items.
pub fn incomplete_groups(content: &str) -> Vec<TodoGroup> {
    group_by_hierarchy(parse_todo_section(content))
        .into_iter()
        .filter(TodoGroup::needs_migration)
        .collect()
}

pub fn has_provenance_tag(text: &str) -> bool {
    provenance_re().is_match(text)
}

/// Renders an item as a checklist line tagged with the date it came from.
/// Existing tags are left alone.
pub fn format_migrated_todo(item: &TodoItem, source_date: NaiveDate) -> String {
    let text = if has_provenance_tag(&item.text) {
        item.text.clone()
    } else {
        format!("{} (from {})", item.text, source_date.format("%Y-%m-%d"))
    };
    let checkbox = if item.completed { "[x]" } else { "[ ]" };
    format!("{}- {} {}", " ".repeat(item.indent), checkbox, text)
}

pub fn format_groups(groups: &[TodoGroup], source_date: NaiveDate) -> Vec<String> {
    groups
        .iter()
        .flat_map(|group| group.items().iter())
        .map(|item| format_migrated_todo(item, source_date))
        .collect()
}
