//! Itemised list extraction with continuation-line merging

use crate::parsing::grammar::{Phrase, BULLET, CUT_HEADING, LABEL, NUMBERED};
use log::debug;

/// Items found after `start` and before the earliest `end` phrase.
///
/// Returns an empty list when the start label is absent.
pub fn extract_items(section_text: &str, start: &Phrase, end: &[&Phrase]) -> Vec<String> {
    let Some((_, after_label)) = start.find(section_text) else {
        debug!("Label {:?} not found in section", start);
        return Vec::new();
    };

    let content = &section_text[after_label..];
    let content = match Phrase::find_first(end, content) {
        Some((stop, _)) => &content[..stop],
        None => content,
    };

    collect_items(content)
}

/// String-level convenience over [`extract_items`].
pub fn extract_list(section_text: &str, item_start_label: &str, next_labels: &[&str]) -> Vec<String> {
    let start = Phrase::new(item_start_label);
    let end = Phrase::any_of(next_labels);
    extract_items(section_text, &start, &[&end])
}

/// Turn a block of lines into items.
///
/// Marked lines open items; unmarked lines continue the previous item unless
/// they look like a new label. Items are kept in discovery order.
pub fn collect_items(block: &str) -> Vec<String> {
    let mut items: Vec<String> = Vec::new();

    for line in block.lines() {
        let trimmed = line.trim();

        if let Some(item) = strip_marker(trimmed) {
            items.push(item.to_string());
        } else if !trimmed.is_empty()
            && !CUT_HEADING.is_match(trimmed)
            && !is_markup_residue(trimmed)
            && !LABEL.is_match(trimmed)
        {
            if let Some(last) = items.last_mut() {
                last.push(' ');
                last.push_str(trimmed);
            }
        }
    }

    // Markup orphaned by a label cut leaves items with no words in them.
    items.retain(|item| !is_markup_residue(item.trim()));
    items
}

/// Markers stranded on their own line, e.g. `**`, `###` or the bullet left
/// before a `- Missing Skills:` label.
fn is_markup_residue(line: &str) -> bool {
    line.chars().all(|c| matches!(c, '*' | '#' | '-' | '•') || c.is_whitespace())
}

fn strip_marker(line: &str) -> Option<&str> {
    let bullet = BULLET.find(line).map(|m| m.end());
    let numbered = NUMBERED.find(line).map(|m| m.end());
    let after = bullet.or(numbered)?;

    let rest = &line[after..];
    // A bullet followed by a number (`- 1. Foo`) carries both markers.
    let rest = match NUMBERED.find(rest) {
        Some(m) if bullet.is_some() => &rest[m.end()..],
        _ => rest,
    };
    Some(rest.trim())
}
