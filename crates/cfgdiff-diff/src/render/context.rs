use std::fmt::Write;

use similar::{DiffOp, DiffTag};

use super::{group_span, Sides};

fn prefix(tag: DiffTag) -> &'static str {
    match tag {
        DiffTag::Equal => "  ",
        DiffTag::Delete => "- ",
        DiffTag::Insert => "+ ",
        DiffTag::Replace => "! ",
    }
}

/// Format a 0-based half-open range as `start,end` (1-based, inclusive).
fn format_range(start: usize, stop: usize) -> String {
    let length = stop - start;
    let beginning = if length == 0 { start } else { start + 1 };
    if length <= 1 {
        beginning.to_string()
    } else {
        format!("{},{}", beginning, beginning + length - 1)
    }
}

pub(crate) fn render(sides: &Sides<'_>, groups: &[Vec<DiffOp>]) -> String {
    let mut out = String::new();
    if groups.is_empty() {
        return out;
    }
    let _ = writeln!(out, "*** {}", sides.from_label);
    let _ = writeln!(out, "--- {}", sides.to_label);

    for group in groups {
        let (old, new) = group_span(group);
        out.push_str("***************\n");

        let _ = writeln!(out, "*** {} ****", format_range(old.start, old.end));
        let tags: Vec<_> = group.iter().map(DiffOp::as_tag_tuple).collect();
        if tags.iter().any(|(tag, _, _)| matches!(tag, DiffTag::Replace | DiffTag::Delete)) {
            for (tag, old_range, _) in tags.iter().filter(|(tag, _, _)| *tag != DiffTag::Insert) {
                for line in &sides.from[old_range.clone()] {
                    let _ = writeln!(out, "{}{line}", prefix(*tag));
                }
            }
        }

        let _ = writeln!(out, "--- {} ----", format_range(new.start, new.end));
        if tags.iter().any(|(tag, _, _)| matches!(tag, DiffTag::Replace | DiffTag::Insert)) {
            for (tag, _, new_range) in tags.iter().filter(|(tag, _, _)| *tag != DiffTag::Delete) {
                for line in &sides.to[new_range.clone()] {
                    let _ = writeln!(out, "{}{line}", prefix(*tag));
                }
            }
        }
    }
    out
}
