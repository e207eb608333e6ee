use std::fmt::Write;

use similar::{DiffOp, DiffTag};

use super::{group_span, Sides};

/// Format a 0-based half-open range as `start,length` (1-based).
fn format_range(start: usize, stop: usize) -> String {
    let length = stop - start;
    let beginning = start + 1;
    match length {
        1 => beginning.to_string(),
        0 => format!("{},0", beginning - 1),
        _ => format!("{beginning},{length}"),
    }
}

pub(crate) fn render(sides: &Sides<'_>, groups: &[Vec<DiffOp>]) -> String {
    let mut out = String::new();
    if groups.is_empty() {
        return out;
    }
    let _ = writeln!(out, "--- {}", sides.from_label);
    let _ = writeln!(out, "+++ {}", sides.to_label);

    for group in groups {
        let (old, new) = group_span(group);
        let _ = writeln!(
            out,
            "@@ -{} +{} @@",
            format_range(old.start, old.end),
            format_range(new.start, new.end)
        );
        for op in group {
            let (tag, old_range, new_range) = op.as_tag_tuple();
            if tag == DiffTag::Equal {
                for line in &sides.from[old_range] {
                    let _ = writeln!(out, " {line}");
                }
                continue;
            }
            if matches!(tag, DiffTag::Replace | DiffTag::Delete) {
                for line in &sides.from[old_range] {
                    let _ = writeln!(out, "-{line}");
                }
            }
            if matches!(tag, DiffTag::Replace | DiffTag::Insert) {
                for line in &sides.to[new_range] {
                    let _ = writeln!(out, "+{line}");
                }
            }
        }
    }
    out
}
