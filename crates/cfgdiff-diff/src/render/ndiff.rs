use std::fmt::Write;

use similar::{DiffOp, DiffTag};

use super::Sides;

/// Every line of both inputs with a two-character marker: `  ` unchanged,
/// `- ` only in the old sequence, `+ ` only in the new one.
pub(crate) fn render(sides: &Sides<'_>, ops: &[DiffOp]) -> String {
    let mut out = String::new();
    for op in ops {
        let (tag, old_range, new_range) = op.as_tag_tuple();
        if tag == DiffTag::Equal {
            for line in &sides.from[old_range] {
                let _ = writeln!(out, "  {line}");
            }
            continue;
        }
        if matches!(tag, DiffTag::Replace | DiffTag::Delete) {
            for line in &sides.from[old_range] {
                let _ = writeln!(out, "- {line}");
            }
        }
        if matches!(tag, DiffTag::Replace | DiffTag::Insert) {
            for line in &sides.to[new_range] {
                let _ = writeln!(out, "+ {line}");
            }
        }
    }
    out
}
