//! Output layouts for a computed diff.

pub mod context;
pub mod html;
pub mod ndiff;
pub mod unified;

use std::ops::Range;

use similar::DiffOp;

/// The two labelled line sequences being compared.
pub(crate) struct Sides<'a> {
    pub(crate) from_label: &'a str,
    pub(crate) to_label: &'a str,
    pub(crate) from: &'a [&'a str],
    pub(crate) to: &'a [&'a str],
}

/// The old and new line ranges spanned by a group of operations.
pub(crate) fn group_span(group: &[DiffOp]) -> (Range<usize>, Range<usize>) {
    match (group.first(), group.last()) {
        (Some(first), Some(last)) => (
            first.old_range().start..last.old_range().end,
            first.new_range().start..last.new_range().end,
        ),
        _ => (0..0, 0..0),
    }
}
