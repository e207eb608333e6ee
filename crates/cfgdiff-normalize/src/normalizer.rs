use cfgdiff_types::{FormatId, OrderingMode};

use crate::error::NormalizeResult;

/// A per-format canonicalizer.
///
/// Implementations are stateless apart from construction-time parameters
/// (the application dialect), so one instance can normalize any number of
/// files. The trait is object-safe and `Send + Sync` so the registry can hand
/// out `Box<dyn Normalizer>`.
pub trait Normalizer: Send + Sync {
    /// The format this normalizer handles.
    fn format(&self) -> FormatId;

    /// Parse `input` and re-serialize it canonically.
    ///
    /// Every line of the returned text is newline-terminated. The same input
    /// and ordering mode always produce byte-identical output.
    fn normalize(&self, input: &str, ordering: OrderingMode) -> NormalizeResult<String>;
}

/// Terminate the last line of `text` if it is not already.
pub(crate) fn ensure_trailing_newline(mut text: String) -> String {
    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
    text
}
