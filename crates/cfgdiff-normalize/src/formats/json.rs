use cfgdiff_types::{FormatId, OrderingMode};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::Value;

use crate::error::{NormalizeError, NormalizeResult};
use crate::normalizer::{ensure_trailing_newline, Normalizer};

/// Normalizer for [`FormatId::Json`].
///
/// Output uses four-space indentation. In sorted mode object keys are ordered
/// at every depth; arrays keep their element order in both modes.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonNormalizer;

impl Normalizer for JsonNormalizer {
    fn format(&self) -> FormatId {
        FormatId::Json
    }

    fn normalize(&self, input: &str, ordering: OrderingMode) -> NormalizeResult<String> {
        let mut value: Value = serde_json::from_str(input)?;
        if ordering.is_sorted() {
            sort_keys(&mut value);
        }

        let mut buf = Vec::new();
        let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        value.serialize(&mut ser)?;
        let text = String::from_utf8(buf).map_err(NormalizeError::parse)?;
        Ok(ensure_trailing_newline(text))
    }
}

fn sort_keys(value: &mut Value) {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = std::mem::take(map).into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            for (_, child) in entries.iter_mut() {
                sort_keys(child);
            }
            map.extend(entries);
        }
        Value::Array(items) => items.iter_mut().for_each(sort_keys),
        _ => {}
    }
}
