use cfgdiff_types::{FormatId, OrderingMode};
use serde_yaml::{Mapping, Value};

use crate::error::{NormalizeError, NormalizeResult};
use crate::normalizer::{ensure_trailing_newline, Normalizer};

/// Normalizer for [`FormatId::Yaml`].
///
/// Documents are loaded as plain data; tags are preserved as values and
/// never resolved to code. Output is block style with two-space indentation.
#[derive(Clone, Copy, Debug, Default)]
pub struct YamlNormalizer;

impl Normalizer for YamlNormalizer {
    fn format(&self) -> FormatId {
        FormatId::Yaml
    }

    fn normalize(&self, input: &str, ordering: OrderingMode) -> NormalizeResult<String> {
        let mut value: Value = serde_yaml::from_str(input).map_err(NormalizeError::parse)?;
        if ordering.is_sorted() {
            sort_mappings(&mut value);
        }
        let text = serde_yaml::to_string(&value).map_err(NormalizeError::parse)?;
        Ok(ensure_trailing_newline(text))
    }
}

fn sort_mappings(value: &mut Value) {
    match value {
        Value::Mapping(map) => {
            let mut entries: Vec<(Value, Value)> = std::mem::take(map).into_iter().collect();
            entries.sort_by_cached_key(|(key, _)| key_text(key));
            for (_, child) in entries.iter_mut() {
                sort_mappings(child);
            }
            *map = entries.into_iter().collect::<Mapping>();
        }
        Value::Sequence(items) => items.iter_mut().for_each(sort_mappings),
        Value::Tagged(tagged) => sort_mappings(&mut tagged.value),
        _ => {}
    }
}

// Scalar keys sort by their text; complex keys by their serialized form.
fn key_text(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Null => "null".to_string(),
        other => serde_yaml::to_string(other).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapping_keys_sorted_recursively() {
        let out = YamlNormalizer
            .normalize("b:\n  y: 1\n  x: 2\na: 3\n", OrderingMode::Sorted)
            .unwrap();
        assert_eq!(out, "a: 3\nb:\n  x: 2\n  y: 1\n");
    }

    #[test]
    fn original_order_kept() {
        let out = YamlNormalizer
            .normalize("b: 1\na: 2\n", OrderingMode::OriginalOrder)
            .unwrap();
        assert_eq!(out, "b: 1\na: 2\n");
    }

    #[test]
    fn flow_style_input_becomes_block_style() {
        let a = YamlNormalizer.normalize("{b: 1, a: 2}\n", OrderingMode::Sorted).unwrap();
        let b = YamlNormalizer.normalize("a: 2\nb: 1\n", OrderingMode::Sorted).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn sequence_order_is_significant() {
        for mode in [OrderingMode::Sorted, OrderingMode::OriginalOrder] {
            let a = YamlNormalizer.normalize("- 1\n- 2\n", mode).unwrap();
            let b = YamlNormalizer.normalize("- 2\n- 1\n", mode).unwrap();
            assert_ne!(a, b);
        }
    }

    #[test]
    fn comments_ignored() {
        let a = YamlNormalizer.normalize("# top\na: 1 # inline\n", OrderingMode::Sorted).unwrap();
        let b = YamlNormalizer.normalize("a: 1\n", OrderingMode::Sorted).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn multiple_documents_rejected() {
        assert!(YamlNormalizer
            .normalize("a: 1\n---\nb: 2\n", OrderingMode::Sorted)
            .is_err());
    }

    #[test]
    fn broken_yaml_rejected() {
        assert!(YamlNormalizer
            .normalize("a: [1, 2\nb: {", OrderingMode::Sorted)
            .is_err());
    }
}
