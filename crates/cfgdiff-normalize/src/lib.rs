//! Normalization layer for cfgdiff.
//!
//! Each supported configuration format has a [`Normalizer`] that parses a
//! file and writes it back as canonical text: comments dropped, whitespace
//! regularized and, in [`OrderingMode::Sorted`], keys and sections put in a
//! fixed order. Two files that differ only in such noise normalize to the
//! same text and so produce an empty diff.
//!
//! # Key Types
//!
//! - [`Normalizer`] — Per-format canonical re-serialization
//! - [`FormatRegistry`] — Format identifier to normalizer lookup, gated by Cargo features
//! - [`ComparableDocument`] — A normalized comparison side with its captured parse error
//! - [`ParseError`] — Recoverable failure carried on a document
//!
//! # Quick Start
//!
//! ```rust
//! use cfgdiff_normalize::{ComparableDocument, FormatRegistry};
//! use cfgdiff_types::{FormatId, OrderingMode, Source};
//!
//! let json = FormatRegistry::global().normalizer_for(FormatId::Json).unwrap();
//! let a = ComparableDocument::from_text(Source::Absent, r#"{"b": 1, "a": 2}"#, json, OrderingMode::Sorted);
//! let b = ComparableDocument::from_text(Source::Absent, r#"{"a": 2, "b": 1}"#, json, OrderingMode::Sorted);
//! assert_eq!(a.lines(), b.lines());
//! ```

pub mod document;
pub mod error;
pub mod formats;
pub mod normalizer;
pub mod registry;

pub use cfgdiff_types::{FormatId, OrderingMode, Source};
pub use document::ComparableDocument;
pub use error::{NormalizeError, NormalizeResult, ParseError};
pub use normalizer::Normalizer;
pub use registry::{FormatRegistry, RegistryEntry};

#[cfg(feature = "reconf")]
pub use formats::reconf::{Dialect, DEFAULT_DIALECT};

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn normalize(format: FormatId, input: &str, ordering: OrderingMode) -> String {
        FormatRegistry::global()
            .normalizer_for(format)
            .unwrap()
            .normalize(input, ordering)
            .unwrap()
    }

    fn entries() -> impl Strategy<Value = Vec<(String, u32)>> {
        prop::collection::btree_map("[a-z][a-z0-9_]{0,7}", any::<u32>(), 1..8)
            .prop_map(|m| m.into_iter().collect())
    }

    fn as_json(entries: &[(String, u32)]) -> String {
        let body: Vec<String> = entries.iter().map(|(k, v)| format!("\"{k}\": {v}")).collect();
        format!("{{{}}}", body.join(", "))
    }

    fn as_ini(entries: &[(String, u32)]) -> String {
        let mut out = String::from("[section]\n");
        for (k, v) in entries {
            out.push_str(&format!("{k}={v}\n"));
        }
        out
    }

    proptest! {
        #[test]
        fn json_sorted_output_ignores_key_order(entries in entries(), seed in any::<u64>()) {
            let mut shuffled = entries.clone();
            shuffled.rotate_left((seed as usize) % entries.len());
            prop_assert_eq!(
                normalize(FormatId::Json, &as_json(&entries), OrderingMode::Sorted),
                normalize(FormatId::Json, &as_json(&shuffled), OrderingMode::Sorted)
            );
        }

        #[test]
        fn ini_sorted_output_ignores_key_order(entries in entries()) {
            let mut reversed = entries.clone();
            reversed.reverse();
            prop_assert_eq!(
                normalize(FormatId::Ini, &as_ini(&entries), OrderingMode::Sorted),
                normalize(FormatId::Ini, &as_ini(&reversed), OrderingMode::Sorted)
            );
        }

        #[test]
        fn normalization_is_deterministic(entries in entries()) {
            for format in [FormatId::Ini, FormatId::Json] {
                let input = match format {
                    FormatId::Ini => as_ini(&entries),
                    _ => as_json(&entries),
                };
                for ordering in [OrderingMode::Sorted, OrderingMode::OriginalOrder] {
                    prop_assert_eq!(normalize(format, &input, ordering), normalize(format, &input, ordering));
                }
            }
        }

        #[test]
        fn original_order_is_order_sensitive(entries in entries()) {
            prop_assume!(entries.len() > 1);
            let mut reversed = entries.clone();
            reversed.reverse();
            prop_assert_ne!(
                normalize(FormatId::Json, &as_json(&entries), OrderingMode::OriginalOrder),
                normalize(FormatId::Json, &as_json(&reversed), OrderingMode::OriginalOrder)
            );
        }
    }

    #[test]
    fn arrays_keep_order_in_both_modes() {
        for ordering in [OrderingMode::Sorted, OrderingMode::OriginalOrder] {
            assert_ne!(
                normalize(FormatId::Json, "[1, 2]", ordering),
                normalize(FormatId::Json, "[2, 1]", ordering)
            );
        }
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn sequences_keep_order_in_both_modes() {
        for ordering in [OrderingMode::Sorted, OrderingMode::OriginalOrder] {
            assert_ne!(
                normalize(FormatId::Yaml, "- a\n- b\n", ordering),
                normalize(FormatId::Yaml, "- b\n- a\n", ordering)
            );
        }
    }

    #[test]
    fn ini_comments_ignored() {
        assert_eq!(
            normalize(FormatId::Ini, "# top\n[a]\n; note\nx = 1\n", OrderingMode::Sorted),
            normalize(FormatId::Ini, "[a]\nx = 1\n", OrderingMode::Sorted)
        );
    }

    #[cfg(feature = "conf")]
    #[test]
    fn conf_comments_ignored() {
        assert_eq!(
            normalize(FormatId::Conf, "# top\n[a]\nx = 1 # trailing\n", OrderingMode::Sorted),
            normalize(FormatId::Conf, "[a]\nx = 1\n", OrderingMode::Sorted)
        );
    }
}
