//! INI normalizer.
//!
//! Follows the lenient dialect of the classic Python-style parser: `=` or `:`
//! delimiters, value-less keys, indented continuation lines, full-line `#` /
//! `;` comments, case-folded keys, duplicate keys overwriting and duplicate
//! sections merging.

use cfgdiff_types::{FormatId, OrderingMode};
use indexmap::IndexMap;

use crate::error::{NormalizeError, NormalizeResult};
use crate::normalizer::Normalizer;

/// The section written before all others.
pub const DEFAULT_SECTION: &str = "DEFAULT";

/// Keys of one section; `None` marks a key written without a value.
pub type IniSection = IndexMap<String, Option<String>>;

/// Sections in declaration order.
pub type IniSections = IndexMap<String, IniSection>;

/// How key names are transformed while parsing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum KeyCase {
    Lower,
    Preserve,
}

/// Parse INI text into ordered sections.
pub(crate) fn parse_sections(input: &str, key_case: KeyCase) -> NormalizeResult<IniSections> {
    let mut sections = IniSections::new();
    let mut current: Option<String> = None;
    // Key and indentation of the entry that may receive continuation lines.
    let mut last_key: Option<(String, usize)> = None;
    // Blank lines seen since `last_key`; kept only if a continuation follows.
    let mut pending_blank = 0;

    for (idx, raw) in input.lines().enumerate() {
        let lineno = idx + 1;
        let stripped = raw.trim();

        if stripped.is_empty() {
            if last_key.is_some() {
                pending_blank += 1;
            }
            continue;
        }
        if stripped.starts_with('#') || stripped.starts_with(';') {
            continue;
        }

        let indent = raw.len() - raw.trim_start().len();

        if let (Some(section), Some((key, key_indent))) = (&current, &last_key) {
            if indent > *key_indent {
                let entry = sections.get_mut(section).and_then(|s| s.get_mut(key));
                match entry {
                    Some(Some(value)) => {
                        for _ in 0..pending_blank {
                            value.push('\n');
                        }
                        pending_blank = 0;
                        value.push('\n');
                        value.push_str(stripped);
                        continue;
                    }
                    Some(None) => {
                        return Err(NormalizeError::syntax(
                            lineno,
                            format!("continuation line {stripped:?} follows key {key:?} without a value"),
                        ));
                    }
                    None => {}
                }
            }
        }
        pending_blank = 0;

        if let Some(name) = section_header(stripped) {
            sections.entry(name.to_string()).or_default();
            current = Some(name.to_string());
            last_key = None;
            continue;
        }

        let Some(section) = current.as_ref() else {
            return Err(NormalizeError::syntax(
                lineno,
                format!("missing section header before {stripped:?}"),
            ));
        };

        let (key, value) = match stripped.find(['=', ':']) {
            Some(pos) => (
                stripped[..pos].trim(),
                Some(stripped[pos + 1..].trim().to_string()),
            ),
            None => (stripped, None),
        };
        if key.is_empty() {
            return Err(NormalizeError::syntax(lineno, format!("empty key in {stripped:?}")));
        }
        let key = match key_case {
            KeyCase::Lower => key.to_lowercase(),
            KeyCase::Preserve => key.to_string(),
        };

        if let Some(entries) = sections.get_mut(section) {
            entries.insert(key.clone(), value);
        }
        last_key = Some((key, indent));
    }

    Ok(sections)
}

fn section_header(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('[')?;
    let end = rest.rfind(']')?;
    let name = &rest[..end];
    (!name.is_empty()).then_some(name)
}

/// Sort sections and keys in place.
pub(crate) fn sort_sections(sections: &mut IniSections) {
    sections.sort_keys();
    for entries in sections.values_mut() {
        entries.sort_keys();
    }
}

/// Normalizer for [`FormatId::Ini`].
#[derive(Clone, Copy, Debug, Default)]
pub struct IniNormalizer;

impl Normalizer for IniNormalizer {
    fn format(&self) -> FormatId {
        FormatId::Ini
    }

    fn normalize(&self, input: &str, ordering: OrderingMode) -> NormalizeResult<String> {
        let mut sections = parse_sections(input, KeyCase::Lower)?;
        if ordering.is_sorted() {
            sort_sections(&mut sections);
        }

        let mut out = String::new();
        if let Some(defaults) = sections.get(DEFAULT_SECTION) {
            write_section(&mut out, DEFAULT_SECTION, defaults);
        }
        for (name, entries) in sections.iter().filter(|(n, _)| *n != DEFAULT_SECTION) {
            write_section(&mut out, name, entries);
        }
        Ok(out)
    }
}

fn write_section(out: &mut String, name: &str, entries: &IniSection) {
    out.push('[');
    out.push_str(name);
    out.push_str("]\n");
    for (key, value) in entries {
        match value {
            Some(value) => {
                out.push_str(key);
                out.push_str(" = ");
                out.push_str(&value.replace('\n', "\n\t"));
            }
            None => out.push_str(key),
        }
        out.push('\n');
    }
    out.push('\n');
}
