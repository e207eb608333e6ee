//! Nested section key/value normalizer with comments stripped.
//!
//! Section depth is given by the number of brackets around the name
//! (`[a]`, `[[b]]`, ...). Values may be quoted, triple-quoted over several
//! lines, or comma-separated lists. Comments, full-line or inline, are
//! dropped during parsing.

use cfgdiff_types::{FormatId, OrderingMode};
use indexmap::IndexMap;

use crate::error::{NormalizeError, NormalizeResult};
use crate::normalizer::Normalizer;

const INDENT: &str = "    ";

#[derive(Clone, Debug, PartialEq, Eq)]
enum ConfValue {
    Single(String),
    List(Vec<String>),
}

#[derive(Clone, Debug, Default)]
struct Section {
    scalars: IndexMap<String, ConfValue>,
    sections: IndexMap<String, Section>,
}

impl Section {
    fn descend_mut(&mut self, path: &[String]) -> &mut Section {
        let mut section = self;
        for name in path {
            section = section.sections.entry(name.clone()).or_default();
        }
        section
    }

    fn sort(&mut self) {
        self.scalars.sort_keys();
        self.sections.sort_keys();
        for child in self.sections.values_mut() {
            child.sort();
        }
    }

    fn write(&self, out: &mut String, depth: usize) {
        let indent = INDENT.repeat(depth);
        for (key, value) in &self.scalars {
            out.push_str(&indent);
            out.push_str(&quote_key(key));
            out.push_str(" = ");
            out.push_str(&format_value(value));
            out.push('\n');
        }
        for (name, child) in &self.sections {
            out.push_str(&indent);
            out.push_str(&"[".repeat(depth + 1));
            out.push_str(&quote_key(name));
            out.push_str(&"]".repeat(depth + 1));
            out.push('\n');
            child.write(out, depth + 1);
        }
    }
}

fn parse(input: &str) -> NormalizeResult<Section> {
    let mut root = Section::default();
    let mut path: Vec<String> = Vec::new();
    let mut lines = input.lines().enumerate();

    while let Some((idx, raw)) = lines.next() {
        let lineno = idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') {
            let (depth, name) = parse_header(line)
                .ok_or_else(|| NormalizeError::syntax(lineno, format!("invalid section marker {line:?}")))?;
            if depth > path.len() + 1 {
                return Err(NormalizeError::syntax(lineno, format!("section {name:?} is too nested")));
            }
            path.truncate(depth - 1);
            let parent = root.descend_mut(&path);
            if parent.sections.contains_key(&name) || parent.scalars.contains_key(&name) {
                return Err(NormalizeError::syntax(lineno, format!("duplicate section name {name:?}")));
            }
            parent.sections.insert(name.clone(), Section::default());
            path.push(name);
            continue;
        }

        let Some(eq) = find_unquoted(line, '=') else {
            return Err(NormalizeError::syntax(lineno, format!("invalid line {line:?}")));
        };
        let key = unquote(line[..eq].trim());
        if key.is_empty() {
            return Err(NormalizeError::syntax(lineno, "empty keyword"));
        }
        let rest = line[eq + 1..].trim_start();

        let value = match triple_quote(rest) {
            Some(delim) => {
                let mut body = rest[3..].to_string();
                loop {
                    if let Some(end) = body.find(delim) {
                        let trailing = body[end + 3..].trim();
                        if !trailing.is_empty() && !trailing.starts_with('#') {
                            return Err(NormalizeError::syntax(lineno, "text after closing triple quote"));
                        }
                        body.truncate(end);
                        break;
                    }
                    let (_, next) = lines
                        .next()
                        .ok_or_else(|| NormalizeError::syntax(lineno, "unterminated multiline value"))?;
                    body.push('\n');
                    body.push_str(next);
                }
                ConfValue::Single(body)
            }
            None => parse_value(rest).map_err(|msg| NormalizeError::syntax(lineno, msg))?,
        };

        let section = root.descend_mut(&path);
        if section.scalars.contains_key(&key) || section.sections.contains_key(&key) {
            return Err(NormalizeError::syntax(lineno, format!("duplicate keyword {key:?}")));
        }
        section.scalars.insert(key, value);
    }

    Ok(root)
}

fn parse_header(line: &str) -> Option<(usize, String)> {
    let open = line.chars().take_while(|c| *c == '[' || c.is_whitespace()).filter(|c| *c == '[').count();
    let body = line.trim_start_matches(|c: char| c == '[' || c.is_whitespace());
    let body = match find_unquoted(body, '#') {
        Some(pos) => body[..pos].trim_end(),
        None => body.trim_end(),
    };
    let close = body.chars().rev().take_while(|c| *c == ']' || c.is_whitespace()).filter(|c| *c == ']').count();
    let name = body.trim_end_matches(|c: char| c == ']' || c.is_whitespace());
    if open == 0 || open != close || name.is_empty() {
        return None;
    }
    Some((open, unquote(name.trim())))
}

fn triple_quote(value: &str) -> Option<&'static str> {
    if value.starts_with("\"\"\"") {
        Some("\"\"\"")
    } else if value.starts_with("'''") {
        Some("'''")
    } else {
        None
    }
}

fn find_unquoted(text: &str, needle: char) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (pos, c) in text.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c == needle => return Some(pos),
            None => {}
        }
    }
    None
}

fn unquote(text: &str) -> String {
    let bytes = text.as_bytes();
    if bytes.len() >= 2 && (bytes[0] == b'"' || bytes[0] == b'\'') && bytes[bytes.len() - 1] == bytes[0] {
        text[1..text.len() - 1].to_string()
    } else {
        text.to_string()
    }
}

/// Parse a single-line value: a scalar, or a list when a comma is present.
fn parse_value(text: &str) -> Result<ConfValue, String> {
    let mut items: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut saw_comma = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' | '\'' if current.trim().is_empty() && !quoted => {
                current.clear();
                let mut closed = false;
                for inner in chars.by_ref() {
                    if inner == c {
                        closed = true;
                        break;
                    }
                    current.push(inner);
                }
                if !closed {
                    return Err(format!("unterminated quote in {text:?}"));
                }
                quoted = true;
            }
            ',' => {
                saw_comma = true;
                let item = if quoted { current.clone() } else { current.trim().to_string() };
                if quoted || !item.is_empty() {
                    items.push(item);
                }
                current.clear();
                quoted = false;
            }
            '#' => break,
            _ if quoted => {
                if !c.is_whitespace() {
                    return Err(format!("unexpected text after quoted value in {text:?}"));
                }
            }
            _ => current.push(c),
        }
    }

    let last = if quoted { current } else { current.trim().to_string() };
    if saw_comma {
        if quoted || !last.is_empty() {
            items.push(last);
        }
        Ok(ConfValue::List(items))
    } else {
        Ok(ConfValue::Single(last))
    }
}

fn needs_quotes(value: &str) -> bool {
    value.is_empty()
        || value != value.trim()
        || value.contains([',', '#'])
        || value.starts_with(['"', '\'', '['])
}

fn quote(value: &str) -> String {
    if value.contains('\n') {
        if value.contains("'''") {
            return format!("\"\"\"{value}\"\"\"");
        }
        return format!("'''{value}'''");
    }
    if !needs_quotes(value) {
        return value.to_string();
    }
    if !value.contains('"') {
        format!("\"{value}\"")
    } else if !value.contains('\'') {
        format!("'{value}'")
    } else {
        format!("\"\"\"{value}\"\"\"")
    }
}

fn quote_key(key: &str) -> String {
    if key.contains(['=', ']']) {
        if key.contains('"') {
            format!("'{key}'")
        } else {
            format!("\"{key}\"")
        }
    } else {
        quote(key)
    }
}

fn format_value(value: &ConfValue) -> String {
    match value {
        ConfValue::Single(s) => quote(s),
        ConfValue::List(items) if items.is_empty() => ",".to_string(),
        ConfValue::List(items) if items.len() == 1 => format!("{},", quote(&items[0])),
        ConfValue::List(items) => items.iter().map(|i| quote(i)).collect::<Vec<_>>().join(", "),
    }
}

/// Normalizer for [`FormatId::Conf`].
#[derive(Clone, Copy, Debug, Default)]
pub struct ConfNormalizer;

impl Normalizer for ConfNormalizer {
    fn format(&self) -> FormatId {
        FormatId::Conf
    }

    fn normalize(&self, input: &str, ordering: OrderingMode) -> NormalizeResult<String> {
        let mut root = parse(input)?;
        if ordering.is_sorted() {
            root.sort();
        }
        let mut out = String::new();
        root.write(&mut out, 0);
        Ok(out)
    }
}
