use std::fmt;

use crate::error::{NormalizeError, NormalizeResult};

const MAX_LABEL_LEN: usize = 63;

/// An absolute domain name, stored as labels without the root.
#[derive(Clone, Debug)]
pub(super) struct Name {
    labels: Vec<String>,
}

impl Name {
    /// Parse `text`, resolving relative names against `origin`.
    pub(super) fn parse(text: &str, origin: &Name) -> NormalizeResult<Self> {
        if text == "@" {
            return Ok(origin.clone());
        }
        if text == "." {
            return Ok(Self { labels: Vec::new() });
        }

        let (body, absolute) = match text.strip_suffix('.') {
            Some(body) if !body.ends_with('\\') => (body, true),
            _ => (text, false),
        };

        let mut labels = split_labels(body)?;
        if !absolute {
            labels.extend(origin.labels.iter().cloned());
        }
        Ok(Self { labels })
    }

    /// Parse a name that must already be absolute.
    pub(super) fn absolute(text: &str) -> NormalizeResult<Self> {
        let root = Self { labels: Vec::new() };
        if !text.ends_with('.') {
            return Err(NormalizeError::Parse(format!("{text:?} is not an absolute name")));
        }
        Self::parse(text, &root)
    }

    /// Labels lower-cased and reversed; ordering these gives DNS canonical order.
    pub(super) fn canonical_key(&self) -> Vec<String> {
        self.labels.iter().rev().map(|l| l.to_ascii_lowercase()).collect()
    }

    fn is_subdomain_of(&self, other: &Name) -> bool {
        let key = self.canonical_key();
        let other_key = other.canonical_key();
        key.len() >= other_key.len() && key[..other_key.len()] == other_key[..]
    }

    /// Render relative to `origin`: `@` for the origin itself, relative labels
    /// below it, and an absolute name otherwise.
    pub(super) fn relativize(&self, origin: &Name) -> String {
        if self.is_subdomain_of(origin) {
            let keep = self.labels.len() - origin.labels.len();
            if keep == 0 {
                "@".to_string()
            } else {
                self.labels[..keep].join(".")
            }
        } else {
            self.to_string()
        }
    }
}

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        self.canonical_key() == other.canonical_key()
    }
}

impl Eq for Name {}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for label in &self.labels {
            write!(f, "{label}.")?;
        }
        if self.labels.is_empty() {
            f.write_str(".")?;
        }
        Ok(())
    }
}

fn split_labels(text: &str) -> NormalizeResult<Vec<String>> {
    let mut labels = Vec::new();
    let mut label = String::new();
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                label.push(c);
                if let Some(escaped) = chars.next() {
                    label.push(escaped);
                }
            }
            '.' => labels.push(finish_label(std::mem::take(&mut label), text)?),
            _ => label.push(c),
        }
    }
    labels.push(finish_label(label, text)?);
    Ok(labels)
}

fn finish_label(label: String, name: &str) -> NormalizeResult<String> {
    if label.is_empty() {
        return Err(NormalizeError::Parse(format!("empty label in {name:?}")));
    }
    if label.len() > MAX_LABEL_LEN {
        return Err(NormalizeError::Parse(format!("label too long in {name:?}")));
    }
    Ok(label)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> Name {
        Name::absolute("example.com.").unwrap()
    }

    #[test]
    fn relative_names_resolved_against_origin() {
        let name = Name::parse("www", &origin()).unwrap();
        assert_eq!(name.to_string(), "www.example.com.");
        assert_eq!(name.relativize(&origin()), "www");
    }

    #[test]
    fn at_sign_is_origin() {
        let name = Name::parse("@", &origin()).unwrap();
        assert_eq!(name.relativize(&origin()), "@");
    }

    #[test]
    fn out_of_zone_names_stay_absolute() {
        let name = Name::parse("ns.other.net.", &origin()).unwrap();
        assert_eq!(name.relativize(&origin()), "ns.other.net.");
    }

    #[test]
    fn comparison_is_case_insensitive() {
        let a = Name::parse("WWW", &origin()).unwrap();
        let b = Name::parse("www.Example.COM.", &origin()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn canonical_order_groups_by_parent() {
        let o = origin();
        let mut names: Vec<Name> = ["b", "a.b", "@", "a"]
            .iter()
            .map(|n| Name::parse(n, &o).unwrap())
            .collect();
        names.sort_by_key(Name::canonical_key);
        let rendered: Vec<_> = names.iter().map(|n| n.relativize(&o)).collect();
        assert_eq!(rendered, ["@", "a", "b", "a.b"]);
    }

    #[test]
    fn empty_label_rejected() {
        assert!(Name::parse("a..b", &origin()).is_err());
    }
}
