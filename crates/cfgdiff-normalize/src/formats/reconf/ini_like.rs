use crate::error::NormalizeResult;
use crate::formats::ini::{parse_sections, KeyCase};

/// How option names are canonicalized.
#[derive(Clone, Copy, Debug)]
enum KeyStyle {
    /// Case-insensitive names with insignificant inner whitespace.
    Folded,
    /// Names compared exactly as written.
    Exact,
}

/// A sectioned `key = value` grammar with its own writer layout.
#[derive(Clone, Copy, Debug)]
pub(super) struct IniGrammar {
    key_style: KeyStyle,
    indent: &'static str,
    separator: &'static str,
}

impl IniGrammar {
    pub(super) const SAMBA: IniGrammar = IniGrammar {
        key_style: KeyStyle::Folded,
        indent: "\t",
        separator: " = ",
    };

    pub(super) const SUPERVISOR: IniGrammar = IniGrammar {
        key_style: KeyStyle::Exact,
        indent: "",
        separator: "=",
    };

    fn canonical_key(&self, key: &str) -> String {
        match self.key_style {
            KeyStyle::Folded => key
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
                .to_lowercase(),
            KeyStyle::Exact => key.to_string(),
        }
    }

    pub(super) fn canonicalize(&self, input: &str) -> NormalizeResult<String> {
        let sections = parse_sections(input, KeyCase::Preserve)?;

        let mut out = String::new();
        for (index, (name, entries)) in sections.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            out.push('[');
            out.push_str(name.trim());
            out.push_str("]\n");
            for (key, value) in entries {
                out.push_str(self.indent);
                out.push_str(&self.canonical_key(key));
                out.push_str(self.separator);
                if let Some(value) = value {
                    out.push_str(&value.replace('\n', " "));
                }
                out.push('\n');
            }
        }
        Ok(out)
    }
}
