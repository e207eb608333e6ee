use crate::error::{NormalizeError, NormalizeResult};

/// How a record line is split into fields.
#[derive(Clone, Copy, Debug)]
enum Fields {
    /// Runs of blanks separate fields; `#` starts a trailing comment.
    Whitespace,
    /// A fixed delimiter; empty fields are significant.
    Delimited(char),
}

/// How fields are joined when a record is written back.
#[derive(Clone, Copy, Debug)]
enum Layout {
    /// Every field separated by a tab.
    Tabs,
    /// The first field, a tab, then the rest separated by spaces.
    HeadTab,
    /// Every field separated by one space.
    Spaces,
    /// Fields joined with the grammar's delimiter.
    Delimiter(char),
}

/// A line-per-record grammar.
#[derive(Clone, Copy, Debug)]
pub(super) struct TableGrammar {
    fields: Fields,
    min_fields: usize,
    max_fields: Option<usize>,
    /// Values appended when optional trailing fields are omitted.
    defaults: &'static [&'static str],
    /// Accepted values of the first field, when restricted.
    keywords: Option<&'static [&'static str]>,
    layout: Layout,
}

impl TableGrammar {
    pub(super) const FSTAB: TableGrammar = TableGrammar {
        fields: Fields::Whitespace,
        min_fields: 4,
        max_fields: Some(6),
        defaults: &["0", "0"],
        keywords: None,
        layout: Layout::Tabs,
    };

    pub(super) const HOSTS: TableGrammar = TableGrammar {
        fields: Fields::Whitespace,
        min_fields: 2,
        max_fields: None,
        defaults: &[],
        keywords: None,
        layout: Layout::HeadTab,
    };

    pub(super) const RESOLV: TableGrammar = TableGrammar {
        fields: Fields::Whitespace,
        min_fields: 2,
        max_fields: None,
        defaults: &[],
        keywords: Some(&["nameserver", "domain", "search", "sortlist", "options"]),
        layout: Layout::Spaces,
    };

    pub(super) const PASSWD: TableGrammar = TableGrammar {
        fields: Fields::Delimited(':'),
        min_fields: 7,
        max_fields: Some(7),
        defaults: &[],
        keywords: None,
        layout: Layout::Delimiter(':'),
    };

    pub(super) const GROUP: TableGrammar = TableGrammar {
        fields: Fields::Delimited(':'),
        min_fields: 4,
        max_fields: Some(4),
        defaults: &[],
        keywords: None,
        layout: Layout::Delimiter(':'),
    };

    fn split<'a>(&self, line: &'a str) -> Vec<&'a str> {
        match self.fields {
            Fields::Whitespace => {
                let data = line.split('#').next().unwrap_or_default();
                data.split_whitespace().collect()
            }
            Fields::Delimited(delim) => line.split(delim).collect(),
        }
    }

    fn parse(&self, input: &str) -> NormalizeResult<Vec<Vec<String>>> {
        let mut records = Vec::new();
        for (idx, raw) in input.lines().enumerate() {
            let lineno = idx + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut fields: Vec<String> = self.split(line).into_iter().map(str::to_string).collect();
            if fields.is_empty() {
                continue;
            }
            if fields.len() < self.min_fields {
                return Err(NormalizeError::syntax(
                    lineno,
                    format!("expected at least {} fields, found {}", self.min_fields, fields.len()),
                ));
            }
            if let Some(max) = self.max_fields {
                if fields.len() > max {
                    return Err(NormalizeError::syntax(
                        lineno,
                        format!("expected at most {max} fields, found {}", fields.len()),
                    ));
                }
                let missing = max - fields.len();
                let start = self.defaults.len().saturating_sub(missing);
                fields.extend(self.defaults[start..].iter().map(|d| d.to_string()));
            }
            if let Some(keywords) = self.keywords {
                if !keywords.contains(&fields[0].as_str()) {
                    return Err(NormalizeError::syntax(
                        lineno,
                        format!("unknown directive {:?}", fields[0]),
                    ));
                }
            }
            records.push(fields);
        }
        Ok(records)
    }

    fn write(&self, record: &[String]) -> String {
        match self.layout {
            Layout::Tabs => record.join("\t"),
            Layout::HeadTab => format!("{}\t{}", record[0], record[1..].join(" ")),
            Layout::Spaces => record.join(" "),
            Layout::Delimiter(delim) => record.join(&delim.to_string()),
        }
    }

    pub(super) fn canonicalize(&self, input: &str) -> NormalizeResult<String> {
        let mut out = String::new();
        for record in self.parse(input)? {
            out.push_str(&self.write(&record));
            out.push('\n');
        }
        Ok(out)
    }
}
