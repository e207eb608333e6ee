//! Line diff between two canonical documents.
//!
//! Uses the `similar` crate (Myers diff algorithm) and renders its grouped
//! operations in one of the classic textual layouts or as an HTML table.

use std::fmt;

use serde::{Deserialize, Serialize};
use similar::TextDiff;

use crate::render::{self, Sides};

/// Number of context lines around each change when none is configured.
pub const DEFAULT_CONTEXT_LINES: usize = 3;

/// How a difference is rendered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// `*** from` / `--- to` context diff.
    #[default]
    Context,
    /// `---` / `+++` unified diff with `@@` hunks.
    Unified,
    /// Every line of both inputs, prefixed by its change marker.
    Ndiff,
    /// Side-by-side HTML table.
    Html,
}

impl OutputMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Context => "context",
            Self::Unified => "unified",
            Self::Ndiff => "ndiff",
            Self::Html => "html",
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Renders the difference between two line sequences.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DiffEngine {
    mode: OutputMode,
    context_lines: usize,
    html_context: bool,
    html_standalone: bool,
    html_table_index: usize,
}

impl DiffEngine {
    /// An engine for `mode` with three lines of context. HTML output is a
    /// complete document showing every line.
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            context_lines: DEFAULT_CONTEXT_LINES,
            html_context: false,
            html_standalone: true,
            html_table_index: 0,
        }
    }

    /// Set the number of unchanged lines shown around each change.
    pub fn context_lines(mut self, lines: usize) -> Self {
        self.context_lines = lines;
        self
    }

    /// In HTML mode, show only changed regions and their context.
    pub fn html_context(mut self, enabled: bool) -> Self {
        self.html_context = enabled;
        self
    }

    /// In HTML mode, emit a full document (`true`) or a bare table followed by
    /// `<br/>` for embedding between [`render::html::HEADER`] and
    /// [`render::html::FOOTER`].
    pub fn html_standalone(mut self, standalone: bool) -> Self {
        self.html_standalone = standalone;
        self
    }

    /// Number the HTML table's navigation anchors so several tables can
    /// share one document.
    pub fn html_table_index(mut self, index: usize) -> Self {
        self.html_table_index = index;
        self
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// Render the difference, or `None` when the sequences are equal.
    pub fn render(&self, from_label: &str, to_label: &str, from: &[&str], to: &[&str]) -> Option<String> {
        if from == to {
            return None;
        }

        let diff = TextDiff::from_slices(from, to);
        let sides = Sides {
            from_label,
            to_label,
            from,
            to,
        };

        let output = match self.mode {
            OutputMode::Context => render::context::render(&sides, &diff.grouped_ops(self.context_lines)),
            OutputMode::Unified => render::unified::render(&sides, &diff.grouped_ops(self.context_lines)),
            OutputMode::Ndiff => render::ndiff::render(&sides, diff.ops()),
            OutputMode::Html => {
                let groups = if self.html_context {
                    diff.grouped_ops(self.context_lines)
                } else {
                    vec![diff.ops().to_vec()]
                };
                let table = render::html::table(&sides, &groups, self.html_table_index);
                if self.html_standalone {
                    render::html::document(&table)
                } else {
                    format!("{table}<br/>")
                }
            }
        };
        Some(output)
    }
}

impl Default for DiffEngine {
    fn default() -> Self {
        Self::new(OutputMode::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FROM: [&str; 4] = ["[a]", "x = 1", "y = 2", ""];
    const TO: [&str; 4] = ["[a]", "x = 1", "y = 3", ""];

    #[test]
    fn equal_inputs_render_nothing_in_every_mode() {
        for mode in [OutputMode::Context, OutputMode::Unified, OutputMode::Ndiff, OutputMode::Html] {
            let engine = DiffEngine::new(mode);
            assert_eq!(engine.render("a", "b", &FROM, &FROM), None, "{mode}");
        }
    }

    #[test]
    fn context_is_the_default() {
        assert_eq!(DiffEngine::default().mode(), OutputMode::Context);
    }

    #[test]
    fn unified_output() {
        let out = DiffEngine::new(OutputMode::Unified)
            .render("a.ini", "b.ini", &FROM, &TO)
            .unwrap();
        assert_eq!(
            out,
            "--- a.ini\n+++ b.ini\n@@ -1,4 +1,4 @@\n [a]\n x = 1\n-y = 2\n+y = 3\n \n"
        );
    }

    #[test]
    fn context_lines_limit_hunk() {
        let out = DiffEngine::new(OutputMode::Unified)
            .context_lines(0)
            .render("a", "b", &FROM, &TO)
            .unwrap();
        assert_eq!(out, "--- a\n+++ b\n@@ -3 +3 @@\n-y = 2\n+y = 3\n");
    }

    #[test]
    fn html_fragment_ends_with_break() {
        let out = DiffEngine::new(OutputMode::Html)
            .html_standalone(false)
            .render("a", "b", &FROM, &TO)
            .unwrap();
        assert!(out.starts_with("\n    <table class=\"diff\""));
        assert!(out.ends_with("</table><br/>"));
        assert!(!out.contains("<html>"));
    }

    #[test]
    fn html_tables_get_distinct_anchors() {
        let engine = DiffEngine::new(OutputMode::Html).html_standalone(false);
        let first = engine.render("a", "b", &FROM, &TO).unwrap();
        let second = engine.html_table_index(1).render("a", "b", &FROM, &TO).unwrap();
        assert!(first.contains("id=\"difflib_chg_to0__top\""));
        assert!(second.contains("id=\"difflib_chg_to1__top\""));
        assert!(!second.contains("difflib_chg_to0__"));
    }

    #[test]
    fn html_document_wraps_table() {
        let out = DiffEngine::new(OutputMode::Html).render("a", "b", &FROM, &TO).unwrap();
        assert!(out.contains("<html>"));
        assert!(out.contains("</html>"));
        assert!(out.contains("class=\"diff_chg\""));
    }
}
