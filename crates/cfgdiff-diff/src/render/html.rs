//! Side-by-side HTML tables in the layout of the classic `HtmlDiff` writer.

use std::fmt::Write;

use similar::{DiffOp, DiffTag};

use super::Sides;

const TAB_SIZE: usize = 8;

/// Document head shared by every table of a run.
pub const HEADER: &str = r#"
<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Transitional//EN"
          "http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd">

<html>

<head>
    <meta http-equiv="Content-Type"
          content="text/html; charset=utf-8" />
    <title></title>
    <style type="text/css">
        table.diff {font-family:Courier; border:medium;}
        .diff_header {background-color:#e0e0e0}
        td.diff_header {text-align:right}
        .diff_next {background-color:#c0c0c0}
        .diff_add {background-color:#aaffaa}
        .diff_chg {background-color:#ffff77}
        .diff_sub {background-color:#ffaaaa}
    </style>
</head>

<body>
"#;

/// Colour legend and document close.
pub const FOOTER: &str = r#"
    <table class="diff" summary="Legends">
        <tr> <th colspan="2"> Legends </th> </tr>
        <tr> <td> <table border="" summary="Colors">
                      <tr><th> Colors </th> </tr>
                      <tr><td class="diff_add">&nbsp;Added&nbsp;</td></tr>
                      <tr><td class="diff_chg">Changed</td> </tr>
                      <tr><td class="diff_sub">Deleted</td> </tr>
                  </table></td>
             <td> <table border="" summary="Links">
                      <tr><th colspan="2"> Links </th> </tr>
                      <tr><td>(f)irst change</td> </tr>
                      <tr><td>(n)ext change</td> </tr>
                      <tr><td>(t)op</td> </tr>
                  </table></td> </tr>
    </table>
</body>

</html>
"#;

fn escape(line: &str) -> String {
    let mut expanded = String::with_capacity(line.len());
    for c in line.chars() {
        if c == '\t' {
            let pad = TAB_SIZE - expanded.chars().count() % TAB_SIZE;
            expanded.extend(std::iter::repeat(' ').take(pad));
        } else {
            expanded.push(c);
        }
    }
    expanded
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace(' ', "&nbsp;")
}

/// One half of a row: navigation cell, line number and marked-up text.
fn cell(out: &mut String, next: &str, line: Option<(usize, &str)>, class: Option<&str>) {
    out.push_str(next);
    match line {
        Some((number, text)) => {
            let text = escape(text);
            let _ = write!(out, "<td class=\"diff_header\">{}</td><td nowrap=\"nowrap\">", number + 1);
            match class {
                Some(class) => {
                    let _ = write!(out, "<span class=\"{class}\">{text}</span>");
                }
                None => out.push_str(&text),
            }
            out.push_str("</td>");
        }
        None => out.push_str("<td class=\"diff_header\"></td><td nowrap=\"nowrap\"></td>"),
    }
}

struct Row<'a> {
    old: Option<usize>,
    new: Option<usize>,
    class: (Option<&'a str>, Option<&'a str>),
    group: usize,
}

impl Row<'_> {
    fn changed(&self) -> bool {
        self.class != (None, None)
    }
}

fn rows(groups: &[Vec<DiffOp>]) -> Vec<Row<'static>> {
    let mut rows = Vec::new();
    for (group, ops) in groups.iter().enumerate() {
        for op in ops {
            let (tag, old, new) = op.as_tag_tuple();
            match tag {
                DiffTag::Equal => {
                    for (i, j) in old.zip(new) {
                        rows.push(Row { old: Some(i), new: Some(j), class: (None, None), group });
                    }
                }
                DiffTag::Delete => {
                    for i in old {
                        rows.push(Row { old: Some(i), new: None, class: (Some("diff_sub"), None), group });
                    }
                }
                DiffTag::Insert => {
                    for j in new {
                        rows.push(Row { old: None, new: Some(j), class: (None, Some("diff_add")), group });
                    }
                }
                DiffTag::Replace => {
                    for k in 0..old.len().max(new.len()) {
                        let i = (k < old.len()).then(|| old.start + k);
                        let j = (k < new.len()).then(|| new.start + k);
                        let class = match (i, j) {
                            (Some(_), Some(_)) => (Some("diff_chg"), Some("diff_chg")),
                            (Some(_), None) => (Some("diff_sub"), None),
                            _ => (None, Some("diff_add")),
                        };
                        rows.push(Row { old: i, new: j, class, group });
                    }
                }
            }
        }
    }
    rows
}

/// Render the groups as one table; each group is its own `<tbody>`.
///
/// `prefix` makes the navigation anchors unique when several tables share a
/// document. The first row links to the first change, each change links to
/// the next one and the last change links back to the top.
pub(crate) fn table(sides: &Sides<'_>, groups: &[Vec<DiffOp>], prefix: usize) -> String {
    let rows = rows(groups);
    let block_starts: Vec<usize> = (0..rows.len())
        .filter(|&i| {
            rows[i].changed() && (i == 0 || !rows[i - 1].changed() || rows[i - 1].group != rows[i].group)
        })
        .collect();
    let anchor = |name: &str| format!("difflib_chg_to{prefix}__{name}");

    let mut body = String::new();
    for (i, row) in rows.iter().enumerate() {
        if i > 0 && rows[i - 1].group != row.group {
            body.push_str("        </tbody>\n        <tbody>\n");
        }

        let block = block_starts.iter().position(|&start| start == i);
        let id = block
            .map(|k| format!(" id=\"{}\"", anchor(&k.to_string())))
            .unwrap_or_default();
        let link = match block {
            Some(k) if k + 1 < block_starts.len() => {
                format!("<a href=\"#{}\">n</a>", anchor(&(k + 1).to_string()))
            }
            Some(_) => format!("<a href=\"#{}\">t</a>", anchor("top")),
            None if i == 0 && !block_starts.is_empty() => format!("<a href=\"#{}\">f</a>", anchor("0")),
            None => String::new(),
        };

        body.push_str("<tr>");
        cell(
            &mut body,
            &format!("<td class=\"diff_next\"{id}>{link}</td>"),
            row.old.map(|i| (i, sides.from[i])),
            row.class.0,
        );
        cell(
            &mut body,
            &format!("<td class=\"diff_next\">{link}</td>"),
            row.new.map(|j| (j, sides.to[j])),
            row.class.1,
        );
        body.push_str("</tr>\n");
    }

    format!(
        r#"
    <table class="diff" id="{}"
           cellspacing="0" cellpadding="0" rules="groups" >
        <colgroup></colgroup> <colgroup></colgroup> <colgroup></colgroup>
        <colgroup></colgroup> <colgroup></colgroup> <colgroup></colgroup>
        <thead><tr><th class="diff_next"><br /></th><th colspan="2" class="diff_header">{}</th><th class="diff_next"><br /></th><th colspan="2" class="diff_header">{}</th></tr></thead>
        <tbody>
{body}        </tbody>
    </table>"#,
        anchor("top"),
        escape(sides.from_label),
        escape(sides.to_label),
    )
}

/// A complete HTML document around one table.
pub(crate) fn document(table: &str) -> String {
    format!("{HEADER}{table}{FOOTER}")
}

#[cfg(test)]
mod tests {
    use similar::TextDiff;

    use super::*;

    fn render(from: &[&str], to: &[&str], groups: impl Fn(&TextDiff<'_, '_, '_, str>) -> Vec<Vec<DiffOp>>) -> String {
        let diff = TextDiff::from_slices(from, to);
        let sides = Sides {
            from_label: "a <old>",
            to_label: "b",
            from,
            to,
        };
        table(&sides, &groups(&diff), 0)
    }

    #[test]
    fn escapes_markup_and_spaces() {
        assert_eq!(escape("a <b> & c"), "a&nbsp;&lt;b&gt;&nbsp;&amp;&nbsp;c");
        assert_eq!(escape("\tx"), "&nbsp;&nbsp;&nbsp;&nbsp;&nbsp;&nbsp;&nbsp;&nbsp;x");
    }

    #[test]
    fn labels_are_escaped() {
        let out = render(&["x"], &["y"], |d| vec![d.ops().to_vec()]);
        assert!(out.contains(">a&nbsp;&lt;old&gt;</th>"));
    }

    #[test]
    fn changed_lines_marked() {
        let out = render(&["same", "old"], &["same", "new", "extra"], |d| vec![d.ops().to_vec()]);
        assert!(out.contains("<span class=\"diff_chg\">old</span>"));
        assert!(out.contains("<span class=\"diff_chg\">new</span>"));
        assert!(out.contains("<span class=\"diff_add\">extra</span>"));
        assert_eq!(out.matches("<tr><td").count(), 3);
    }

    #[test]
    fn navigation_links_walk_changes() {
        let from = ["a", "b", "c", "d", "e"];
        let to = ["a", "B", "c", "d", "E"];
        let out = render(&from, &to, |d| vec![d.ops().to_vec()]);
        assert!(out.contains("id=\"difflib_chg_to0__top\""));
        assert!(out.contains("<td class=\"diff_next\"><a href=\"#difflib_chg_to0__0\">f</a></td>"));
        assert!(out.contains(
            "<td class=\"diff_next\" id=\"difflib_chg_to0__0\"><a href=\"#difflib_chg_to0__1\">n</a></td>"
        ));
        assert!(out.contains(
            "<td class=\"diff_next\" id=\"difflib_chg_to0__1\"><a href=\"#difflib_chg_to0__top\">t</a></td>"
        ));
    }

    #[test]
    fn footer_lists_colors_and_links() {
        assert!(FOOTER.contains("summary=\"Colors\""));
        assert!(FOOTER.contains("(f)irst change"));
        assert!(FOOTER.contains("(t)op"));
    }

    #[test]
    fn context_groups_split_bodies() {
        let from: Vec<String> = (0..20).map(|i| format!("line {i}")).collect();
        let mut to = from.clone();
        to[1] = "changed 1".into();
        to[18] = "changed 18".into();
        let from: Vec<&str> = from.iter().map(String::as_str).collect();
        let to: Vec<&str> = to.iter().map(String::as_str).collect();
        let out = render(&from, &to, |d| d.grouped_ops(2));
        assert_eq!(out.matches("<tbody>").count(), 2);
        assert!(!out.contains("line&nbsp;10"));
    }
}
