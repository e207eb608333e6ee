use std::io::Write;

use anyhow::Context;
use cfgdiff_diff::{render::html, DiffEngine, OutputMode, DEFAULT_CONTEXT_LINES};
use cfgdiff_normalize::{ComparableDocument, FormatId, FormatRegistry, OrderingMode, ParseError};
use colored::Colorize;
use tracing::debug;

use crate::cli::Cli;
use crate::config::{CfgdiffConfig, Defaults};

/// Exit status when the inputs compare equal.
pub const EXIT_SAME: u8 = 0;
/// Exit status when any difference, missing file or parse failure was reported.
pub const EXIT_DIFFERENT: u8 = 1;
/// Exit status for fatal errors.
pub const EXIT_TROUBLE: u8 = 2;

/// Command-line flags merged over configuration file defaults.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub format: FormatId,
    pub dialect: Option<String>,
    pub ordering: OrderingMode,
    pub mode: OutputMode,
    pub html_context: bool,
    pub context_lines: usize,
    pub new_file: bool,
    pub recursive: bool,
    pub color: bool,
}

impl Settings {
    pub fn resolve(cli: &Cli, defaults: &Defaults) -> Self {
        let mode = if cli.unified {
            OutputMode::Unified
        } else if cli.ndiff {
            OutputMode::Ndiff
        } else if cli.html {
            OutputMode::Html
        } else if cli.context {
            OutputMode::Context
        } else {
            defaults.output.unwrap_or_default()
        };

        #[cfg(feature = "reconf")]
        let dialect = cli.reconf_class.clone().or_else(|| defaults.reconf_class.clone());
        #[cfg(not(feature = "reconf"))]
        let dialect = None;

        Self {
            format: cli.input_format.or(defaults.input_format).unwrap_or(FormatId::Ini),
            dialect,
            ordering: OrderingMode::from_ordered(cli.ordered || defaults.ordered),
            mode,
            html_context: cli.html && cli.context,
            context_lines: cli.lines.or(defaults.lines).unwrap_or(DEFAULT_CONTEXT_LINES),
            new_file: cli.new_file || defaults.new_file,
            recursive: cli.recursive,
            color: cli.color.enabled(),
        }
    }
}

/// Run one cfgdiff invocation, writing the report to `out`.
///
/// Returns the exit status; `Err` is a fatal error.
pub fn run(cli: &Cli, out: &mut dyn Write) -> anyhow::Result<u8> {
    let config = CfgdiffConfig::discover(cli.config.as_deref())?;
    let settings = Settings::resolve(cli, &config.defaults);
    compare(cli, &settings, out)
}

fn compare(cli: &Cli, settings: &Settings, out: &mut dyn Write) -> anyhow::Result<u8> {
    let normalizer = FormatRegistry::global().build(settings.format, settings.dialect.as_deref())?;
    let pairs = cfgdiff_diff::enumerate(&cli.fromfile, &cli.tofile, settings.recursive)?;
    debug!(pairs = pairs.len(), format = %settings.format, mode = %settings.mode, "comparing");

    let engine = DiffEngine::new(settings.mode)
        .context_lines(settings.context_lines)
        .html_context(settings.html_context)
        .html_standalone(!settings.recursive);
    let wrap_html = settings.mode == OutputMode::Html && settings.recursive;

    if wrap_html {
        out.write_all(html::HEADER.as_bytes())?;
    }

    let mut status = EXIT_SAME;
    for (index, pair) in pairs.iter().enumerate() {
        if let Some(mismatch) = pair.mismatch.as_ref().filter(|_| !settings.new_file) {
            writeln!(out, "{mismatch}")?;
            status = EXIT_DIFFERENT;
            continue;
        }

        let from = ComparableDocument::load(pair.from.clone(), &*normalizer, settings.ordering);
        let to = ComparableDocument::load(pair.to.clone(), &*normalizer, settings.ordering);
        for error in [from.parse_error(), to.parse_error()].into_iter().flatten() {
            report_parse_error(out, error)?;
            status = EXIT_DIFFERENT;
        }

        let rendered = engine.html_table_index(index).render(
            &from.source().to_string(),
            &to.source().to_string(),
            &from.lines(),
            &to.lines(),
        );
        if let Some(diff) = rendered {
            if settings.color && settings.mode != OutputMode::Html {
                for line in diff.lines() {
                    writeln!(out, "{}", paint(line, settings.mode))?;
                }
            } else {
                out.write_all(diff.as_bytes())?;
            }
            status = EXIT_DIFFERENT;
        }
    }

    if wrap_html {
        out.write_all(html::FOOTER.as_bytes())?;
    }
    out.flush().context("writing output")?;
    Ok(status)
}

fn report_parse_error(out: &mut dyn Write, error: &ParseError) -> std::io::Result<()> {
    writeln!(out, "{} could not be parsed as a {} file:", error.path, error.format)?;
    writeln!(out, " {}", error.message)?;
    writeln!(out, "It will be interpreted as an empty file.")
}

fn paint(line: &str, mode: OutputMode) -> String {
    let header = match mode {
        OutputMode::Context => line.starts_with("*** ") || line.starts_with("--- ") || line == "***************",
        OutputMode::Unified => line.starts_with("--- ") || line.starts_with("+++ "),
        _ => false,
    };
    if header {
        return line.bold().to_string();
    }
    if line.starts_with("@@") {
        return line.cyan().to_string();
    }
    match line.chars().next() {
        Some('+') => line.green().to_string(),
        Some('-') => line.red().to_string(),
        Some('!') => line.yellow().to_string(),
        _ => line.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use clap::Parser;

    use super::*;

    fn cli(args: &[&str]) -> Cli {
        let mut full = vec!["cfgdiff", "--color", "never"];
        full.extend_from_slice(args);
        Cli::try_parse_from(full).unwrap()
    }

    fn run_args(args: &[&str]) -> (u8, String) {
        let cli = cli(args);
        let settings = Settings::resolve(&cli, &Defaults::default());
        let mut out = Vec::new();
        let status = compare(&cli, &settings, &mut out).unwrap();
        (status, String::from_utf8(out).unwrap())
    }

    fn write(dir: &Path, name: &str, contents: &str) -> String {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, contents).unwrap();
        path.display().to_string()
    }

    #[test]
    fn flags_override_defaults() {
        let defaults = Defaults {
            input_format: Some(FormatId::Json),
            lines: Some(7),
            output: Some(OutputMode::Ndiff),
            ..Defaults::default()
        };
        let settings = Settings::resolve(&cli(&["-u", "a", "b"]), &defaults);
        assert_eq!(settings.mode, OutputMode::Unified);
        assert_eq!(settings.format, FormatId::Json);
        assert_eq!(settings.context_lines, 7);

        let settings = Settings::resolve(&cli(&["a", "b"]), &defaults);
        assert_eq!(settings.mode, OutputMode::Ndiff);
    }

    #[test]
    fn builtin_defaults() {
        let settings = Settings::resolve(&cli(&["a", "b"]), &Defaults::default());
        assert_eq!(settings.format, FormatId::Ini);
        assert_eq!(settings.mode, OutputMode::Context);
        assert_eq!(settings.ordering, OrderingMode::Sorted);
        assert_eq!(settings.context_lines, 3);
        assert!(!settings.color);
    }

    #[test]
    fn html_with_context_flag() {
        let settings = Settings::resolve(&cli(&["-m", "-c", "a", "b"]), &Defaults::default());
        assert_eq!(settings.mode, OutputMode::Html);
        assert!(settings.html_context);
    }

    #[test]
    fn permuted_ini_is_equal() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(dir.path(), "a.ini", "[s]\nx = 1\ny = 2\n");
        let b = write(dir.path(), "b.ini", "[s]\ny = 2\nx = 1\n");
        assert_eq!(run_args(&[&a, &b]), (EXIT_SAME, String::new()));
    }

    #[test]
    fn ordered_input_reports_permutation() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(dir.path(), "a.ini", "[s]\nx = 1\ny = 2\n");
        let b = write(dir.path(), "b.ini", "[s]\ny = 2\nx = 1\n");
        let (status, out) = run_args(&["-O", &a, &b]);
        assert_eq!(status, EXIT_DIFFERENT);
        assert!(out.starts_with(&format!("*** {a}\n--- {b}\n")));
    }

    #[test]
    fn parse_error_reported_and_counted() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(dir.path(), "a.json", "{\"x\": 1}");
        let b = write(dir.path(), "b.json", "{broken");
        let (status, out) = run_args(&["-i", "json", "-u", &a, &b]);
        assert_eq!(status, EXIT_DIFFERENT);
        assert!(out.starts_with(&format!("{b} could not be parsed as a json file:\n ")));
        assert!(out.contains("It will be interpreted as an empty file.\n"));
        assert!(out.contains("-    \"x\": 1\n"));
    }

    #[test]
    fn recursive_reports_only_in() {
        let from = tempfile::tempdir().unwrap();
        let to = tempfile::tempdir().unwrap();
        write(from.path(), "same.ini", "[a]\nk = v\n");
        write(to.path(), "same.ini", "[a]\nk = v\n");
        write(to.path(), "extra.ini", "[a]\nk = v\n");
        let from_arg = from.path().display().to_string();
        let to_arg = to.path().display().to_string();

        let (status, out) = run_args(&["-r", &from_arg, &to_arg]);
        assert_eq!(status, EXIT_DIFFERENT);
        assert_eq!(out, format!("Only in {to_arg}: extra.ini\n"));

        let (status, out) = run_args(&["-r", "-N", "-u", &from_arg, &to_arg]);
        assert_eq!(status, EXIT_DIFFERENT);
        assert!(out.starts_with("--- /dev/null\n+++ "));
    }

    #[test]
    fn recursive_html_shares_header_and_footer() {
        let from = tempfile::tempdir().unwrap();
        let to = tempfile::tempdir().unwrap();
        write(from.path(), "a.ini", "[a]\nk = 1\n");
        write(to.path(), "a.ini", "[a]\nk = 2\n");
        write(from.path(), "b.ini", "[b]\nk = 1\n");
        write(to.path(), "b.ini", "[b]\nk = 2\n");
        let from_arg = from.path().display().to_string();
        let to_arg = to.path().display().to_string();

        let (_, out) = run_args(&["-r", "-m", &from_arg, &to_arg]);
        assert_eq!(out.matches("<html>").count(), 1);
        assert_eq!(out.matches("<br/>").count(), 2);
        assert!(out.contains("id=\"difflib_chg_to0__top\""));
        assert!(out.contains("id=\"difflib_chg_to1__top\""));
        assert!(out.trim_end().ends_with("</html>"));
    }

    #[test]
    fn directory_mode_mismatch_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let file = write(dir.path(), "a.ini", "[a]\n");
        let cli = cli(&["-r", &dir.path().display().to_string(), &file]);
        let settings = Settings::resolve(&cli, &Defaults::default());
        let err = compare(&cli, &settings, &mut Vec::new()).unwrap_err();
        assert!(err.downcast_ref::<cfgdiff_diff::DiffError>().is_some());
    }

    #[cfg(feature = "reconf")]
    #[test]
    fn unknown_dialect_is_fatal() {
        let cli = cli(&["-i", "reconf", "-R", "NoSuchConfig", "a", "b"]);
        let settings = Settings::resolve(&cli, &Defaults::default());
        let err = compare(&cli, &settings, &mut Vec::new()).unwrap_err();
        assert!(err.to_string().contains("NoSuchConfig"));
    }

    #[test]
    fn colored_lines_keep_text() {
        colored::control::set_override(false);
        assert_eq!(paint("+x = 1", OutputMode::Unified), "+x = 1");
        assert_eq!(paint("*** a", OutputMode::Context), "*** a");
    }
}
