use std::io::IsTerminal;
use std::path::PathBuf;

use cfgdiff_normalize::{FormatId, FormatRegistry};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "cfgdiff",
    about = "Diff configuration files after normalizing away comments, whitespace and ordering",
    version
)]
pub struct Cli {
    /// Produce a context format diff (default)
    #[arg(short = 'c')]
    pub context: bool,

    /// Produce a unified format diff
    #[arg(short = 'u')]
    pub unified: bool,

    /// Produce a ndiff format diff
    #[arg(short = 'n')]
    pub ndiff: bool,

    /// Produce HTML side by side diff (can use -c and -l in conjunction)
    #[arg(short = 'm')]
    pub html: bool,

    /// Set number of context lines [default: 3]
    #[arg(short = 'l', long)]
    pub lines: Option<usize>,

    /// Parse input as this format [default: ini]
    #[arg(short = 'i', long, value_parser = supported_format)]
    pub input_format: Option<FormatId>,

    /// Application grammar for the reconf format [default: SambaConfig]
    #[cfg(feature = "reconf")]
    #[arg(short = 'R', long)]
    pub reconf_class: Option<String>,

    /// Recursively compare any subdirectories found
    #[arg(short, long)]
    pub recursive: bool,

    /// Treat absent files as empty
    #[arg(short = 'N', long)]
    pub new_file: bool,

    /// Do not change order of options in the input
    #[arg(short = 'O', long = "ordered-input")]
    pub ordered: bool,

    /// Read defaults from this TOML file
    #[arg(long, env = "CFGDIFF_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log debug diagnostics to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// When to colorize diff output
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    pub fromfile: PathBuf,
    pub tofile: PathBuf,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum ColorChoice {
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    /// Resolve `Auto` against whether stdout is a terminal.
    pub fn enabled(self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => std::io::stdout().is_terminal(),
        }
    }
}

fn supported_format(value: &str) -> Result<FormatId, String> {
    let registry = FormatRegistry::global();
    let format: FormatId = value.parse().map_err(|e| format!("{e}"))?;
    if registry.is_supported(format) {
        return Ok(format);
    }
    let names: Vec<String> = registry.supported().iter().map(ToString::to_string).collect();
    Err(format!(
        "{format} support is not compiled in (supported: {})",
        names.join("/")
    ))
}
