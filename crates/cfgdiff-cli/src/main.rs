use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    init_tracing(cli.verbose);
    colored::control::set_override(cli.color.enabled());

    let stdout = std::io::stdout();
    match commands::run(&cli, &mut stdout.lock()) {
        Ok(status) => ExitCode::from(status),
        Err(err) => {
            eprintln!("cfgdiff: {err:#}");
            ExitCode::from(commands::EXIT_TROUBLE)
        }
    }
}
