//! `powderopt`: find the operating point of a Ti6Al4V powder line that
//! minimizes one LCA impact indicator.

mod cli;
mod config;
mod prompt;
mod report;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    cli::run(&cli)
}
