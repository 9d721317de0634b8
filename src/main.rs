//! CLI entry point for orientation correlation analysis

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use vectorcorr::io::cli::Cli;

fn main() -> vectorcorr::Result<ExitCode> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level())),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Any skipped item makes the exit status a failure
    cli.run().map(|report| report.exit_code())
}
