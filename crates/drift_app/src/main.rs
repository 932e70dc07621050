mod cli;
mod commands;
mod config;

use std::process::ExitCode;

use clap::Parser;
use drift_logging::drift_error;

use crate::cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    if !drift_logging::initialize(cli.log_destination(), cli.log_level()) {
        eprintln!("Logging could not be initialized; continuing without it");
    }

    match commands::run(cli).await {
        Ok(code) => code,
        Err(err) => {
            drift_error!("{:#}", err);
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
