//! ModelKit operator tool.
//!
//! Works on JSON files offline; nothing here talks to the remote API.
//!
//! Usage:
//!   modelkit types
//!   modelkit check model.json
//!   modelkit validate model.json data.json
//!   modelkit preview model.json --rows 5

use anyhow::Result;
use clap::Parser;
use modelkit_cli::{Cli, run};
use std::io;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();

    let passed = run(cli.command, &mut io::stdout().lock())?;
    Ok(if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
