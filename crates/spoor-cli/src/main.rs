//! Spoor CLI - Command-line interface for the Spoor observability pipeline
//!
//! Provides commands for:
//! - Managing tracking consent
//! - Sending manual events and error reports
//! - Listing the remote error log (administrative view)
//! - Inspecting pipeline status

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod context;
mod output;

use commands::{
    consent::ConsentCommand,
    errors::ErrorsCommand,
    report::ReportCommand,
    status::StatusCommand,
    track::TrackCommand,
};
use output::Printer;

#[derive(Debug, Parser)]
#[command(name = "spoor", version, about = "Consent-gated observability pipeline")]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Use alternate config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// View or change tracking consent
    #[command(subcommand)]
    Consent(ConsentCommand),
    /// Send a manual analytics event
    Track(TrackCommand),
    /// Send a manual error report
    Report(ReportCommand),
    /// View the remote error log
    #[command(subcommand)]
    Errors(ErrorsCommand),
    /// Show pipeline status
    Status(StatusCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing
    let filter = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    let printer = Printer::new(cli.json, cli.quiet);

    match cli.command {
        Commands::Consent(cmd) => cmd.execute(&printer, cli.config.as_deref()).await,
        Commands::Track(cmd) => cmd.execute(&printer, cli.config.as_deref()).await,
        Commands::Report(cmd) => cmd.execute(&printer, cli.config.as_deref()).await,
        Commands::Errors(cmd) => cmd.execute(&printer, cli.config.as_deref()).await,
        Commands::Status(cmd) => cmd.execute(&printer, cli.config.as_deref()).await,
    }
}
