//! blobsrv - Entry Point
//!
//! Loads the configured storage engines and handlers and reports what was
//! constructed.

// Force-link blobsrv-providers to ensure linkme registrations are included
extern crate blobsrv_providers;

use clap::Parser;

/// Command line interface for blobsrv
#[derive(Parser, Debug)]
#[command(name = "blobsrv")]
#[command(about = "blobsrv - Pluggable Blob Server")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<std::path::PathBuf>,

    /// List the registered storage and handler types, then exit
    #[arg(long)]
    pub list_types: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    blobsrv::run(cli.config.as_deref(), cli.list_types)?;
    Ok(())
}
