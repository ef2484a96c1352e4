//! termux-create-package - Create Debian packages for Termux
//!
//! Reads a JSON manifest, builds `<name>_<version>_<arch>.deb` and prints
//! the path of the written package.

mod cli;
mod error;

use crate::cli::Cli;
use crate::error::CliError;
use clap::Parser;
use std::process;
use tcpkg_config::Config;
use tcpkg_manifest::Manifest;
use tracing::{error, info};

fn main() {
    let cli = Cli::parse();

    init_tracing();

    match run(&cli) {
        Ok(output) => println!("{output}"),
        Err(e) => {
            error!("Application error: {}", e);
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}

/// Main application logic
fn run(cli: &Cli) -> Result<String, CliError> {
    info!("Starting termux-create-package v{}", env!("CARGO_PKG_VERSION"));

    // 1. Defaults merged with environment variables
    let mut config = Config::from_env()?;

    // 2. CLI flags (highest precedence)
    if let Some(prefix) = &cli.prefix {
        config.prefix.clone_from(prefix);
    }

    let manifest = Manifest::from_file(&cli.manifest)?;
    let report = tcpkg_builder::build_package(&config, &manifest)?;

    info!(
        package = %report.package,
        version = %report.version,
        entries = report.payload_entries,
        bytes = report.payload_bytes,
        size = report.archive_size,
        "package built"
    );
    Ok(report.output_path.display().to_string())
}

/// Log to stderr so stdout only carries the result line
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .try_init();
}
