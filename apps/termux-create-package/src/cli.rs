//! Command line interface definition

use clap::Parser;
use std::path::PathBuf;

/// termux-create-package - Create Debian packages for Termux
#[derive(Debug, Parser)]
#[command(name = "termux-create-package")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Create a Debian package for Termux from a JSON manifest")]
#[command(long_about = None)]
pub struct Cli {
    /// Path to the JSON manifest describing the package
    #[arg(value_name = "MANIFEST")]
    pub manifest: PathBuf,

    /// Install prefix prepended to every file path in the package
    #[arg(long, value_name = "DIR")]
    pub prefix: Option<String>,
}
