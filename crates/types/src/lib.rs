#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Core type definitions for termux-create-package
//!
//! This crate provides the small value types shared between the manifest,
//! configuration and builder crates.

pub mod reports;

pub use reports::BuildReport;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tcpkg_errors::ManifestError;

/// Target architecture of a package
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Arch {
    /// Architecture-independent package
    #[default]
    All,
    Arm,
    I686,
    Aarch64,
    X86_64,
}

impl Arch {
    /// Every accepted architecture, in the order they are documented
    pub const ALL: [Arch; 5] = [
        Arch::All,
        Arch::Arm,
        Arch::I686,
        Arch::Aarch64,
        Arch::X86_64,
    ];

    /// Token used in control files and package file names
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Arm => "arm",
            Self::I686 => "i686",
            Self::Aarch64 => "aarch64",
            Self::X86_64 => "x86_64",
        }
    }

    /// Comma-separated list of accepted tokens, for error messages
    #[must_use]
    pub fn allowed_values() -> String {
        Self::ALL
            .into_iter()
            .map(Arch::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Arch {
    type Err = ManifestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|arch| arch.as_str() == s)
            .ok_or_else(|| ManifestError::InvalidArch {
                value: s.to_string(),
                allowed: Self::allowed_values(),
            })
    }
}

impl TryFrom<String> for Arch {
    type Error = ManifestError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Arch> for String {
    fn from(arch: Arch) -> Self {
        arch.as_str().to_string()
    }
}

/// How the final `.deb` container is assembled from its members
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CombinerKind {
    /// Run the system `ar` binary
    #[default]
    External,
    /// Write the container in-process
    Builtin,
}

impl fmt::Display for CombinerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::External => write!(f, "external"),
            Self::Builtin => write!(f, "builtin"),
        }
    }
}
