#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for termux-create-package
//!
//! Configuration is layered, lowest precedence first:
//! - Default values (hard-coded)
//! - Environment variables (`TCPKG_*`)
//! - CLI flags

pub mod constants;

use constants::{
    DEFAULT_AR_PROGRAM, DEFAULT_COMPRESSION_LEVEL, DEFAULT_PREFIX, ENV_AR, ENV_COMBINER,
    ENV_COMPRESSION_LEVEL, ENV_OUTPUT_DIR, ENV_PREFIX, MAX_COMPRESSION_LEVEL,
};
use std::path::PathBuf;
use tcpkg_errors::{ConfigError, Error};
use tcpkg_types::CombinerKind;
use tracing::debug;

/// Build configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Installation prefix the payload is placed under
    pub prefix: String,
    /// Directory the `.deb` is written to
    pub output_dir: PathBuf,
    /// xz preset (0-9) for the control and data streams
    pub compression_level: u32,
    /// How the container is assembled
    pub combiner: CombinerKind,
    /// `ar` binary used by the external combiner
    pub ar_program: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            output_dir: PathBuf::from("."),
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            combiner: CombinerKind::External,
            ar_program: DEFAULT_AR_PROGRAM.to_string(),
        }
    }
}

impl Config {
    /// Defaults overlaid with the process environment
    ///
    /// # Errors
    ///
    /// Returns an error if a `TCPKG_*` variable holds an invalid value.
    pub fn from_env() -> Result<Self, Error> {
        let mut config = Self::default();
        config.merge_env()?;
        Ok(config)
    }

    /// Merge environment variables into config
    ///
    /// # Errors
    ///
    /// Returns an error if a `TCPKG_*` variable holds an invalid value.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        // TCPKG_PREFIX
        if let Ok(prefix) = std::env::var(ENV_PREFIX) {
            self.prefix = prefix;
        }

        // TCPKG_OUTPUT_DIR
        if let Ok(dir) = std::env::var(ENV_OUTPUT_DIR) {
            if dir.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: ENV_OUTPUT_DIR.to_string(),
                    value: dir,
                }
                .into());
            }
            self.output_dir = PathBuf::from(dir);
        }

        // TCPKG_COMPRESSION_LEVEL
        if let Ok(level) = std::env::var(ENV_COMPRESSION_LEVEL) {
            self.compression_level = match level.parse::<u32>() {
                Ok(parsed) if parsed <= MAX_COMPRESSION_LEVEL => parsed,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: ENV_COMPRESSION_LEVEL.to_string(),
                        value: level,
                    }
                    .into())
                }
            };
        }

        // TCPKG_COMBINER
        if let Ok(combiner) = std::env::var(ENV_COMBINER) {
            self.combiner = match combiner.as_str() {
                "external" | "ar" => CombinerKind::External,
                "builtin" => CombinerKind::Builtin,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: ENV_COMBINER.to_string(),
                        value: combiner,
                    }
                    .into())
                }
            };
        }

        // TCPKG_AR
        if let Ok(ar) = std::env::var(ENV_AR) {
            if ar.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: ENV_AR.to_string(),
                    value: ar,
                }
                .into());
            }
            self.ar_program = ar;
        }

        debug!(config = ?self, "configuration after environment merge");
        Ok(())
    }

    /// Override the installation prefix
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Override the output directory
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Override the container combiner
    #[must_use]
    pub fn with_combiner(mut self, combiner: CombinerKind) -> Self {
        self.combiner = combiner;
        self
    }
}
