//! Report type definitions for operations

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Build report
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BuildReport {
    /// Package that was built
    pub package: String,
    /// Version that was built
    pub version: String,
    /// Output file path
    pub output_path: PathBuf,
    /// Number of entries in the payload stream
    pub payload_entries: usize,
    /// Uncompressed size of all payload files
    pub payload_bytes: u64,
    /// Size of the finished `.deb`
    pub archive_size: u64,
}
