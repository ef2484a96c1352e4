//! Fixed defaults and environment variable names

/// Installation prefix of a stock Termux install
pub const DEFAULT_PREFIX: &str = "/data/data/com.termux/files/usr/";

/// xz preset used for both tar streams
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

/// Highest xz preset
pub const MAX_COMPRESSION_LEVEL: u32 = 9;

pub const DEFAULT_AR_PROGRAM: &str = "ar";

pub const ENV_PREFIX: &str = "TCPKG_PREFIX";
pub const ENV_OUTPUT_DIR: &str = "TCPKG_OUTPUT_DIR";
pub const ENV_COMPRESSION_LEVEL: &str = "TCPKG_COMPRESSION_LEVEL";
pub const ENV_COMBINER: &str = "TCPKG_COMBINER";
pub const ENV_AR: &str = "TCPKG_AR";
