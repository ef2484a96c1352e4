//! Final `.deb` assembly

use std::path::{Path, PathBuf};
use tcpkg_errors::Error;
use tcpkg_platform::MemberCombiner;
use tracing::{debug, info};

/// Format marker member
pub const DEBIAN_BINARY: &str = "debian-binary";
/// Compressed control stream member
pub const CONTROL_ARCHIVE: &str = "control.tar.xz";
/// Compressed payload stream member
pub const DATA_ARCHIVE: &str = "data.tar.xz";

/// Content of the `debian-binary` member
pub const FORMAT_VERSION: &str = "2.0\n";

/// Paths of the three container members inside a work directory
#[derive(Debug, Clone)]
pub struct ContainerMembers {
    pub debian_binary: PathBuf,
    pub control: PathBuf,
    pub data: PathBuf,
}

impl ContainerMembers {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            debian_binary: dir.join(DEBIAN_BINARY),
            control: dir.join(CONTROL_ARCHIVE),
            data: dir.join(DATA_ARCHIVE),
        }
    }

    /// Members in container order
    pub fn ordered(&self) -> [PathBuf; 3] {
        [
            self.debian_binary.clone(),
            self.control.clone(),
            self.data.clone(),
        ]
    }
}

/// Write the `debian-binary` format marker
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_format_marker(path: &Path) -> Result<(), Error> {
    std::fs::write(path, FORMAT_VERSION).map_err(|e| Error::io_with_path(&e, path))
}

/// Combine the prepared members into `output` and return its size
///
/// A leftover file at `output` is removed first: `ar r` would otherwise
/// update it in place instead of starting a fresh container. When the
/// combiner fails, whatever it wrote to `output` is left behind.
///
/// # Errors
///
/// Returns an error if the stale output cannot be removed or the combiner
/// fails.
pub fn assemble_container(
    combiner: &dyn MemberCombiner,
    members: &ContainerMembers,
    output: &Path,
) -> Result<u64, Error> {
    match std::fs::remove_file(output) {
        Ok(()) => debug!(output = %output.display(), "removed stale package"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(Error::io_with_path(&e, output)),
    }

    combiner.combine_members(output, &members.ordered())?;

    let size = std::fs::metadata(output)
        .map_err(|e| Error::io_with_path(&e, output))?
        .len();
    info!(
        output = %output.display(),
        combiner = combiner.name(),
        size,
        "package assembled"
    );
    Ok(size)
}
