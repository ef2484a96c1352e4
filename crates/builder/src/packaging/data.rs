//! `data.tar.xz`: the files installed by the package

use indexmap::IndexMap;
use std::fs::File;
use std::os::unix::fs::{MetadataExt, PermissionsExt};
use std::path::{Path, PathBuf};
use tcpkg_errors::{BuildError, Error};
use tracing::{debug, info};

use super::archive::{EntrySource, TarEntry, TarStreamWriter};

/// Totals for a written payload stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PayloadSummary {
    pub entries: usize,
    pub bytes: u64,
}

/// Make the installation prefix relative and terminate it with one `/`
///
/// A prefix naming the filesystem root normalizes to the empty string so
/// payload paths never start with `/`.
pub fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim_start_matches('/').trim_end_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{trimmed}/")
    }
}

/// Path of a payload entry inside `data.tar.xz`
pub fn target_path(normalized_prefix: &str, install_path: &str) -> String {
    format!("{normalized_prefix}{}", install_path.trim_start_matches('/'))
}

fn source_error(path: &Path, err: &std::io::Error) -> Error {
    BuildError::SourceFile {
        path: path.display().to_string(),
        kind: err.kind(),
        message: err.to_string(),
    }
    .into()
}

/// Open a source file and build its entry from the opened handle's metadata
fn source_entry(source: &Path, target: String) -> Result<TarEntry<'static>, Error> {
    let file = File::open(source).map_err(|e| source_error(source, &e))?;
    let metadata = file.metadata().map_err(|e| source_error(source, &e))?;
    if !metadata.is_file() {
        return Err(source_error(
            source,
            &std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a regular file"),
        ));
    }

    Ok(TarEntry {
        path: target,
        size: metadata.len(),
        mode: metadata.permissions().mode() & 0o7777,
        mtime: u64::try_from(metadata.mtime()).unwrap_or(0),
        source: EntrySource::File(file),
    })
}

/// Write the payload stream to `path`
///
/// Entries are written in the order of `files`, each at
/// `normalize_prefix(prefix) + install_path`, carrying the source file's
/// mode, modification time and size.
///
/// # Errors
///
/// Returns an error if a source file is missing or unreadable, two sources
/// map to the same target, or the stream cannot be written.
pub fn write_data_archive(
    prefix: &str,
    files: &IndexMap<PathBuf, String>,
    path: &Path,
    compression_level: u32,
) -> Result<PayloadSummary, Error> {
    let prefix = normalize_prefix(prefix);
    let mut writer = TarStreamWriter::create(path, compression_level)?;
    let mut summary = PayloadSummary::default();

    for (source, install_path) in files {
        let target = target_path(&prefix, install_path);
        if target.is_empty() || target.ends_with('/') {
            return Err(BuildError::InvalidPath {
                path: install_path.clone(),
                reason: format!("install path for {} does not name a file", source.display()),
            }
            .into());
        }

        let entry = source_entry(source, target)?;
        debug!(source = %source.display(), target = %entry.path, "adding payload file");
        summary.bytes += entry.size;
        writer.append(entry)?;
        summary.entries += 1;
    }

    writer.finish()?;
    info!(
        entries = summary.entries,
        bytes = summary.bytes,
        prefix = %prefix,
        "data archive written"
    );
    Ok(summary)
}
