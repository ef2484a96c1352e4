//! Tar entry writing shared by the control and data streams

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tcpkg_errors::{BuildError, Error};
use tracing::debug;

use super::compression::{create_xz_writer, finish_xz_writer, XzFileWriter};

/// Body of a tar entry
#[derive(Debug)]
pub enum EntrySource<'a> {
    /// Generated content such as the control file
    Memory(&'a [u8]),
    /// An opened source file, streamed into the archive
    File(File),
}

/// One file placed into a tar stream
#[derive(Debug)]
pub struct TarEntry<'a> {
    /// Path inside the archive, relative
    pub path: String,
    pub size: u64,
    /// Permission bits; file type bits are masked off
    pub mode: u32,
    /// Seconds since the Unix epoch
    pub mtime: u64,
    pub source: EntrySource<'a>,
}

impl<'a> TarEntry<'a> {
    /// Entry for generated content, owned by root with mode 0644 and mtime 0
    pub fn from_memory(path: impl Into<String>, content: &'a [u8]) -> Self {
        Self {
            path: path.into(),
            size: content.len() as u64,
            mode: 0o644,
            mtime: 0,
            source: EntrySource::Memory(content),
        }
    }
}

/// Canonical form of an archive entry path
///
/// `.` and empty segments are dropped so that spellings such as
/// `./bin/tool` and `bin//tool` map to the single path `bin/tool`.
///
/// # Errors
///
/// Returns an error if the path is absolute, contains `..`, or names no file.
pub fn canonical_entry_path(path: &str) -> Result<String, BuildError> {
    let invalid = |reason: &str| BuildError::InvalidPath {
        path: path.to_string(),
        reason: reason.to_string(),
    };

    if path.starts_with('/') {
        return Err(invalid("archive entries must be relative"));
    }
    let mut segments = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => return Err(invalid("archive entries must not contain `..`")),
            other => segments.push(other),
        }
    }
    if segments.is_empty() {
        return Err(invalid("archive entries must name a file"));
    }
    Ok(segments.join("/"))
}

/// Counts the bytes read through it
struct CountingReader<R> {
    inner: R,
    count: u64,
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.count += n as u64;
        Ok(n)
    }
}

/// An xz-compressed tar stream being written to disk
pub struct TarStreamWriter {
    builder: tar::Builder<XzFileWriter>,
    path: PathBuf,
    seen: HashSet<String>,
    entries: usize,
}

impl TarStreamWriter {
    /// Start a new stream at `path`
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created.
    pub fn create(path: &Path, compression_level: u32) -> Result<Self, Error> {
        let writer = create_xz_writer(path, compression_level)?;
        let mut builder = tar::Builder::new(writer);
        builder.follow_symlinks(false);
        Ok(Self {
            builder,
            path: path.to_path_buf(),
            seen: HashSet::new(),
            entries: 0,
        })
    }

    fn archive_name(&self) -> String {
        self.path
            .file_name()
            .map_or_else(|| self.path.display().to_string(), |n| n.to_string_lossy().into_owned())
    }

    /// Append one regular file entry
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not a valid relative file path, if
    /// its canonical form is already present, if a file body is shorter
    /// than the recorded size, or if writing to the stream fails.
    pub fn append(&mut self, entry: TarEntry<'_>) -> Result<(), Error> {
        let path = canonical_entry_path(&entry.path)?;
        if !self.seen.insert(path.clone()) {
            return Err(BuildError::DuplicateEntry {
                path,
                archive: self.archive_name(),
            }
            .into());
        }

        let mut header = tar::Header::new_gnu();
        header.set_entry_type(tar::EntryType::Regular);
        header.set_size(entry.size);
        header.set_mode(entry.mode & 0o7777);
        header.set_mtime(entry.mtime);
        header.set_uid(0);
        header.set_gid(0);
        header
            .set_username("root")
            .map_err(|e| Error::io_with_path(&e, &self.path))?;
        header
            .set_groupname("root")
            .map_err(|e| Error::io_with_path(&e, &self.path))?;

        debug!(
            archive = %self.archive_name(),
            path = %path,
            size = entry.size,
            mode = format_args!("{:o}", entry.mode & 0o7777),
            "appending tar entry"
        );

        let archive = self.archive_name();
        let archive_error = |message: String| BuildError::ArchiveWrite {
            archive: archive.clone(),
            message,
        };
        match entry.source {
            EntrySource::Memory(bytes) => self
                .builder
                .append_data(&mut header, &path, bytes)
                .map_err(|e| archive_error(e.to_string()))?,
            EntrySource::File(file) => {
                // Bounded so the body never exceeds the size recorded in the header
                let mut body = CountingReader {
                    inner: file.take(entry.size),
                    count: 0,
                };
                self.builder
                    .append_data(&mut header, &path, &mut body)
                    .map_err(|e| archive_error(e.to_string()))?;
                if body.count != entry.size {
                    return Err(archive_error(format!(
                        "{path}: expected {} bytes but read {}, source changed while archiving",
                        entry.size, body.count
                    ))
                    .into());
                }
            }
        }

        self.entries += 1;
        Ok(())
    }

    /// Number of entries appended so far
    pub fn len(&self) -> usize {
        self.entries
    }

    /// Whether no entry has been appended yet
    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    /// Write the tar trailer and the xz footer
    ///
    /// # Errors
    ///
    /// Returns an error if the trailing data cannot be written.
    pub fn finish(self) -> Result<(), Error> {
        let writer = self
            .builder
            .into_inner()
            .map_err(|e| Error::io_with_path(&e, &self.path))?;
        finish_xz_writer(writer, &self.path)
    }
}
