//! Package build error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum BuildError {
    #[error("cannot read source file {path}: {message}")]
    SourceFile {
        path: String,
        kind: std::io::ErrorKind,
        message: String,
    },

    #[error("failed to write {archive}: {message}")]
    ArchiveWrite { archive: String, message: String },

    #[error("duplicate entry {path} in {archive}")]
    DuplicateEntry { path: String, archive: String },

    #[error("invalid path: {path} - {reason}")]
    InvalidPath { path: String, reason: String },
}

impl UserFacingError for BuildError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::SourceFile { .. } => {
                Some("Source paths in `files` are resolved relative to the current directory.")
            }
            Self::DuplicateEntry { .. } => {
                Some("Give every entry in `files` a distinct install path.")
            }
            Self::ArchiveWrite { .. } => Some("Check free disk space in the temporary directory."),
            _ => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::SourceFile { .. } => "build.source_file",
            Self::ArchiveWrite { .. } => "build.archive_write",
            Self::DuplicateEntry { .. } => "build.duplicate_entry",
            Self::InvalidPath { .. } => "build.invalid_path",
        };
        Some(code)
    }
}
