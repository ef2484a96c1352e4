#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Package manifest handling for termux-create-package
//!
//! A manifest is a JSON document describing one package. It is parsed into
//! a [`RawManifest`] where every key is optional, then turned into an
//! immutable [`Manifest`] by [`normalize`], which fills defaults and checks
//! the required fields.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tcpkg_errors::{Error, ManifestError};
use tcpkg_types::Arch;
use tracing::{debug, warn};

/// Description used when the manifest has none
pub const DEFAULT_DESCRIPTION: &str = "No description";

/// Maintainer used when the manifest has none
pub const DEFAULT_MAINTAINER: &str = "None";

/// Manifest exactly as written in the JSON document
///
/// `arch` is typed so an unknown architecture is rejected while parsing.
/// Keys not listed here are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawManifest {
    pub name: Option<String>,
    pub version: Option<String>,
    pub arch: Option<Arch>,
    pub maintainer: Option<String>,
    pub description: Option<String>,
    pub homepage: Option<String>,
    pub depends: Option<Vec<String>>,
    pub provides: Option<Vec<String>>,
    pub conflicts: Option<Vec<String>>,
    /// Source path -> install path relative to the prefix, in document order
    pub files: Option<IndexMap<PathBuf, String>>,
}

/// Normalized package manifest with every field populated
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Manifest {
    pub name: String,
    pub version: String,
    pub arch: Arch,
    pub maintainer: String,
    pub description: String,
    pub homepage: Option<String>,
    pub depends: Vec<String>,
    pub provides: Vec<String>,
    pub conflicts: Vec<String>,
    pub files: IndexMap<PathBuf, String>,
}

impl RawManifest {
    /// Parse a manifest document
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not a JSON object of the expected
    /// shape or if `arch` is not an accepted architecture.
    pub fn from_json(content: &str) -> Result<Self, ManifestError> {
        Ok(serde_json::from_str(content)?)
    }
}

/// Fill defaults and validate a raw manifest
///
/// # Errors
///
/// Returns an error if `name`, `version` or `files` is absent, if `name`
/// or `version` cannot be used in a package file name, or if a control
/// field value would not fit on one control line.
pub fn normalize(raw: RawManifest) -> Result<Manifest, ManifestError> {
    let name = require(raw.name, "name")?;
    let version = require(raw.version, "version")?;
    let files = require(raw.files, "files")?;

    validate_file_name_component("name", &name)?;
    validate_file_name_component("version", &version)?;

    if files.is_empty() {
        warn!(package = %name, "manifest lists no files, payload will be empty");
    }

    let manifest = Manifest {
        name,
        version,
        arch: raw.arch.unwrap_or_default(),
        maintainer: raw
            .maintainer
            .unwrap_or_else(|| DEFAULT_MAINTAINER.to_string()),
        description: raw
            .description
            .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
        homepage: raw.homepage,
        depends: raw.depends.unwrap_or_default(),
        provides: raw.provides.unwrap_or_default(),
        conflicts: raw.conflicts.unwrap_or_default(),
        files,
    };

    validate_single_line("maintainer", &manifest.maintainer)?;
    validate_single_line("description", &manifest.description)?;
    if let Some(homepage) = &manifest.homepage {
        validate_single_line("homepage", homepage)?;
    }
    validate_list("depends", &manifest.depends)?;
    validate_list("provides", &manifest.provides)?;
    validate_list("conflicts", &manifest.conflicts)?;

    Ok(manifest)
}

fn require<T>(value: Option<T>, field: &str) -> Result<T, ManifestError> {
    value.ok_or_else(|| ManifestError::MissingField {
        field: field.to_string(),
    })
}

/// `name` and `version` end up in `<name>_<version>_<arch>.deb`
fn validate_file_name_component(field: &str, value: &str) -> Result<(), ManifestError> {
    let reason = if value.is_empty() {
        Some("must not be empty")
    } else if value.contains('/') {
        Some("must not contain '/'")
    } else if value.chars().any(|c| c.is_whitespace() || c.is_control()) {
        Some("must not contain whitespace or control characters")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(invalid_field(field, reason)),
        None => Ok(()),
    }
}

fn invalid_field(field: &str, reason: &str) -> ManifestError {
    ManifestError::InvalidField {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

/// Each control field is one `Key: value` line
fn validate_single_line(field: &str, value: &str) -> Result<(), ManifestError> {
    if value.contains(['\n', '\r']) {
        return Err(invalid_field(field, "must not contain line breaks"));
    }
    Ok(())
}

/// List items are joined with `,` into a single control line
fn validate_list(field: &str, items: &[String]) -> Result<(), ManifestError> {
    for item in items {
        validate_single_line(field, item)?;
        if item.contains(',') {
            return Err(invalid_field(field, "items must not contain ','"));
        }
    }
    Ok(())
}

impl Manifest {
    /// Parse and normalize a manifest document
    ///
    /// # Errors
    ///
    /// Returns an error if parsing or validation fails.
    pub fn from_json(content: &str) -> Result<Self, ManifestError> {
        normalize(RawManifest::from_json(content)?)
    }

    /// Load and normalize a manifest file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, or if parsing or
    /// validation fails.
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        debug!(path = %path.display(), "loading manifest");
        let content = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(&e, path))?;
        Ok(Self::from_json(&content)?)
    }

    /// File name of the package built from this manifest
    #[must_use]
    pub fn package_file_name(&self) -> String {
        format!("{}_{}_{}.deb", self.name, self.version, self.arch)
    }
}

/// Builder for manifests assembled in code rather than read from JSON
#[derive(Debug, Clone)]
pub struct ManifestBuilder {
    raw: RawManifest,
}

impl ManifestBuilder {
    /// Create a new builder
    #[must_use]
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            raw: RawManifest {
                name: Some(name.into()),
                version: Some(version.into()),
                files: Some(IndexMap::new()),
                ..RawManifest::default()
            },
        }
    }

    /// Set architecture
    #[must_use]
    pub fn arch(mut self, arch: Arch) -> Self {
        self.raw.arch = Some(arch);
        self
    }

    /// Set maintainer
    #[must_use]
    pub fn maintainer(mut self, maintainer: impl Into<String>) -> Self {
        self.raw.maintainer = Some(maintainer.into());
        self
    }

    /// Set description
    #[must_use]
    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.raw.description = Some(desc.into());
        self
    }

    /// Set homepage
    #[must_use]
    pub fn homepage(mut self, url: impl Into<String>) -> Self {
        self.raw.homepage = Some(url.into());
        self
    }

    /// Add runtime dependency
    #[must_use]
    pub fn depends_on(mut self, name: impl Into<String>) -> Self {
        self.raw.depends.get_or_insert_with(Vec::new).push(name.into());
        self
    }

    /// Add a virtual package this one provides
    #[must_use]
    pub fn provides(mut self, name: impl Into<String>) -> Self {
        self.raw.provides.get_or_insert_with(Vec::new).push(name.into());
        self
    }

    /// Add a package this one conflicts with
    #[must_use]
    pub fn conflicts_with(mut self, name: impl Into<String>) -> Self {
        self.raw
            .conflicts
            .get_or_insert_with(Vec::new)
            .push(name.into());
        self
    }

    /// Map a source file to an install path relative to the prefix
    #[must_use]
    pub fn file(mut self, source: impl Into<PathBuf>, install_path: impl Into<String>) -> Self {
        self.raw
            .files
            .get_or_insert_with(IndexMap::new)
            .insert(source.into(), install_path.into());
        self
    }

    /// Build the manifest
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest fails validation.
    pub fn build(self) -> Result<Manifest, ManifestError> {
        normalize(self.raw)
    }
}
