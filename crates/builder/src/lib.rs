#![deny(clippy::pedantic, unsafe_code)]
//! Debian package building for termux-create-package
//!
//! This crate turns a normalized manifest into a `.deb`: it writes the
//! `debian-binary` marker, the xz-compressed control and data tar streams,
//! and hands the three members to a [`MemberCombiner`].

mod packaging;

pub use packaging::archive::{canonical_entry_path, EntrySource, TarEntry, TarStreamWriter};
pub use packaging::container::{
    assemble_container, write_format_marker, ContainerMembers, CONTROL_ARCHIVE, DATA_ARCHIVE,
    DEBIAN_BINARY, FORMAT_VERSION,
};
pub use packaging::control::{render_control, write_control_archive, CONTROL_ENTRY};
pub use packaging::create_deb_package;
pub use packaging::data::{normalize_prefix, target_path, write_data_archive, PayloadSummary};

use tcpkg_config::Config;
use tcpkg_errors::Error;
use tcpkg_manifest::Manifest;
use tcpkg_platform::{ArCommandCombiner, BuiltinArCombiner, MemberCombiner};
use tcpkg_types::{BuildReport, CombinerKind};

/// The combiner selected by `config`
pub fn combiner_for(config: &Config) -> Box<dyn MemberCombiner> {
    match config.combiner {
        CombinerKind::External => Box::new(ArCommandCombiner::new(config.ar_program.clone())),
        CombinerKind::Builtin => Box::new(BuiltinArCombiner),
    }
}

/// Build the package described by `manifest` with the configured combiner
///
/// # Errors
///
/// Returns an error if any build step fails; see [`create_deb_package`].
pub fn build_package(config: &Config, manifest: &Manifest) -> Result<BuildReport, Error> {
    let combiner = combiner_for(config);
    create_deb_package(config, manifest, combiner.as_ref())
}
