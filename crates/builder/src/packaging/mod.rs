//! Packaging module for the control stream, payload stream and container

pub mod archive;
pub mod compression;
pub mod container;
pub mod control;
pub mod data;

use self::container::{assemble_container, write_format_marker, ContainerMembers};
use self::control::write_control_archive;
use self::data::write_data_archive;
use tcpkg_config::Config;
use tcpkg_errors::Error;
use tcpkg_manifest::Manifest;
use tcpkg_platform::MemberCombiner;
use tcpkg_types::BuildReport;
use tracing::{info, warn};

/// Build the `.deb` for `manifest` into `config.output_dir`
///
/// The members are prepared in a private temporary directory that is
/// removed when this function returns, whether or not the build succeeded.
///
/// # Errors
///
/// Returns an error if:
/// - The temporary or output directory cannot be created
/// - A source file listed in the manifest is missing or unreadable
/// - Writing either tar stream fails
/// - Combining the members fails
pub fn create_deb_package(
    config: &Config,
    manifest: &Manifest,
    combiner: &dyn MemberCombiner,
) -> Result<BuildReport, Error> {
    std::fs::create_dir_all(&config.output_dir)
        .map_err(|e| Error::io_with_path(&e, &config.output_dir))?;
    let output_path = config.output_dir.join(manifest.package_file_name());

    let work_dir = tempfile::Builder::new()
        .prefix("tcpkg-")
        .tempdir()
        .map_err(Error::from)?;
    let members = ContainerMembers::in_dir(work_dir.path());
    info!(
        package = %manifest.name,
        version = %manifest.version,
        work_dir = %work_dir.path().display(),
        "building package"
    );

    // Step 1: format marker
    write_format_marker(&members.debian_binary)?;

    // Step 2: control stream
    write_control_archive(manifest, &members.control, config.compression_level)?;

    // Step 3: payload stream
    let payload = write_data_archive(
        &config.prefix,
        &manifest.files,
        &members.data,
        config.compression_level,
    )?;

    // Step 4: container
    let archive_size = assemble_container(combiner, &members, &output_path)?;

    // Step 5: cleanup; the package is complete, so a leftover temp dir only warrants a warning
    let work_path = work_dir.path().to_path_buf();
    if let Err(e) = work_dir.close() {
        warn!(work_dir = %work_path.display(), error = %e, "failed to remove work directory");
    }

    Ok(BuildReport {
        package: manifest.name.clone(),
        version: manifest.version.clone(),
        output_path,
        payload_entries: payload.entries,
        payload_bytes: payload.bytes,
        archive_size,
    })
}
