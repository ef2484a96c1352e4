//! `control.tar.xz`: package metadata

use std::fmt::Write as _;
use std::path::Path;
use tcpkg_errors::Error;
use tcpkg_manifest::Manifest;
use tracing::info;

use super::archive::{TarEntry, TarStreamWriter};

/// Name of the single entry in the control stream
pub const CONTROL_ENTRY: &str = "control";

/// Render the dpkg control file for a manifest
///
/// Fields appear in a fixed order. `Homepage` is written only when set and
/// the relationship fields only when their list is non-empty.
pub fn render_control(manifest: &Manifest) -> String {
    let mut control = String::new();
    let mut field = |key: &str, value: &str| {
        // Writing into a String cannot fail
        let _ = writeln!(control, "{key}: {value}");
    };

    field("Package", &manifest.name);
    field("Version", &manifest.version);
    field("Architecture", manifest.arch.as_str());
    field("Maintainer", &manifest.maintainer);
    field("Description", &manifest.description);
    if let Some(homepage) = &manifest.homepage {
        field("Homepage", homepage);
    }
    for (key, values) in [
        ("Depends", &manifest.depends),
        ("Provides", &manifest.provides),
        ("Conflicts", &manifest.conflicts),
    ] {
        if !values.is_empty() {
            field(key, &values.join(","));
        }
    }

    control
}

/// Write the control stream for `manifest` to `path`
///
/// # Errors
///
/// Returns an error if the stream cannot be written.
pub fn write_control_archive(
    manifest: &Manifest,
    path: &Path,
    compression_level: u32,
) -> Result<(), Error> {
    let control = render_control(manifest);

    let mut writer = TarStreamWriter::create(path, compression_level)?;
    writer.append(TarEntry::from_memory(CONTROL_ENTRY, control.as_bytes()))?;
    writer.finish()?;

    info!(
        package = %manifest.name,
        bytes = control.len(),
        "control archive written"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Read;
    use tcpkg_manifest::ManifestBuilder;
    use tcpkg_types::Arch;
    use tempfile::TempDir;
    use xz2::read::XzDecoder;

    #[test]
    fn test_minimal_control_has_defaults_and_no_empty_fields() {
        let manifest = ManifestBuilder::new("hi", "1.0")
            .file("hi.sh", "bin/hi")
            .build()
            .unwrap();

        assert_eq!(
            render_control(&manifest),
            "Package: hi\n\
             Version: 1.0\n\
             Architecture: all\n\
             Maintainer: None\n\
             Description: No description\n"
        );
    }

    #[test]
    fn test_full_control_field_order() {
        let manifest = ManifestBuilder::new("tool", "2.1-3")
            .arch(Arch::Aarch64)
            .maintainer("Jo <jo@example.org>")
            .description("A tool")
            .homepage("https://example.org")
            .depends_on("libc++")
            .depends_on("zlib")
            .provides("tool-bin")
            .conflicts_with("old-tool")
            .conflicts_with("tool-git")
            .build()
            .unwrap();

        assert_eq!(
            render_control(&manifest),
            "Package: tool\n\
             Version: 2.1-3\n\
             Architecture: aarch64\n\
             Maintainer: Jo <jo@example.org>\n\
             Description: A tool\n\
             Homepage: https://example.org\n\
             Depends: libc++,zlib\n\
             Provides: tool-bin\n\
             Conflicts: old-tool,tool-git\n"
        );
    }

    #[test]
    fn test_only_non_empty_lists_are_written() {
        let manifest = ManifestBuilder::new("hi", "1.0")
            .conflicts_with("bye")
            .build()
            .unwrap();
        let control = render_control(&manifest);

        assert!(!control.contains("Depends:"));
        assert!(!control.contains("Provides:"));
        assert!(!control.contains("Homepage:"));
        assert!(control.ends_with("Conflicts: bye\n"));
    }

    #[test]
    fn test_control_archive_entry_size_is_utf8_length() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("control.tar.xz");
        let manifest = ManifestBuilder::new("hi", "1.0")
            .maintainer("Zoë Ångström")
            .build()
            .unwrap();

        write_control_archive(&manifest, &path, 6).unwrap();

        let mut archive = tar::Archive::new(XzDecoder::new(File::open(&path).unwrap()));
        let mut entries = archive.entries().unwrap();
        let mut entry = entries.next().unwrap().unwrap();
        let expected = render_control(&manifest);

        assert_eq!(entry.path().unwrap().to_str(), Some("control"));
        assert_eq!(entry.header().size().unwrap(), expected.len() as u64);
        assert!(expected.len() > expected.chars().count());

        let mut content = String::new();
        entry.read_to_string(&mut content).unwrap();
        assert_eq!(content, expected);
        drop(entry);
        assert!(entries.next().is_none());
    }

    #[test]
    fn test_control_archive_is_reproducible() {
        let temp = TempDir::new().unwrap();
        let manifest = ManifestBuilder::new("hi", "1.0")
            .depends_on("bash")
            .build()
            .unwrap();
        let first = temp.path().join("first.tar.xz");
        let second = temp.path().join("second.tar.xz");

        write_control_archive(&manifest, &first, 6).unwrap();
        write_control_archive(&manifest, &second, 6).unwrap();

        assert_eq!(std::fs::read(first).unwrap(), std::fs::read(second).unwrap());
    }
}
