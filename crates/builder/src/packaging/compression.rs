//! xz compression for the control and data streams

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tcpkg_errors::Error;
use xz2::write::XzEncoder;

/// Writer that xz-compresses everything written into a file
pub type XzFileWriter = XzEncoder<BufWriter<File>>;

/// Create `path` and wrap it in an xz encoder at preset `level`
///
/// # Errors
///
/// Returns an error if the file cannot be created.
pub fn create_xz_writer(path: &Path, level: u32) -> Result<XzFileWriter, Error> {
    let file = File::create(path).map_err(|e| Error::io_with_path(&e, path))?;
    Ok(XzEncoder::new(BufWriter::new(file), level))
}

/// Write the xz footer and flush the file
///
/// # Errors
///
/// Returns an error if the trailing data cannot be written.
pub fn finish_xz_writer(writer: XzFileWriter, path: &Path) -> Result<(), Error> {
    let mut inner = writer.finish().map_err(|e| Error::io_with_path(&e, path))?;
    inner.flush().map_err(|e| Error::io_with_path(&e, path))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::TempDir;
    use xz2::read::XzDecoder;

    #[test]
    fn test_xz_output_decodes() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("blob.xz");

        let mut writer = create_xz_writer(&path, 6).unwrap();
        writer.write_all(b"hello xz").unwrap();
        finish_xz_writer(writer, &path).unwrap();

        let mut decoded = String::new();
        XzDecoder::new(File::open(&path).unwrap())
            .read_to_string(&mut decoded)
            .unwrap();
        assert_eq!(decoded, "hello xz");
    }

    #[test]
    fn test_xz_output_is_deterministic() {
        let temp = TempDir::new().unwrap();
        let first = temp.path().join("a.xz");
        let second = temp.path().join("b.xz");

        for path in [&first, &second] {
            let mut writer = create_xz_writer(path, 6).unwrap();
            writer.write_all(b"same bytes every time").unwrap();
            finish_xz_writer(writer, path).unwrap();
        }

        assert_eq!(std::fs::read(first).unwrap(), std::fs::read(second).unwrap());
    }
}
