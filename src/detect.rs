//! Pre-flight checks on the source file.
//!
//! These run before the document is handed to the parser so that a missing
//! or non-PDF input fails fast, without touching the output directory.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";

/// How far into the file the header may start. Some producers prepend junk
/// bytes before `%PDF-`, and readers accept the header anywhere in the first
/// kilobyte.
const HEADER_SEARCH_WINDOW: usize = 1024;

/// Check that `path` exists and looks like a PDF.
///
/// Returns the version string from the header (e.g. `"1.7"`).
///
/// # Errors
/// * [`Error::SourceNotFound`] if the path does not exist or is not a file
/// * [`Error::UnknownFormat`] if no `%PDF-` header is found
/// * [`Error::UnsupportedVersion`] if the header version is malformed
pub fn preflight<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(Error::SourceNotFound(path.to_path_buf()));
    }

    let mut head = Vec::with_capacity(HEADER_SEARCH_WINDOW);
    File::open(path)?
        .take(HEADER_SEARCH_WINDOW as u64)
        .read_to_end(&mut head)?;
    header_version(&head)
}

/// Find the `%PDF-x.y` header in the first bytes of a file.
pub fn header_version(data: &[u8]) -> Result<String> {
    let window = &data[..data.len().min(HEADER_SEARCH_WINDOW)];
    let start = window
        .windows(PDF_MAGIC.len())
        .position(|w| w == PDF_MAGIC)
        .ok_or(Error::UnknownFormat)?;

    let version_bytes = &window[start + PDF_MAGIC.len()..];
    let version_bytes = &version_bytes[..version_bytes.len().min(3)];
    let version = String::from_utf8_lossy(version_bytes).to_string();

    if !is_valid_version(&version) {
        return Err(Error::UnsupportedVersion(version));
    }
    Ok(version)
}

fn is_valid_version(version: &str) -> bool {
    let bytes = version.as_bytes();
    bytes.len() == 3 && bytes[0].is_ascii_digit() && bytes[1] == b'.' && bytes[2].is_ascii_digit()
}
