//! Error types for pdfharvest.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pdfharvest operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while converting a PDF.
///
/// Whether an error is fatal depends on where it happens: anything raised
/// while opening the document or writing the manifest aborts the run, while
/// image decode and save errors are downgraded to per-image warnings by the
/// converter.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The source file does not exist.
    #[error("Source file not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// The file does not start with a PDF header.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF header carries a version string we do not recognize.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted.
    #[error("Document is encrypted")]
    Encrypted,

    /// Error extracting text content.
    #[error("Text extraction error: {0}")]
    TextExtract(String),

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// Invalid page range specification.
    #[error("Invalid page range: {0}")]
    InvalidPageRange(String),

    /// A stream filter failed to decode its input.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The image uses a filter we cannot decode.
    #[error("Unsupported filter: {0}")]
    UnsupportedFilter(String),

    /// The image uses a color space we cannot convert.
    #[error("Unsupported color space: {0}")]
    UnsupportedColorSpace(String),

    /// The decoded pixels could not be turned into a PNG.
    #[error("Image encoding error: {0}")]
    ImageEncode(String),

    /// The manifest could not be serialized.
    #[error("Manifest error: {0}")]
    Manifest(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(e) => Error::Io(e),
            image::ImageError::Decoding(e) => Error::Decode(e.to_string()),
            other => Error::ImageEncode(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Manifest(err.to_string())
    }
}
