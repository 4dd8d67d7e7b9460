//! # pdfharvest
//!
//! Extract the text and embedded images of a PDF, page by page.
//!
//! A conversion writes every decodable image as `page{N}_image{M}.png` and a
//! manifest, `extracted_content.json`, listing the text and saved image paths
//! of each page.
//!
//! ## Quick Start
//!
//! ```no_run
//! fn main() -> pdfharvest::Result<()> {
//!     let report = pdfharvest::convert_file("document.pdf", "output")?;
//!     for page in &report.manifest {
//!         println!("page {}: {} images", page.page(), page.images().len());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Images**: Flate, LZW, ASCII, run-length and JPEG streams; gray, RGB,
//!   CMYK, ICC-based and indexed color; stencil masks
//! - **Isolation**: an image that cannot be decoded is skipped with a warning
//! - **Page selection**: process a range or list of pages
//! - **Clean re-runs**: outputs of a previous run are removed first

pub mod convert;
pub mod detect;
pub mod error;
pub mod filter;
pub mod model;
pub mod parser;
pub mod raster;

// Re-export commonly used types
pub use convert::{
    ConversionReport, ConvertOptions, DocumentConverter, ErrorMode, ImageFailure, PageProgress,
    PageSelection, Stage, MANIFEST_FILE_NAME,
};
pub use error::{Error, Result};
pub use model::{Manifest, PageRecord};
pub use parser::SourceDocument;
pub use raster::{ColorSpace, ImageXObject};

use std::path::Path;

/// Convert a PDF file with default options.
///
/// # Example
///
/// ```no_run
/// let report = pdfharvest::convert_file("document.pdf", "output").unwrap();
/// println!("Manifest: {}", report.manifest_path.display());
/// ```
pub fn convert_file<P, Q>(pdf_path: P, output_dir: Q) -> Result<ConversionReport>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    DocumentConverter::new().convert(pdf_path, output_dir)
}

/// Convert a PDF file with custom options.
pub fn convert_file_with_options<P, Q>(
    pdf_path: P,
    output_dir: Q,
    options: ConvertOptions,
) -> Result<ConversionReport>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    DocumentConverter::with_options(options).convert(pdf_path, output_dir)
}

/// Open a PDF file for inspection without converting it.
pub fn open<P: AsRef<Path>>(path: P) -> Result<SourceDocument> {
    SourceDocument::open(path)
}

/// Builder for converting PDF documents.
///
/// # Example
///
/// ```no_run
/// use pdfharvest::{Harvest, PageSelection};
///
/// let report = Harvest::new()
///     .strict()
///     .with_pages(PageSelection::Range(1..=5))
///     .convert("document.pdf", "output")?;
/// # Ok::<(), pdfharvest::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Harvest {
    options: ConvertOptions,
}

impl Harvest {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip pages whose text or images cannot be listed.
    pub fn lenient(mut self) -> Self {
        self.options = self.options.lenient();
        self
    }

    /// Fail on the first page that cannot be read.
    pub fn strict(mut self) -> Self {
        self.options = self.options.strict();
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.options = self.options.with_pages(pages);
        self
    }

    /// Write completed pages to the manifest if the run fails.
    pub fn with_partial_manifest(mut self) -> Self {
        self.options = self.options.with_partial_manifest(true);
        self
    }

    /// Run the conversion.
    pub fn convert<P, Q>(self, pdf_path: P, output_dir: Q) -> Result<ConversionReport>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        convert_file_with_options(pdf_path, output_dir, self.options)
    }
}
