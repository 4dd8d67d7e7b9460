//! The document converter: PDF in, images and a JSON manifest out.
//!
//! A run opens the source, walks the selected pages in order and, for each
//! one, extracts the text and saves every embedded image as a PNG. The page
//! records are then written as `extracted_content.json`.
//!
//! # Example
//!
//! ```no_run
//! use pdfharvest::convert::{ConvertOptions, DocumentConverter};
//!
//! fn main() -> pdfharvest::Result<()> {
//!     let mut converter = DocumentConverter::with_options(ConvertOptions::new().strict());
//!     let report = converter.convert("document.pdf", "output")?;
//!     println!("{} pages, {} images", report.manifest.len(), report.images_written);
//!     Ok(())
//! }
//! ```

mod options;
mod output;

pub use options::{ConvertOptions, ErrorMode, PageSelection};
pub use output::{image_file_name, OutputDir, MANIFEST_FILE_NAME};

use std::fmt;
use std::path::{Path, PathBuf};

use lopdf::ObjectId;

use crate::error::Result;
use crate::model::{Manifest, PageRecord};
use crate::parser::SourceDocument;

/// Where a converter is in its run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// `convert` has not been called yet
    NotStarted,
    /// Opening the source document
    Opening,
    /// Extracting the text of a page
    ExtractingText(u32),
    /// Extracting the images of a page
    ExtractingImages(u32),
    /// Writing the manifest
    WritingManifest,
    /// The run is over and the document released
    Closed,
}

/// An image that could not be saved. The rest of the run is unaffected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFailure {
    /// Page number (1-indexed)
    pub page: u32,
    /// Image number within the page (1-indexed)
    pub index: usize,
    /// Object id of the image stream
    pub xref: ObjectId,
    /// Why the image was skipped
    pub reason: String,
}

impl fmt::Display for ImageFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "page {} image {} ({} {} R): {}",
            self.page, self.index, self.xref.0, self.xref.1, self.reason
        )
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct ConversionReport {
    /// The records written to the manifest
    pub manifest: Manifest,
    /// Path of the manifest file
    pub manifest_path: PathBuf,
    /// Images that were skipped
    pub failures: Vec<ImageFailure>,
    /// Number of PNG files written
    pub images_written: usize,
}

/// Progress after a page has been processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageProgress {
    /// The page just processed (1-indexed)
    pub page: u32,
    /// Pages processed so far, this one included
    pub done: usize,
    /// Pages selected for this run
    pub total: usize,
    /// Images saved from this page
    pub images_saved: usize,
    /// Images skipped on this page
    pub images_failed: usize,
}

/// Converts one PDF at a time into an output directory.
#[derive(Debug)]
pub struct DocumentConverter {
    options: ConvertOptions,
    stage: Stage,
}

impl DocumentConverter {
    /// Create a converter with default options.
    pub fn new() -> Self {
        Self::with_options(ConvertOptions::default())
    }

    /// Create a converter with the given options.
    pub fn with_options(options: ConvertOptions) -> Self {
        Self {
            options,
            stage: Stage::NotStarted,
        }
    }

    /// Options in use.
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Current stage. After `convert` returns, this is [`Stage::Closed`].
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Convert `pdf_path`, writing into `output_dir`.
    ///
    /// The output directory is created (with parents) only once the source
    /// has been opened, so a missing input leaves the filesystem untouched.
    pub fn convert<P, Q>(&mut self, pdf_path: P, output_dir: Q) -> Result<ConversionReport>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        self.convert_with_progress(pdf_path, output_dir, |_| {})
    }

    /// Like [`convert`](Self::convert), calling `on_page` after every page.
    pub fn convert_with_progress<P, Q, F>(
        &mut self,
        pdf_path: P,
        output_dir: Q,
        mut on_page: F,
    ) -> Result<ConversionReport>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
        F: FnMut(&PageProgress),
    {
        let result = self.run(pdf_path.as_ref(), output_dir.as_ref(), &mut on_page);
        if let Err(e) = &result {
            log::debug!("Conversion failed: {}", e);
        }
        self.set_stage(Stage::Closed);
        result
    }

    fn run(
        &mut self,
        pdf_path: &Path,
        output_dir: &Path,
        on_page: &mut dyn FnMut(&PageProgress),
    ) -> Result<ConversionReport> {
        self.set_stage(Stage::Opening);
        let source = SourceDocument::open(pdf_path)?;
        let pages = self.options.pages.resolve(source.page_count())?;
        let output = OutputDir::prepare(output_dir)?;

        log::info!(
            "Processing {} of {} pages from {}",
            pages.len(),
            source.page_count(),
            pdf_path.display()
        );

        let mut manifest = Manifest::new();
        let mut failures = Vec::new();

        for (position, &page) in pages.iter().enumerate() {
            let failed_before = failures.len();
            let record = match self.process_page(&source, &output, page, &mut failures) {
                Ok(record) => record,
                Err(e) => {
                    if self.options.partial_manifest {
                        self.write_partial(&output, &manifest);
                    }
                    return Err(e);
                }
            };

            on_page(&PageProgress {
                page,
                done: position + 1,
                total: pages.len(),
                images_saved: record.images().len(),
                images_failed: failures.len() - failed_before,
            });
            manifest.push(record);
        }

        self.set_stage(Stage::WritingManifest);
        let manifest_path = output.write_manifest(&manifest)?;
        let images_written = manifest.image_count();

        log::info!(
            "Wrote {} pages and {} images to {} ({} images skipped)",
            manifest.len(),
            images_written,
            output.root().display(),
            failures.len()
        );

        Ok(ConversionReport {
            manifest,
            manifest_path,
            failures,
            images_written,
        })
    }

    fn process_page(
        &mut self,
        source: &SourceDocument,
        output: &OutputDir,
        page: u32,
        failures: &mut Vec<ImageFailure>,
    ) -> Result<PageRecord> {
        self.set_stage(Stage::ExtractingText(page));
        let text = match source.page_text(page) {
            Ok(text) => text,
            Err(e) => self.downgrade(page, e)?,
        };

        self.set_stage(Stage::ExtractingImages(page));
        let ids = match source.page_image_ids(page) {
            Ok(ids) => ids,
            Err(e) => self.downgrade(page, e)?,
        };

        let mut images = Vec::with_capacity(ids.len());
        for (i, id) in ids.into_iter().enumerate() {
            let index = i + 1;
            let path = output.image_path(page, index);
            match save_image(source, output, id, &path) {
                Ok(()) => {
                    log::debug!("Saved {}", path.display());
                    images.push(path.to_string_lossy().into_owned());
                }
                Err(e) => {
                    let failure = ImageFailure {
                        page,
                        index,
                        xref: id,
                        reason: e.to_string(),
                    };
                    log::warn!("Could not save {}", failure);
                    failures.push(failure);
                }
            }
        }

        Ok(PageRecord::new(page, text, images))
    }

    /// In lenient mode, turn a page-level failure into an empty value.
    fn downgrade<T: Default>(&self, page: u32, error: crate::Error) -> Result<T> {
        match self.options.error_mode {
            ErrorMode::Strict => Err(error),
            ErrorMode::Lenient => {
                log::warn!("Page {}: {}", page, error);
                Ok(T::default())
            }
        }
    }

    fn write_partial(&mut self, output: &OutputDir, manifest: &Manifest) {
        self.set_stage(Stage::WritingManifest);
        match output.write_manifest(manifest) {
            Ok(path) => log::warn!(
                "Run failed; wrote {} completed pages to {}",
                manifest.len(),
                path.display()
            ),
            Err(e) => log::warn!("Could not write partial manifest: {}", e),
        }
    }

    fn set_stage(&mut self, stage: Stage) {
        if self.stage != stage {
            log::debug!("{:?} -> {:?}", self.stage, stage);
            self.stage = stage;
        }
    }
}

impl Default for DocumentConverter {
    fn default() -> Self {
        Self::new()
    }
}

fn save_image(
    source: &SourceDocument,
    output: &OutputDir,
    id: ObjectId,
    path: &Path,
) -> Result<()> {
    let image = source.image(id)?.decode()?;
    output.write_image(&image, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use tempfile::TempDir;

    #[test]
    fn test_new_converter_not_started() {
        let converter = DocumentConverter::new();
        assert_eq!(converter.stage(), Stage::NotStarted);
        assert_eq!(converter.options().error_mode, ErrorMode::Lenient);
    }

    #[test]
    fn test_missing_source_closes() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("out");
        let mut converter = DocumentConverter::new();

        let err = converter
            .convert(tmp.path().join("missing.pdf"), &out)
            .unwrap_err();
        assert!(matches!(err, Error::SourceNotFound(_)));
        assert_eq!(converter.stage(), Stage::Closed);
        assert!(!out.exists());
    }

    #[test]
    fn test_downgrade_by_mode() {
        let lenient = DocumentConverter::new();
        let text: String = lenient
            .downgrade(1, Error::TextExtract("bad font".into()))
            .unwrap();
        assert!(text.is_empty());

        let strict = DocumentConverter::with_options(ConvertOptions::new().strict());
        let result: Result<String> = strict.downgrade(1, Error::TextExtract("bad font".into()));
        assert!(matches!(result, Err(Error::TextExtract(_))));
    }

    #[test]
    fn test_image_failure_display() {
        let failure = ImageFailure {
            page: 2,
            index: 1,
            xref: (12, 0),
            reason: "Unsupported filter: JBIG2Decode".to_string(),
        };
        assert_eq!(
            failure.to_string(),
            "page 2 image 1 (12 0 R): Unsupported filter: JBIG2Decode"
        );
    }
}
