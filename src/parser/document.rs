//! Source document handle backed by lopdf.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use lopdf::{Document as LopdfDocument, Object, ObjectId};

use crate::detect::{header_version, preflight};
use crate::error::{Error, Result};
use crate::raster::ImageXObject;

use super::resources::collect_page_images;
use super::xobject::read_image_xobject;

/// Maximum length of a chain of indirect references we follow.
const MAX_REFERENCE_DEPTH: usize = 32;

/// An opened PDF.
///
/// The underlying document is owned by this handle and released when it is
/// dropped, so every exit path of a conversion closes it.
pub struct SourceDocument {
    doc: LopdfDocument,
    path: Option<PathBuf>,
    pages: BTreeMap<u32, ObjectId>,
}

impl SourceDocument {
    /// Open a PDF file.
    ///
    /// Fails with [`Error::SourceNotFound`] before reading anything if the
    /// path does not exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let version = preflight(path)?;
        log::debug!("Opening {} (PDF {})", path.display(), version);

        let doc = LopdfDocument::load(path).map_err(|e| match e {
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::from(e),
        })?;
        let mut source = Self::from_document(doc);
        source.path = Some(path.to_path_buf());
        Ok(source)
    }

    /// Open a PDF held in memory.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        header_version(data)?;
        let doc = LopdfDocument::load_mem(data).map_err(|e| match e {
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::from(e),
        })?;
        Ok(Self::from_document(doc))
    }

    pub(crate) fn from_document(doc: LopdfDocument) -> Self {
        if doc.is_encrypted() {
            log::warn!("Document is encrypted; text and images may not be readable");
        }
        let pages = doc.get_pages();
        Self {
            doc,
            path: None,
            pages,
        }
    }

    /// Path the document was opened from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// PDF version from the file header.
    pub fn version(&self) -> &str {
        &self.doc.version
    }

    /// Whether the file carries an `/Encrypt` dictionary.
    pub fn is_encrypted(&self) -> bool {
        self.doc.is_encrypted()
    }

    /// Number of pages.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Plain text of one page, trimmed of surrounding whitespace.
    pub fn page_text(&self, page: u32) -> Result<String> {
        self.page_id(page)?;
        let text = self
            .doc
            .extract_text(&[page])
            .map_err(|e| Error::TextExtract(format!("Page {}: {}", page, e)))?;
        Ok(text.trim().to_string())
    }

    /// Object ids of the images drawn on a page, in the order they appear in
    /// the page resources.
    pub fn page_image_ids(&self, page: u32) -> Result<Vec<ObjectId>> {
        let page_id = self.page_id(page)?;
        collect_page_images(self, page_id)
    }

    /// Read one image XObject.
    pub fn image(&self, id: ObjectId) -> Result<ImageXObject> {
        read_image_xobject(self, id)
    }

    /// Total number of distinct image XObjects across all pages.
    pub fn image_count(&self) -> usize {
        let mut seen = std::collections::HashSet::new();
        for &page_id in self.pages.values() {
            match collect_page_images(self, page_id) {
                Ok(ids) => seen.extend(ids),
                Err(e) => log::debug!("Skipping images of page {:?}: {}", page_id, e),
            }
        }
        seen.len()
    }

    fn page_id(&self, page: u32) -> Result<ObjectId> {
        self.pages
            .get(&page)
            .copied()
            .ok_or(Error::PageOutOfRange(page, self.page_count()))
    }

    /// Borrow the underlying lopdf document.
    pub(crate) fn raw(&self) -> &LopdfDocument {
        &self.doc
    }

    /// Follow indirect references until a direct object is reached.
    pub(crate) fn resolve<'a>(&'a self, mut object: &'a Object) -> Result<&'a Object> {
        for _ in 0..MAX_REFERENCE_DEPTH {
            match object {
                Object::Reference(id) => object = self.doc.get_object(*id)?,
                direct => return Ok(direct),
            }
        }
        Err(Error::PdfParse("reference chain too deep".to_string()))
    }
}

impl std::fmt::Debug for SourceDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceDocument")
            .field("path", &self.path)
            .field("version", &self.doc.version)
            .field("pages", &self.pages.len())
            .finish()
    }
}
