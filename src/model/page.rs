//! Page-level types.

use serde::Serialize;

/// What was extracted from a single page.
///
/// Serializes with keys in the order `page`, `text`, `images`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRecord {
    page: u32,
    text: String,
    images: Vec<String>,
}

impl PageRecord {
    /// Create a record for page `page` (1-indexed).
    pub fn new(page: u32, text: impl Into<String>, images: Vec<String>) -> Self {
        Self {
            page,
            text: text.into(),
            images,
        }
    }

    /// Page number (1-indexed).
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Plain text of the page.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Paths of the images saved for this page.
    pub fn images(&self) -> &[String] {
        &self.images
    }
}
