//! The JSON manifest written at the end of a run.

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use super::PageRecord;
use crate::error::Result;

/// Indentation used when writing the manifest.
const INDENT: &[u8] = b"    ";

/// Ordered page records, serialized as a JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Manifest {
    pages: Vec<PageRecord>,
}

impl Manifest {
    /// Create an empty manifest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the record for the next page.
    pub fn push(&mut self, record: PageRecord) {
        self.pages.push(record);
    }

    /// Number of page records.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Whether no page has been recorded.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// All records in page order.
    pub fn pages(&self) -> &[PageRecord] {
        &self.pages
    }

    /// Iterate over the records in page order.
    pub fn iter(&self) -> std::slice::Iter<'_, PageRecord> {
        self.pages.iter()
    }

    /// Total number of image paths across all pages.
    pub fn image_count(&self) -> usize {
        self.pages.iter().map(|p| p.images().len()).sum()
    }

    /// Pretty-printed JSON with 4-space indentation.
    pub fn to_json(&self) -> Result<String> {
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(INDENT);
        let mut serializer = Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut serializer)?;
        // serde_json only ever emits UTF-8
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

impl From<Vec<PageRecord>> for Manifest {
    fn from(pages: Vec<PageRecord>) -> Self {
        Self { pages }
    }
}

impl<'a> IntoIterator for &'a Manifest {
    type Item = &'a PageRecord;
    type IntoIter = std::slice::Iter<'a, PageRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
