//! PDF access: opening documents, page text and image XObjects.

mod document;
mod resources;
mod xobject;

pub use document::SourceDocument;
