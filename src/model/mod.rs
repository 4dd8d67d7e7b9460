//! Output model: one record per page, collected into a manifest.

mod manifest;
mod page;

pub use manifest::Manifest;
pub use page::PageRecord;
