//! Options controlling a conversion run.

use std::ops::RangeInclusive;

use crate::error::{Error, Result};

/// Options for a conversion run.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// What to do when a page's text cannot be extracted
    pub error_mode: ErrorMode,

    /// Which pages to process
    pub pages: PageSelection,

    /// Write the records of completed pages when the run fails part way
    pub partial_manifest: bool,
}

impl ConvertOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Downgrade text extraction failures to warnings.
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Abort the run on a text extraction failure.
    pub fn strict(mut self) -> Self {
        self.error_mode = ErrorMode::Strict;
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, selection: PageSelection) -> Self {
        self.pages = selection;
        self
    }

    /// Enable or disable writing a partial manifest on failure.
    pub fn with_partial_manifest(mut self, enabled: bool) -> Self {
        self.partial_manifest = enabled;
        self
    }
}

/// How text extraction failures are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail the run
    Strict,
    /// Record empty text and continue
    #[default]
    Lenient,
}

/// Pages to process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageSelection {
    /// Every page
    #[default]
    All,
    /// A range of pages (inclusive, 1-indexed)
    Range(RangeInclusive<u32>),
    /// Specific pages (1-indexed)
    Pages(Vec<u32>),
    /// A list of ranges, as parsed from "1,3,5-7"; kept unexpanded
    Ranges(Vec<RangeInclusive<u32>>),
}

impl PageSelection {
    /// Check if a page number should be included.
    pub fn includes(&self, page: u32) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page),
            PageSelection::Pages(pages) => pages.contains(&page),
            PageSelection::Ranges(ranges) => ranges.iter().any(|r| r.contains(&page)),
        }
    }

    /// Parse a page selection string (e.g., "all", "1-10", "1,3,5,7-10").
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();

        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(PageSelection::All);
        }

        if !s.contains(',') {
            if let Some((start, end)) = s.split_once('-') {
                let start = parse_page(start, s)?;
                let end = parse_page(end, s)?;
                if start > end {
                    return Err(Error::InvalidPageRange(format!(
                        "{}: start is after end",
                        s
                    )));
                }
                return Ok(PageSelection::Range(start..=end));
            }
        }

        let mut ranges = Vec::new();
        for part in s.split(',') {
            let part = part.trim();
            let (start, end) = match part.split_once('-') {
                Some((start, end)) => (parse_page(start, s)?, parse_page(end, s)?),
                None => {
                    let page = parse_page(part, s)?;
                    (page, page)
                }
            };
            if start > end {
                return Err(Error::InvalidPageRange(format!(
                    "{}: start is after end",
                    part
                )));
            }
            ranges.push(start..=end);
        }

        ranges.sort_unstable_by_key(|r| (*r.start(), *r.end()));
        Ok(PageSelection::Ranges(ranges))
    }

    /// The selected page numbers for a document with `page_count` pages, in
    /// ascending order.
    ///
    /// Fails with [`Error::PageOutOfRange`] if the selection names a page the
    /// document does not have.
    pub fn resolve(&self, page_count: u32) -> Result<Vec<u32>> {
        let out_of_range = |page: u32| Error::PageOutOfRange(page, page_count);
        match self {
            PageSelection::All => Ok((1..=page_count).collect()),
            PageSelection::Range(range) => {
                if *range.end() > page_count {
                    return Err(out_of_range(*range.end()));
                }
                Ok(range.clone().collect())
            }
            PageSelection::Pages(pages) => match pages.iter().find(|&&p| p > page_count) {
                Some(&page) => Err(out_of_range(page)),
                None => Ok(pages.clone()),
            },
            PageSelection::Ranges(ranges) => match ranges.iter().find(|r| *r.end() > page_count) {
                Some(range) => Err(out_of_range(*range.end())),
                None => Ok((1..=page_count).filter(|&p| self.includes(p)).collect()),
            },
        }
    }
}

fn parse_page(value: &str, selection: &str) -> Result<u32> {
    match value.trim().parse::<u32>() {
        Ok(0) => Err(Error::InvalidPageRange(format!(
            "{}: pages are numbered from 1",
            selection
        ))),
        Ok(page) => Ok(page),
        Err(_) => Err(Error::InvalidPageRange(format!(
            "{}: '{}' is not a page number",
            selection,
            value.trim()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_options_builder() {
        let options = ConvertOptions::new()
            .strict()
            .with_pages(PageSelection::Range(2..=3))
            .with_partial_manifest(true);

        assert_eq!(options.error_mode, ErrorMode::Strict);
        assert_eq!(options.pages, PageSelection::Range(2..=3));
        assert!(options.partial_manifest);
    }

    #[test]
    fn test_defaults() {
        let options = ConvertOptions::default();
        assert_eq!(options.error_mode, ErrorMode::Lenient);
        assert_eq!(options.pages, PageSelection::All);
        assert!(!options.partial_manifest);
    }

    #[test]
    fn test_page_selection_includes() {
        let all = PageSelection::All;
        assert!(all.includes(1));
        assert!(all.includes(100));

        let range = PageSelection::Range(5..=10);
        assert!(!range.includes(4));
        assert!(range.includes(5));
        assert!(range.includes(10));
        assert!(!range.includes(11));

        let pages = PageSelection::Pages(vec![1, 3, 5]);
        assert!(pages.includes(3));
        assert!(!pages.includes(2));

        let ranges = PageSelection::Ranges(vec![1..=1, 4..=6]);
        assert!(ranges.includes(5));
        assert!(!ranges.includes(3));
    }

    #[test]
    fn test_page_selection_parse() {
        assert_eq!(PageSelection::parse("all").unwrap(), PageSelection::All);
        assert_eq!(PageSelection::parse(" ").unwrap(), PageSelection::All);
        assert_eq!(
            PageSelection::parse("1-10").unwrap(),
            PageSelection::Range(1..=10)
        );
        assert_eq!(
            PageSelection::parse("5,1,3-4,3").unwrap(),
            PageSelection::Ranges(vec![1..=1, 3..=3, 3..=4, 5..=5])
        );
    }

    #[test]
    fn test_wide_ranges_stay_unexpanded() {
        let selection = PageSelection::parse("1,1-4000000000").unwrap();
        assert_eq!(
            selection,
            PageSelection::Ranges(vec![1..=1, 1..=4_000_000_000])
        );
        assert!(selection.includes(3_999_999_999));
        assert!(matches!(
            selection.resolve(10),
            Err(Error::PageOutOfRange(4_000_000_000, 10))
        ));
    }

    #[test]
    fn test_page_selection_parse_errors() {
        for bad in ["0", "x", "3-1", "1,0-2", "1-"] {
            assert!(
                matches!(PageSelection::parse(bad), Err(Error::InvalidPageRange(_))),
                "{} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_resolve() {
        assert_eq!(PageSelection::All.resolve(3).unwrap(), vec![1, 2, 3]);
        assert!(PageSelection::All.resolve(0).unwrap().is_empty());
        assert_eq!(
            PageSelection::Range(2..=3).resolve(3).unwrap(),
            vec![2, 3]
        );
        assert!(matches!(
            PageSelection::Range(2..=4).resolve(3),
            Err(Error::PageOutOfRange(4, 3))
        ));
        assert!(matches!(
            PageSelection::Pages(vec![1, 9]).resolve(3),
            Err(Error::PageOutOfRange(9, 3))
        ));
        assert_eq!(
            PageSelection::parse("5,1,3-4,3").unwrap().resolve(6).unwrap(),
            vec![1, 3, 4, 5]
        );
    }
}
