//! PDF processing module.

mod extractor;

pub use extractor::PdfExtractor;

use std::path::Path;

use image::DynamicImage;
use tracing::debug;

use crate::error::PdfError;
use crate::models::Metadata;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Page-level access to a loaded document. Page numbers are 1-indexed.
pub trait PageSource {
    /// Get the number of pages in the document.
    fn page_count(&self) -> u32;

    /// Embedded metadata, keyed by lower-cased Info dictionary name.
    fn metadata(&self) -> Metadata;

    /// Extract embedded text from a specific page.
    fn page_text(&self, page: u32) -> Result<String>;

    /// Produce an image of a page for OCR.
    fn page_image(&self, page: u32) -> Result<DynamicImage>;
}

/// Opens a path into a [`PageSource`].
pub trait DocumentOpener {
    fn open(&self, path: &Path) -> Result<Box<dyn PageSource>>;
}

/// Opens PDF files from disk with [`PdfExtractor`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfOpener;

impl DocumentOpener for PdfOpener {
    fn open(&self, path: &Path) -> Result<Box<dyn PageSource>> {
        let data = std::fs::read(path).map_err(|source| PdfError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let mut extractor = PdfExtractor::new();
        extractor.load(&data)?;
        debug!("Opened {} ({} pages)", path.display(), extractor.page_count());
        Ok(Box::new(extractor))
    }
}
