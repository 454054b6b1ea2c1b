//! Front-matter text acquisition: embedded text first, OCR for sparse pages.

use std::path::Path;

use tracing::{debug, trace, warn};

use crate::error::PdfError;
use crate::models::config::AcquisitionConfig;
use crate::models::Document;
use crate::ocr::PageOcr;
use crate::pdf::{DocumentOpener, PageSource};

/// Reads the leading pages of a document into per-page text.
pub struct TextAcquirer {
    config: AcquisitionConfig,
    ocr: Option<Box<dyn PageOcr>>,
}

impl TextAcquirer {
    /// Create an acquirer without an OCR backend.
    pub fn new(config: AcquisitionConfig) -> Self {
        Self { config, ocr: None }
    }

    /// Set the OCR backend used for sparse pages.
    pub fn with_ocr(mut self, ocr: Box<dyn PageOcr>) -> Self {
        self.ocr = Some(ocr);
        self
    }

    pub fn config(&self) -> &AcquisitionConfig {
        &self.config
    }

    /// Acquire front matter using the configured page cap and OCR switch.
    pub fn acquire(&self, source: &dyn PageSource) -> Vec<String> {
        self.acquire_pages(source, self.config.max_pages, self.config.ocr_enabled)
    }

    /// Acquire text for at most `max_pages` leading pages.
    ///
    /// A page that fails to extract yields an empty string. With `ocr_enabled`
    /// a page whose trimmed text is shorter than the sparse threshold is
    /// replaced by OCR output when recognition succeeds with non-empty text.
    pub fn acquire_pages(
        &self,
        source: &dyn PageSource,
        max_pages: usize,
        ocr_enabled: bool,
    ) -> Vec<String> {
        let page_count = (source.page_count() as usize).min(max_pages);
        let ocr = if ocr_enabled {
            if self.ocr.is_none() {
                debug!("OCR requested but no OCR backend is configured");
            }
            self.ocr.as_deref()
        } else {
            None
        };

        (1..=page_count as u32)
            .map(|page| {
                let text = source.page_text(page).unwrap_or_else(|e| {
                    warn!("Page {}: {}; treating as empty", page, e);
                    String::new()
                });

                match ocr {
                    Some(ocr) if text.trim().chars().count() < self.config.sparse_text_threshold => {
                        ocr_page(source, ocr, page).unwrap_or(text)
                    }
                    _ => text,
                }
            })
            .collect()
    }
}

fn ocr_page(source: &dyn PageSource, ocr: &dyn PageOcr, page: u32) -> Option<String> {
    let image = match source.page_image(page) {
        Ok(image) => image,
        Err(e) => {
            debug!("Page {}: no image for OCR ({})", page, e);
            return None;
        }
    };

    match ocr.recognize(&image) {
        Ok(text) if !text.trim().is_empty() => {
            trace!("Page {}: OCR produced {} chars", page, text.len());
            Some(text)
        }
        Ok(_) => None,
        Err(e) => {
            warn!("Page {}: OCR failed: {}", page, e);
            None
        }
    }
}

/// Open `path` and acquire its front matter into a [`Document`].
pub fn load_document(
    opener: &dyn DocumentOpener,
    acquirer: &TextAcquirer,
    path: &Path,
) -> Result<Document, PdfError> {
    let source = opener.open(path)?;
    let pages = acquirer.acquire(source.as_ref());

    Ok(Document {
        path: path.to_path_buf(),
        page_count: source.page_count(),
        pages,
        metadata: source.metadata(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OcrError;
    use crate::models::Metadata;
    use image::DynamicImage;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Pages given as `Some(text)`; `None` fails to extract.
    struct FakeSource {
        pages: Vec<Option<&'static str>>,
    }

    impl PageSource for FakeSource {
        fn page_count(&self) -> u32 {
            self.pages.len() as u32
        }

        fn metadata(&self) -> Metadata {
            Metadata::new()
        }

        fn page_text(&self, page: u32) -> crate::pdf::Result<String> {
            self.pages[page as usize - 1]
                .map(str::to_string)
                .ok_or(PdfError::TextExtraction {
                    page,
                    reason: "corrupt stream".to_string(),
                })
        }

        fn page_image(&self, _page: u32) -> crate::pdf::Result<DynamicImage> {
            Ok(DynamicImage::new_rgb8(4, 4))
        }
    }

    /// Text-only pages with nothing to render.
    struct VectorSource;

    impl PageSource for VectorSource {
        fn page_count(&self) -> u32 {
            1
        }

        fn metadata(&self) -> Metadata {
            Metadata::new()
        }

        fn page_text(&self, _page: u32) -> crate::pdf::Result<String> {
            Ok("tiny".to_string())
        }

        fn page_image(&self, page: u32) -> crate::pdf::Result<DynamicImage> {
            Err(PdfError::NoPageImage(page))
        }
    }

    struct FakeOcr {
        calls: Rc<Cell<usize>>,
        output: Result<&'static str, ()>,
    }

    impl PageOcr for FakeOcr {
        fn recognize(&self, _image: &DynamicImage) -> Result<String, OcrError> {
            self.calls.set(self.calls.get() + 1);
            self.output
                .map(str::to_string)
                .map_err(|_| OcrError::Recognition("engine crashed".to_string()))
        }
    }

    fn acquirer_with_ocr(output: Result<&'static str, ()>) -> (TextAcquirer, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        let acquirer = TextAcquirer::new(AcquisitionConfig::default()).with_ocr(Box::new(FakeOcr {
            calls: calls.clone(),
            output,
        }));
        (acquirer, calls)
    }

    #[test]
    fn test_bad_page_becomes_empty() {
        let source = FakeSource {
            pages: vec![Some("A Title"), None, Some("Copyright 1998")],
        };
        let acquirer = TextAcquirer::new(AcquisitionConfig::default());

        let pages = acquirer.acquire(&source);
        assert_eq!(pages, vec!["A Title", "", "Copyright 1998"]);
    }

    #[test]
    fn test_page_cap() {
        let source = FakeSource {
            pages: vec![Some("one"), Some("two"), Some("three")],
        };
        let acquirer = TextAcquirer::new(AcquisitionConfig::default());

        assert_eq!(acquirer.acquire_pages(&source, 2, false), vec!["one", "two"]);
        assert!(acquirer.acquire_pages(&source, 0, false).is_empty());
    }

    #[test]
    fn test_ocr_replaces_sparse_pages_only() {
        let long = "This page carries plenty of embedded text to stay as it is.";
        let source = FakeSource {
            pages: vec![Some(""), Some(long)],
        };
        let (acquirer, calls) = acquirer_with_ocr(Ok("Scanned Title"));

        let pages = acquirer.acquire_pages(&source, 8, true);
        assert_eq!(pages, vec!["Scanned Title", long]);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_ocr_disabled_is_never_called() {
        let source = FakeSource {
            pages: vec![Some(""), None],
        };
        let (acquirer, calls) = acquirer_with_ocr(Ok("Scanned Title"));

        let pages = acquirer.acquire_pages(&source, 8, false);
        assert_eq!(pages, vec!["", ""]);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_ocr_failure_keeps_embedded_text() {
        let source = FakeSource {
            pages: vec![Some("tiny")],
        };
        let (acquirer, calls) = acquirer_with_ocr(Err(()));

        assert_eq!(acquirer.acquire_pages(&source, 8, true), vec!["tiny"]);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_page_without_image_keeps_embedded_text() {
        let (acquirer, calls) = acquirer_with_ocr(Ok("Scanned Title"));

        assert_eq!(acquirer.acquire_pages(&VectorSource, 8, true), vec!["tiny"]);
        assert_eq!(calls.get(), 0);
    }
}
