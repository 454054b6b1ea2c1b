//! Core library for cataloguing PDF books.
//!
//! This crate provides:
//! - PDF access (page text, embedded metadata, page images)
//! - Front-matter acquisition with optional OCR for scanned pages
//! - Heuristic inference of title, author, editor, year, publisher and language
//! - Batch cataloguing with a fail-soft `Unknown` value for every field

pub mod acquisition;
pub mod catalog;
pub mod error;
pub mod inference;
pub mod models;
pub mod ocr;
pub mod pdf;

pub use acquisition::TextAcquirer;
pub use catalog::{CatalogReport, Cataloguer, Failure};
pub use error::{CatalogError, DetectionError, OcrError, PdfError, Result};
pub use inference::{Inference, InferenceEngine, LanguageDetector, Rule, ScriptDetector};
pub use models::{CatalogConfig, Document, Field, Metadata, Record, UnreadablePolicy, Year, UNKNOWN};
pub use ocr::{load_page_ocr, PageOcr};
pub use pdf::{DocumentOpener, PageSource, PdfExtractor, PdfOpener};
