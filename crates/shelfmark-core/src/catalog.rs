//! Batch cataloguing: open, acquire and infer each document in order.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use crate::acquisition::{load_document, TextAcquirer};
use crate::error::{PdfError, Result};
use crate::inference::InferenceEngine;
use crate::models::config::{CatalogConfig, UnreadablePolicy};
use crate::models::Record;
use crate::ocr::load_page_ocr;
use crate::pdf::{DocumentOpener, PdfOpener};

/// A document that could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub path: PathBuf,
    pub error: String,
}

/// Records in input order plus the documents that failed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CatalogReport {
    pub records: Vec<Record>,
    pub failures: Vec<Failure>,
}

impl CatalogReport {
    /// Add the outcome for one document, applying `policy` to failures.
    pub fn push(&mut self, path: &Path, outcome: std::result::Result<Record, PdfError>, policy: UnreadablePolicy) {
        match outcome {
            Ok(record) => self.records.push(record),
            Err(e) => {
                warn!("Unreadable document {}: {}", path.display(), e);
                if policy == UnreadablePolicy::UnknownRow {
                    self.records.push(Record::unknown(path.display().to_string()));
                }
                self.failures.push(Failure {
                    path: path.to_path_buf(),
                    error: e.to_string(),
                });
            }
        }
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Turns PDF paths into catalogue records.
pub struct Cataloguer {
    opener: Box<dyn DocumentOpener>,
    acquirer: TextAcquirer,
    engine: InferenceEngine,
    policy: UnreadablePolicy,
}

impl Cataloguer {
    /// Cataloguer reading PDFs from disk.
    pub fn new(acquirer: TextAcquirer, engine: InferenceEngine) -> Self {
        Self {
            opener: Box::new(PdfOpener),
            acquirer,
            engine,
            policy: UnreadablePolicy::default(),
        }
    }

    /// Build from configuration. An OCR backend that fails to load is
    /// reported and cataloguing continues with embedded text only.
    pub fn from_config(config: &CatalogConfig) -> Result<Self> {
        let engine = InferenceEngine::from_config(config)?;
        // Acquire enough pages for language detection; the engine narrows
        // the other fields back to acquisition.max_pages.
        let mut acquisition = config.acquisition.clone();
        acquisition.max_pages = acquisition.max_pages.max(config.language.max_pages);
        let mut acquirer = TextAcquirer::new(acquisition);

        if config.acquisition.ocr_enabled {
            match load_page_ocr(&config.ocr) {
                Ok(ocr) => acquirer = acquirer.with_ocr(ocr),
                Err(e) => warn!("OCR unavailable, using embedded text only: {}", e),
            }
        }

        Ok(Self::new(acquirer, engine).with_policy(config.batch.on_unreadable))
    }

    pub fn with_opener(mut self, opener: impl DocumentOpener + 'static) -> Self {
        self.opener = Box::new(opener);
        self
    }

    pub fn with_policy(mut self, policy: UnreadablePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> UnreadablePolicy {
        self.policy
    }

    pub fn engine(&self) -> &InferenceEngine {
        &self.engine
    }

    /// Load the document at `path` without inferring anything.
    pub fn load(&self, path: &Path) -> std::result::Result<crate::models::Document, PdfError> {
        load_document(self.opener.as_ref(), &self.acquirer, path)
    }

    /// Catalogue a single document.
    pub fn process_path(&self, path: &Path) -> std::result::Result<Record, PdfError> {
        let document = self.load(path)?;
        Ok(self.engine.infer(&document))
    }

    /// Catalogue `paths` in order. Never aborts on a bad document.
    pub fn build_catalog<P: AsRef<Path>>(&self, paths: impl IntoIterator<Item = P>) -> CatalogReport {
        let mut report = CatalogReport::default();
        for path in paths {
            let path = path.as_ref();
            report.push(path, self.process_path(path), self.policy);
        }

        info!(
            "Catalogued {} documents, {} unreadable",
            report.records.len(),
            report.failures.len()
        );
        report
    }
}
