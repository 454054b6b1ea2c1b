//! Inference engine: runs every field resolver over one document.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use super::heuristics::Heuristics;
use super::rules::{
    resolve_author, resolve_editor, resolve_language, resolve_publisher, resolve_title, resolve_year,
    Candidate, FrontMatter, LanguageDetector, ScriptDetector,
};
use crate::error::Result;
use crate::models::config::{CatalogConfig, InferenceConfig, LanguageConfig};
use crate::models::{Document, Field, Metadata, Record, Year};

/// Winning candidate for each text field, before conversion to a [`Record`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Inference {
    pub title: Option<Candidate<String>>,
    pub author: Option<Candidate<String>>,
    pub editor: Option<Candidate<String>>,
    pub year: Option<Candidate<Year>>,
    pub publisher: Option<Candidate<String>>,
    pub language: Option<Candidate<String>>,
}

impl Inference {
    /// Build the record, filling misses with `Unknown`.
    pub fn into_record(self, page_count: u32, source_path: impl Into<String>) -> Record {
        Record {
            title: value(self.title),
            author: value(self.author),
            editor: value(self.editor),
            year: value(self.year),
            publisher: value(self.publisher),
            language: value(self.language),
            page_count: Field::from((page_count > 0).then_some(page_count)),
            format: Record::FORMAT,
            source_path: source_path.into(),
        }
    }
}

fn value<T>(candidate: Option<Candidate<T>>) -> Field<T> {
    candidate.map(|c| c.value).into()
}

/// Infers a catalogue record from acquired front matter.
///
/// Holds only immutable state, so one engine can serve any number of
/// documents and threads.
#[derive(Clone)]
pub struct InferenceEngine {
    heuristics: Heuristics,
    /// Leading pages the field rules read; language has its own window.
    front_pages: usize,
    language: LanguageConfig,
    detector: Arc<dyn LanguageDetector>,
}

impl InferenceEngine {
    /// Compile the heuristic vocabularies; uses [`ScriptDetector`] for language.
    pub fn new(inference: &InferenceConfig, language: LanguageConfig) -> Result<Self> {
        let detector = Arc::new(ScriptDetector::new(&language));
        Ok(Self {
            heuristics: Heuristics::new(inference)?,
            front_pages: usize::MAX,
            language,
            detector,
        })
    }

    /// Engine whose field rules read `acquisition.max_pages` pages.
    pub fn from_config(config: &CatalogConfig) -> Result<Self> {
        Ok(Self::new(&config.inference, config.language.clone())?
            .with_front_pages(config.acquisition.max_pages))
    }

    /// Limit the title, people, year and publisher rules to the first
    /// `pages` pages. Language detection still reads up to its own cap.
    pub fn with_front_pages(mut self, pages: usize) -> Self {
        self.front_pages = pages;
        self
    }

    /// Replace the language detector.
    pub fn with_detector(mut self, detector: impl LanguageDetector + 'static) -> Self {
        self.detector = Arc::new(detector);
        self
    }

    pub fn heuristics(&self) -> &Heuristics {
        &self.heuristics
    }

    /// Infer the record for one document. Never fails; misses become `Unknown`.
    pub fn infer(&self, document: &Document) -> Record {
        let record = self
            .explain(&document.metadata, &document.pages)
            .into_record(document.page_count, document.source_path());
        debug!("{}: {}", record.source_path, RecordSummary(&record));
        record
    }

    /// Run every resolver and keep the winning candidates.
    pub fn explain(&self, metadata: &Metadata, pages: &[String]) -> Inference {
        let h = &self.heuristics;
        let front = FrontMatter::new(&pages[..pages.len().min(self.front_pages)]);

        let title = resolve_title(h, &front, metadata);
        let author = resolve_author(h, &front, metadata);
        let editor = resolve_editor(h, &front);
        let year = resolve_year(h, &front);

        let consumed: Vec<usize> = [
            title.as_ref().and_then(|c| c.line),
            author.as_ref().and_then(|c| c.line),
            editor.as_ref().and_then(|c| c.line),
            year.as_ref().and_then(|c| c.line),
        ]
        .into_iter()
        .flatten()
        .collect();
        let publisher = resolve_publisher(h, &front, &consumed);

        let language = resolve_language(self.detector.as_ref(), &self.language, pages);

        Inference {
            title,
            author,
            editor,
            year,
            publisher,
            language,
        }
    }
}

impl fmt::Debug for InferenceEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InferenceEngine")
            .field("heuristics", &self.heuristics)
            .field("front_pages", &self.front_pages)
            .field("language", &self.language)
            .finish_non_exhaustive()
    }
}

struct RecordSummary<'a>(&'a Record);

impl fmt::Display for RecordSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.0;
        write!(
            f,
            "title={:?} author={:?} editor={:?} year={} publisher={:?} language={} pages={}",
            r.title.to_string(),
            r.author.to_string(),
            r.editor.to_string(),
            r.year,
            r.publisher.to_string(),
            r.language,
            r.page_count,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::rules::Rule;
    use pretty_assertions::assert_eq;

    fn engine() -> InferenceEngine {
        InferenceEngine::from_config(&CatalogConfig::default()).unwrap()
    }

    fn document(pages: &[&str], page_count: u32) -> Document {
        Document {
            path: "books/sample.pdf".into(),
            page_count,
            pages: pages.iter().map(|p| p.to_string()).collect(),
            metadata: Metadata::new(),
        }
    }

    #[test]
    fn test_full_front_matter() {
        let doc = document(
            &[
                "THE SILENT SHORE\nA Novel\nBy Margaret Ellis",
                "Edited by Thomas Reed\nFirst published 1987 by Harbor House\nPublished by: Harbor House Books; London\nISBN 9780123456789\nThis edition is printed and bound in the United Kingdom for readers everywhere.",
            ],
            320,
        );

        let record = engine().infer(&doc);

        assert_eq!(record.title, Field::Known("THE SILENT SHORE".to_string()));
        assert_eq!(record.author, Field::Known("Margaret Ellis".to_string()));
        assert_eq!(record.editor, Field::Known("Thomas Reed".to_string()));
        assert_eq!(record.year.known().map(|y| y.value()), Some(1987));
        assert_eq!(record.publisher, Field::Known("Harbor House Books".to_string()));
        assert_eq!(record.language, Field::Known("English".to_string()));
        assert_eq!(record.page_count, Field::Known(320));
        assert_eq!(record.format, "PDF");
        assert_eq!(record.source_path, "books/sample.pdf");
    }

    #[test]
    fn test_empty_document_is_all_unknown() {
        let record = engine().infer(&document(&[], 0));
        assert_eq!(record, Record::unknown("books/sample.pdf"));
    }

    #[test]
    fn test_keyword_publisher_skips_year_line() {
        let inference = engine().explain(
            &Metadata::new(),
            &["River Songs\nCopyright 1998 Example Press\nLantern Books".to_string()],
        );

        assert_eq!(inference.year.as_ref().unwrap().line, Some(1));
        let publisher = inference.publisher.unwrap();
        assert_eq!(publisher.value, "Lantern Books");
        assert_eq!(publisher.rule, Rule::PublisherKeyword);
    }

    #[test]
    fn test_language_reads_past_front_matter_window() {
        let mut pages = vec![String::new(); 8];
        pages.push("By Late Author\nThis late page is written in plain English words for every reader.".to_string());

        let inference = engine().explain(&Metadata::new(), &pages);
        assert_eq!(inference.author, None);
        assert_eq!(inference.language.map(|c| c.value).as_deref(), Some("English"));

        let wide = engine().with_front_pages(9).explain(&Metadata::new(), &pages);
        assert_eq!(wide.author.map(|c| c.value).as_deref(), Some("Late Author"));
    }

    #[test]
    fn test_engine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<InferenceEngine>();
    }
}
