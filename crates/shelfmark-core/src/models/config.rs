//! Configuration structures for the cataloguing pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for the shelfmark pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Front-matter text acquisition.
    pub acquisition: AcquisitionConfig,

    /// OCR backend configuration.
    pub ocr: OcrConfig,

    /// Heuristic vocabularies for field inference.
    pub inference: InferenceConfig,

    /// Language detection configuration.
    pub language: LanguageConfig,

    /// Batch behaviour.
    pub batch: BatchConfig,
}

/// Front-matter text acquisition configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AcquisitionConfig {
    /// Number of leading pages treated as front matter.
    pub max_pages: usize,

    /// Pages with fewer trimmed characters than this are OCR candidates.
    pub sparse_text_threshold: usize,

    /// Run OCR on sparse pages.
    pub ocr_enabled: bool,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            max_pages: 8,
            sparse_text_threshold: 40,
            ocr_enabled: false,
        }
    }
}

/// OCR model configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Directory containing model files.
    pub model_dir: PathBuf,

    /// Text detection model file name.
    pub detection_model: String,

    /// Text recognition model file name.
    pub recognition_model: String,

    /// Character dictionary file name.
    pub dictionary: String,

    /// Keep `[UNK]` tokens emitted by the recognizer.
    pub keep_unk: bool,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            detection_model: "det.onnx".to_string(),
            recognition_model: "latin_rec.onnx".to_string(),
            dictionary: "latin_dict.txt".to_string(),
            keep_unk: false,
        }
    }
}

impl OcrConfig {
    /// Get full path to a model file.
    pub fn model_path(&self, model_name: &str) -> PathBuf {
        self.model_dir.join(model_name)
    }

    /// Whether every model file is present on disk.
    pub fn models_present(&self) -> bool {
        [&self.detection_model, &self.recognition_model, &self.dictionary]
            .iter()
            .all(|name| self.model_path(name).is_file())
    }
}

/// Heuristic vocabularies used by the inference engine.
///
/// Entries are plain words or phrases; they are escaped and compiled into
/// case-insensitive patterns when the engine is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Words that disqualify a page-1 line from being the title.
    pub title_exclusions: Vec<String>,

    /// Metadata titles treated as empty.
    pub placeholder_titles: Vec<String>,

    /// Shortest acceptable title, in characters.
    pub min_title_len: usize,

    /// Labels introducing an editor name (`Edited by`, `Editor`).
    pub editor_labels: Vec<String>,

    /// Labels introducing an author name (`Author`, `Written by`).
    pub author_labels: Vec<String>,

    /// Words that, directly before `by`, mean the name is not the author.
    pub author_role_exclusions: Vec<String>,

    /// Honorifics stripped from captured names.
    pub honorifics: Vec<String>,

    /// Markers near which a publication year is expected.
    pub year_markers: Vec<String>,

    /// Labels introducing a publisher name.
    pub publisher_labels: Vec<String>,

    /// Whole words that make a line look like a publisher imprint.
    pub publisher_keywords: Vec<String>,
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            title_exclusions: words(&[
                "by",
                "edited",
                "copyright",
                "©",
                "all rights reserved",
                "isbn",
            ]),
            placeholder_titles: words(&["untitled", "unknown", "untitled document"]),
            min_title_len: 3,
            editor_labels: words(&["edited by", "editors", "editor"]),
            author_labels: words(&["authors", "author"]),
            author_role_exclusions: words(&[
                "edited",
                "published",
                "printed",
                "translated",
                "illustrated",
                "distributed",
                "designed",
                "compiled",
                "typeset",
                "introduced",
                "copyright",
                "©",
            ]),
            honorifics: words(&["dr", "prof", "professor", "ph.d", "phd", "m.d", "md"]),
            year_markers: words(&["©", "copyright", "first published", "published"]),
            publisher_labels: words(&["published by", "publisher", "imprint", "printed by"]),
            publisher_keywords: words(&[
                "press",
                "publications",
                "publishers",
                "university",
                "books",
            ]),
        }
    }
}

/// Language detection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageConfig {
    /// Leading pages sampled for detection. The cataloguer reads this many
    /// pages even when `acquisition.max_pages` is smaller.
    pub max_pages: usize,

    /// Below this many trimmed characters detection is not attempted.
    pub min_text_len: usize,

    /// Characters inspected by the script detector.
    pub sample_chars: usize,

    /// Letters the winning script needs before it is trusted.
    pub min_script_letters: usize,
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            max_pages: 12,
            min_text_len: 40,
            sample_chars: 5000,
            min_script_letters: 20,
        }
    }
}

/// What to emit for a document that cannot be opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnreadablePolicy {
    /// Emit a row with every field `Unknown`.
    #[default]
    UnknownRow,
    /// Leave the document out of the catalogue.
    Skip,
}

/// Batch processing configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Policy for unreadable documents.
    pub on_unreadable: UnreadablePolicy,
}

impl CatalogConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}
