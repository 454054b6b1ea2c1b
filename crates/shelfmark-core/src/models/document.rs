//! Acquired input document.

use std::collections::BTreeMap;
use std::path::PathBuf;

/// Embedded metadata keyed by lower-cased Info dictionary name (`title`, `author`, ...).
pub type Metadata = BTreeMap<String, String>;

/// One input file after acquisition: front-matter text plus embedded metadata.
#[derive(Debug, Clone, Default)]
pub struct Document {
    /// Path of the source file.
    pub path: PathBuf,
    /// Total number of pages in the file.
    pub page_count: u32,
    /// Front-matter page text, in physical page order.
    pub pages: Vec<String>,
    /// Embedded metadata (may be empty).
    pub metadata: Metadata,
}

impl Document {
    /// Source path as written into the record.
    pub fn source_path(&self) -> String {
        self.path.display().to_string()
    }
}
