//! Data models and configuration.

pub mod config;
pub mod document;
pub mod record;

pub use config::{
    AcquisitionConfig, BatchConfig, CatalogConfig, InferenceConfig, LanguageConfig, OcrConfig,
    UnreadablePolicy,
};
pub use document::{Document, Metadata};
pub use record::{Field, Record, Year, UNKNOWN};
