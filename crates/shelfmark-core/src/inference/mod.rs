//! Bibliographic field inference.

mod engine;
pub mod heuristics;
pub mod rules;

pub use engine::{Inference, InferenceEngine};
pub use heuristics::Heuristics;
pub use rules::{display_name, Candidate, FrontMatter, LanguageDetector, Rule, ScriptDetector};
