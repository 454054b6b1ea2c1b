//! Heuristic vocabularies compiled into matchers.

use regex::Regex;

use crate::error::CatalogError;
use crate::models::config::InferenceConfig;

/// Immutable matchers built once from an [`InferenceConfig`].
#[derive(Debug, Clone)]
pub struct Heuristics {
    pub(crate) title_exclusion: Option<Regex>,
    pub(crate) placeholder_titles: Vec<String>,
    pub(crate) min_title_len: usize,
    pub(crate) editor_labels: Vec<Regex>,
    pub(crate) author_by: Regex,
    pub(crate) author_labels: Vec<Regex>,
    pub(crate) author_role_exclusions: Vec<String>,
    pub(crate) honorific: Option<Regex>,
    pub(crate) year_marker: Option<Regex>,
    pub(crate) publisher_label: Option<Regex>,
    pub(crate) publisher_keyword: Option<Regex>,
}

impl Heuristics {
    pub fn new(config: &InferenceConfig) -> Result<Self, CatalogError> {
        let labels = |terms: &[String]| -> Result<Vec<Regex>, CatalogError> {
            terms
                .iter()
                .filter(|t| !t.trim().is_empty())
                .map(|t| label_regex(std::slice::from_ref(t)))
                .collect()
        };

        Ok(Self {
            title_exclusion: any_term_regex(&config.title_exclusions, "")?,
            placeholder_titles: lowercase(&config.placeholder_titles),
            min_title_len: config.min_title_len,
            editor_labels: labels(&config.editor_labels)?,
            author_by: label_regex(&["by".to_string()])?,
            author_labels: labels(&config.author_labels)?,
            author_role_exclusions: lowercase(&config.author_role_exclusions),
            honorific: any_term_regex(&config.honorifics, r"\.?")?,
            year_marker: any_term_regex(&config.year_markers, "")?,
            publisher_label: if config.publisher_labels.iter().all(|t| t.trim().is_empty()) {
                None
            } else {
                Some(label_regex(&config.publisher_labels)?)
            },
            publisher_keyword: any_term_regex(&config.publisher_keywords, "")?,
        })
    }
}

fn lowercase(terms: &[String]) -> Vec<String> {
    terms
        .iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Pattern for one term: inner spaces match any whitespace, and word
/// boundaries are added only where the term starts or ends with a word char.
fn term_pattern(term: &str) -> Option<String> {
    let term = term.trim();
    let first = term.chars().next()?;
    let last = term.chars().last()?;

    let body = term
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+");

    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    Some(format!(
        "{}{}{}",
        if is_word(first) { r"\b" } else { "" },
        body,
        if is_word(last) { r"\b" } else { "" },
    ))
}

fn alternation(terms: &[String]) -> Option<String> {
    let parts: Vec<String> = terms.iter().filter_map(|t| term_pattern(t)).collect();
    (!parts.is_empty()).then(|| parts.join("|"))
}

fn compile(pattern: &str) -> Result<Regex, CatalogError> {
    Regex::new(pattern).map_err(|e| CatalogError::Config(format!("invalid heuristic pattern: {}", e)))
}

/// Case-insensitive "any of these terms"; `None` for an empty list.
fn any_term_regex(terms: &[String], suffix: &str) -> Result<Option<Regex>, CatalogError> {
    alternation(terms)
        .map(|alt| compile(&format!("(?i)(?:{}){}", alt, suffix)))
        .transpose()
}

/// Label followed by an optional colon; capture group 1 is the rest of the line.
fn label_regex(terms: &[String]) -> Result<Regex, CatalogError> {
    let alt = alternation(terms)
        .ok_or_else(|| CatalogError::Config("empty label list".to_string()))?;
    compile(&format!(r"(?i)(?:{})\s*:?\s*(.*)$", alt))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_term_boundaries() {
        let re = any_term_regex(&["by".to_string(), "©".to_string()], "")
            .unwrap()
            .unwrap();
        assert!(re.is_match("Written BY her"));
        assert!(re.is_match("©2001"));
        assert!(!re.is_match("Abby Road"));
    }

    #[test]
    fn test_label_captures_rest() {
        let re = label_regex(&["published by".to_string()]).unwrap();
        let caps = re.captures("First Published  by: Example Press").unwrap();
        assert_eq!(&caps[1], "Example Press");
    }

    #[test]
    fn test_empty_lists_compile_to_nothing() {
        let config = InferenceConfig {
            title_exclusions: vec![],
            publisher_keywords: vec![" ".to_string()],
            publisher_labels: vec![],
            ..InferenceConfig::default()
        };
        let heuristics = Heuristics::new(&config).unwrap();
        assert!(heuristics.title_exclusion.is_none());
        assert!(heuristics.publisher_keyword.is_none());
        assert!(heuristics.publisher_label.is_none());
    }
}
