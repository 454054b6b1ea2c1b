//! Rule chains for each catalogue field.
//!
//! Every field is resolved by an ordered list of rules; the first rule that
//! yields a validated [`Candidate`] wins and later rules are not consulted.

pub mod language;
pub mod patterns;
pub mod people;
pub mod publisher;
pub mod title;
pub mod year;

pub use language::{display_name, resolve_language, LanguageDetector, ScriptDetector};
pub use people::{clean_name, resolve_author, resolve_editor};
pub use publisher::resolve_publisher;
pub use title::resolve_title;
pub use year::{resolve_year, year_tokens};

use serde::Serialize;

/// Which rule produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    MetadataTitle,
    FirstPageLine,
    EditorLabel,
    AuthorBy,
    AuthorLabel,
    MetadataAuthor,
    YearNearMarker,
    FirstYearToken,
    PublisherLabel,
    PublisherKeyword,
    DetectedLanguage,
}

impl Rule {
    pub fn as_str(self) -> &'static str {
        match self {
            Rule::MetadataTitle => "metadata_title",
            Rule::FirstPageLine => "first_page_line",
            Rule::EditorLabel => "editor_label",
            Rule::AuthorBy => "author_by",
            Rule::AuthorLabel => "author_label",
            Rule::MetadataAuthor => "metadata_author",
            Rule::YearNearMarker => "year_near_marker",
            Rule::FirstYearToken => "first_year_token",
            Rule::PublisherLabel => "publisher_label",
            Rule::PublisherKeyword => "publisher_keyword",
            Rule::DetectedLanguage => "detected_language",
        }
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value proposed by one rule, with where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate<T> {
    /// Proposed value, already validated.
    pub value: T,
    /// Rule that produced it.
    pub rule: Rule,
    /// Index into [`FrontMatter::lines`] of the source line, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

impl<T> Candidate<T> {
    pub fn new(value: T, rule: Rule) -> Self {
        Self {
            value,
            rule,
            line: None,
        }
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }
}

/// A non-blank, trimmed line of front matter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// Zero-based page index.
    pub page: usize,
    pub text: &'a str,
}

/// Front-matter pages split into non-blank lines, in page order.
#[derive(Debug, Clone)]
pub struct FrontMatter<'a> {
    lines: Vec<Line<'a>>,
}

impl<'a> FrontMatter<'a> {
    pub fn new(pages: &'a [String]) -> Self {
        let lines = pages
            .iter()
            .enumerate()
            .flat_map(|(page, text)| {
                text.lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .map(move |text| Line { page, text })
            })
            .collect();

        Self { lines }
    }

    pub fn lines(&self) -> &[Line<'a>] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Lines with their indices.
    pub fn indexed(&self) -> impl Iterator<Item = (usize, &Line<'a>)> {
        self.lines.iter().enumerate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_front_matter_skips_blank_lines() {
        let pages = vec![
            "  The Title \n\n   \nSubtitle".to_string(),
            String::new(),
            "Copyright 1998".to_string(),
        ];
        let front = FrontMatter::new(&pages);

        let lines: Vec<(usize, &str)> = front.lines().iter().map(|l| (l.page, l.text)).collect();
        assert_eq!(
            lines,
            vec![(0, "The Title"), (0, "Subtitle"), (2, "Copyright 1998")]
        );
    }
}
