//! Title rules: embedded metadata, then the first plausible line of page 1.

use super::patterns::PAGE_NUMBER;
use super::{Candidate, FrontMatter, Rule};
use crate::inference::heuristics::Heuristics;
use crate::models::Metadata;

/// Resolve the title: metadata, then page 1.
pub fn resolve_title(
    heuristics: &Heuristics,
    front: &FrontMatter<'_>,
    metadata: &Metadata,
) -> Option<Candidate<String>> {
    title_from_metadata(heuristics, metadata).or_else(|| title_from_first_page(heuristics, front))
}

/// Embedded title, unless it is trivial.
pub fn title_from_metadata(heuristics: &Heuristics, metadata: &Metadata) -> Option<Candidate<String>> {
    let title = metadata.get("title")?.trim();
    let lowered = title.to_lowercase();

    if title.chars().count() < heuristics.min_title_len
        || !title.chars().any(char::is_alphabetic)
        || heuristics.placeholder_titles.contains(&lowered)
    {
        return None;
    }

    Some(Candidate::new(title.to_string(), Rule::MetadataTitle))
}

/// First line of page 1 that is not furniture, credits or legal text.
pub fn title_from_first_page(heuristics: &Heuristics, front: &FrontMatter<'_>) -> Option<Candidate<String>> {
    front
        .indexed()
        .take_while(|(_, line)| line.page == 0)
        .find(|(_, line)| is_title_line(heuristics, line.text))
        .map(|(index, line)| Candidate::new(line.text.to_string(), Rule::FirstPageLine).at_line(index))
}

fn is_title_line(heuristics: &Heuristics, text: &str) -> bool {
    if text.chars().count() < heuristics.min_title_len || !text.chars().any(char::is_alphanumeric) {
        return false;
    }
    if PAGE_NUMBER.is_match(text) {
        return false;
    }
    !heuristics
        .title_exclusion
        .as_ref()
        .is_some_and(|re| re.is_match(text))
}
