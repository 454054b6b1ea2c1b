//! Publisher rules: labelled lines, then imprint keywords.

use super::patterns::{PUBLISHER_NOISE, WHITESPACE_RUN};
use super::{Candidate, FrontMatter, Rule};
use crate::inference::heuristics::Heuristics;

const MIN_PUBLISHER_CHARS: usize = 2;
const MAX_PUBLISHER_CHARS: usize = 120;

/// Resolve the publisher.
///
/// `consumed` lists line indices already claimed by the title, author,
/// editor or year candidates; the keyword pass skips them so that a
/// `Copyright 1998 Example Press` line is not re-used, while an explicit
/// `Published by` label always wins.
pub fn resolve_publisher(
    heuristics: &Heuristics,
    front: &FrontMatter<'_>,
    consumed: &[usize],
) -> Option<Candidate<String>> {
    publisher_from_label(heuristics, front).or_else(|| publisher_from_keyword(heuristics, front, consumed))
}

fn publisher_from_label(heuristics: &Heuristics, front: &FrontMatter<'_>) -> Option<Candidate<String>> {
    let label = heuristics.publisher_label.as_ref()?;

    front.indexed().find_map(|(index, line)| {
        let caps = label.captures(line.text)?;
        clean_publisher(&caps[1]).map(|name| Candidate::new(name, Rule::PublisherLabel).at_line(index))
    })
}

fn publisher_from_keyword(
    heuristics: &Heuristics,
    front: &FrontMatter<'_>,
    consumed: &[usize],
) -> Option<Candidate<String>> {
    let keyword = heuristics.publisher_keyword.as_ref()?;

    front
        .indexed()
        .filter(|(index, _)| !consumed.contains(index))
        .filter(|(_, line)| keyword.is_match(line.text))
        .find_map(|(index, line)| {
            clean_publisher(line.text).map(|name| Candidate::new(name, Rule::PublisherKeyword).at_line(index))
        })
}

/// Cut trailing contact details and collapse spacing.
fn clean_publisher(raw: &str) -> Option<String> {
    let head = PUBLISHER_NOISE.split(raw).next().unwrap_or_default();
    let collapsed = WHITESPACE_RUN.replace_all(head.trim(), " ");
    let name = collapsed.trim_end_matches([',', ':', '-']).trim();

    let len = name.chars().count();
    if !(MIN_PUBLISHER_CHARS..=MAX_PUBLISHER_CHARS).contains(&len) || !name.chars().any(char::is_alphabetic) {
        return None;
    }

    Some(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::InferenceConfig;

    fn heuristics() -> Heuristics {
        Heuristics::new(&InferenceConfig::default()).unwrap()
    }

    fn resolve(text: &str, consumed: &[usize]) -> Option<Candidate<String>> {
        let pages = vec![text.to_string()];
        resolve_publisher(&heuristics(), &FrontMatter::new(&pages), consumed)
    }

    #[test]
    fn test_label_cuts_contact_noise() {
        let publisher = resolve(
            "Oxford University Press\nPublished by: Harbor  Books; 12 Quay St. Tel: 555-0100",
            &[],
        )
        .unwrap();
        assert_eq!(publisher.value, "Harbor Books");
        assert_eq!(publisher.rule, Rule::PublisherLabel);
        assert_eq!(publisher.line, Some(1));
    }

    #[test]
    fn test_imprint_and_printed_by_labels() {
        assert_eq!(resolve("Imprint: Vintage | www.example.com", &[]).unwrap().value, "Vintage");
        assert_eq!(resolve("Printed by Lakeside Print Works", &[]).unwrap().value, "Lakeside Print Works");
    }

    #[test]
    fn test_keyword_line_fallback() {
        let publisher = resolve("A Short History\nCambridge University Press", &[]).unwrap();
        assert_eq!(publisher.value, "Cambridge University Press");
        assert_eq!(publisher.rule, Rule::PublisherKeyword);
    }

    #[test]
    fn test_keyword_pass_skips_consumed_lines() {
        let text = "Copyright 1998 Example Press\nRiverside Books";
        assert_eq!(resolve(text, &[]).unwrap().value, "Copyright 1998 Example Press");
        assert_eq!(resolve(text, &[0]).unwrap().value, "Riverside Books");
        assert!(resolve(text, &[0, 1]).is_none());
    }

    #[test]
    fn test_keywords_are_whole_words() {
        assert!(resolve("Compression Algorithms\nBookshelf Notes", &[]).is_none());
    }

    #[test]
    fn test_label_remainder_must_be_plausible() {
        assert!(resolve("Publisher: X", &[]).is_none());
        assert!(resolve("Publisher: 12345", &[]).is_none());
    }
}
