//! Author and editor rules.
//!
//! Both fields scan the same lines independently. Labels are tried in
//! configured order, each over all lines, before the next label is tried.

use std::borrow::Cow;

use regex::Regex;

use super::{Candidate, FrontMatter, Rule};
use crate::inference::heuristics::Heuristics;
use crate::models::Metadata;

const MAX_NAME_CHARS: usize = 120;

/// Resolve the editor from `edited by` / `editor:` phrases.
pub fn resolve_editor(heuristics: &Heuristics, front: &FrontMatter<'_>) -> Option<Candidate<String>> {
    heuristics
        .editor_labels
        .iter()
        .find_map(|label| labelled_name(heuristics, front, label, Rule::EditorLabel))
}

/// Resolve the author: `by` phrases, `author:` labels, then embedded metadata.
pub fn resolve_author(
    heuristics: &Heuristics,
    front: &FrontMatter<'_>,
    metadata: &Metadata,
) -> Option<Candidate<String>> {
    author_by(heuristics, front)
        .or_else(|| {
            heuristics
                .author_labels
                .iter()
                .find_map(|label| labelled_name(heuristics, front, label, Rule::AuthorLabel))
        })
        .or_else(|| author_from_metadata(heuristics, metadata))
}

fn labelled_name(
    heuristics: &Heuristics,
    front: &FrontMatter<'_>,
    label: &Regex,
    rule: Rule,
) -> Option<Candidate<String>> {
    front.indexed().find_map(|(index, line)| {
        let caps = label.captures(line.text)?;
        clean_name(heuristics.honorific.as_ref(), &caps[1])
            .map(|name| Candidate::new(name, rule).at_line(index))
    })
}

fn author_by(heuristics: &Heuristics, front: &FrontMatter<'_>) -> Option<Candidate<String>> {
    front.indexed().find_map(|(index, line)| {
        let caps = heuristics.author_by.captures(line.text)?;
        let start = caps.get(0)?.start();
        if follows_role_word(heuristics, &line.text[..start]) {
            return None;
        }
        clean_name(heuristics.honorific.as_ref(), &caps[1])
            .map(|name| Candidate::new(name, Rule::AuthorBy).at_line(index))
    })
}

/// True when the word before `by` names another role (`Edited by`, `Published by`).
fn follows_role_word(heuristics: &Heuristics, prefix: &str) -> bool {
    let Some(word) = prefix.split_whitespace().last() else {
        return false;
    };
    let word = word
        .trim_matches(|c: char| !c.is_alphanumeric() && c != '©')
        .to_lowercase();

    heuristics.author_role_exclusions.contains(&word)
}

fn author_from_metadata(heuristics: &Heuristics, metadata: &Metadata) -> Option<Candidate<String>> {
    let author = metadata.get("author")?;
    if author.to_lowercase().contains("unknown") {
        return None;
    }
    clean_name(heuristics.honorific.as_ref(), author)
        .map(|name| Candidate::new(name, Rule::MetadataAuthor))
}

/// Clean a captured name.
///
/// Honorifics are dropped, the text is cut at a semicolon or at a period that
/// closes a word of two or more letters (initials such as `J.` do not count),
/// whitespace is collapsed and edge punctuation trimmed. Returns `None` unless the result starts with a non-lower-case
/// letter and is at most 120 characters long.
pub fn clean_name(honorific: Option<&Regex>, raw: &str) -> Option<String> {
    let stripped = match honorific {
        Some(re) => re.replace_all(raw, ""),
        None => Cow::Borrowed(raw),
    };

    let name = stripped.split(';').next().unwrap_or_default();
    let name = &name[..sentence_end(name)];

    let collapsed = name.split_whitespace().collect::<Vec<_>>().join(" ");
    let name = collapsed
        .trim_matches(|c: char| c.is_whitespace() || matches!(c, ',' | ':' | '.' | '-' | '–' | '—' | '/'));

    let first = name.chars().next()?;
    if !first.is_alphabetic() || first.is_lowercase() || name.chars().count() > MAX_NAME_CHARS {
        return None;
    }

    Some(name.to_string())
}

/// Byte offset of the first sentence-ending period, or the text length.
fn sentence_end(text: &str) -> usize {
    let chars: Vec<(usize, char)> = text.char_indices().collect();

    for (pos, &(offset, c)) in chars.iter().enumerate() {
        if c != '.' || pos < 2 {
            continue;
        }
        let closes_word = chars[pos - 2].1.is_alphabetic() && chars[pos - 1].1.is_alphabetic();
        let at_break = chars
            .get(pos + 1)
            .map_or(true, |&(_, next)| next.is_whitespace());
        if closes_word && at_break {
            return offset;
        }
    }

    text.len()
}
