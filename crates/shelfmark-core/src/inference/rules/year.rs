//! Publication year rules.

use super::patterns::DIGIT_RUN;
use super::{Candidate, FrontMatter, Rule};
use crate::inference::heuristics::Heuristics;
use crate::models::Year;

/// In-range years in `text`, in order.
///
/// A token is a maximal run of exactly four ASCII digits, so fragments of
/// longer numbers such as ISBNs are never returned.
pub fn year_tokens(text: &str) -> impl Iterator<Item = Year> + '_ {
    DIGIT_RUN
        .find_iter(text)
        .filter(|m| m.as_str().len() == 4)
        .filter_map(|m| Year::parse(m.as_str()))
}

/// Resolve the year: near a publication marker first, then anywhere.
pub fn resolve_year(heuristics: &Heuristics, front: &FrontMatter<'_>) -> Option<Candidate<Year>> {
    year_near_marker(heuristics, front).or_else(|| first_year_token(front))
}

fn year_near_marker(heuristics: &Heuristics, front: &FrontMatter<'_>) -> Option<Candidate<Year>> {
    let marker = heuristics.year_marker.as_ref()?;
    let lines = front.lines();

    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| marker.is_match(line.text))
        .find_map(|(index, _)| {
            // The marker line plus the next one, for years wrapped onto a new line.
            lines[index..]
                .iter()
                .take(2)
                .enumerate()
                .find_map(|(offset, line)| year_tokens(line.text).next().map(|year| (index + offset, year)))
        })
        .map(|(index, year)| Candidate::new(year, Rule::YearNearMarker).at_line(index))
}

fn first_year_token(front: &FrontMatter<'_>) -> Option<Candidate<Year>> {
    front.indexed().find_map(|(index, line)| {
        year_tokens(line.text)
            .next()
            .map(|year| Candidate::new(year, Rule::FirstYearToken).at_line(index))
    })
}
