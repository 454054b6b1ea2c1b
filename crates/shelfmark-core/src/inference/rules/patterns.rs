//! Fixed lexical patterns shared by the field rules.

use lazy_static::lazy_static;
use regex::Regex;

const ROMAN: &str = r"m{0,4}(?:cm|cd|d?c{0,3})(?:xc|xl|l?x{0,3})(?:ix|iv|v?i{0,3})";

lazy_static! {
    // Maximal ASCII digit runs; a year is a run of exactly four
    pub static ref DIGIT_RUN: Regex = Regex::new(r"[0-9]+").unwrap();

    // Page furniture: "12", "- 12 -", "Page 3", "xiv", "- IV -". Bare roman
    // numerals count only in lower case; "MIX" or "Vi" may be a title.
    pub static ref PAGE_NUMBER: Regex = Regex::new(&format!(
        r"^\s*(?:(?i:page)\s+(?:[0-9]+|(?i:{roman}))|[-–—]\s*(?:[0-9]+|(?i:{roman}))\s*[-–—]|[-–—]?\s*(?:[0-9]+|{roman})\s*[-–—]?)\s*$",
        roman = ROMAN
    )).unwrap();

    // Contact details that trail a publisher name on the same line
    pub static ref PUBLISHER_NOISE: Regex = Regex::new(
        r"(?i)[;|•]|\btel\s*:|\bphone\s*:|\bfax\s*:|\be-?mail\s*:|\bwww\."
    ).unwrap();

    pub static ref WHITESPACE_RUN: Regex = Regex::new(r"\s{2,}").unwrap();
}
