//! Catalogue record produced for every input document.

use std::fmt;

use serde::{Serialize, Serializer};

/// Sentinel written for any field that could not be inferred.
pub const UNKNOWN: &str = "Unknown";

/// A record field: either a validated value or the `Unknown` sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Field<T> {
    /// A value that passed validation.
    Known(T),
    /// Nothing trustworthy was found.
    #[default]
    Unknown,
}

impl<T> Field<T> {
    /// Borrow the known value, if any.
    pub fn known(&self) -> Option<&T> {
        match self {
            Field::Known(value) => Some(value),
            Field::Unknown => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Field::Unknown)
    }

    pub fn is_known(&self) -> bool {
        !self.is_unknown()
    }
}

impl Field<String> {
    /// Build a text field; blank input collapses to `Unknown`.
    pub fn text(value: impl AsRef<str>) -> Self {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            Field::Unknown
        } else {
            Field::Known(trimmed.to_string())
        }
    }
}

impl<T> From<Option<T>> for Field<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Field::Unknown, Field::Known)
    }
}

impl<T: fmt::Display> fmt::Display for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Known(value) => value.fmt(f),
            Field::Unknown => f.write_str(UNKNOWN),
        }
    }
}

impl<T: Serialize> Serialize for Field<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Field::Known(value) => value.serialize(serializer),
            Field::Unknown => serializer.serialize_str(UNKNOWN),
        }
    }
}

/// Publication year, always inside [`Year::MIN`, `Year::MAX`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Year(u16);

impl Year {
    pub const MIN: u16 = 1500;
    pub const MAX: u16 = 2035;

    /// Accept a year only if it lies in the plausible publishing range.
    pub fn new(value: u32) -> Option<Self> {
        let value = u16::try_from(value).ok()?;
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    /// Parse a digit token into a year.
    pub fn parse(token: &str) -> Option<Self> {
        token.trim().parse::<u32>().ok().and_then(Self::new)
    }

    pub fn value(self) -> u16 {
        self.0
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Inferred bibliographic metadata for one PDF.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub title: Field<String>,
    pub author: Field<String>,
    pub editor: Field<String>,
    pub year: Field<Year>,
    pub publisher: Field<String>,
    pub language: Field<String>,
    pub page_count: Field<u32>,
    pub format: &'static str,
    pub source_path: String,
}

impl Record {
    /// Value of the format column for every record.
    pub const FORMAT: &'static str = "PDF";

    /// Spreadsheet header, in output column order.
    pub const COLUMNS: [&'static str; 9] = [
        "Book Title",
        "Author",
        "Editor",
        "Year of Publishing",
        "Publisher",
        "Language",
        "Number of Pages",
        "Format",
        "Source File",
    ];

    /// A record with every inferred field set to `Unknown`.
    pub fn unknown(source_path: impl Into<String>) -> Self {
        Self {
            title: Field::Unknown,
            author: Field::Unknown,
            editor: Field::Unknown,
            year: Field::Unknown,
            publisher: Field::Unknown,
            language: Field::Unknown,
            page_count: Field::Unknown,
            format: Self::FORMAT,
            source_path: source_path.into(),
        }
    }

    /// Cells in [`Record::COLUMNS`] order.
    pub fn to_row(&self) -> [String; 9] {
        [
            self.title.to_string(),
            self.author.to_string(),
            self.editor.to_string(),
            self.year.to_string(),
            self.publisher.to_string(),
            self.language.to_string(),
            self.page_count.to_string(),
            self.format.to_string(),
            self.source_path.clone(),
        ]
    }
}
