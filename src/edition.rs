use crate::repository::RawRecord;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::cmp::Ordering;

/// Columns every normalized edition carries, in sheet order.
pub const SCHEMA_COLUMNS: [&str; 6] = [
    "edition_id",
    "date",
    "language",
    "title",
    "content_md",
    "published",
];

/// Lowercased, trimmed values that mark an edition as published.
const TRUTHY_VALUES: [&str; 5] = ["true", "1", "yes", "y", "oui"];

/// Tried in order. `%b` only takes the short month name, `%B` either form.
const DATE_FORMATS: [&str; 9] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%Y%m%d",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d %b %Y",
    "%d %B %Y",
    "%B %d %Y",
];

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
];

/// One newsletter issue, normalized from a spreadsheet row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edition {
    pub edition_id: Option<String>,
    pub date: Option<NaiveDate>,
    pub language: Option<String>,
    pub title: Option<String>,
    pub content_md: Option<String>,
    pub published: bool,
}

impl Edition {
    /// Coerce a raw record into the six-attribute schema.
    ///
    /// Missing columns and blank cells become `None`. Extra columns are
    /// ignored. Nothing here can fail: a bad date is `None`, an unknown
    /// published value is `false`.
    pub fn from_record(record: &RawRecord) -> Self {
        let text = |column: &str| {
            record
                .get(column)
                .filter(|value| !value.trim().is_empty())
                .cloned()
        };

        Self {
            edition_id: text("edition_id").map(|id| id.trim().to_string()),
            date: record.get("date").and_then(|value| parse_date(value)),
            language: text("language").map(|lang| lang.trim().to_string()),
            title: text("title"),
            content_md: text("content_md"),
            published: record
                .get("published")
                .map(|value| parse_published(value))
                .unwrap_or(false),
        }
    }

    /// Match against a lowercased UI language code.
    pub fn is_in_language(&self, language: &str) -> bool {
        self.language
            .as_deref()
            .map(|lang| lang.to_lowercase() == language)
            .unwrap_or(false)
    }

    /// Case-insensitive substring match over title OR content.
    /// `needle` must already be lowercased; an empty needle matches.
    pub fn matches_query(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        let contains = |field: &Option<String>| {
            field
                .as_deref()
                .map(|text| text.to_lowercase().contains(needle))
                .unwrap_or(false)
        };
        contains(&self.title) || contains(&self.content_md)
    }

    /// `YYYY-MM-DD`, or `None` when the date is unknown.
    pub fn date_label(&self) -> Option<String> {
        self.date.map(|date| date.format("%Y-%m-%d").to_string())
    }
}

/// Free-form "published" text to a strict boolean.
pub fn parse_published(value: &str) -> bool {
    let normalized = value.trim().to_lowercase();
    TRUTHY_VALUES.contains(&normalized.as_str())
}

/// Parse a sheet date cell, keeping only the calendar date.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
                .map(|datetime| datetime.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|datetime| datetime.date_naive())
        })
}

/// Newest first, unknown dates last; equal dates by `edition_id` descending
/// with unknown identifiers last.
fn newest_first(a: &Edition, b: &Edition) -> Ordering {
    let by_date = match (a.date, b.date) {
        (Some(da), Some(db)) => db.cmp(&da),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };

    by_date.then_with(|| match (&a.edition_id, &b.edition_id) {
        (Some(ia), Some(ib)) => ib.cmp(ia),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    })
}

/// Normalize every record and sort the result. No record is dropped.
pub fn normalize(records: &[RawRecord]) -> Vec<Edition> {
    let mut editions: Vec<Edition> = records.iter().map(Edition::from_record).collect();
    editions.sort_by(newest_first);
    editions
}
