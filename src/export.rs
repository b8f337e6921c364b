//! CSV export of the archive entries shown on the page.

use crate::edition::{Edition, SCHEMA_COLUMNS};
use serde::Serialize;

pub const EXPORT_FILE_NAME: &str = "editions_export.csv";

/// One CSV line; field order follows `SCHEMA_COLUMNS`.
#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    edition_id: Option<&'a str>,
    date: Option<String>,
    language: Option<&'a str>,
    title: Option<&'a str>,
    content_md: Option<&'a str>,
    published: bool,
}

impl<'a> From<&'a Edition> for ExportRow<'a> {
    fn from(edition: &'a Edition) -> Self {
        Self {
            edition_id: edition.edition_id.as_deref(),
            date: edition.date_label(),
            language: edition.language.as_deref(),
            title: edition.title.as_deref(),
            content_md: edition.content_md.as_deref(),
            published: edition.published,
        }
    }
}

/// Serialize `editions` in the given order, header row first. Unknown
/// values are written as empty fields.
pub fn editions_csv(editions: &[&Edition]) -> csv::Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(SCHEMA_COLUMNS)?;
    for edition in editions {
        writer.serialize(ExportRow::from(*edition))?;
    }

    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}
