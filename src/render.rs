//! Page view model: the three display sections, built from a read-only
//! slice of normalized editions.

use crate::edition::Edition;
use crate::i18n::Language;

/// Latest-edition panel.
#[derive(Debug, PartialEq)]
pub enum LatestSection<'a> {
    Edition(&'a Edition),
    Empty { message: &'static str },
}

/// Archive list. `entries` keep the repository order (newest first).
#[derive(Debug, PartialEq)]
pub enum ArchiveSection<'a> {
    Entries(Vec<&'a Edition>),
    Empty { message: &'static str },
}

/// Statistics are not computed; the section only carries its placeholder.
#[derive(Debug, PartialEq)]
pub struct StatsSection {
    pub heading: &'static str,
    pub placeholder: &'static str,
}

#[derive(Debug, PartialEq)]
pub struct PageView<'a> {
    pub language: Language,
    /// The query as typed, for re-filling the search box.
    pub query: String,
    pub latest: LatestSection<'a>,
    pub archive: ArchiveSection<'a>,
    pub stats: StatsSection,
}

impl PageView<'_> {
    /// Page with every section in its empty state, used when no sheet is
    /// configured.
    pub fn empty(language: Language, query: &str) -> PageView<'static> {
        build_page(&[], language, query)
    }
}

fn is_visible(edition: &Edition, language_code: &str) -> bool {
    edition.published && edition.is_in_language(language_code)
}

/// Build the page sections for `language`, filtering the archive by `query`.
///
/// `editions` must already be sorted newest first; the latest section takes
/// the first visible one.
pub fn build_page<'a>(editions: &'a [Edition], language: Language, query: &str) -> PageView<'a> {
    let strings = language.strings();
    let code = language.code();
    let needle = query.trim().to_lowercase();

    let latest = editions
        .iter()
        .find(|edition| is_visible(edition, code))
        .map(LatestSection::Edition)
        .unwrap_or(LatestSection::Empty {
            message: strings.empty,
        });

    let entries: Vec<&Edition> = editions
        .iter()
        .filter(|edition| is_visible(edition, code))
        .filter(|edition| edition.matches_query(&needle))
        .collect();

    let archive = if entries.is_empty() {
        ArchiveSection::Empty {
            message: strings.empty,
        }
    } else {
        ArchiveSection::Entries(entries)
    };

    PageView {
        language,
        query: query.to_string(),
        latest,
        archive,
        stats: StatsSection {
            heading: strings.stats,
            placeholder: strings.stats_placeholder,
        },
    }
}
