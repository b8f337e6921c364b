/// All localized UI labels of the viewer page for one language.
///
/// Strings are stored raw; the HTML layer escapes them on output.
#[derive(Debug, Clone)]
pub struct LanguageStrings {
    // ==================== Header ====================
    /// Page title and sidebar heading
    pub app_title: &'static str,

    /// Line shown under the title
    pub subtitle: &'static str,

    /// Label of the language selector
    pub language_label: &'static str,

    // ==================== Sections ====================
    /// Heading of the latest-edition panel
    pub latest: &'static str,

    /// Heading of the archive list
    pub archive: &'static str,

    /// Heading of the statistics section
    pub stats: &'static str,

    /// Body of the statistics section (no statistics are computed yet)
    pub stats_placeholder: &'static str,

    // ==================== Controls ====================
    /// Label of the manual refresh button
    pub refresh: &'static str,

    /// Placeholder of the archive search box
    pub search: &'static str,

    /// Label of the single-edition markdown download link
    pub download: &'static str,

    /// Label of the CSV export of the filtered archive
    pub download_csv: &'static str,

    // ==================== Status ====================
    /// Prefix of the last-sync timestamp
    pub last_sync: &'static str,

    /// Shown whenever a section has no edition to display
    pub empty: &'static str,

    /// Published indicator label
    pub published: &'static str,

    /// Indicator for editions that are not published
    pub draft: &'static str,

    /// Heading shown when the editions could not be fetched
    pub fetch_error: &'static str,
}

// ==================== English Strings ====================

pub const ENGLISH_STRINGS: LanguageStrings = LanguageStrings {
    app_title: "Le Pari Nordique",
    subtitle: "Sports betting insights",
    language_label: "Language / Langue",

    latest: "🏆 Latest Edition",
    archive: "Archive",
    stats: "Performance",
    stats_placeholder: "Performance tracking is coming soon.",

    refresh: "Refresh",
    search: "Search in titles...",
    download: "Download MD",
    download_csv: "Download CSV (filtered)",

    last_sync: "Last sync",
    empty: "No editions published yet in this language.",
    published: "Published",
    draft: "Draft",
    fetch_error: "The editions could not be loaded.",
};

// ==================== French Strings ====================

pub const FRENCH_STRINGS: LanguageStrings = LanguageStrings {
    app_title: "Le Pari Nordique",
    subtitle: "Paris sportifs",
    language_label: "Language / Langue",

    latest: "🏆 Dernière édition",
    archive: "Archives",
    stats: "Performance",
    stats_placeholder: "Le suivi des performances arrive bientôt.",

    refresh: "Rafraîchir",
    search: "Rechercher dans les titres...",
    download: "Télécharger MD",
    download_csv: "Télécharger CSV (filtré)",

    last_sync: "Dernière synchro",
    empty: "Aucune édition publiée pour cette langue.",
    published: "Publié",
    draft: "Brouillon",
    fetch_error: "Impossible de charger les éditions.",
};
