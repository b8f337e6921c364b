//! HTML rendering of the page view with maud (interpolation is escaped).
//! Edition content is markdown converted by pulldown-cmark; it is authored
//! by the sheet owners and inserted as is.

use crate::edition::Edition;
use crate::i18n::{Language, LanguageStrings};
use crate::render::{ArchiveSection, LatestSection, PageView};
use chrono::{DateTime, Datelike, Utc};
use maud::{html, Markup, PreEscaped, DOCTYPE};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use pulldown_cmark::{Options, Parser};
use url::form_urlencoded;

const CSS: &str = r#"
:root { --primary: #0EA5E9; --accent: #F59E0B; }
body { font-family: system-ui, sans-serif; max-width: 960px; margin: 0 auto; padding: 2rem 1rem; color: #111827; }
.kicker { color: var(--primary); font-weight: 600; text-transform: uppercase; font-size: .85rem; }
.toolbar { display: flex; gap: 1rem; align-items: center; flex-wrap: wrap; }
.lang { color: #6b7280; text-decoration: none; }
.lang.active { color: var(--primary); font-weight: 600; }
.edition-card { border: 1px solid rgba(0,0,0,.06); border-radius: 16px; padding: 1rem 1.25rem; box-shadow: 0 2px 12px rgba(0,0,0,.04); margin-bottom: .75rem; }
.badge { display: inline-block; padding: 2px 8px; border-radius: 999px; font-size: .75rem; background: rgba(14,165,233,.1); color: var(--primary); margin-right: .5rem; }
.meta { color: #6b7280; font-size: .9rem; }
.content { background-color: #f3f4f6; padding: 1rem; border-radius: 10px; }
.empty { background: rgba(14,165,233,.08); padding: .75rem 1rem; border-radius: 10px; }
.error { background: #fef2f2; color: #991b1b; padding: .75rem 1rem; border-radius: 10px; }
summary { cursor: pointer; font-weight: 600; }
"#;

const SPORTS_EMOJIS: [&str; 8] = ["⚽", "🏀", "🏈", "🎾", "🏐", "🏒", "🥊", "🏓"];

/// Markdown to HTML.
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let mut out = String::new();
    pulldown_cmark::html::push_html(&mut out, Parser::new_ext(markdown, options));
    out
}

/// Everything outside the RFC 3986 unreserved set.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

pub fn markdown_download_href(edition_id: &str) -> String {
    format!(
        "/editions/{}/markdown",
        utf8_percent_encode(edition_id, PATH_SEGMENT)
    )
}

/// Form-encoded `lang` and `q` page parameters. An empty query is left out.
pub fn page_query(language: Language, query: &str) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    serializer.append_pair("lang", language.code());
    if !query.is_empty() {
        serializer.append_pair("q", query);
    }
    serializer.finish()
}

pub fn csv_export_href(language: Language, query: &str) -> String {
    format!("/editions.csv?{}", page_query(language, query))
}

fn language_badge(edition: &Edition) -> String {
    edition
        .language
        .as_deref()
        .map(str::to_uppercase)
        .unwrap_or_default()
}

fn edition_body(edition: &Edition) -> Markup {
    let content = edition.content_md.as_deref().unwrap_or_default();
    html! {
        div.content { (PreEscaped(markdown_to_html(content))) }
    }
}

fn published_indicator(edition: &Edition, strings: &LanguageStrings) -> Markup {
    html! {
        @if edition.published {
            span.meta { "✅ " (strings.published) }
        } @else {
            span.meta { "❌ " (strings.draft) }
        }
    }
}

fn header(language: Language, strings: &LanguageStrings, query: &str) -> Markup {
    html! {
        header {
            div.kicker { "Newsletter" }
            h1 { (strings.app_title) " 🏅" }
            p.meta { (strings.subtitle) }
            div.toolbar {
                span.meta { (strings.language_label) }
                @for option in Language::all() {
                    a.lang.active[option == language]
                        href={ "/?" (page_query(option, "")) }
                        title=(option.name()) {
                        (option.native_name())
                    }
                }
                form method="post" action="/refresh" {
                    input type="hidden" name="lang" value=(language.code());
                    @if !query.is_empty() {
                        input type="hidden" name="q" value=(query);
                    }
                    button type="submit" { (strings.refresh) }
                }
            }
        }
    }
}

fn latest_section(view: &PageView<'_>, strings: &LanguageStrings) -> Markup {
    html! {
        section id="latest" {
            h2 { (strings.latest) }
            @match &view.latest {
                LatestSection::Edition(edition) => {
                    article.edition-card {
                        span.badge { (language_badge(edition)) }
                        h3 { (edition.title.as_deref().unwrap_or_default()) }
                        @if let Some(date) = edition.date_label() {
                            div.meta { (date) }
                        }
                        (edition_body(edition))
                        p {
                            (published_indicator(edition, strings))
                            @if let Some(id) = &edition.edition_id {
                                " · "
                                span.meta { "#" (id) }
                                " · "
                                a href=(markdown_download_href(id)) { (strings.download) }
                            }
                        }
                    }
                }
                LatestSection::Empty { message } => {
                    p.empty { (message) }
                }
            }
        }
    }
}

fn archive_section(view: &PageView<'_>, strings: &LanguageStrings) -> Markup {
    html! {
        section id="archive" {
            h2 { (strings.archive) }
            form method="get" action="/" {
                input type="hidden" name="lang" value=(view.language.code());
                input type="search" name="q" value=(view.query) placeholder=(strings.search);
            }
            @match &view.archive {
                ArchiveSection::Entries(entries) => {
                    @for (index, edition) in entries.iter().enumerate() {
                        details.edition-card {
                            summary {
                                (SPORTS_EMOJIS[index % SPORTS_EMOJIS.len()]) " "
                                @if let Some(date) = edition.date_label() {
                                    (date) " — "
                                }
                                (edition.title.as_deref().unwrap_or_default())
                            }
                            span.badge { (language_badge(edition)) }
                            (edition_body(edition))
                            p { (published_indicator(edition, strings)) }
                        }
                    }
                    p {
                        a href=(csv_export_href(view.language, &view.query)) { "⬇️ " (strings.download_csv) }
                    }
                }
                ArchiveSection::Empty { message } => {
                    p.empty { (message) }
                }
            }
        }
    }
}

fn layout(language: Language, strings: &LanguageStrings, query: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang=(language.code()) {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (strings.app_title) " – Newsletter" }
                style { (PreEscaped(CSS)) }
            }
            body {
                (header(language, strings, query))
                main { (content) }
                footer.meta {
                    "© " (Utc::now().year()) " " (strings.app_title)
                }
            }
        }
    }
}

/// The full viewer page. `synced_at` is the fetch time of the data shown,
/// or the render time when nothing was fetched.
pub fn page(view: &PageView<'_>, synced_at: DateTime<Utc>) -> Markup {
    let strings = view.language.strings();
    let body = html! {
        p.meta {
            (strings.last_sync) ": " (synced_at.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        }
        (latest_section(view, strings))
        (archive_section(view, strings))
        section id="stats" {
            h2 { (view.stats.heading) }
            p.meta { (view.stats.placeholder) }
        }
    };
    layout(view.language, strings, &view.query, body)
}

/// Page shown when the editions could not be fetched.
pub fn error_page(language: Language, error: &str) -> Markup {
    let strings = language.strings();
    let body = html! {
        div.error {
            strong { (strings.fetch_error) }
            pre { (error) }
        }
    };
    layout(language, strings, "", body)
}
