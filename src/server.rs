//! HTTP surface: the viewer page, the manual refresh action and the
//! single-edition markdown download.

use crate::config::Config;
use crate::edition::Edition;
use crate::export;
use crate::html;
use crate::i18n::Language;
use crate::render::{build_page, ArchiveSection, PageView};
use crate::repository::{EditionRepository, EditionSnapshot, RowSource};
use crate::sheets::ClientProvider;
use anyhow::{Context, Result};
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

pub struct AppState<S> {
    /// `None` when no spreadsheet is configured.
    pub sheet_id: Option<String>,
    pub default_language: Language,
    pub repository: Arc<EditionRepository<S>>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            sheet_id: self.sheet_id.clone(),
            default_language: self.default_language,
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<S: RowSource> AppState<S> {
    pub fn new(config: &Config, source: S) -> Self {
        Self {
            sheet_id: config.sheet_id.clone(),
            default_language: config.default_language,
            repository: Arc::new(EditionRepository::new(source, config.cache_ttl)),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PageParams {
    lang: Option<String>,
    q: Option<String>,
}

pub fn router<S: RowSource + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route("/", get(index::<S>))
        .route("/refresh", post(refresh::<S>))
        .route("/editions.csv", get(editions_export::<S>))
        .route("/editions/:id/markdown", get(edition_markdown::<S>))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index<S: RowSource + 'static>(
    State(state): State<AppState<S>>,
    Query(params): Query<PageParams>,
) -> Response {
    let language = Language::from_code_or(params.lang.as_deref(), state.default_language);
    let query = params.q.unwrap_or_default();

    let Some(sheet_id) = state.sheet_id.as_deref() else {
        let view = PageView::empty(language, &query);
        return Html(html::page(&view, Utc::now()).into_string()).into_response();
    };

    match state.repository.load_editions(sheet_id).await {
        Ok(snapshot) => {
            let view = build_page(&snapshot.editions, language, &query);
            Html(html::page(&view, snapshot.fetched_at).into_string()).into_response()
        }
        Err(e) => {
            error!("Could not load editions: {}", e);
            (
                StatusCode::BAD_GATEWAY,
                Html(html::error_page(language, &e.to_string()).into_string()),
            )
                .into_response()
        }
    }
}

/// Clear the fetch cache and send the browser back to the page.
async fn refresh<S: RowSource + 'static>(
    State(state): State<AppState<S>>,
    Form(params): Form<PageParams>,
) -> Redirect {
    state.repository.invalidate();

    let language = Language::from_code_or(params.lang.as_deref(), state.default_language);
    let query = params.q.unwrap_or_default();

    Redirect::to(&format!("/?{}", html::page_query(language, &query)))
}

/// Snapshot for the download routes. Errors are already plain-text
/// responses: 503 without a sheet, 502 when the fetch fails.
async fn download_snapshot<S: RowSource + 'static>(
    state: &AppState<S>,
) -> std::result::Result<Arc<EditionSnapshot>, Response> {
    let Some(sheet_id) = state.sheet_id.as_deref() else {
        return Err((StatusCode::SERVICE_UNAVAILABLE, "No spreadsheet configured").into_response());
    };

    state.repository.load_editions(sheet_id).await.map_err(|e| {
        error!("Could not load editions: {}", e);
        (StatusCode::BAD_GATEWAY, e.to_string()).into_response()
    })
}

/// `# {title}` followed by the markdown body.
pub fn edition_markdown_document(edition: &Edition) -> String {
    format!(
        "# {}\n\n{}",
        edition.title.as_deref().unwrap_or_default(),
        edition.content_md.as_deref().unwrap_or_default()
    )
}

/// Keep download file names to a header-safe character set.
fn download_file_name(edition_id: &str) -> String {
    let stem: String = edition_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{}.md", stem)
}

async fn edition_markdown<S: RowSource + 'static>(
    State(state): State<AppState<S>>,
    Path(edition_id): Path<String>,
) -> Response {
    let snapshot = match download_snapshot(&state).await {
        Ok(snapshot) => snapshot,
        Err(response) => return response,
    };

    match snapshot.find(&edition_id) {
        Some(edition) => (
            [
                (header::CONTENT_TYPE, "text/markdown; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", download_file_name(&edition_id)),
                ),
            ],
            edition_markdown_document(edition),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "Edition not found").into_response(),
    }
}

/// The archive as filtered on the page, as a CSV attachment.
async fn editions_export<S: RowSource + 'static>(
    State(state): State<AppState<S>>,
    Query(params): Query<PageParams>,
) -> Response {
    let language = Language::from_code_or(params.lang.as_deref(), state.default_language);
    let query = params.q.unwrap_or_default();

    let snapshot = match download_snapshot(&state).await {
        Ok(snapshot) => snapshot,
        Err(response) => return response,
    };

    let view = build_page(&snapshot.editions, language, &query);
    let entries: &[&Edition] = match &view.archive {
        ArchiveSection::Entries(entries) => entries.as_slice(),
        ArchiveSection::Empty { .. } => &[],
    };

    match export::editions_csv(entries) {
        Ok(body) => (
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", export::EXPORT_FILE_NAME),
                ),
            ],
            body,
        )
            .into_response(),
        Err(e) => {
            error!("Could not write CSV export: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "CSV export failed").into_response()
        }
    }
}

async fn health() -> &'static str {
    "OK"
}

/// Serve the viewer until the process is stopped.
pub async fn run(config: Config) -> Result<()> {
    let provider = ClientProvider::new(config.credentials.clone(), &config.sheets_api_url)
        .context("Failed to create Sheets client provider")?;
    let state = AppState::new(&config, provider);

    match &state.sheet_id {
        Some(sheet_id) => info!("Serving editions of sheet {}", sheet_id),
        None => info!("SHEET_ID not set, data loading disabled"),
    }

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, router(state))
        .await
        .context("HTTP server failed")?;

    Ok(())
}
