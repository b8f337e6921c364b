//! Integration tests for the newsletter viewer
//!
//! These tests serve the real router on a local port, with the Google token
//! endpoint and the Sheets API replaced by a mock server.

use serde_json::json;
use std::time::Duration;
use wiremock::{
    matchers::{header, method, path},
    Mock, MockServer, ResponseTemplate,
};

use newsletter_viewer::{
    auth::ServiceAccountKey,
    config::Config,
    i18n::Language,
    server::{router, AppState},
    sheets::ClientProvider,
};

const TEST_KEY_JSON: &str = include_str!("fixtures/service_account.json");
const SHEET_ID: &str = "sheet-123";
const VALUES_PATH: &str = "/v4/spreadsheets/sheet-123/values/editions";

// ==================== Test Helpers ====================

/// Create a test config pointing both Google endpoints at the mock server
fn create_test_config(mock_uri: &str, sheet_id: Option<&str>) -> Config {
    let mut credentials =
        ServiceAccountKey::from_json(TEST_KEY_JSON).expect("fixture key should parse");
    credentials.token_uri = format!("{}/token", mock_uri);

    Config {
        credentials,
        sheet_id: sheet_id.map(str::to_string),
        sheets_api_url: mock_uri.to_string(),
        cache_ttl: Duration::from_secs(60),
        default_language: Language::ENGLISH,
        port: 0,
    }
}

/// Serve the app on an ephemeral port and return its base URL
async fn spawn_app(config: Config) -> String {
    let provider = ClientProvider::new(config.credentials.clone(), &config.sheets_api_url)
        .expect("provider should build");
    let app = router(AppState::new(&config, provider));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server failed");
    });

    format!("http://{}", addr)
}

async fn mount_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "test-access-token",
            "token_type": "Bearer",
            "expires_in": 3600
        })))
        .mount(server)
        .await;
}

/// Worksheet grid shared by most tests
fn editions_grid() -> serde_json::Value {
    json!({
        "range": "editions!A1:F6",
        "majorDimension": "ROWS",
        "values": [
            ["edition_id", "date", "language", "title", "content_md", "published"],
            ["fr-2", "2024-02-02", "FR", "Semaine 2", "Les **Canadiens** gagnent", "TRUE"],
            ["en-2", "2024-02-01", "en", "Hockey Night", "Big win for the home team", "yes"],
            ["en-1", "2024-01-05", "en", "Soccer Weekend", "Derby preview", "1"],
            ["en-3", "2024-03-01", "en", "Unreleased picks", "Not yet", "FALSE"],
            ["fr-1", "", "fr", "Sans date", "Contenu", "oui"]
        ]
    })
}

async fn mount_values(server: &MockServer, body: serde_json::Value, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path(VALUES_PATH))
        .and(header("authorization", "Bearer test-access-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(expected_calls)
        .mount(server)
        .await;
}

fn no_redirect_client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("client should build")
}

// ==================== Page Tests ====================

#[tokio::test]
async fn test_latest_french_edition() {
    let mock_server = MockServer::start().await;
    mount_token(&mock_server).await;
    mount_values(&mock_server, editions_grid(), 1).await;

    let base = spawn_app(create_test_config(&mock_server.uri(), Some(SHEET_ID))).await;

    let response = reqwest::get(format!("{}/?lang=fr", base)).await.unwrap();
    assert_eq!(response.status(), 200);
    let html = response.text().await.unwrap();

    assert!(html.contains("lang=\"fr\""));
    assert!(html.contains("Semaine 2"));
    assert!(html.contains("2024-02-02"));
    assert!(html.contains("<strong>Canadiens</strong>"));
    assert!(html.contains("/editions/fr-2/markdown"));
    // English editions never show on the French page
    assert!(!html.contains("Hockey Night"));
}

#[tokio::test]
async fn test_default_language_and_unpublished_hidden() {
    let mock_server = MockServer::start().await;
    mount_token(&mock_server).await;
    mount_values(&mock_server, editions_grid(), 1).await;

    let base = spawn_app(create_test_config(&mock_server.uri(), Some(SHEET_ID))).await;

    let html = reqwest::get(format!("{}/", base))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(html.contains("lang=\"en\""));
    assert!(html.contains("Hockey Night"));
    assert!(html.contains("Soccer Weekend"));
    assert!(!html.contains("Unreleased picks"));
}

#[tokio::test]
async fn test_archive_search_filters_entries() {
    let mock_server = MockServer::start().await;
    mount_token(&mock_server).await;
    mount_values(&mock_server, editions_grid(), 1).await;

    let base = spawn_app(create_test_config(&mock_server.uri(), Some(SHEET_ID))).await;

    let html = reqwest::get(format!("{}/?lang=en&q=DERBY", base))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    // Only one archive entry; the latest panel is unaffected by the query
    assert_eq!(html.matches("<details").count(), 1);
    assert!(html.contains("Soccer Weekend"));
    assert!(html.contains("Hockey Night"));
    assert!(html.contains("value=\"DERBY\""));
}

#[tokio::test]
async fn test_archive_search_without_match_shows_empty_message() {
    let mock_server = MockServer::start().await;
    mount_token(&mock_server).await;
    mount_values(&mock_server, editions_grid(), 1).await;

    let base = spawn_app(create_test_config(&mock_server.uri(), Some(SHEET_ID))).await;

    let html = reqwest::get(format!("{}/?lang=en&q=tennis", base))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert_eq!(html.matches("<details").count(), 0);
    assert!(html.contains(Language::ENGLISH.strings().empty));
}

#[tokio::test]
async fn test_no_sheet_id_renders_empty_page_without_fetching() {
    let mock_server = MockServer::start().await;
    // Neither endpoint may be called
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&mock_server)
        .await;

    let base = spawn_app(create_test_config(&mock_server.uri(), None)).await;

    let response = reqwest::get(format!("{}/?lang=fr", base)).await.unwrap();
    assert_eq!(response.status(), 200);
    let html = response.text().await.unwrap();

    let strings = Language::FRENCH.strings();
    assert_eq!(html.matches(strings.empty).count(), 2);
    assert!(html.contains(strings.stats_placeholder));
}

#[tokio::test]
async fn test_page_served_from_cache_within_ttl() {
    let mock_server = MockServer::start().await;
    mount_token(&mock_server).await;
    mount_values(&mock_server, editions_grid(), 1).await;

    let base = spawn_app(create_test_config(&mock_server.uri(), Some(SHEET_ID))).await;

    for lang in ["en", "fr", "en"] {
        let response = reqwest::get(format!("{}/?lang={}", base, lang)).await.unwrap();
        assert_eq!(response.status(), 200);
    }
    // `.expect(1)` on the values mock is verified when the server drops
}

// ==================== Refresh Tests ====================

#[tokio::test]
async fn test_refresh_invalidates_cache_and_redirects() {
    let mock_server = MockServer::start().await;
    mount_token(&mock_server).await;
    mount_values(&mock_server, editions_grid(), 2).await;

    let base = spawn_app(create_test_config(&mock_server.uri(), Some(SHEET_ID))).await;
    let client = no_redirect_client();

    let first = client.get(format!("{}/?lang=fr", base)).send().await.unwrap();
    assert_eq!(first.status(), 200);

    let refresh = client
        .post(format!("{}/refresh", base))
        .form(&[("lang", "fr"), ("q", "semaine 2")])
        .send()
        .await
        .unwrap();
    assert_eq!(refresh.status(), 303);
    assert_eq!(
        refresh.headers()["location"].to_str().unwrap(),
        "/?lang=fr&q=semaine+2"
    );

    let second = client.get(format!("{}/?lang=fr", base)).send().await.unwrap();
    assert_eq!(second.status(), 200);
}

// ==================== Markdown Download Tests ====================

#[tokio::test]
async fn test_edition_markdown_download() {
    let mock_server = MockServer::start().await;
    mount_token(&mock_server).await;
    mount_values(&mock_server, editions_grid(), 1).await;

    let base = spawn_app(create_test_config(&mock_server.uri(), Some(SHEET_ID))).await;

    let response = reqwest::get(format!("{}/editions/fr-2/markdown", base))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert!(response.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/markdown"));
    assert_eq!(
        response.headers()["content-disposition"].to_str().unwrap(),
        "attachment; filename=\"fr-2.md\""
    );
    assert_eq!(
        response.text().await.unwrap(),
        "# Semaine 2\n\nLes **Canadiens** gagnent"
    );

    let missing = reqwest::get(format!("{}/editions/nope/markdown", base))
        .await
        .unwrap();
    assert_eq!(missing.status(), 404);
}

#[tokio::test]
async fn test_csv_export_follows_archive_filter() {
    let mock_server = MockServer::start().await;
    mount_token(&mock_server).await;
    mount_values(&mock_server, editions_grid(), 1).await;

    let base = spawn_app(create_test_config(&mock_server.uri(), Some(SHEET_ID))).await;

    let response = reqwest::get(format!("{}/editions.csv?lang=en&q=hockey", base))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert!(response.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/csv"));
    assert_eq!(
        response.headers()["content-disposition"].to_str().unwrap(),
        "attachment; filename=\"editions_export.csv\""
    );

    let body = response.text().await.unwrap();
    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(
        lines,
        vec![
            "edition_id,date,language,title,content_md,published",
            "en-2,2024-02-01,en,Hockey Night,Big win for the home team,true",
        ]
    );
}

#[tokio::test]
async fn test_csv_export_without_query_lists_visible_archive() {
    let mock_server = MockServer::start().await;
    mount_token(&mock_server).await;
    mount_values(&mock_server, editions_grid(), 1).await;

    let base = spawn_app(create_test_config(&mock_server.uri(), Some(SHEET_ID))).await;

    let body = reqwest::get(format!("{}/editions.csv?lang=fr", base))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    // Newest first, undated last; English and draft editions left out
    let ids: Vec<&str> = body
        .lines()
        .skip(1)
        .map(|line| line.split(',').next().unwrap())
        .collect();
    assert_eq!(ids, vec!["fr-2", "fr-1"]);
}

#[tokio::test]
async fn test_csv_export_without_sheet_is_unavailable() {
    let mock_server = MockServer::start().await;
    let base = spawn_app(create_test_config(&mock_server.uri(), None)).await;

    let response = reqwest::get(format!("{}/editions.csv", base)).await.unwrap();

    assert_eq!(response.status(), 503);
}

#[tokio::test]
async fn test_markdown_without_sheet_is_unavailable() {
    let mock_server = MockServer::start().await;
    let base = spawn_app(create_test_config(&mock_server.uri(), None)).await;

    let response = reqwest::get(format!("{}/editions/fr-2/markdown", base))
        .await
        .unwrap();

    assert_eq!(response.status(), 503);
}

// ==================== HTTP Error Handling Tests ====================

#[tokio::test]
async fn test_missing_worksheet_shows_error_page() {
    let mock_server = MockServer::start().await;
    mount_token(&mock_server).await;
    Mock::given(method("GET"))
        .and(path(VALUES_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "code": 400,
                "message": "Unable to parse range: editions",
                "status": "INVALID_ARGUMENT"
            }
        })))
        .mount(&mock_server)
        .await;

    let base = spawn_app(create_test_config(&mock_server.uri(), Some(SHEET_ID))).await;

    let response = reqwest::get(format!("{}/?lang=en", base)).await.unwrap();
    assert_eq!(response.status(), 502);
    let html = response.text().await.unwrap();

    assert!(html.contains(Language::ENGLISH.strings().fetch_error));
    assert!(html.contains("not found in spreadsheet"));
}

#[tokio::test]
async fn test_failed_fetch_is_retried_on_next_request() {
    let mock_server = MockServer::start().await;
    mount_token(&mock_server).await;
    Mock::given(method("GET"))
        .and(path(VALUES_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend error"))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&mock_server)
        .await;
    mount_values(&mock_server, editions_grid(), 1).await;

    let base = spawn_app(create_test_config(&mock_server.uri(), Some(SHEET_ID))).await;

    let failed = reqwest::get(format!("{}/?lang=en", base)).await.unwrap();
    assert_eq!(failed.status(), 502);

    let recovered = reqwest::get(format!("{}/?lang=en", base)).await.unwrap();
    assert_eq!(recovered.status(), 200);
    assert!(recovered.text().await.unwrap().contains("Hockey Night"));
}

#[tokio::test]
async fn test_token_rejection_shows_error_page() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant"
        })))
        .mount(&mock_server)
        .await;

    let base = spawn_app(create_test_config(&mock_server.uri(), Some(SHEET_ID))).await;

    let response = reqwest::get(format!("{}/", base)).await.unwrap();

    assert_eq!(response.status(), 502);
    assert!(response.text().await.unwrap().contains("invalid_grant"));
}

// ==================== Health Tests ====================

#[tokio::test]
async fn test_health() {
    let mock_server = MockServer::start().await;
    let base = spawn_app(create_test_config(&mock_server.uri(), None)).await;

    let response = reqwest::get(format!("{}/health", base)).await.unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "OK");
}
