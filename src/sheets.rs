//! Google Sheets client and its process-lifetime provider.
//!
//! `ClientProvider::get_client` performs the service-account handshake on the
//! first call and hands out the same `Arc<SheetsClient>` afterwards.

use crate::auth::{fetch_access_token, AccessToken, ServiceAccountKey};
use crate::error::{Error, Result};
use crate::repository::{RawRecord, RowSource};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Url;
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, info, warn};

pub const DEFAULT_API_URL: &str = "https://sheets.googleapis.com";

const REQUEST_TIMEOUT_SECS: u64 = 20;

/// Response of `spreadsheets.values.get`. `values` is omitted by the API
/// when the worksheet is empty.
#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

fn cell_text(cell: &serde_json::Value) -> String {
    match cell {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Turn a grid of cells into header-keyed records.
///
/// The first row holds the column names. Later rows are zipped with them:
/// short rows miss their trailing columns, cells beyond the header row and
/// columns with a blank header are ignored. When a header repeats, the
/// leftmost column wins.
pub fn records_from_values(values: &[Vec<serde_json::Value>]) -> Vec<RawRecord> {
    let Some((header_row, rows)) = values.split_first() else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let headers: Vec<Option<String>> = header_row
        .iter()
        .map(|cell| cell_text(cell).trim().to_string())
        .map(|header| {
            if header.is_empty() {
                return None;
            }
            if !seen.insert(header.clone()) {
                warn!("Duplicate column '{}' ignored, keeping the first one", header);
                return None;
            }
            Some(header)
        })
        .collect();

    rows.iter()
        .map(|row| {
            headers
                .iter()
                .zip(row.iter())
                .filter_map(|(header, cell)| {
                    header.as_ref().map(|header| (header.clone(), cell_text(cell)))
                })
                .collect()
        })
        .collect()
}

/// An authenticated handle to the Sheets v4 API.
pub struct SheetsClient {
    http: reqwest::Client,
    api_base: Url,
    /// `None` for clients built from a fixed token; those never refresh.
    key: Option<ServiceAccountKey>,
    token: Mutex<AccessToken>,
}

impl SheetsClient {
    /// Authenticate with `key` and return a ready client.
    pub async fn authorize(
        http: reqwest::Client,
        api_base: &str,
        key: ServiceAccountKey,
    ) -> Result<Self> {
        let api_base = parse_api_base(api_base)?;
        let token = fetch_access_token(&http, &key).await?;

        Ok(Self {
            http,
            api_base,
            key: Some(key),
            token: Mutex::new(token),
        })
    }

    /// Build a client around an already issued bearer token.
    #[cfg(test)]
    pub fn with_token(http: reqwest::Client, api_base: &str, token: &str) -> Result<Self> {
        Ok(Self {
            http,
            api_base: parse_api_base(api_base)?,
            key: None,
            token: Mutex::new(AccessToken {
                token: token.to_string(),
                expires_at: chrono::DateTime::<Utc>::MAX_UTC,
            }),
        })
    }

    /// Current bearer token, refreshed first if it is about to expire.
    async fn bearer(&self) -> Result<String> {
        let mut token = self.token.lock().await;

        if let Some(key) = &self.key {
            if token.is_expiring(Utc::now()) {
                debug!("Access token expiring, refreshing");
                *token = fetch_access_token(&self.http, key).await?;
            }
        }

        Ok(token.token.clone())
    }

    fn values_url(&self, sheet_id: &str, worksheet: &str) -> Result<Url> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| Error::InvalidEndpoint(self.api_base.to_string()))?
            .pop_if_empty()
            .extend(["v4", "spreadsheets", sheet_id, "values", worksheet]);
        Ok(url)
    }

    /// Read every row of `worksheet` as header-keyed records.
    pub async fn worksheet_records(
        &self,
        sheet_id: &str,
        worksheet: &str,
    ) -> Result<Vec<RawRecord>> {
        let url = self.values_url(sheet_id, worksheet)?;
        let bearer = self.bearer().await?;

        let response = self.http.get(url).bearer_auth(bearer).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // A missing tab is reported as an unparseable A1 range.
            if status == reqwest::StatusCode::BAD_REQUEST && body.contains("Unable to parse range")
            {
                return Err(Error::WorksheetNotFound {
                    sheet_id: sheet_id.to_string(),
                    worksheet: worksheet.to_string(),
                });
            }
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }

        let range: ValueRange = response.json().await?;
        Ok(records_from_values(&range.values))
    }
}

fn parse_api_base(api_base: &str) -> Result<Url> {
    let url = Url::parse(api_base).map_err(|e| Error::InvalidEndpoint(format!("{}: {}", api_base, e)))?;
    if url.cannot_be_a_base() {
        return Err(Error::InvalidEndpoint(api_base.to_string()));
    }
    Ok(url)
}

/// Lazily authenticated, process-lifetime `SheetsClient`.
///
/// The handshake runs at most once; a failed handshake is not cached, so the
/// next call tries again.
pub struct ClientProvider {
    http: reqwest::Client,
    api_base: String,
    key: ServiceAccountKey,
    client: OnceCell<Arc<SheetsClient>>,
}

impl ClientProvider {
    pub fn new(key: ServiceAccountKey, api_base: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        parse_api_base(api_base)?;

        Ok(Self {
            http,
            api_base: api_base.to_string(),
            key,
            client: OnceCell::new(),
        })
    }

    /// The authenticated client, created on first use.
    pub async fn get_client(&self) -> Result<Arc<SheetsClient>> {
        self.client
            .get_or_try_init(|| async {
                info!("Authenticating service account {}", self.key.client_email);
                SheetsClient::authorize(self.http.clone(), &self.api_base, self.key.clone())
                    .await
                    .map(Arc::new)
            })
            .await
            .map(Arc::clone)
    }
}

#[async_trait]
impl RowSource for ClientProvider {
    async fn fetch_records(&self, sheet_id: &str, worksheet: &str) -> Result<Vec<RawRecord>> {
        let client = self.get_client().await?;
        client.worksheet_records(sheet_id, worksheet).await
    }
}
