use crate::auth::ServiceAccountKey;
use crate::error::Error;
use crate::i18n::Language;
use crate::repository::DEFAULT_CACHE_TTL;
use crate::sheets::DEFAULT_API_URL;
use anyhow::{Context, Result};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    // Google
    pub credentials: ServiceAccountKey,
    /// `None` disables data loading; every section shows its empty state.
    pub sheet_id: Option<String>,
    pub sheets_api_url: String,

    // Cache
    pub cache_ttl: Duration,

    // Page
    pub default_language: Language,

    // Server
    pub port: u16,
}

/// Inline JSON wins over a key file path.
fn load_credentials() -> std::result::Result<ServiceAccountKey, Error> {
    if let Some(json) = non_empty_var("GOOGLE_SERVICE_ACCOUNT_JSON") {
        return ServiceAccountKey::from_json(&json);
    }
    if let Some(path) = non_empty_var("GOOGLE_APPLICATION_CREDENTIALS") {
        return ServiceAccountKey::from_file(Path::new(&path));
    }
    Err(Error::MissingCredentials(
        "set GOOGLE_SERVICE_ACCOUNT_JSON or GOOGLE_APPLICATION_CREDENTIALS".to_string(),
    ))
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Google - service account key material is mandatory
            credentials: load_credentials()
                .context("Google service account credentials could not be loaded")?,
            sheet_id: non_empty_var("SHEET_ID"),
            sheets_api_url: std::env::var("SHEETS_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),

            // Cache
            cache_ttl: std::env::var("CACHE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_CACHE_TTL),

            // Page
            default_language: match non_empty_var("DEFAULT_LANGUAGE") {
                Some(code) => Language::from_code(&code).context("Invalid DEFAULT_LANGUAGE")?,
                None => Language::default(),
            },

            // Server
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
        })
    }
}
