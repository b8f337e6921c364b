//! Error types for the Sheets backend and the edition repository.

/// Failures surfaced while authenticating or fetching editions.
///
/// Row-level anomalies (bad dates, unknown published values) are never
/// errors; they degrade to defaults during normalization.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No service-account key material was supplied.
    #[error("service account credentials are not configured: {0}")]
    MissingCredentials(String),

    /// Key material was supplied but could not be parsed or used.
    #[error("invalid service account credentials: {0}")]
    InvalidCredentials(String),

    /// The token endpoint rejected the handshake.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Transport-level failure talking to Google.
    #[error("request to Google failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The Sheets API answered with a non-success status.
    #[error("Sheets API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The configured API base cannot address a spreadsheet.
    #[error("invalid Sheets API endpoint: {0}")]
    InvalidEndpoint(String),

    /// The spreadsheet exists but has no worksheet with that name.
    #[error("worksheet '{worksheet}' not found in spreadsheet '{sheet_id}'")]
    WorksheetNotFound { sheet_id: String, worksheet: String },
}

pub type Result<T> = std::result::Result<T, Error>;
