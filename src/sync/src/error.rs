//! Error taxonomy for a sync run.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SyncError>;

#[derive(Debug, Error)]
pub enum SyncError {
    /// Network failure, timeout or non-success HTTP status
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Response body is not the JSON shape the endpoint documents
    #[error("malformed response body: {0}")]
    Parse(#[from] serde_json::Error),

    /// A single draw entry could not be normalized
    #[error("malformed draw {code}: {reason}")]
    Format { code: String, reason: String },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to read workbook: {0}")]
    WorkbookRead(#[from] calamine::XlsxError),

    #[error("failed to write workbook: {0}")]
    WorkbookWrite(#[from] rust_xlsxwriter::XlsxError),

    /// The local sheet exists but does not hold a draw table
    #[error("invalid sheet: {0}")]
    InvalidSheet(String),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl SyncError {
    pub fn format(code: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Format {
            code: code.into(),
            reason: reason.into(),
        }
    }

    /// Only malformed entries are skipped; everything else aborts the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Format { .. })
    }
}
