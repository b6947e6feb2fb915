use explorer_common::error::CommonError;

use crate::validate::REQUIRED_FIELDS;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("invalid source URL: {0}")]
    InvalidSourceUrl(String),

    #[error("feed unavailable{}: {message}", status_suffix(.status))]
    FeedUnavailable { status: Option<u16>, message: String },

    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error(
        "no valid locations found. Please ensure your spreadsheet has columns: {}",
        REQUIRED_FIELDS.join(", ")
    )]
    NoValidRecords,

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Common(#[from] CommonError),
}

impl AppError {
    /// Only transport and upstream failures are worth a manual retry; every
    /// other failure needs the configuration or the sheet fixed first.
    pub fn is_retriable(&self) -> bool {
        matches!(self, AppError::FeedUnavailable { .. })
    }

    pub(crate) fn from_fetch(err: CommonError) -> Self {
        let status = err.status();
        let message = match err {
            CommonError::Upstream { body, .. } if body.trim().is_empty() => {
                "upstream returned no body".to_string()
            }
            CommonError::Upstream { body, .. } => body,
            other => other.to_string(),
        };
        AppError::FeedUnavailable { status, message }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (status {s})")).unwrap_or_default()
}
