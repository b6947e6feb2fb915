/// Error types shared across explorer server crates.
///
/// These errors represent failures in infrastructure components (the HTTP feed client)
/// that are common to every server. Application-specific errors should be defined
/// in each server crate and wrap `CommonError` via `#[from]`.

#[derive(Debug, thiserror::Error)]
pub enum CommonError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream returned status={status} body={body}")]
    Upstream { status: u16, body: String },
}

impl CommonError {
    /// HTTP status code when the upstream answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            CommonError::Http(e) => e.status().map(|s| s.as_u16()),
            CommonError::Upstream { status, .. } => Some(*status),
        }
    }
}
