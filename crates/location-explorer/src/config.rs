use explorer_common::http::FeedClientConfig;

use crate::error::AppError;

pub const DEFAULT_SHEETS_HOST: &str = "https://docs.google.com";

#[derive(Debug, Clone)]
pub struct Config {
    /// Human-facing spreadsheet link; the export URL is derived from it.
    pub sheet_url: String,
    pub sheets_host: String,
    pub client: FeedClientConfig,
    pub tcp_listen_addr: Option<String>,
}

impl Config {
    /// Required:
    /// - `EXPLORER_SHEET_URL` (spreadsheet sharing URL)
    ///
    /// Optional:
    /// - `EXPLORER_SHEETS_HOST` (default: "https://docs.google.com")
    /// - `MCP_TCP_LISTEN_ADDR` (serve on TCP instead of stdio)
    /// - HTTP client settings, see `FeedClientConfig::from_env`
    pub fn from_env() -> Result<Self, AppError> {
        let sheet_url = std::env::var("EXPLORER_SHEET_URL").map_err(|_| {
            AppError::Config("EXPLORER_SHEET_URL environment variable is required".to_string())
        })?;

        let sheets_host = std::env::var("EXPLORER_SHEETS_HOST")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SHEETS_HOST.to_string());

        Self::new(sheet_url, sheets_host).map(|config| Self {
            client: FeedClientConfig::from_env(),
            tcp_listen_addr: std::env::var("MCP_TCP_LISTEN_ADDR").ok(),
            ..config
        })
    }

    /// Build a config with default client settings. Fails early on an
    /// unusable sharing URL so a bad deployment never reaches the network.
    pub fn new(sheet_url: impl Into<String>, sheets_host: impl Into<String>) -> Result<Self, AppError> {
        let sheet_url = sheet_url.into().trim().to_string();
        crate::source_url::spreadsheet_id(&sheet_url)?;

        Ok(Self {
            sheet_url,
            sheets_host: sheets_host.into().trim_end_matches('/').to_string(),
            client: FeedClientConfig::default(),
            tcp_listen_addr: None,
        })
    }
}
