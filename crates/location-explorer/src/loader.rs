/// Feed loader: sharing URL → export URL → HTTP GET → parse → validate → index.
///
/// This is the only stage that touches the network. A failed fetch is
/// returned as `FeedUnavailable` and never retried here; `reload_feed` is the
/// caller's retry.
use sha2::{Digest, Sha256};
use tracing::info;

use explorer_common::http::FeedClient;

use crate::config::Config;
use crate::error::AppError;
use crate::index::{CategoryIndex, build_index};
use crate::model::Entity;
use crate::parser;
use crate::source_url;
use crate::validate;

/// Output of one successful load, ready to become a snapshot.
#[derive(Debug, Clone)]
pub struct LoadedFeed {
    /// SHA-256 of the fetched body.
    pub revision: String,
    pub entities: Vec<Entity>,
    pub index: CategoryIndex,
}

impl LoadedFeed {
    pub fn from_text(text: &str) -> Result<Self, AppError> {
        let entities = ingest(text)?;
        let index = build_index(&entities);
        Ok(Self {
            revision: revision(text),
            entities,
            index,
        })
    }
}

pub struct FeedLoader {
    config: Config,
    client: FeedClient,
}

impl FeedLoader {
    pub fn new(config: Config) -> Result<Self, AppError> {
        let client = FeedClient::new(config.client.clone())?;
        Ok(Self { config, client })
    }

    pub fn export_url(&self) -> Result<String, AppError> {
        source_url::export_url(&self.config.sheet_url, &self.config.sheets_host)
    }

    pub async fn fetch_text(&self) -> Result<String, AppError> {
        let url = self.export_url()?;
        self.client
            .fetch_text(&url)
            .await
            .map_err(AppError::from_fetch)
    }

    /// Canonical entity list for the configured sheet, with revision and index.
    pub async fn load(&self) -> Result<LoadedFeed, AppError> {
        let text = self.fetch_text().await?;
        let feed = LoadedFeed::from_text(&text)?;
        info!(
            revision = %feed.revision,
            locations = feed.entities.len(),
            categories = feed.index.categories().count(),
            "feed loaded"
        );
        Ok(feed)
    }
}

/// Synchronous half of the pipeline: CSV text to canonical entities.
pub fn ingest(text: &str) -> Result<Vec<Entity>, AppError> {
    let records = parser::parse_records(text)?;
    validate::validate(&records)
}

pub fn revision(text: &str) -> String {
    let hash = Sha256::digest(text.as_bytes());
    format!("{:x}", hash)
}
