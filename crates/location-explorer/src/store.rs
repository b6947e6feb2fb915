/// Generation-guarded holder for the current feed snapshot.
///
/// Every reload takes a generation number before it starts fetching. When a
/// load finishes, its snapshot is installed only if no newer generation has
/// been installed already, so a slow stale response can never overwrite
/// fresher data. Readers always get a whole `Arc<FeedSnapshot>`.
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::error::AppError;
use crate::index::CategoryIndex;
use crate::loader::LoadedFeed;
use crate::model::Entity;

#[derive(Debug)]
pub struct FeedSnapshot {
    pub generation: u64,
    pub revision: String,
    pub entities: Vec<Entity>,
    pub index: CategoryIndex,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReloadOutcome {
    Installed {
        generation: u64,
        revision: String,
        changed: bool,
        location_count: usize,
    },
    /// A newer reload finished first; this result was discarded.
    Superseded { generation: u64, current_generation: u64 },
}

/// Generation reserved for one in-flight reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReloadTicket(u64);

#[derive(Default)]
pub struct FeedStore {
    next_generation: AtomicU64,
    current: RwLock<Option<Arc<FeedSnapshot>>>,
}

impl FeedStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> Option<Arc<FeedSnapshot>> {
        self.current.read().await.clone()
    }

    pub fn begin(&self) -> ReloadTicket {
        ReloadTicket(self.next_generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub async fn install(&self, ticket: ReloadTicket, feed: LoadedFeed) -> ReloadOutcome {
        let mut current = self.current.write().await;

        if let Some(existing) = current.as_ref() {
            if existing.generation >= ticket.0 {
                warn!(
                    generation = ticket.0,
                    current_generation = existing.generation,
                    "discarding stale feed load"
                );
                return ReloadOutcome::Superseded {
                    generation: ticket.0,
                    current_generation: existing.generation,
                };
            }
        }

        let changed = current
            .as_ref()
            .map_or(true, |existing| existing.revision != feed.revision);
        let location_count = feed.entities.len();
        let revision = feed.revision.clone();

        *current = Some(Arc::new(FeedSnapshot {
            generation: ticket.0,
            revision: feed.revision,
            entities: feed.entities,
            index: feed.index,
        }));

        info!(
            generation = ticket.0,
            revision = %revision,
            changed,
            locations = location_count,
            "feed snapshot installed"
        );

        ReloadOutcome::Installed {
            generation: ticket.0,
            revision,
            changed,
            location_count,
        }
    }

    /// Run `load` under a fresh generation and install its result.
    ///
    /// On error the installed snapshot is left untouched.
    pub async fn reload<F>(&self, load: F) -> Result<ReloadOutcome, AppError>
    where
        F: Future<Output = Result<LoadedFeed, AppError>>,
    {
        let ticket = self.begin();
        let feed = load.await.inspect_err(|e| {
            warn!(generation = ticket.0, error = %e, "feed reload failed");
        })?;
        Ok(self.install(ticket, feed).await)
    }
}
