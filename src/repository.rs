//! Edition repository: fetch, normalize and memoize the editions worksheet.

use crate::cache::TtlCache;
use crate::edition::{normalize, Edition};
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Worksheet holding one row per edition.
pub const EDITIONS_WORKSHEET: &str = "editions";

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60);

/// One worksheet row keyed by column header.
pub type RawRecord = HashMap<String, String>;

/// Backend that can read a worksheet as header-keyed records.
#[async_trait]
pub trait RowSource: Send + Sync {
    async fn fetch_records(&self, sheet_id: &str, worksheet: &str) -> Result<Vec<RawRecord>>;
}

/// The normalized editions of one fetch. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct EditionSnapshot {
    /// Sorted newest first, undated editions last.
    pub editions: Vec<Edition>,
    pub fetched_at: DateTime<Utc>,
}

impl EditionSnapshot {
    pub fn new(editions: Vec<Edition>) -> Self {
        Self {
            editions,
            fetched_at: Utc::now(),
        }
    }

    /// Editions are looked up by identifier; with duplicate identifiers the
    /// most recent one wins.
    pub fn find(&self, edition_id: &str) -> Option<&Edition> {
        self.editions
            .iter()
            .find(|edition| edition.edition_id.as_deref() == Some(edition_id))
    }
}

pub struct EditionRepository<S> {
    source: S,
    cache: TtlCache<String, Arc<EditionSnapshot>>,
}

impl<S: RowSource> EditionRepository<S> {
    pub fn new(source: S, ttl: Duration) -> Self {
        Self {
            source,
            cache: TtlCache::new(ttl),
        }
    }

    /// Normalized editions of `sheet_id`, served from the cache while the
    /// previous fetch is younger than the TTL.
    ///
    /// Backend errors propagate unchanged and leave the cache untouched.
    pub async fn load_editions(&self, sheet_id: &str) -> Result<Arc<EditionSnapshot>> {
        let key = sheet_id.to_string();

        if let Some(snapshot) = self.cache.get(&key) {
            debug!("Editions cache hit for sheet {}", sheet_id);
            return Ok(snapshot);
        }

        info!("Fetching '{}' worksheet of sheet {}", EDITIONS_WORKSHEET, sheet_id);
        let records = match self.source.fetch_records(sheet_id, EDITIONS_WORKSHEET).await {
            Ok(records) => records,
            Err(e) => {
                warn!("Failed to fetch editions from sheet {}: {}", sheet_id, e);
                return Err(e);
            }
        };

        let snapshot = Arc::new(EditionSnapshot::new(normalize(&records)));
        let published = snapshot.editions.iter().filter(|e| e.published).count();
        info!(
            "Loaded {} editions ({} published), cached for {}s",
            snapshot.editions.len(),
            published,
            self.cache.ttl().as_secs()
        );

        self.cache.insert(key, Arc::clone(&snapshot));
        Ok(snapshot)
    }

    /// Forget every cached fetch; the next load goes to the backend.
    pub fn invalidate(&self) {
        info!("Editions cache cleared");
        self.cache.clear();
    }
}
