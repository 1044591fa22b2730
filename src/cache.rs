//! Search index cache for the HTTP endpoint.
//!
//! `techgloss serve` answers index, search and suggestion requests from one
//! in-memory [`IndexSnapshot`]. The snapshot is rebuilt wholesale from the
//! content directory once it is older than the configured TTL.
//!
//! # Design
//!
//! [`IndexCache`] is an explicit object holding `(value, built_at, ttl)`. It
//! is created once in `serve` and handed to request handlers through axum
//! state; there is no module-level cache.
//!
//! ## Atomic replacement
//!
//! Snapshots are immutable and shared as `Arc<IndexSnapshot>`. A refresh
//! builds the new snapshot without holding the lock, then swaps the pointer
//! under a short write lock. Readers hold their own `Arc`, so a request that
//! started before a swap finishes on the old snapshot and no request ever
//! sees a half-built index. Two requests that both find the snapshot expired
//! may both rebuild; the last swap wins and both results are complete.
//!
//! ## ETags
//!
//! The serialized JSON is hashed once per snapshot. The ETag is the quoted
//! SHA-256 hex digest, so it changes exactly when the served bytes change and
//! survives process restarts.

use sha2::{Digest, Sha256};
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::info;

use crate::scan::{self, ScanError};
use crate::search::{SearchRecord, build_index};

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Produces a fresh record set. Called on first use and after expiry.
pub type IndexLoader = dyn Fn() -> Result<Vec<SearchRecord>, ScanError> + Send + Sync;

/// One immutable build of the index with its wire form.
#[derive(Debug)]
pub struct IndexSnapshot {
    pub records: Vec<SearchRecord>,
    /// `records` serialized as a JSON array.
    pub json: String,
    /// Strong ETag, quotes included.
    pub etag: String,
    pub built_at: Instant,
}

impl IndexSnapshot {
    pub fn new(records: Vec<SearchRecord>, built_at: Instant) -> Result<Self, serde_json::Error> {
        let json = serde_json::to_string(&records)?;
        let etag = etag_for(json.as_bytes());
        Ok(Self {
            records,
            json,
            etag,
            built_at,
        })
    }
}

pub struct IndexCache {
    loader: Box<IndexLoader>,
    ttl: Duration,
    current: RwLock<Option<Arc<IndexSnapshot>>>,
}

impl IndexCache {
    pub fn new<F>(ttl: Duration, loader: F) -> Self
    where
        F: Fn() -> Result<Vec<SearchRecord>, ScanError> + Send + Sync + 'static,
    {
        Self {
            loader: Box::new(loader),
            ttl,
            current: RwLock::new(None),
        }
    }

    /// A cache that rescans `root` on every refresh.
    pub fn for_content_root(root: PathBuf, ttl: Duration) -> Self {
        Self::new(ttl, move || {
            let corpus = scan::scan(&root)?;
            Ok(build_index(&corpus.entries))
        })
    }

    /// `Cache-Control` value matching the TTL.
    pub fn cache_control(&self) -> String {
        format!("public, max-age={}", self.ttl.as_secs())
    }

    /// The current snapshot, rebuilding it if missing or expired.
    pub fn snapshot(&self) -> Result<Arc<IndexSnapshot>, CacheError> {
        self.snapshot_at(Instant::now())
    }

    /// [`snapshot`](Self::snapshot) with an explicit clock.
    pub fn snapshot_at(&self, now: Instant) -> Result<Arc<IndexSnapshot>, CacheError> {
        if let Some(snapshot) = self.fresh(now) {
            return Ok(snapshot);
        }

        let records = (self.loader)()?;
        let snapshot = Arc::new(IndexSnapshot::new(records, now)?);
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&snapshot));
        info!(
            records = snapshot.records.len(),
            etag = %snapshot.etag,
            "search index rebuilt"
        );
        Ok(snapshot)
    }

    fn fresh(&self, now: Instant) -> Option<Arc<IndexSnapshot>> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        guard
            .as_ref()
            .filter(|s| now.saturating_duration_since(s.built_at) < self.ttl)
            .cloned()
    }
}

/// Quoted SHA-256 hex digest of `bytes`.
pub fn etag_for(bytes: &[u8]) -> String {
    format!("\"{:x}\"", Sha256::digest(bytes))
}

/// Whether an `If-None-Match` header value matches `etag`.
///
/// Accepts `*`, comma-separated lists, and weak validators (`W/"..."`),
/// which compare weakly as for GET requests.
pub fn etag_matches(if_none_match: &str, etag: &str) -> bool {
    let etag = etag.trim_start_matches("W/");
    if_none_match.split(',').map(str::trim).any(|candidate| {
        candidate == "*" || candidate.trim_start_matches("W/") == etag
    })
}
