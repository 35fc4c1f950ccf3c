//! Time-boxed cache of the current data snapshot.
//!
//! A [`Snapshot`] is immutable once published. Refreshing builds a new one
//! and swaps the shared pointer; readers holding the old `Arc` keep a
//! consistent view. A stale snapshot is still served while a background
//! refresh runs.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::analyzers::benchmark::compute;
use crate::analyzers::types::BenchmarkSnapshot;
use crate::metrics::Metric;
use crate::records::RecordStore;
use crate::source::TableSource;

/// Records plus the benchmarks derived from them.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub store: RecordStore,
    pub benchmarks: BenchmarkSnapshot,
    pub loaded_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn build(store: RecordStore, loaded_at: DateTime<Utc>) -> Self {
        let benchmarks = compute(&store);
        Self {
            store,
            benchmarks,
            loaded_at,
        }
    }

    pub fn empty(loaded_at: DateTime<Utc>) -> Self {
        Self::build(RecordStore::default(), loaded_at)
    }

    pub fn metric_columns(&self) -> Vec<Metric> {
        self.store.metric_columns()
    }

    pub fn is_stale(&self, now: DateTime<Utc>, freshness: Duration) -> bool {
        now - self.loaded_at >= freshness
    }
}

type Slot = Arc<RwLock<Option<Arc<Snapshot>>>>;

pub struct SnapshotCache {
    source: Arc<dyn TableSource>,
    freshness: Duration,
    current: Slot,
    refreshing: Arc<AtomicBool>,
}

impl SnapshotCache {
    pub fn new(source: Arc<dyn TableSource>, freshness: Duration) -> Self {
        Self {
            source,
            freshness,
            current: Arc::new(RwLock::new(None)),
            refreshing: Arc::new(AtomicBool::new(false)),
        }
    }

    /// The published snapshot, if any, without triggering a load.
    pub fn current(&self) -> Option<Arc<Snapshot>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns a usable snapshot, loading or refreshing as needed.
    ///
    /// - nothing loaded yet: loads inline. If the source fails, an empty
    ///   snapshot is published so callers can render a "no data" state.
    /// - fresh: returned as is.
    /// - stale: returned as is, and one background refresh is started.
    pub async fn get_or_refresh(&self, now: DateTime<Utc>) -> Arc<Snapshot> {
        match self.current() {
            Some(snapshot) if !snapshot.is_stale(now, self.freshness) => snapshot,
            Some(snapshot) => {
                self.spawn_refresh(now);
                snapshot
            }
            None => {
                let snapshot = match load(self.source.as_ref(), now).await {
                    Ok(snapshot) => snapshot,
                    Err(e) => {
                        error!(source = %self.source.describe(), error = %e, "Initial load failed, serving empty snapshot");
                        Snapshot::empty(now)
                    }
                };
                publish(&self.current, snapshot)
            }
        }
    }

    /// Loads inline and publishes on success. On failure the current
    /// snapshot stays in place.
    pub async fn refresh(&self, now: DateTime<Utc>) -> Result<Arc<Snapshot>> {
        let snapshot = load(self.source.as_ref(), now).await?;
        Ok(publish(&self.current, snapshot))
    }

    /// Starts a background refresh unless one is already running.
    pub fn spawn_refresh(&self, now: DateTime<Utc>) -> Option<JoinHandle<()>> {
        if self.refreshing.swap(true, Ordering::AcqRel) {
            return None;
        }

        let source = Arc::clone(&self.source);
        let current = Arc::clone(&self.current);
        let guard = RefreshGuard(Arc::clone(&self.refreshing));

        Some(tokio::spawn(async move {
            let _guard = guard;
            match load(source.as_ref(), now).await {
                Ok(snapshot) => {
                    publish(&current, snapshot);
                }
                Err(e) => {
                    warn!(source = %source.describe(), error = %e, "Refresh failed, keeping stale snapshot");
                }
            }
        }))
    }
}

/// Clears the refresh flag when the task ends, including on panic or abort.
struct RefreshGuard(Arc<AtomicBool>);

impl Drop for RefreshGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[tracing::instrument(skip(source), fields(source = %source.describe()))]
async fn load(source: &dyn TableSource, now: DateTime<Utc>) -> Result<Snapshot> {
    let tables = source.fetch_tables().await?;
    let store = RecordStore::load(&tables);
    Ok(Snapshot::build(store, now))
}

fn publish(slot: &Slot, snapshot: Snapshot) -> Arc<Snapshot> {
    info!(
        records = snapshot.store.len(),
        segments = snapshot.store.segments().len(),
        loaded_at = %snapshot.loaded_at,
        "Snapshot published"
    );
    let snapshot = Arc::new(snapshot);
    *slot.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&snapshot));
    snapshot
}
