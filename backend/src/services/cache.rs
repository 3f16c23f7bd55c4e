use crate::models::ChannelTable;
use crate::services::channel_service::{FetchError, FetchOptions};
use chrono::{DateTime, Utc};
use log::debug;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Outcome of one fetch, shared by every request inside the TTL window.
#[derive(Debug, Clone)]
pub struct CachedFetch {
    pub result: Result<Arc<ChannelTable>, FetchError>,
    pub fetched_at: DateTime<Utc>,
    loaded: Instant,
}

type Slot = Arc<Mutex<Option<CachedFetch>>>;

/// Fixed time-to-live memo of fetch results, keyed by fetch options.
///
/// Every key has its own slot lock, held while that key's fetch runs, so
/// requests arriving after expiry wait for that one fetch instead of issuing
/// their own. The map lock only guards slot lookup.
pub struct ChannelCache {
    ttl: Duration,
    slots: Mutex<HashMap<FetchOptions, Slot>>,
}

impl ChannelCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slots: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn get_or_fetch<F, Fut>(&self, options: FetchOptions, fetch: F) -> CachedFetch
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<ChannelTable, FetchError>>,
    {
        let slot = self.slots.lock().await.entry(options).or_default().clone();
        let mut cached = slot.lock().await;

        if let Some(entry) = cached.as_ref() {
            if entry.loaded.elapsed() < self.ttl {
                debug!("Serving cached channels from {}", entry.fetched_at);
                return entry.clone();
            }
        }

        let entry = CachedFetch {
            result: fetch().await.map(Arc::new),
            fetched_at: Utc::now(),
            loaded: Instant::now(),
        };
        *cached = Some(entry.clone());
        entry
    }
}
