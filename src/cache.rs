use moka::{future::Cache, Expiry};
use std::future::Future;
use std::time::{Duration, Instant};

use crate::models::{ItemDetail, ItemKey};

/// Upper bound on how long a degraded (empty) detail is kept by default
pub const DEFAULT_EMPTY_TTL: Duration = Duration::from_secs(300);

/// Per-entry lifetime: full details live for `ttl`, empty ones for `empty_ttl`
struct DetailExpiry {
    ttl: Duration,
    empty_ttl: Duration,
}

impl Expiry<ItemKey, ItemDetail> for DetailExpiry {
    fn expire_after_create(
        &self,
        _key: &ItemKey,
        value: &ItemDetail,
        _created_at: Instant,
    ) -> Option<Duration> {
        if value.is_empty() {
            Some(self.empty_ttl)
        } else {
            Some(self.ttl)
        }
    }
}

/// Process-wide store of item details, keyed by `(item id, media kind)`
///
/// Bounded by entry count and entry age. Concurrent lookups of a missing key
/// are coalesced, so a key is fetched from upstream at most once while it
/// stays cached. Empty details stand in for failed fetches and expire sooner,
/// so a transient outage is retried without refetching on every request.
/// Cloning is cheap and every clone shares the same entries.
#[derive(Clone)]
pub struct DetailCache {
    entries: Cache<ItemKey, ItemDetail>,
}

impl DetailCache {
    /// Empty details are kept for `ttl` or [`DEFAULT_EMPTY_TTL`], whichever is shorter
    pub fn new(max_capacity: u64, ttl: Duration) -> Self {
        Self::with_empty_ttl(max_capacity, ttl, DEFAULT_EMPTY_TTL.min(ttl))
    }

    pub fn with_empty_ttl(max_capacity: u64, ttl: Duration, empty_ttl: Duration) -> Self {
        let entries = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(DetailExpiry { ttl, empty_ttl })
            .build();

        Self { entries }
    }

    /// Returns the cached detail for `key`, running `fetch` to fill it on a miss
    ///
    /// `fetch` must not fail: degraded upstream data is cached as an empty detail.
    pub async fn get_or_fetch<F>(&self, key: ItemKey, fetch: F) -> ItemDetail
    where
        F: Future<Output = ItemDetail>,
    {
        self.entries.get_with(key, fetch).await
    }
}
