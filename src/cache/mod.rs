use crate::constants::REVERSE_CACHE_KEY_DECIMALS;
use crate::error::Result;
use crate::models::Coordinates;
use crate::services::geocoding::Geocoder;
use async_trait::async_trait;
use moka::future::Cache;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
    pub entries: u64,
}

/// Memoizes successful geocoding lookups in a moka cache with TTL and
/// bounded capacity. Failures (including `AddressNotFound`) are not cached.
pub struct CachedGeocoder {
    inner: Arc<dyn Geocoder>,
    forward: Cache<String, Coordinates>,
    reverse: Cache<String, Option<String>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl CachedGeocoder {
    pub fn new(inner: Arc<dyn Geocoder>, ttl_seconds: u64, max_capacity: u64) -> Self {
        let ttl = Duration::from_secs(ttl_seconds);

        CachedGeocoder {
            inner,
            forward: Cache::builder()
                .time_to_live(ttl)
                .max_capacity(max_capacity)
                .build(),
            reverse: Cache::builder()
                .time_to_live(ttl)
                .max_capacity(max_capacity)
                .build(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let hit_rate = if hits + misses > 0 {
            (hits as f64 / (hits + misses) as f64) * 100.0
        } else {
            0.0
        };

        CacheStats {
            hits,
            misses,
            hit_rate,
            entries: self.forward.entry_count() + self.reverse.entry_count(),
        }
    }

    fn record(&self, hit: bool) {
        if hit {
            self.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
    }
}

/// Addresses differing only in case or surrounding whitespace share an entry
pub fn forward_cache_key(text: &str) -> String {
    text.trim().to_lowercase()
}

pub fn reverse_cache_key(coords: &Coordinates) -> String {
    let rounded = coords.round(REVERSE_CACHE_KEY_DECIMALS);
    format!("{},{}", rounded.lat, rounded.lng)
}

#[async_trait]
impl Geocoder for CachedGeocoder {
    async fn resolve(&self, text: &str) -> Result<Coordinates> {
        let key = forward_cache_key(text);
        if let Some(coords) = self.forward.get(&key).await {
            self.record(true);
            tracing::debug!("Geocode cache hit: {}", key);
            return Ok(coords);
        }
        self.record(false);

        let coords = self.inner.resolve(text).await?;
        self.forward.insert(key, coords).await;
        Ok(coords)
    }

    async fn reverse(&self, coords: Coordinates) -> Result<Option<String>> {
        let key = reverse_cache_key(&coords);
        if let Some(name) = self.reverse.get(&key).await {
            self.record(true);
            tracing::debug!("Reverse geocode cache hit: {}", key);
            return Ok(name);
        }
        self.record(false);

        let name = self.inner.reverse(coords).await?;
        self.reverse.insert(key, name.clone()).await;
        Ok(name)
    }
}
