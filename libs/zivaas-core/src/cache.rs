//! Caching layer for gateway reads
//!
//! Listings pages re-derive their display state far more often than the
//! backend changes, so the normalized collection and per-user wishlist id
//! sets sit behind a TTL cache. Wishlist mutations invalidate the
//! affected entries explicitly.

use crate::error::Result;
use crate::gateway::PropertyGateway;
use crate::models::Property;
use crate::normalize::normalize_row;
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Cache tuning
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries per cache
    pub max_capacity: u64,
    /// Time to live for cache entries
    pub ttl: Duration,
    /// Time to idle for cache entries
    pub tti: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 1000,
            ttl: Duration::from_secs(300), // 5 minutes
            tti: Duration::from_secs(60),  // 1 minute
        }
    }
}

/// TTL cache over the two gateway read paths the listings surfaces hit:
/// the full normalized collection and per-user wishlist ids
#[derive(Debug, Clone)]
pub struct ListingsCache {
    properties: Cache<(), Arc<Vec<Property>>>,
    wishlists: Cache<Uuid, Arc<Vec<Uuid>>>,
}

impl ListingsCache {
    /// Cache with the given tuning
    #[must_use]
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            properties: Cache::builder()
                .max_capacity(config.max_capacity)
                .time_to_live(config.ttl)
                .time_to_idle(config.tti)
                .build(),
            wishlists: Cache::builder()
                .max_capacity(config.max_capacity)
                .time_to_live(config.ttl)
                .time_to_idle(config.tti)
                .build(),
        }
    }

    /// The normalized property collection, fetching through the gateway
    /// on a miss
    ///
    /// # Errors
    /// Propagates gateway read failures; nothing is cached on failure
    pub async fn properties<G>(&self, gateway: &G) -> Result<Arc<Vec<Property>>>
    where
        G: PropertyGateway + ?Sized,
    {
        if let Some(hit) = self.properties.get(&()).await {
            return Ok(hit);
        }
        let rows = gateway.fetch_properties().await?;
        let collection: Arc<Vec<Property>> =
            Arc::new(rows.into_iter().map(normalize_row).collect());
        self.properties.insert((), Arc::clone(&collection)).await;
        Ok(collection)
    }

    /// The user's wishlisted property ids, fetching through the gateway
    /// on a miss
    ///
    /// # Errors
    /// Propagates gateway read failures; nothing is cached on failure
    pub async fn wishlist_ids<G>(&self, gateway: &G, user_id: Uuid) -> Result<Arc<Vec<Uuid>>>
    where
        G: PropertyGateway + ?Sized,
    {
        if let Some(hit) = self.wishlists.get(&user_id).await {
            return Ok(hit);
        }
        let ids = Arc::new(gateway.fetch_wishlist_ids(user_id).await?);
        self.wishlists.insert(user_id, Arc::clone(&ids)).await;
        Ok(ids)
    }

    /// Drop the cached collection after a property mutation
    pub async fn invalidate_properties(&self) {
        self.properties.invalidate(&()).await;
    }

    /// Drop a user's cached wishlist after an add/remove
    pub async fn invalidate_wishlist(&self, user_id: Uuid) {
        self.wishlists.invalidate(&user_id).await;
    }
}

impl Default for ListingsCache {
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_config_defaults() {
        let config = CacheConfig::default();
        assert_eq!(config.max_capacity, 1000);
        assert_eq!(config.ttl, Duration::from_secs(300));
        assert_eq!(config.tti, Duration::from_secs(60));
    }

    #[tokio::test]
    async fn test_invalidate_empty_cache_is_harmless() {
        let cache = ListingsCache::default();
        cache.invalidate_properties().await;
        cache.invalidate_wishlist(Uuid::from_u128(1)).await;
    }
}
