//! Subscriber lookup memoization
//!
//! The resolution service consults an explicit cache keyed by
//! (environment, subscriber) before hitting the subscriber repository.
//! This is purely a latency optimization; resolution is correct with a
//! cache that never hits.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;

use super::workflow::{EnvironmentId, Subscriber, SubscriberId};

/// Cache for subscriber lookups, keyed by (environment, subscriber)
#[async_trait]
pub trait SubscriberCache: Send + Sync {
    /// Get a cached subscriber, if present and fresh
    async fn get(
        &self,
        environment_id: &EnvironmentId,
        subscriber_id: &SubscriberId,
    ) -> Option<Subscriber>;

    /// Store a subscriber after a successful repository lookup
    async fn insert(&self, subscriber: Subscriber);
}

/// Cache that never hits. Every lookup goes to the repository.
pub struct NoopSubscriberCache;

#[async_trait]
impl SubscriberCache for NoopSubscriberCache {
    async fn get(
        &self,
        _environment_id: &EnvironmentId,
        _subscriber_id: &SubscriberId,
    ) -> Option<Subscriber> {
        None
    }

    async fn insert(&self, _subscriber: Subscriber) {}
}

/// In-memory TTL-bounded subscriber cache.
pub struct InMemorySubscriberCache {
    entries: DashMap<(String, String), (Subscriber, Instant)>,
    ttl: Duration,
}

impl InMemorySubscriberCache {
    /// Create a cache whose entries expire after `ttl`.
    ///
    /// A zero TTL degrades to an always-miss cache.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    fn key(environment_id: &EnvironmentId, subscriber_id: &SubscriberId) -> (String, String) {
        (environment_id.0.clone(), subscriber_id.0.clone())
    }
}

#[async_trait]
impl SubscriberCache for InMemorySubscriberCache {
    async fn get(
        &self,
        environment_id: &EnvironmentId,
        subscriber_id: &SubscriberId,
    ) -> Option<Subscriber> {
        let key = Self::key(environment_id, subscriber_id);

        if let Some(entry) = self.entries.get(&key) {
            let (subscriber, stored_at) = entry.value();
            if stored_at.elapsed() < self.ttl {
                return Some(subscriber.clone());
            }
        }

        // Expired or missing; drop any stale entry
        self.entries.remove(&key);
        None
    }

    async fn insert(&self, subscriber: Subscriber) {
        let key = Self::key(&subscriber.environment_id, &subscriber.id);
        self.entries.insert(key, (subscriber, Instant::now()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn subscriber(id: &str) -> Subscriber {
        Subscriber {
            id: SubscriberId(id.to_string()),
            environment_id: EnvironmentId("env_1".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_noop_cache_never_hits() {
        let cache = NoopSubscriberCache;
        cache.insert(subscriber("sub_1")).await;

        let hit = cache
            .get(
                &EnvironmentId("env_1".to_string()),
                &SubscriberId("sub_1".to_string()),
            )
            .await;
        assert!(hit.is_none());
    }

    #[tokio::test]
    async fn test_memory_cache_hits_within_ttl() {
        let cache = InMemorySubscriberCache::new(Duration::from_secs(60));
        cache.insert(subscriber("sub_1")).await;

        let hit = cache
            .get(
                &EnvironmentId("env_1".to_string()),
                &SubscriberId("sub_1".to_string()),
            )
            .await;
        assert_eq!(hit.unwrap().id.0, "sub_1");

        // Different environment is a different key
        let miss = cache
            .get(
                &EnvironmentId("env_2".to_string()),
                &SubscriberId("sub_1".to_string()),
            )
            .await;
        assert!(miss.is_none());
    }

    #[tokio::test]
    async fn test_memory_cache_zero_ttl_always_misses() {
        let cache = InMemorySubscriberCache::new(Duration::ZERO);
        cache.insert(subscriber("sub_1")).await;

        let hit = cache
            .get(
                &EnvironmentId("env_1".to_string()),
                &SubscriberId("sub_1".to_string()),
            )
            .await;
        assert!(hit.is_none());
    }
}
