#![forbid(unsafe_code)]

//! Stale-time read cache over [`ApiClient`].
//!
//! Reads go through [`QueryClient::fetch`]: a fresh cache hit returns
//! without touching the network, a miss fetches (retrying once on a
//! transient failure), and concurrent fetches for the same key share
//! one request. Mutations bypass the cache, never retry, and on
//! success invalidate every cached key under the resource prefix so
//! the next read refetches.
//!
//! # Invariants
//!
//! - A failed fetch never poisons the cache: only successful responses
//!   are stored.
//! - Invalidation is prefix-based: `["companies"]` drops every page and
//!   search variation of the companies list.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::watch;
use tracing::debug;

use crate::api::{ApiClient, ListParams};
use crate::error::Result;

const DEFAULT_STALE_AFTER: Duration = Duration::from_secs(30);

/// Cache key: ordered path segments, compared by prefix for
/// invalidation. A list page keys as
/// `["companies", "page=2", "size=25"]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    #[must_use]
    pub fn new<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(parts.into_iter().map(Into::into).collect())
    }

    /// Key for one page of a resource list.
    #[must_use]
    pub fn list(resource: &str, params: &ListParams) -> Self {
        let mut parts = vec![
            resource.to_string(),
            format!("page={}", params.page),
            format!("size={}", params.page_size),
        ];
        if let Some(search) = &params.search
            && !search.is_empty()
        {
            parts.push(format!("search={search}"));
        }
        Self(parts)
    }

    #[must_use]
    pub fn starts_with(&self, prefix: &[&str]) -> bool {
        prefix.len() <= self.0.len()
            && prefix
                .iter()
                .zip(&self.0)
                .all(|(want, part)| *want == part)
    }
}

struct CacheEntry {
    value: Value,
    fetched_at: Instant,
}

#[derive(Default)]
struct Cache {
    entries: HashMap<QueryKey, CacheEntry>,
}

impl Cache {
    fn get_fresh(&self, key: &QueryKey, now: Instant, stale_after: Duration) -> Option<Value> {
        let entry = self.entries.get(key)?;
        if now.duration_since(entry.fetched_at) < stale_after {
            Some(entry.value.clone())
        } else {
            None
        }
    }

    fn insert(&mut self, key: QueryKey, value: Value, now: Instant) {
        self.entries.insert(
            key,
            CacheEntry {
                value,
                fetched_at: now,
            },
        );
    }

    fn invalidate_prefix(&mut self, prefix: &[&str]) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !key.starts_with(prefix));
        before - self.entries.len()
    }
}

/// Read cache plus mutation gateway, shared by every page.
pub struct QueryClient {
    api: Arc<ApiClient>,
    stale_after: Duration,
    cache: Mutex<Cache>,
    in_flight: Mutex<HashMap<QueryKey, watch::Receiver<bool>>>,
}

impl QueryClient {
    #[must_use]
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self {
            api,
            stale_after: DEFAULT_STALE_AFTER,
            cache: Mutex::new(Cache::default()),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn stale_after(mut self, stale_after: Duration) -> Self {
        self.stale_after = stale_after;
        self
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Fetch `path` under `key`, serving from cache when fresh. When
    /// another task is already fetching the same key, wait for it and
    /// read its result from the cache instead of issuing a second
    /// request.
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        key: &QueryKey,
        path: &str,
        query: &[(String, String)],
    ) -> Result<T> {
        loop {
            if let Some(value) = self
                .cache
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .get_fresh(key, Instant::now(), self.stale_after)
            {
                return Ok(serde_json::from_value(value)?);
            }

            let leader = {
                let mut in_flight = self
                    .in_flight
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner);
                if let Some(rx) = in_flight.get(key) {
                    Err(rx.clone())
                } else {
                    let (tx, rx) = watch::channel(false);
                    in_flight.insert(key.clone(), rx);
                    Ok(tx)
                }
            };

            match leader {
                Ok(done) => {
                    let result = self.get_with_retry(path, query).await;
                    if let Ok(value) = &result {
                        self.cache
                            .lock()
                            .unwrap_or_else(PoisonError::into_inner)
                            .insert(key.clone(), value.clone(), Instant::now());
                    }
                    self.in_flight
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .remove(key);
                    let _ = done.send(true);
                    return result.and_then(|value| Ok(serde_json::from_value(value)?));
                }
                Err(mut rx) => {
                    // Leader failure leaves the cache cold; the loop
                    // promotes this waiter to leader on the next pass.
                    let _ = rx.changed().await;
                }
            }
        }
    }

    /// One page of a resource list, cached under [`QueryKey::list`].
    pub async fn fetch_list<T: DeserializeOwned>(
        &self,
        resource: &str,
        params: &ListParams,
    ) -> Result<crate::dto::Paged<T>> {
        let key = QueryKey::list(resource, params);
        self.fetch(&key, resource, &params.to_query()).await
    }

    async fn get_with_retry(&self, path: &str, query: &[(String, String)]) -> Result<Value> {
        match self.api.get_value(path, query).await {
            Ok(value) => Ok(value),
            Err(err) if err.is_transient() => {
                debug!(path, %err, "retrying GET once");
                self.api.get_value(path, query).await
            }
            Err(err) => Err(err),
        }
    }

    /// Create an entity. Not retried; invalidates the resource prefix
    /// on success.
    pub async fn create<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        resource: &str,
        body: &B,
    ) -> Result<T> {
        let created = self.api.create(resource, body).await?;
        self.invalidate(&[resource]);
        Ok(created)
    }

    /// Update an entity. Not retried; invalidates the resource prefix
    /// on success.
    pub async fn update<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        resource: &str,
        id: i64,
        body: &B,
    ) -> Result<T> {
        let updated = self.api.update(resource, id, body).await?;
        self.invalidate(&[resource]);
        Ok(updated)
    }

    /// Delete an entity. Not retried; invalidates the resource prefix
    /// on success.
    pub async fn delete(&self, resource: &str, id: i64) -> Result<()> {
        self.api.delete(resource, id).await?;
        self.invalidate(&[resource]);
        Ok(())
    }

    /// Drop every cached key under `prefix`. Returns how many entries
    /// were removed. Pages call this directly when a mutation affects
    /// a related resource.
    pub fn invalidate(&self, prefix: &[&str]) -> usize {
        let removed = self
            .cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .invalidate_prefix(prefix);
        if removed > 0 {
            debug!(?prefix, removed, "invalidated");
        }
        removed
    }

    /// Drop the whole cache. Used on logout.
    pub fn clear(&self) {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .clear();
    }
}
