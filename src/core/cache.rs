use crate::core::rate::FetchError;
use chrono::{DateTime, Utc};
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

type SharedRequest<V> = Shared<BoxFuture<'static, Result<V, FetchError>>>;

/// How a fetch treats an existing cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// Serve cached data, else join the in-flight request, else start one.
    CacheFirst,
    /// Always start a new request. Cached data stays visible until it lands.
    Refetch,
}

/// Point-in-time view of a single cache entry.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryState<V> {
    pub data: Option<V>,
    pub error: Option<FetchError>,
    pub is_fetching: bool,
    pub updated_at: Option<DateTime<Utc>>,
}

impl<V> Default for QueryState<V> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            is_fetching: false,
            updated_at: None,
        }
    }
}

struct InFlight<V: Clone> {
    generation: u64,
    request: SharedRequest<V>,
}

struct QueryEntry<V: Clone> {
    data: Option<V>,
    error: Option<FetchError>,
    updated_at: Option<DateTime<Utc>>,
    // Generation of the most recently issued request.
    generation: u64,
    in_flight: Option<InFlight<V>>,
}

impl<V: Clone> Default for QueryEntry<V> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            updated_at: None,
            generation: 0,
            in_flight: None,
        }
    }
}

/// A query cache scoped to its owner.
///
/// Overlapping callers for a key share one in-flight request. Every request
/// is stamped with a generation number and only the response of the latest
/// issued request for a key may update that key's entry.
#[derive(Clone)]
pub struct QueryCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    inner: Arc<Mutex<HashMap<K, QueryEntry<V>>>>,
}

impl<K, V> QueryCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + std::fmt::Debug + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Resolves `key`, calling `fetcher` only when a new request is needed.
    pub async fn fetch<F, Fut>(
        &self,
        key: &K,
        mode: FetchMode,
        fetcher: F,
    ) -> Result<V, FetchError>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<V, FetchError>> + Send + 'static,
    {
        let (generation, request) = {
            let mut cache = self.inner.lock().await;
            let entry = cache.entry(key.clone()).or_default();

            let joined = match mode {
                FetchMode::CacheFirst => {
                    if let Some(data) = &entry.data {
                        debug!("Cache HIT for key: {:?}", key);
                        return Ok(data.clone());
                    }
                    entry
                        .in_flight
                        .as_ref()
                        .map(|in_flight| (in_flight.generation, in_flight.request.clone()))
                }
                FetchMode::Refetch => None,
            };

            match joined {
                Some(in_flight) => {
                    debug!("Joining in-flight request for key: {:?}", key);
                    in_flight
                }
                None => {
                    entry.generation += 1;
                    debug!(
                        generation = entry.generation,
                        "Starting request for key: {:?}", key
                    );
                    let request = fetcher().boxed().shared();
                    entry.in_flight = Some(InFlight {
                        generation: entry.generation,
                        request: request.clone(),
                    });
                    (entry.generation, request)
                }
            }
        };

        let result = request.await;
        self.settle(key, generation, &result).await;
        result
    }

    async fn settle(&self, key: &K, generation: u64, result: &Result<V, FetchError>) {
        let mut cache = self.inner.lock().await;
        let Some(entry) = cache.get_mut(key) else {
            return;
        };

        if generation != entry.generation {
            debug!(
                generation,
                latest = entry.generation,
                "Discarding stale response for key: {:?}",
                key
            );
            return;
        }

        entry.in_flight = None;
        match result {
            Ok(value) => {
                debug!("Cache PUT for key: {:?}", key);
                entry.data = Some(value.clone());
                entry.error = None;
                entry.updated_at = Some(Utc::now());
            }
            Err(e) => {
                debug!("Request failed for key: {:?}: {}", key, e);
                entry.error = Some(e.clone());
            }
        }
    }

    /// Current data for `key`, without touching the network.
    pub async fn get(&self, key: &K) -> Option<V> {
        let cache = self.inner.lock().await;
        cache.get(key).and_then(|entry| entry.data.clone())
    }

    pub async fn state(&self, key: &K) -> QueryState<V> {
        let cache = self.inner.lock().await;
        cache
            .get(key)
            .map(|entry| QueryState {
                data: entry.data.clone(),
                error: entry.error.clone(),
                is_fetching: entry.in_flight.is_some(),
                updated_at: entry.updated_at,
            })
            .unwrap_or_default()
    }

    /// Drops the entry for `key`. A request still in flight for it will not
    /// repopulate the cache.
    pub async fn invalidate(&self, key: &K) {
        let mut cache = self.inner.lock().await;
        if let Some(entry) = cache.get_mut(key) {
            entry.generation += 1;
            entry.data = None;
            entry.error = None;
            entry.updated_at = None;
            entry.in_flight = None;
        }
        debug!("Cache INVALIDATE for key: {:?}", key);
    }
}

impl<K, V> Default for QueryCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + std::fmt::Debug + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
