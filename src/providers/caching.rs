use crate::core::cache::{FetchMode, QueryCache, QueryState};
use crate::core::rate::{FetchError, Rate, RateProvider};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Key the rate is cached under.
pub const RATE_QUERY_KEY: &str = "eur-rate";

// Caching for RateProvider
#[derive(Clone)]
pub struct CachingRateProvider<T: RateProvider + 'static> {
    inner: Arc<T>,
    cache: QueryCache<&'static str, Rate>,
}

impl<T: RateProvider + 'static> CachingRateProvider<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner: Arc::new(inner),
            cache: QueryCache::new(),
        }
    }

    async fn load(&self, mode: FetchMode) -> Result<Rate, FetchError> {
        let inner = Arc::clone(&self.inner);
        self.cache
            .fetch(&RATE_QUERY_KEY, mode, move || async move {
                inner.fetch_rate().await
            })
            .await
    }

    /// Forces a new request. The cached rate stays visible until it lands.
    pub async fn refetch(&self) -> Result<Rate, FetchError> {
        debug!("Refetching rate");
        self.load(FetchMode::Refetch).await
    }

    pub async fn invalidate(&self) {
        self.cache.invalidate(&RATE_QUERY_KEY).await;
    }

    /// Last successfully fetched rate, if any.
    pub async fn current(&self) -> Option<Rate> {
        self.cache.get(&RATE_QUERY_KEY).await
    }

    pub async fn state(&self) -> QueryState<Rate> {
        self.cache.state(&RATE_QUERY_KEY).await
    }
}

#[async_trait]
impl<T: RateProvider + 'static> RateProvider for CachingRateProvider<T> {
    async fn fetch_rate(&self) -> Result<Rate, FetchError> {
        self.load(FetchMode::CacheFirst).await
    }
}
