#[cfg(feature = "cache")]
use crate::Cache;
use crate::{HttpFetch, RedditProvider, Summary, SummaryError, SummaryProvider};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, instrument, warn};
use url::Url;

pub const MAX_CONCURRENT_REQUESTS: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStrategy {
    UseCache,
    NoCache,
}

/// SummaryService dispatches URLs to the first registered provider that accepts them.
/// Reddit is registered by default; more providers can be appended with [`SummaryService::with_provider`].
#[derive(Clone)]
pub struct SummaryService {
    providers: Vec<Arc<dyn SummaryProvider>>,
    #[cfg(feature = "cache")]
    cache: Cache,
    cache_strategy: CacheStrategy,
    // Max Concurrent Requests
    semaphore: Arc<Semaphore>,
}

impl SummaryService {
    /// Creates a service with a 1000-entry cache and the default Reddit provider.
    pub fn new() -> Result<Self, SummaryError> {
        Self::new_with_config(SummaryServiceConfig::new(1000))
    }

    pub fn no_cache() -> Result<Self, SummaryError> {
        Self::new_with_config(SummaryServiceConfig::new(0).with_cache_strategy(CacheStrategy::NoCache))
    }

    pub fn new_with_config(config: SummaryServiceConfig) -> Result<Self, SummaryError> {
        debug!(
            cache_capacity = config.cache_capacity,
            max_concurrent_requests = config.max_concurrent_requests,
            "Initializing SummaryService"
        );

        // a zero-permit semaphore would park every caller forever
        if config.max_concurrent_requests == 0 {
            warn!("max_concurrent_requests is 0, using 1");
        }
        let permits = config.max_concurrent_requests.max(1);

        let reddit = match config.fetcher {
            Some(fetcher) => RedditProvider::with_fetcher(fetcher),
            None => RedditProvider::new()?,
        };
        let reddit = match config.user_agent {
            Some(user_agent) => reddit.with_user_agent(user_agent),
            None => reddit,
        };

        Ok(Self {
            providers: vec![Arc::new(reddit)],
            #[cfg(feature = "cache")]
            cache: Cache::new(config.cache_capacity),
            cache_strategy: config.cache_strategy,
            semaphore: Arc::new(Semaphore::new(permits)),
        })
    }

    /// Appends a provider. Earlier providers win when several accept a URL.
    pub fn with_provider(mut self, provider: Arc<dyn SummaryProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn provider_for(&self, url: &Url) -> Option<&Arc<dyn SummaryProvider>> {
        self.providers.iter().find(|provider| provider.can_handle(url))
    }

    #[instrument(level = "debug", skip(self), err)]
    pub async fn summarize(&self, url: &str) -> Result<Summary, SummaryError> {
        #[cfg(feature = "cache")]
        if self.cache_strategy == CacheStrategy::UseCache {
            if let Some(cached) = self.cache.get(url).await {
                debug!("Cache hit");
                return Ok(cached);
            }
        }

        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| SummaryError::ConcurrencyLimitError)?;

        let parsed = Url::parse(url)?;
        let provider = self
            .provider_for(&parsed)
            .ok_or_else(|| SummaryError::UnsupportedUrl(url.to_string()))?;
        debug!(provider = provider.name(), "Dispatching to provider");

        let mut summary = provider.summarize(&parsed).await?;
        summary.url = url.to_string();

        #[cfg(feature = "cache")]
        if self.cache_strategy == CacheStrategy::UseCache {
            self.cache.set(url.to_string(), summary.clone()).await;
        }

        Ok(summary)
    }

    /// Summarizes every URL concurrently; results keep the input order.
    pub async fn summarize_batch(&self, urls: &[&str]) -> Vec<Result<Summary, SummaryError>> {
        let futures: Vec<_> = urls.iter().map(|url| self.summarize(url)).collect();
        futures::future::join_all(futures).await
    }

    pub fn cache_strategy(&self) -> CacheStrategy {
        self.cache_strategy
    }
}

pub struct SummaryServiceConfig {
    pub cache_capacity: usize,
    pub cache_strategy: CacheStrategy,
    pub max_concurrent_requests: usize,
    pub fetcher: Option<Arc<dyn HttpFetch>>,
    pub user_agent: Option<String>,
}

impl SummaryServiceConfig {
    pub fn new(cache_capacity: usize) -> Self {
        Self {
            cache_capacity,
            cache_strategy: CacheStrategy::UseCache,
            max_concurrent_requests: MAX_CONCURRENT_REQUESTS,
            fetcher: None,
            user_agent: None,
        }
    }

    pub fn with_fetcher(mut self, fetcher: Arc<dyn HttpFetch>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_max_concurrent_requests(mut self, max_concurrent_requests: usize) -> Self {
        self.max_concurrent_requests = max_concurrent_requests;
        self
    }

    pub fn with_cache_strategy(mut self, cache_strategy: CacheStrategy) -> Self {
        self.cache_strategy = cache_strategy;
        self
    }
}
