//! Cache layer that orchestrates caching logic with network fetching.

use chrono::{DateTime, Duration, Utc};
use color_eyre::Result;
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

use super::clock::{Clock, SystemClock};
use super::storage::CacheStorage;
use super::traits::{CacheResult, Cacheable};

/// How long a cached list is served before it is fetched again.
pub const DEFAULT_TTL: Duration = Duration::minutes(5);

/// Cache layer that manages caching logic and network fetching.
///
/// This layer sits between the application and the network client. Clones
/// share the same storage, so one layer handle can be passed to every
/// consumer in the process.
pub struct CacheLayer<S: CacheStorage> {
  storage: Arc<S>,
  clock: Arc<dyn Clock>,
}

impl<S: CacheStorage> CacheLayer<S> {
  /// Create a new cache layer with the given storage backend.
  pub fn new(storage: S) -> Self {
    Self {
      storage: Arc::new(storage),
      clock: Arc::new(SystemClock),
    }
  }

  /// Use a different time source for freshness checks and timestamps.
  pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
    self.clock = Arc::new(clock);
    self
  }

  #[cfg(test)]
  pub fn storage(&self) -> &S {
    &self.storage
  }

  /// An entry is fresh while `now - cached_at < DEFAULT_TTL`.
  fn is_stale(&self, cached_at: DateTime<Utc>) -> bool {
    self.clock.now() - cached_at >= DEFAULT_TTL
  }

  /// Look up a fresh cached list without touching the network.
  pub fn get_fresh<T: Cacheable>(&self, key: &str) -> Result<Option<CacheResult<Vec<T>>>> {
    match self.storage.get_query_result::<T>(key)? {
      Some(cached) if !self.is_stale(cached.cached_at) => Ok(Some(CacheResult::from_cache(
        cached.entities,
        cached.cached_at,
      ))),
      Some(_) => {
        debug!(key, "cache entry expired");
        Ok(None)
      }
      None => Ok(None),
    }
  }

  /// Fetch a list from the network regardless of what is cached, then store it.
  ///
  /// A failed fetch is returned as an error and leaves the cache untouched.
  pub async fn refresh_list<T, F, Fut>(
    &self,
    key: &str,
    fetcher: F,
  ) -> Result<CacheResult<Vec<T>>>
  where
    T: Cacheable,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
  {
    debug!(key, "fetching from network");
    let data = fetcher().await?;
    self
      .storage
      .store_query_result(key, &data, self.clock.now())?;
    Ok(CacheResult::from_network(data))
  }

  /// Drop the cached entry for `key`, if any.
  pub fn invalidate(&self, key: &str) -> Result<()> {
    debug!(key, "invalidating cache entry");
    self.storage.remove_query_result(key)
  }

  /// Drop every cached entry.
  pub fn invalidate_all(&self) -> Result<()> {
    debug!("invalidating all cache entries");
    self.storage.clear()
  }
}

impl<S: CacheStorage> Clone for CacheLayer<S> {
  fn clone(&self) -> Self {
    Self {
      storage: Arc::clone(&self.storage),
      clock: Arc::clone(&self.clock),
    }
  }
}
