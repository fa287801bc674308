//! Settings client wrapper that adds the shared dropdown-options cache.

use color_eyre::Result;
use std::sync::Arc;
use tracing::warn;

use crate::cache::{CacheLayer, CacheResult, MemoryStorage};

use super::cache::dropdown_cache_key;
use super::source::DropdownSource;
use super::types::DropdownOption;

/// Dropdown source with a process-wide, in-memory options cache.
///
/// Clones share both the source and the cache, so one instance is created at
/// startup and handed to every consumer.
pub struct CachedSettingsClient<S: DropdownSource> {
  inner: Arc<S>,
  cache: CacheLayer<MemoryStorage>,
}

impl<S: DropdownSource> CachedSettingsClient<S> {
  /// Wrap `inner` with a fresh cache using the default time-to-live.
  pub fn new(inner: S) -> Self {
    Self::with_cache(inner, CacheLayer::new(MemoryStorage::new()))
  }

  pub fn with_cache(inner: S, cache: CacheLayer<MemoryStorage>) -> Self {
    Self {
      inner: Arc::new(inner),
      cache,
    }
  }

  /// Options for `dropdown_type` if a fresh entry is cached. Never hits the network.
  pub fn cached_options(&self, dropdown_type: &str) -> Option<CacheResult<Vec<DropdownOption>>> {
    match self.cache.get_fresh(&dropdown_cache_key(dropdown_type)) {
      Ok(hit) => hit,
      Err(e) => {
        warn!(dropdown_type, error = %e, "cache lookup failed, treating as miss");
        None
      }
    }
  }

  /// Fetch options from the backend and replace the cached entry.
  ///
  /// The returned future owns everything it needs, so it can be spawned.
  pub fn refresh_dropdown_options(
    &self,
    dropdown_type: &str,
  ) -> impl std::future::Future<Output = Result<CacheResult<Vec<DropdownOption>>>> + Send + 'static
  {
    let cache = self.cache.clone();
    let fetch = self.inner.fetch_options(dropdown_type);
    let key = dropdown_cache_key(dropdown_type);
    async move { cache.refresh_list(&key, || fetch).await }
  }

  /// Drop the cached options of one type, or of every type when `None`.
  ///
  /// Does not refetch and does not touch fetches already in flight.
  pub fn invalidate(&self, dropdown_type: Option<&str>) {
    let result = match dropdown_type {
      Some(t) => self.cache.invalidate(&dropdown_cache_key(t)),
      None => self.cache.invalidate_all(),
    };
    if let Err(e) = result {
      warn!(?dropdown_type, error = %e, "failed to invalidate dropdown cache");
    }
  }
}

impl<S: DropdownSource> Clone for CachedSettingsClient<S> {
  fn clone(&self) -> Self {
    Self {
      inner: Arc::clone(&self.inner),
      cache: self.cache.clone(),
    }
  }
}
