//! Core traits and types for the caching system.

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};

/// Trait for entities that can be cached.
///
/// Entities are stored serialized, so anything round-tripping through JSON
/// (including passthrough fields) comes back out unchanged.
pub trait Cacheable: Clone + Send + Sync + Serialize + DeserializeOwned {
  /// Identifier of this entity within its list (e.g., option key)
  fn cache_key(&self) -> String;

  /// Entity type name for storage organization (e.g., "dropdown_option")
  fn entity_type() -> &'static str;
}

/// Result from a cache operation, including data and metadata about the source.
#[derive(Debug, Clone)]
pub struct CacheResult<T> {
  /// The actual data
  pub data: T,
  /// Where the data came from
  pub source: CacheSource,
  /// When the data was cached (if from cache)
  pub cached_at: Option<DateTime<Utc>>,
}

impl<T> CacheResult<T> {
  /// Create a new cache result from fresh network data.
  pub fn from_network(data: T) -> Self {
    Self {
      data,
      source: CacheSource::Network,
      cached_at: None,
    }
  }

  /// Create a new cache result from cached data.
  pub fn from_cache(data: T, cached_at: DateTime<Utc>) -> Self {
    Self {
      data,
      source: CacheSource::CacheFresh,
      cached_at: Some(cached_at),
    }
  }
}

/// Indicates where cached data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CacheSource {
  /// Fresh data from network
  #[serde(rename = "network")]
  Network,
  /// Data from cache, still within its time-to-live
  #[serde(rename = "cache")]
  CacheFresh,
}

impl std::fmt::Display for CacheSource {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      CacheSource::Network => f.write_str("network"),
      CacheSource::CacheFresh => f.write_str("cache"),
    }
  }
}
