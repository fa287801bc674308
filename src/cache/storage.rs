//! Cache storage trait and in-memory implementation.

use chrono::{DateTime, Utc};
use color_eyre::{eyre::eyre, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

use super::traits::Cacheable;

/// Result of a cached query lookup.
#[derive(Debug, Clone)]
pub struct CachedQueryResult<T> {
  /// The cached entities in order
  pub entities: Vec<T>,
  /// When the query result was cached
  pub cached_at: DateTime<Utc>,
}

/// Trait for cache storage backends.
pub trait CacheStorage: Send + Sync {
  /// Store entities from a query result, replacing anything stored under `key`.
  fn store_query_result<T: Cacheable>(
    &self,
    key: &str,
    entities: &[T],
    cached_at: DateTime<Utc>,
  ) -> Result<()>;

  /// Get cached entities for a query.
  fn get_query_result<T: Cacheable>(&self, key: &str) -> Result<Option<CachedQueryResult<T>>>;

  /// Remove a single query result. Missing keys are not an error.
  fn remove_query_result(&self, key: &str) -> Result<()>;

  /// Remove every query result.
  fn clear(&self) -> Result<()>;
}

/// A stored query result. Entities are kept serialized so one table can hold
/// any `Cacheable` type.
struct StoredQuery {
  entity_type: &'static str,
  entities: Vec<Value>,
  cached_at: DateTime<Utc>,
}

/// In-memory cache storage. Nothing is written to disk.
#[derive(Default)]
pub struct MemoryStorage {
  queries: Mutex<HashMap<String, StoredQuery>>,
}

impl MemoryStorage {
  pub fn new() -> Self {
    Self::default()
  }

  fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, StoredQuery>>> {
    self
      .queries
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))
  }

  /// Number of query results currently held.
  #[cfg(test)]
  pub fn len(&self) -> usize {
    self.lock().map(|q| q.len()).unwrap_or(0)
  }

  #[cfg(test)]
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

impl CacheStorage for MemoryStorage {
  fn store_query_result<T: Cacheable>(
    &self,
    key: &str,
    entities: &[T],
    cached_at: DateTime<Utc>,
  ) -> Result<()> {
    // Serialize before taking the lock so a bad entity leaves the old entry intact
    let entities = entities
      .iter()
      .map(|e| {
        serde_json::to_value(e)
          .map_err(|err| eyre!("Failed to serialize entity {}: {}", e.cache_key(), err))
      })
      .collect::<Result<Vec<_>>>()?;

    self.lock()?.insert(
      key.to_string(),
      StoredQuery {
        entity_type: T::entity_type(),
        entities,
        cached_at,
      },
    );

    Ok(())
  }

  fn get_query_result<T: Cacheable>(&self, key: &str) -> Result<Option<CachedQueryResult<T>>> {
    let (entities, cached_at) = {
      let queries = self.lock()?;
      match queries.get(key) {
        Some(stored) if stored.entity_type == T::entity_type() => {
          (stored.entities.clone(), stored.cached_at)
        }
        _ => return Ok(None),
      }
    };

    let entities = entities
      .into_iter()
      .map(serde_json::from_value)
      .collect::<serde_json::Result<Vec<T>>>()
      .map_err(|e| eyre!("Failed to deserialize cached entity: {}", e))?;

    Ok(Some(CachedQueryResult {
      entities,
      cached_at,
    }))
  }

  fn remove_query_result(&self, key: &str) -> Result<()> {
    self.lock()?.remove(key);
    Ok(())
  }

  fn clear(&self) -> Result<()> {
    self.lock()?.clear();
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde::{Deserialize, Serialize};

  #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
  struct Item {
    id: String,
  }

  impl Cacheable for Item {
    fn cache_key(&self) -> String {
      self.id.clone()
    }

    fn entity_type() -> &'static str {
      "item"
    }
  }

  #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
  struct Other {
    id: String,
  }

  impl Cacheable for Other {
    fn cache_key(&self) -> String {
      self.id.clone()
    }

    fn entity_type() -> &'static str {
      "other"
    }
  }

  fn items(ids: &[&str]) -> Vec<Item> {
    ids.iter().map(|id| Item { id: id.to_string() }).collect()
  }

  #[test]
  fn test_store_preserves_order() {
    let storage = MemoryStorage::new();
    storage
      .store_query_result("k", &items(&["c", "a", "b"]), Utc::now())
      .unwrap();

    let cached = storage.get_query_result::<Item>("k").unwrap().unwrap();
    assert_eq!(cached.entities, items(&["c", "a", "b"]));
  }

  #[test]
  fn test_store_replaces_instead_of_merging() {
    let storage = MemoryStorage::new();
    storage
      .store_query_result("k", &items(&["a", "b"]), Utc::now())
      .unwrap();
    storage
      .store_query_result("k", &items(&["z"]), Utc::now())
      .unwrap();

    let cached = storage.get_query_result::<Item>("k").unwrap().unwrap();
    assert_eq!(cached.entities, items(&["z"]));
  }

  #[test]
  fn test_lookup_with_wrong_entity_type_misses() {
    let storage = MemoryStorage::new();
    storage
      .store_query_result("k", &items(&["a"]), Utc::now())
      .unwrap();

    assert!(storage.get_query_result::<Other>("k").unwrap().is_none());
  }

  #[test]
  fn test_remove_and_clear() {
    let storage = MemoryStorage::new();
    storage
      .store_query_result("a", &items(&["1"]), Utc::now())
      .unwrap();
    storage
      .store_query_result("b", &items(&["2"]), Utc::now())
      .unwrap();

    storage.remove_query_result("a").unwrap();
    storage.remove_query_result("missing").unwrap();
    assert!(storage.get_query_result::<Item>("a").unwrap().is_none());
    assert_eq!(storage.len(), 1);

    storage.clear().unwrap();
    assert!(storage.is_empty());
  }
}
