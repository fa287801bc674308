//! Generic in-memory caching layer with a fixed time-to-live.
//!
//! This module is agnostic of what is being cached:
//! - Caches ordered lists of entities under a string key
//! - Serves a list without network access while it is younger than the TTL
//! - Replaces lists wholesale on refetch, never merges
//! - Supports dropping one key or everything

mod clock;
mod layer;
mod storage;
mod traits;

#[cfg(test)]
pub use clock::ManualClock;
pub use clock::{Clock, SystemClock};
pub use layer::{CacheLayer, DEFAULT_TTL};
pub use storage::{CacheStorage, CachedQueryResult, MemoryStorage};
pub use traits::{CacheResult, CacheSource, Cacheable};
