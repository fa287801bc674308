use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::{CacheResult, CacheSource};
use crate::query::Query;
use crate::settings::types::to_select_options;
use crate::settings::{CachedSettingsClient, DropdownOption, DropdownSource, SelectOption};

/// Snapshot of a resolver, for consumers that want owned data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DropdownState {
  pub options: Vec<DropdownOption>,
  pub select_options: Vec<SelectOption>,
  pub loading: bool,
  pub error: Option<String>,
  /// Where the current options came from, `None` when there are none
  pub source: Option<CacheSource>,
}

/// Options of one dropdown type, as seen by one consumer.
///
/// Bound to a `(dropdown_type, use_cache)` pair and re-resolved whenever
/// either changes. Construction resolves immediately: a fresh cache entry is
/// applied synchronously, anything else spawns a fetch that `poll()` or
/// `wait()` picks up. No method returns an error; failures show up in
/// `error()`. Dropping the resolver leaves in-flight fetches running, they
/// still fill the shared cache but never touch this resolver.
pub struct DropdownOptions<S: DropdownSource> {
  client: CachedSettingsClient<S>,
  dropdown_type: Option<String>,
  use_cache: bool,
  query: Query<CacheResult<Vec<DropdownOption>>>,
  select_options: Vec<SelectOption>,
}

impl<S: DropdownSource> DropdownOptions<S> {
  pub fn new(client: CachedSettingsClient<S>, dropdown_type: Option<&str>, use_cache: bool) -> Self {
    let mut resolver = Self {
      client,
      dropdown_type: normalize_type(dropdown_type),
      use_cache,
      query: Query::new(),
      select_options: Vec::new(),
    };
    resolver.resolve();
    resolver
  }

  /// Resolver for `dropdown_type` that reads from the cache while fresh.
  pub fn cached(client: CachedSettingsClient<S>, dropdown_type: &str) -> Self {
    Self::new(client, Some(dropdown_type), true)
  }

  pub fn client(&self) -> &CachedSettingsClient<S> {
    &self.client
  }

  pub fn dropdown_type(&self) -> Option<&str> {
    self.dropdown_type.as_deref()
  }

  pub fn use_cache(&self) -> bool {
    self.use_cache
  }

  /// Current options in backend order. Empty while nothing has loaded or
  /// after a failure.
  pub fn options(&self) -> &[DropdownOption] {
    self
      .query
      .data()
      .map(|result| result.data.as_slice())
      .unwrap_or(&[])
  }

  /// Whether the current options were served from the cache or the network.
  pub fn source(&self) -> Option<CacheSource> {
    self.query.data().map(|result| result.source)
  }

  /// When the current options were cached, if they were served from the cache.
  pub fn cached_at(&self) -> Option<DateTime<Utc>> {
    self.query.data().and_then(|result| result.cached_at)
  }

  /// `options()` projected for choice controls.
  pub fn select_options(&self) -> &[SelectOption] {
    &self.select_options
  }

  pub fn is_loading(&self) -> bool {
    self.query.is_loading()
  }

  pub fn error(&self) -> Option<&str> {
    self.query.error()
  }

  pub fn state(&self) -> DropdownState {
    DropdownState {
      options: self.options().to_vec(),
      select_options: self.select_options.clone(),
      loading: self.is_loading(),
      error: self.error().map(String::from),
      source: self.source(),
    }
  }

  /// Rebind to another dropdown type. Re-resolves only if it changed.
  pub fn set_type(&mut self, dropdown_type: Option<&str>) {
    let dropdown_type = normalize_type(dropdown_type);
    if dropdown_type != self.dropdown_type {
      self.dropdown_type = dropdown_type;
      self.resolve();
    }
  }

  /// Switch cache use on or off. Re-resolves only if it changed.
  pub fn set_use_cache(&mut self, use_cache: bool) {
    if use_cache != self.use_cache {
      self.use_cache = use_cache;
      self.resolve();
    }
  }

  /// Fetch from the backend regardless of cache freshness.
  pub fn refresh(&mut self) {
    if let Some(dropdown_type) = self.dropdown_type.clone() {
      self.fetch(dropdown_type);
    }
  }

  /// Pick up a finished fetch. Returns `true` if the state changed.
  pub fn poll(&mut self) -> bool {
    let changed = self.query.poll();
    if changed {
      self.sync_select_options();
    }
    changed
  }

  /// Wait for the pending fetch, if any. Returns `true` if the state changed.
  pub async fn wait(&mut self) -> bool {
    let changed = self.query.wait().await;
    if changed {
      self.sync_select_options();
    }
    changed
  }

  fn resolve(&mut self) {
    let dropdown_type = match self.dropdown_type.clone() {
      Some(t) => t,
      None => {
        self.query.reset();
        self.sync_select_options();
        return;
      }
    };

    if self.use_cache {
      if let Some(hit) = self.client.cached_options(&dropdown_type) {
        debug!(%dropdown_type, count = hit.data.len(), "dropdown options served from cache");
        self.query.set_data(hit);
        self.sync_select_options();
        return;
      }
    }

    self.fetch(dropdown_type);
  }

  fn fetch(&mut self, dropdown_type: String) {
    let request = self.client.refresh_dropdown_options(&dropdown_type);
    self.query.spawn(async move {
      match request.await {
        Ok(result) => {
          debug!(%dropdown_type, count = result.data.len(), "dropdown options fetched");
          Ok(result)
        }
        Err(e) => {
          warn!(%dropdown_type, error = %e, "failed to load dropdown options");
          Err(e.to_string())
        }
      }
    });
  }

  fn sync_select_options(&mut self) {
    self.select_options = to_select_options(self.options());
  }
}

/// Blank types mean "nothing to fetch".
fn normalize_type(dropdown_type: Option<&str>) -> Option<String> {
  dropdown_type
    .filter(|t| !t.is_empty())
    .map(String::from)
}
