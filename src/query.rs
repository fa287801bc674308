//! Async query abstraction for data fetching with loading and error state.
//!
//! A `Query<T>` owns at most one pending fetch. Fetches run as spawned tasks
//! and report back over a channel; the owner picks the result up with
//! `poll()` from its event loop, or awaits it with `wait()`.
//!
//! # Example
//!
//! ```ignore
//! let mut query = Query::new();
//! query.spawn(async move { client.load().await.map_err(|e| e.to_string()) });
//!
//! // In event loop tick
//! if query.poll() {
//!     // State changed, trigger re-render
//! }
//!
//! // In render
//! if let Some(error) = query.error() {
//!     render_error(error)
//! } else {
//!     render_data(query.data(), query.is_loading())
//! }
//! ```

use std::future::Future;
use tokio::sync::mpsc;

/// Async query with state management.
///
/// Unlike a plain state enum, the last successful data stays readable while
/// a new fetch is loading. A failed fetch clears it.
pub struct Query<T> {
  loading: bool,
  data: Option<T>,
  error: Option<String>,
  receiver: Option<mpsc::UnboundedReceiver<Result<T, String>>>,
}

impl<T: Send + 'static> Query<T> {
  pub fn new() -> Self {
    Self {
      loading: false,
      data: None,
      error: None,
      receiver: None,
    }
  }

  /// Get the most recent data, if any.
  pub fn data(&self) -> Option<&T> {
    self.data.as_ref()
  }

  pub fn is_loading(&self) -> bool {
    self.loading
  }

  /// Get the error message if the last fetch failed.
  pub fn error(&self) -> Option<&str> {
    self.error.as_deref()
  }

  /// Back to idle with no data. Any pending fetch result is ignored.
  pub fn reset(&mut self) {
    self.receiver = None;
    self.loading = false;
    self.data = None;
    self.error = None;
  }

  /// Set data directly, e.g. from a cache. Any pending fetch result is ignored.
  pub fn set_data(&mut self, data: T) {
    self.receiver = None;
    self.loading = false;
    self.data = Some(data);
    self.error = None;
  }

  /// Start a fetch with the given future.
  ///
  /// A fetch already pending is not aborted, but its result will be
  /// ignored: only the latest spawned fetch updates this query.
  pub fn spawn<Fut>(&mut self, future: Fut)
  where
    Fut: Future<Output = Result<T, String>> + Send + 'static,
  {
    let (tx, rx) = mpsc::unbounded_channel();
    self.receiver = Some(rx);
    self.loading = true;
    self.error = None;

    tokio::spawn(async move {
      let result = future.await;
      // Ignore send errors - the query was dropped or moved on
      let _ = tx.send(result);
    });
  }

  /// Poll for results from a pending fetch.
  ///
  /// Returns `true` if the state changed (data arrived or error occurred).
  /// Call this in your event loop tick handler.
  pub fn poll(&mut self) -> bool {
    let receiver = match &mut self.receiver {
      Some(rx) => rx,
      None => return false,
    };

    // Try to receive without blocking
    match receiver.try_recv() {
      Ok(result) => self.apply(Some(result)),
      Err(mpsc::error::TryRecvError::Empty) => false,
      Err(mpsc::error::TryRecvError::Disconnected) => self.apply(None),
    }
  }

  /// Wait for the pending fetch, if any, and apply its result.
  ///
  /// Returns `true` if the state changed.
  pub async fn wait(&mut self) -> bool {
    let result = match &mut self.receiver {
      Some(rx) => rx.recv().await,
      None => return false,
    };
    self.apply(result)
  }

  fn apply(&mut self, result: Option<Result<T, String>>) -> bool {
    self.receiver = None;
    self.loading = false;
    match result {
      Some(Ok(data)) => {
        self.data = Some(data);
        self.error = None;
      }
      Some(Err(error)) => {
        self.data = None;
        self.error = Some(error);
      }
      None => {
        // Sender dropped without sending (the task panicked)
        self.data = None;
        self.error = Some("Query was cancelled".to_string());
      }
    }
    true
  }
}

impl<T: Send + 'static> Default for Query<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Query<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Query")
      .field("loading", &self.loading)
      .field("data", &self.data)
      .field("error", &self.error)
      .finish_non_exhaustive()
  }
}
