//! In-process dropdown source for tests.

use color_eyre::{eyre::eyre, Result};
use futures::future::{BoxFuture, FutureExt};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::source::DropdownSource;
use super::types::DropdownOption;

#[derive(Clone)]
enum Response {
  Options(Vec<DropdownOption>),
  Error(String),
}

#[derive(Default)]
struct State {
  responses: HashMap<String, Response>,
  delays: HashMap<String, Duration>,
}

/// Per-type request counter shared with a [`FakeSource`].
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<HashMap<String, usize>>>);

impl CallLog {
  pub fn count(&self, dropdown_type: &str) -> usize {
    self
      .0
      .lock()
      .unwrap()
      .get(dropdown_type)
      .copied()
      .unwrap_or(0)
  }

  pub fn total(&self) -> usize {
    self.0.lock().unwrap().values().sum()
  }
}

/// Fake backend. Clones share responses and the call log, so a test can keep
/// a handle and change what the backend returns after handing it out.
#[derive(Clone, Default)]
pub struct FakeSource {
  state: Arc<Mutex<State>>,
  calls: CallLog,
}

pub fn options(pairs: &[(&str, &str)]) -> Vec<DropdownOption> {
  pairs
    .iter()
    .map(|(key, label)| DropdownOption::new(*key, *label))
    .collect()
}

impl FakeSource {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_options(self, dropdown_type: &str, pairs: &[(&str, &str)]) -> Self {
    self.set_options(dropdown_type, options(pairs));
    self
  }

  pub fn with_error(self, dropdown_type: &str, message: &str) -> Self {
    self.set_error(dropdown_type, message);
    self
  }

  pub fn set_options(&self, dropdown_type: &str, options: Vec<DropdownOption>) {
    self
      .state
      .lock()
      .unwrap()
      .responses
      .insert(dropdown_type.to_string(), Response::Options(options));
  }

  pub fn set_error(&self, dropdown_type: &str, message: &str) {
    self
      .state
      .lock()
      .unwrap()
      .responses
      .insert(dropdown_type.to_string(), Response::Error(message.to_string()));
  }

  /// Delay responses for `dropdown_type`; applies to requests issued afterwards.
  pub fn set_delay(&self, dropdown_type: &str, delay: Duration) {
    self
      .state
      .lock()
      .unwrap()
      .delays
      .insert(dropdown_type.to_string(), delay);
  }

  pub fn calls(&self) -> CallLog {
    self.calls.clone()
  }
}

impl DropdownSource for FakeSource {
  fn fetch_options(&self, dropdown_type: &str) -> BoxFuture<'static, Result<Vec<DropdownOption>>> {
    *self
      .calls
      .0
      .lock()
      .unwrap()
      .entry(dropdown_type.to_string())
      .or_default() += 1;

    let (response, delay) = {
      let state = self.state.lock().unwrap();
      (
        state.responses.get(dropdown_type).cloned(),
        state.delays.get(dropdown_type).copied(),
      )
    };
    let dropdown_type = dropdown_type.to_string();

    async move {
      if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
      }
      match response {
        Some(Response::Options(options)) => Ok(options),
        Some(Response::Error(message)) => Err(eyre!("{}", message)),
        None => Err(eyre!("no fake response for {}", dropdown_type)),
      }
    }
    .boxed()
  }
}
