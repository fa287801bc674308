use color_eyre::Result;
use futures::future::BoxFuture;

use super::types::DropdownOption;

/// Anything that can produce the complete option list for a dropdown type.
///
/// Futures are `'static` so a fetch can be spawned and outlive the caller.
pub trait DropdownSource: Send + Sync + 'static {
  fn fetch_options(&self, dropdown_type: &str) -> BoxFuture<'static, Result<Vec<DropdownOption>>>;
}
