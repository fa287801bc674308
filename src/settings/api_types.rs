//! Serde-deserializable types matching the settings API responses.
//!
//! These are kept separate from domain types so a loosely shaped body can be
//! read without failing, and interpreted afterwards.

use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use super::types::DropdownOption;

/// Message used when the backend gives no reason for a failure.
pub const GENERIC_ERROR: &str = "Failed to load dropdown options";

/// Body of `GET /settings/dropdowns/{type}`.
#[derive(Debug, Default, Deserialize)]
pub struct ApiDropdownResponse {
  #[serde(default)]
  pub success: bool,
  /// Kept untyped so a malformed list degrades instead of failing the parse
  #[serde(default)]
  pub options: Option<Value>,
  #[serde(default)]
  pub message: Option<String>,
}

impl ApiDropdownResponse {
  /// Backend message, or the generic one when absent or blank.
  pub fn error_message(&self) -> String {
    self
      .message
      .as_deref()
      .map(str::trim)
      .filter(|m| !m.is_empty())
      .unwrap_or(GENERIC_ERROR)
      .to_string()
  }

  /// Convert the `options` array into domain options.
  ///
  /// A missing or non-array `options` is an empty list. Entries that are not
  /// JSON objects are skipped.
  pub fn into_options(self, dropdown_type: &str) -> Vec<DropdownOption> {
    let items = match self.options {
      Some(Value::Array(items)) => items,
      Some(Value::Null) | None => return Vec::new(),
      Some(other) => {
        warn!(dropdown_type, kind = value_kind(&other), "options is not an array");
        return Vec::new();
      }
    };

    items
      .into_iter()
      .enumerate()
      .filter_map(|(index, item)| match serde_json::from_value(item) {
        Ok(option) => Some(option),
        Err(e) => {
          warn!(dropdown_type, index, error = %e, "skipping malformed dropdown option");
          None
        }
      })
      .collect()
  }
}

fn value_kind(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "bool",
    Value::Number(_) => "number",
    Value::String(_) => "string",
    Value::Array(_) => "array",
    Value::Object(_) => "object",
  }
}

/// Interpret a raw HTTP response from the dropdowns endpoint.
///
/// Non-2xx statuses and `success: false` bodies are treated the same way:
/// an error carrying the backend message, or the generic message.
pub fn parse_dropdown_response(
  dropdown_type: &str,
  status: u16,
  body: &[u8],
) -> Result<Vec<DropdownOption>> {
  let parsed: Option<ApiDropdownResponse> = serde_json::from_slice(body).ok();
  let is_success = (200..300).contains(&status);

  match parsed {
    Some(response) if is_success && response.success => Ok(response.into_options(dropdown_type)),
    Some(response) => Err(eyre!("{}", response.error_message())),
    None => {
      warn!(dropdown_type, status, "unreadable dropdowns response body");
      Err(eyre!("{}", GENERIC_ERROR))
    }
  }
}
