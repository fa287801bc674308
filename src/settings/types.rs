use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One selectable choice of a dropdown type.
///
/// Fields the backend sends beyond the known ones are kept in `extra` and
/// written back out unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropdownOption {
  /// Dropdown type this option belongs to, when the backend echoes it
  #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
  pub dropdown_type: Option<String>,
  /// Value stored when this option is chosen; unique within its type
  #[serde(default, deserialize_with = "null_as_empty")]
  pub key: String,
  #[serde(default, deserialize_with = "null_as_empty")]
  pub label: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub color: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub icon: Option<String>,
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

/// Explicit `null` reads the same as a missing field.
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
  Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl DropdownOption {
  pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
    Self {
      dropdown_type: None,
      key: key.into(),
      label: label.into(),
      color: None,
      icon: None,
      extra: Map::new(),
    }
  }

  pub fn with_color(mut self, color: impl Into<String>) -> Self {
    self.color = Some(color.into());
    self
  }

  pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
    self.icon = Some(icon.into());
    self
  }
}

/// Generic `{ value, label, color, icon }` shape for choice controls.
///
/// `value` is the option key. The original option is kept alongside and
/// serialized flat, so every raw field is still readable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectOption {
  pub value: String,
  pub label: String,
  pub color: Option<String>,
  pub icon: Option<String>,
  #[serde(skip)]
  pub option: DropdownOption,
  #[serde(flatten)]
  passthrough: Map<String, Value>,
}

impl From<&DropdownOption> for SelectOption {
  fn from(option: &DropdownOption) -> Self {
    let mut passthrough = option.extra.clone();
    // Projected fields win over raw fields of the same name
    for field in ["value", "label", "color", "icon"] {
      passthrough.remove(field);
    }
    passthrough.insert("key".to_string(), Value::String(option.key.clone()));
    if let Some(t) = &option.dropdown_type {
      passthrough.insert("type".to_string(), Value::String(t.clone()));
    }

    Self {
      value: option.key.clone(),
      label: option.label.clone(),
      color: option.color.clone(),
      icon: option.icon.clone(),
      option: option.clone(),
      passthrough,
    }
  }
}

/// Project raw options into selectable options, keeping order.
pub fn to_select_options(options: &[DropdownOption]) -> Vec<SelectOption> {
  options.iter().map(SelectOption::from).collect()
}
