//! Caching implementations for settings types.

use crate::cache::Cacheable;

use super::types::DropdownOption;

impl Cacheable for DropdownOption {
  fn cache_key(&self) -> String {
    self.key.clone()
  }

  fn entity_type() -> &'static str {
    "dropdown_option"
  }
}

/// Cache key under which the options of `dropdown_type` are stored.
pub fn dropdown_cache_key(dropdown_type: &str) -> String {
  format!("dropdowns:{}", dropdown_type)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_cache_key_is_per_type() {
    assert_eq!(dropdown_cache_key("industry"), "dropdowns:industry");
    assert_ne!(dropdown_cache_key("industry"), dropdown_cache_key("priority"));
  }
}
