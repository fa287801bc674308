pub mod api_types;
pub mod cache;
pub mod cached_client;
pub mod client;
pub mod source;
#[cfg(test)]
pub mod testing;
pub mod types;

pub use cached_client::CachedSettingsClient;
pub use client::SettingsClient;
pub use source::DropdownSource;
pub use types::{DropdownOption, SelectOption};
