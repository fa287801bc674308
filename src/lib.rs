pub mod cache;
pub mod config;
pub mod dropdowns;
pub mod query;
pub mod settings;

pub use dropdowns::{DropdownOptions, DropdownState};
pub use settings::{CachedSettingsClient, DropdownOption, SelectOption, SettingsClient};
