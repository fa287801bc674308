//! Per-consumer dropdown option resolution on top of the shared cache.

mod resolver;

pub use resolver::{DropdownOptions, DropdownState};
