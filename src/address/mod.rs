//! Address values and country-aware title rendering.
//!
//! Addresses are plain value types compared field by field. Titles for saved
//! locations are rendered from per-country format templates.

pub mod format;
pub mod types;

pub use format::{AddressFormat, AddressFormatter, BuiltinFormats, FormatError, render_title};
pub use types::{Address, AddressField, DISPLAY_FIELDS};
