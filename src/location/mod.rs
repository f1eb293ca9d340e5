//! Saved event locations.
//!
//! Provides the location record, the storage interface with a JSON-file
//! implementation, and exact-match address deduplication.

pub mod dedup;
pub mod store;
pub mod types;

pub use dedup::LocationDeduplicator;
pub use store::{JsonLocationStore, LocationStore};
pub use types::{Location, LocationFilter, LocationId, NewLocation, StoreError};
