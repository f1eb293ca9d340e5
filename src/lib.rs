//! Reusable event locations.
//!
//! Event forms can remember a custom address as a saved location, offer
//! saved locations for selection, and refill the address fields from the
//! chosen one.

pub mod address;
pub mod location;
pub mod logging;
pub mod server;
pub mod workflow;
