//! Core types for saved locations.

use crate::address::Address;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Identifier of a stored location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationId(pub u64);

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for LocationId {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(LocationId)
            .map_err(|_| StoreError::NotFound(s.to_string()))
    }
}

/// A reusable event address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    /// Record type, e.g. "event_location".
    pub bundle: String,
    pub title: String,
    pub address: Address,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Field values for a location that has not been created yet.
#[derive(Debug, Clone)]
pub struct NewLocation {
    pub bundle: String,
    pub title: String,
    pub address: Address,
    pub active: bool,
}

/// Conditions for [`LocationStore::query`](super::LocationStore::query).
#[derive(Debug, Clone, Default)]
pub struct LocationFilter {
    pub bundle: Option<String>,
    pub active: Option<bool>,
    /// Order by creation time, newest first. Otherwise ascending id.
    pub newest_first: bool,
}

impl LocationFilter {
    pub fn bundle(mut self, bundle: &str) -> Self {
        self.bundle = Some(bundle.to_string());
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    pub fn newest_first(mut self) -> Self {
        self.newest_first = true;
        self
    }

    pub fn matches(&self, location: &Location) -> bool {
        self.bundle.as_deref().is_none_or(|b| b == location.bundle)
            && self.active.is_none_or(|a| a == location.active)
    }
}

/// Location store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Location store I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Location store is corrupt: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Location not found: '{0}'")]
    NotFound(String),
}
