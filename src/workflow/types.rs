//! Types exchanged between the workflow and the form runtime.

use crate::address::{Address, FormatError};
use crate::location::{Location, LocationId, StoreError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Which kind of event entity owns the form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// A recurring event series.
    Series,
    /// A single occurrence.
    #[default]
    Instance,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Series => write!(f, "series"),
            Self::Instance => write!(f, "instance"),
        }
    }
}

/// Field values of the event entity being saved.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventEntity {
    pub kind: EntityKind,
    /// Plain-valued fields, e.g. the location type selector.
    #[serde(default)]
    pub values: BTreeMap<String, String>,
    /// Address-valued fields.
    #[serde(default)]
    pub addresses: BTreeMap<String, Address>,
}

impl EventEntity {
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }

    pub fn with_value(mut self, field: &str, value: &str) -> Self {
        self.values.insert(field.to_string(), value.to_string());
        self
    }

    pub fn with_address(mut self, field: &str, address: Address) -> Self {
        self.addresses.insert(field.to_string(), address);
        self
    }

    pub fn value(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    pub fn address(&self, field: &str) -> Option<&Address> {
        self.addresses.get(field)
    }
}

/// The location-related values a user submitted with the form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormSubmission {
    /// Value of the saved-location selector, if it was shown.
    #[serde(default)]
    pub saved_location: Option<String>,
    /// "Remember this address?"
    #[serde(default)]
    pub remember: bool,
    #[serde(default)]
    pub address: Option<Address>,
}

/// Set the form element `field` to `value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldInstruction {
    pub field: String,
    pub value: String,
}

/// One entry of the saved-location selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

/// Why a submission did not create a location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    NotRemembered,
    NotOtherLocation,
    EmptyAddress,
    AlreadySaved(LocationId),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotRemembered => write!(f, "address not marked to remember"),
            Self::NotOtherLocation => write!(f, "location type is not 'other'"),
            Self::EmptyAddress => write!(f, "address is empty"),
            Self::AlreadySaved(id) => write!(f, "address already saved as location {}", id),
        }
    }
}

/// Result of the submit step.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmitOutcome {
    Persisted { location: Location },
    Skipped { reason: SkipReason },
}

/// A field-level error shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{message}")]
pub struct ValidationError {
    /// Name of the offending form field.
    pub field: String,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Format(#[from] FormatError),
}
