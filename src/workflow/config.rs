//! Workflow settings.

use serde::{Deserialize, Serialize};

/// Constants the workflow is built with. Every field has a default, so a
/// partial JSON document is enough to override one of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Record type of saved locations.
    pub location_bundle: String,
    /// Location-type value meaning "enter a custom address".
    pub other_location_value: String,
    /// Saved-location selector value meaning "nothing selected".
    pub none_selection: String,
    /// Filled address fields required when remembering an address.
    pub min_address_fields: usize,
    /// Label of the empty selector entry.
    pub select_placeholder: String,
    /// Label of the remember checkbox.
    pub remember_label: String,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            location_bundle: "event_location".into(),
            other_location_value: "other".into(),
            none_selection: "_none".into(),
            min_address_fields: 3,
            select_placeholder: "Select address".into(),
            remember_label: "Remember this address?".into(),
        }
    }
}

impl WorkflowConfig {
    pub fn address_required_message(&self) -> String {
        format!("The address is required if \"{}\" is checked.", self.remember_label)
    }
}
