//! Field-name resolution per entity kind.

use super::types::EntityKind;
use serde::{Deserialize, Serialize};

/// Maps an entity kind to the names of its location fields.
pub trait EntityFieldResolver {
    fn address_field_name(&self, kind: EntityKind) -> &str;
    fn location_type_field_name(&self, kind: EntityKind) -> &str;
}

/// Location field names of one entity kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldNames {
    pub address: String,
    pub location_type: String,
}

/// Field names used by recurring-event series and instances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventFieldNames {
    pub series: FieldNames,
    pub instance: FieldNames,
}

impl Default for EventFieldNames {
    fn default() -> Self {
        Self {
            series: FieldNames {
                address: "field_other_location".into(),
                location_type: "field_location".into(),
            },
            instance: FieldNames {
                address: "field_events_custom_other_loc".into(),
                location_type: "field_events_custom_location".into(),
            },
        }
    }
}

impl EventFieldNames {
    fn names(&self, kind: EntityKind) -> &FieldNames {
        match kind {
            EntityKind::Series => &self.series,
            EntityKind::Instance => &self.instance,
        }
    }
}

impl EntityFieldResolver for EventFieldNames {
    fn address_field_name(&self, kind: EntityKind) -> &str {
        &self.names(kind).address
    }

    fn location_type_field_name(&self, kind: EntityKind) -> &str {
        &self.names(kind).location_type
    }
}
