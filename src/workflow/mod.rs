//! The location reuse workflow for event forms.
//!
//! Validate:  remember flag set → address needs enough filled fields
//! Submit:    remember → location type "other" → address present → not yet saved → persist
//! Select:    "_none" → clear display fields, saved id → fill them from the location

pub mod config;
pub mod fields;
pub mod reuse;
pub mod types;

pub use config::WorkflowConfig;
pub use fields::{EntityFieldResolver, EventFieldNames, FieldNames};
pub use reuse::LocationReuseWorkflow;
pub use types::{
    EntityKind, EventEntity, FieldInstruction, FormSubmission, SelectOption, SkipReason,
    SubmitOutcome, ValidationError, WorkflowError,
};
