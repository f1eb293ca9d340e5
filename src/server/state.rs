use crate::address::BuiltinFormats;
use crate::location::JsonLocationStore;
use crate::workflow::{EventFieldNames, LocationReuseWorkflow};
use std::sync::Mutex;

/// The workflow wired to the JSON store and built-in address formats.
pub type AppWorkflow = LocationReuseWorkflow<JsonLocationStore, BuiltinFormats, EventFieldNames>;

pub struct AppState {
    pub workflow: Mutex<AppWorkflow>,
}
