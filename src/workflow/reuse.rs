//! The location reuse workflow.

use super::config::WorkflowConfig;
use super::fields::EntityFieldResolver;
use super::types::{
    EntityKind, EventEntity, FieldInstruction, FormSubmission, SelectOption, SkipReason,
    SubmitOutcome, ValidationError, WorkflowError,
};
use crate::address::{Address, AddressFormatter, DISPLAY_FIELDS};
use crate::location::{
    LocationDeduplicator, LocationFilter, LocationId, LocationStore, NewLocation,
};
use tracing::{debug, info};

/// Remembers submitted event addresses as reusable locations and fills
/// forms back in from saved ones.
pub struct LocationReuseWorkflow<S, F, R> {
    store: S,
    formatter: F,
    fields: R,
    config: WorkflowConfig,
    dedup: LocationDeduplicator,
}

impl<S, F, R> LocationReuseWorkflow<S, F, R>
where
    S: LocationStore,
    F: AddressFormatter,
    R: EntityFieldResolver,
{
    pub fn new(store: S, formatter: F, fields: R, config: WorkflowConfig) -> Self {
        Self {
            store,
            formatter,
            fields,
            config,
            dedup: LocationDeduplicator,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// Reject a submission that asks to remember an address with fewer
    /// than `min_address_fields` filled fields.
    pub fn validate(&self, kind: EntityKind, submission: &FormSubmission) -> Result<(), ValidationError> {
        self.check_address(kind, submission.remember, submission.address.as_ref())
    }

    fn check_address(
        &self,
        kind: EntityKind,
        remember: bool,
        address: Option<&Address>,
    ) -> Result<(), ValidationError> {
        if !remember {
            return Ok(());
        }
        let filled = address.map_or(0, |a| a.filled_count());
        if filled < self.config.min_address_fields {
            let field = self.fields.address_field_name(kind).to_string();
            debug!(%kind, %field, filled, "remembered address is incomplete");
            return Err(ValidationError {
                field,
                message: self.config.address_required_message(),
            });
        }
        Ok(())
    }

    /// Save the entity's address as a new location if the user asked for it
    /// and it is not saved already. Call only after [`validate`](Self::validate)
    /// passed.
    pub fn submit(
        &mut self,
        submission: &FormSubmission,
        entity: &EventEntity,
    ) -> Result<SubmitOutcome, WorkflowError> {
        let outcome = self.submit_inner(submission, entity)?;
        match &outcome {
            SubmitOutcome::Persisted { location } => {
                info!(id = %location.id, title = %location.title, "remembered event location")
            }
            SubmitOutcome::Skipped { reason } => debug!(%reason, "location not saved"),
        }
        Ok(outcome)
    }

    fn submit_inner(
        &mut self,
        submission: &FormSubmission,
        entity: &EventEntity,
    ) -> Result<SubmitOutcome, WorkflowError> {
        let skipped = |reason| -> Result<SubmitOutcome, WorkflowError> {
            Ok(SubmitOutcome::Skipped { reason })
        };

        if !submission.remember {
            return skipped(SkipReason::NotRemembered);
        }

        let type_field = self.fields.location_type_field_name(entity.kind);
        if entity.value(type_field) != Some(self.config.other_location_value.as_str()) {
            return skipped(SkipReason::NotOtherLocation);
        }

        let address_field = self.fields.address_field_name(entity.kind);
        let address = match entity.address(address_field) {
            Some(a) if !a.is_empty() => a.clone(),
            _ => return skipped(SkipReason::EmptyAddress),
        };

        let filter = LocationFilter::default()
            .bundle(&self.config.location_bundle)
            .active(true);
        let ids = self.store.query(&filter)?;
        let existing = self.store.load_many(&ids)?;
        if let Some(found) = self.dedup.find_match(&address, &existing) {
            return skipped(SkipReason::AlreadySaved(found.id));
        }

        let title = self.formatter.title_for(&address)?;
        let location = self.store.create(NewLocation {
            bundle: self.config.location_bundle.clone(),
            title,
            address,
            active: true,
        })?;
        self.store.save(&location)?;
        Ok(SubmitOutcome::Persisted { location })
    }

    /// Validate the entity's address (the one that gets saved), then submit.
    pub fn process(
        &mut self,
        submission: &FormSubmission,
        entity: &EventEntity,
    ) -> Result<SubmitOutcome, WorkflowError> {
        let address = entity.address(self.fields.address_field_name(entity.kind));
        self.check_address(entity.kind, submission.remember, address)?;
        self.submit(submission, entity)
    }

    /// Instructions for the address display fields after the saved-location
    /// selector changed to `selection`.
    pub fn resolve_selection(
        &self,
        kind: EntityKind,
        selection: &str,
    ) -> Result<Vec<FieldInstruction>, WorkflowError> {
        let address_field = self.fields.address_field_name(kind);
        let element = |key: &str| format!("{}[0][address][{}]", address_field, key);

        if selection == self.config.none_selection {
            return Ok(DISPLAY_FIELDS
                .iter()
                .map(|f| FieldInstruction {
                    field: element(f.key()),
                    value: String::new(),
                })
                .collect());
        }

        let id: LocationId = selection.parse()?;
        let location = self.store.load(id)?;
        debug!(%id, title = %location.title, "filling address from saved location");
        Ok(DISPLAY_FIELDS
            .iter()
            .map(|&f| FieldInstruction {
                field: element(f.key()),
                value: location.address.get(f).to_string(),
            })
            .collect())
    }

    /// Field instructions for the selector value carried by `submission`;
    /// no value counts as the "nothing selected" sentinel.
    pub fn refill(
        &self,
        kind: EntityKind,
        submission: &FormSubmission,
    ) -> Result<Vec<FieldInstruction>, WorkflowError> {
        let selection = submission
            .saved_location
            .as_deref()
            .unwrap_or(&self.config.none_selection);
        self.resolve_selection(kind, selection)
    }

    /// Options for the saved-location selector, newest first behind a
    /// placeholder entry. `None` when there is nothing to offer.
    pub fn saved_location_options(&self) -> Result<Option<Vec<SelectOption>>, WorkflowError> {
        let filter = LocationFilter::default()
            .bundle(&self.config.location_bundle)
            .active(true)
            .newest_first();
        let ids = self.store.query(&filter)?;
        if ids.is_empty() {
            return Ok(None);
        }

        let mut options = vec![SelectOption {
            value: self.config.none_selection.clone(),
            label: self.config.select_placeholder.clone(),
        }];
        options.extend(self.store.load_many(&ids)?.into_iter().map(|l| SelectOption {
            value: l.id.to_string(),
            label: l.title,
        }));
        Ok(Some(options))
    }
}
