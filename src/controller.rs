//! Form controller
//!
//! Owns the record store, the storage backend, the four form inputs and
//! their error messages, and the edit target. One controller lives for the
//! whole page session; the UI layer holds it and calls in on each event:
//!
//! event -> validate -> mutate store -> persist -> re-render (`view()`)
//!
//! The edit target is held as a `RecordKey`, so deleting other records never
//! moves it to a different logical record.

use log::{debug, error, info};
use thiserror::Error;

use crate::consts::{ADD_LABEL, UPDATE_LABEL};
use crate::persistence::{self, KeyValueStorage};
use crate::record::{RecordKey, StudentRecord};
use crate::settings::Settings;
use crate::store::{RecordStore, StoreError};
use crate::validation::{self, Field, FieldError};
use crate::view::{TableView, render_table};

/// Message shown once when the store could not be written
pub const SAVE_FAILED_MESSAGE: &str = "Unable to save data. Please check your browser settings.";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ControllerError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result of a submit attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// New record appended
    Added(RecordKey),
    /// Edited record replaced in place
    Updated(RecordKey),
    /// At least one field failed validation; nothing changed
    Rejected,
}

/// One-shot notification for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    SaveFailed,
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Notice::SaveFailed => SAVE_FAILED_MESSAGE,
        }
    }
}

/// Interactive yes/no confirmation (e.g. `window.confirm`)
pub trait Confirm {
    fn confirm(&mut self, message: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, message: &str) -> bool {
        self(message)
    }
}

fn field_slot(field: Field) -> usize {
    match field {
        Field::Name => 0,
        Field::Id => 1,
        Field::Email => 2,
        Field::Contact => 3,
    }
}

/// Form state plus the record store it edits
pub struct FormController<S: KeyValueStorage> {
    store: RecordStore,
    storage: S,
    storage_key: String,
    inputs: [String; 4],
    errors: [Option<FieldError>; 4],
    editing: Option<RecordKey>,
    notice: Option<Notice>,
}

impl<S: KeyValueStorage> FormController<S> {
    /// Create a controller, loading any records saved under the configured key
    pub fn new(storage: S, settings: &Settings) -> Self {
        let store = persistence::load_store(&storage, &settings.storage_key);
        Self::with_store(store, storage, settings.storage_key.clone())
    }

    /// Create a controller around an existing store
    pub fn with_store(store: RecordStore, storage: S, storage_key: impl Into<String>) -> Self {
        Self {
            store,
            storage,
            storage_key: storage_key.into(),
            inputs: Default::default(),
            errors: [None; 4],
            editing: None,
            notice: None,
        }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn input(&self, field: Field) -> &str {
        &self.inputs[field_slot(field)]
    }

    pub fn error(&self, field: Field) -> Option<FieldError> {
        self.errors[field_slot(field)]
    }

    /// Fields currently showing an error, in form order
    pub fn errors(&self) -> Vec<(Field, FieldError)> {
        Field::ALL
            .iter()
            .filter_map(|&field| self.error(field).map(|err| (field, err)))
            .collect()
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    /// Current position of the record being edited
    pub fn editing_index(&self) -> Option<usize> {
        self.editing.and_then(|key| self.store.position_of(key))
    }

    pub fn submit_label(&self) -> &'static str {
        if self.editing.is_some() {
            UPDATE_LABEL
        } else {
            ADD_LABEL
        }
    }

    /// Take the pending notice, if any
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    /// Store raw input and re-validate that field
    pub fn set_input(&mut self, field: Field, value: impl Into<String>) -> bool {
        self.inputs[field_slot(field)] = value.into();
        self.validate_field(field)
    }

    /// Re-validate one field, updating its error message
    pub fn validate_field(&mut self, field: Field) -> bool {
        let result = validation::validate_field(
            field,
            self.input(field),
            &self.store,
            self.editing_index(),
        );
        self.errors[field_slot(field)] = result.err();
        result.is_ok()
    }

    /// Re-validate every field; all errors are surfaced, not just the first
    pub fn validate_all(&mut self) -> bool {
        Field::ALL
            .iter()
            .fold(true, |valid, &field| self.validate_field(field) && valid)
    }

    /// Validate and commit the form as a new or updated record
    pub fn submit(&mut self) -> Result<SubmitOutcome, ControllerError> {
        if !self.validate_all() {
            debug!("Submit rejected: {:?}", self.errors());
            return Ok(SubmitOutcome::Rejected);
        }

        let record = StudentRecord::new(
            self.input(Field::Name).trim(),
            self.input(Field::Id).trim(),
            self.input(Field::Email).trim(),
            self.input(Field::Contact).trim(),
        );

        let outcome = match self.editing {
            Some(key) => {
                let index = self
                    .store
                    .position_of(key)
                    .ok_or(StoreError::UnknownKey(key))?;
                self.store.replace_at(index, record)?;
                info!("Updated student at row {}", index + 1);
                SubmitOutcome::Updated(key)
            }
            None => {
                let key = self.store.append(record);
                info!("Added student ({} total)", self.store.len());
                SubmitOutcome::Added(key)
            }
        };

        self.persist();
        self.reset();
        Ok(outcome)
    }

    /// Load a record into the form and switch to update mode
    pub fn edit(&mut self, key: RecordKey) -> Result<(), ControllerError> {
        let index = self
            .store
            .position_of(key)
            .ok_or(StoreError::UnknownKey(key))?;
        let Some(record) = self.store.get(index) else {
            return Err(StoreError::UnknownKey(key).into());
        };
        self.inputs = [
            record.name.clone(),
            record.id.clone(),
            record.email.clone(),
            record.contact.clone(),
        ];
        self.errors = [None; 4];
        self.editing = Some(key);
        debug!("Editing student at row {}", index + 1);
        Ok(())
    }

    /// `edit` by current position
    pub fn edit_at(&mut self, index: usize) -> Result<(), ControllerError> {
        let key = self.key_at(index)?;
        self.edit(key)
    }

    /// Delete a record after confirmation.
    ///
    /// Returns `Ok(false)` when the user declined. Deleting the record being
    /// edited also resets the form.
    pub fn delete(&mut self, key: RecordKey, mut confirm: impl Confirm) -> Result<bool, ControllerError> {
        let index = self
            .store
            .position_of(key)
            .ok_or(StoreError::UnknownKey(key))?;
        let name = self
            .store
            .get(index)
            .map(|record| record.name.clone())
            .unwrap_or_default();

        if !confirm.confirm(&format!("Are you sure you want to delete {name}'s record?")) {
            return Ok(false);
        }

        self.store.remove_at(index)?;
        info!("Deleted student at row {} ({} left)", index + 1, self.store.len());
        self.persist();

        if self.editing == Some(key) {
            self.reset();
        }
        Ok(true)
    }

    /// `delete` by current position
    pub fn delete_at(&mut self, index: usize, confirm: impl Confirm) -> Result<bool, ControllerError> {
        let key = self.key_at(index)?;
        self.delete(key, confirm)
    }

    /// Clear inputs, errors and edit mode
    pub fn reset(&mut self) {
        self.inputs = Default::default();
        self.errors = [None; 4];
        self.editing = None;
    }

    /// Freshly rendered table for the current store
    pub fn view(&self) -> TableView {
        render_table(self.store.iter())
    }

    fn key_at(&self, index: usize) -> Result<RecordKey, StoreError> {
        self.store.key_at(index).ok_or(StoreError::IndexOutOfRange {
            index,
            len: self.store.len(),
        })
    }

    /// Write the store; failures keep the in-memory change and raise a notice
    fn persist(&mut self) {
        if let Err(e) = persistence::save_store(&mut self.storage, &self.storage_key, &self.store) {
            error!("Error saving to storage: {e}");
            self.notice = Some(Notice::SaveFailed);
        }
    }
}
