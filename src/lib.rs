//! Student Registry - a browser-resident student registration form
//!
//! Core modules:
//! - `record`: Student record data model
//! - `store`: Ordered in-memory record store with stable keys
//! - `validation`: Per-field input rules and messages
//! - `controller`: Form state machine (create/edit/delete/submit)
//! - `view`: Escaped table rendering
//! - `persistence`: Key-value storage abstraction and blob load/save
//! - `platform`: Browser/native platform abstraction
//! - `settings`: Tunables persisted next to the data

pub mod controller;
pub mod persistence;
pub mod platform;
pub mod record;
pub mod settings;
pub mod store;
pub mod validation;
pub mod view;

pub use controller::{Confirm, ControllerError, FormController, Notice, SubmitOutcome};
pub use persistence::{KeyValueStorage, MemoryStorage, PersistError, StorageError};
pub use record::{RecordKey, StudentRecord};
pub use settings::Settings;
pub use store::{RecordStore, StoreError};
pub use validation::{Field, FieldError};
pub use view::{RowView, TableView, escape_html, render_table};

/// Application constants
pub mod consts {
    /// LocalStorage key for the record blob
    pub const STORAGE_KEY: &str = "studentRegistrationData";
    /// LocalStorage key for settings overrides
    pub const SETTINGS_KEY: &str = "studentRegistrationSettings";

    /// Table height before the container starts scrolling (pixels)
    pub const MAX_TABLE_HEIGHT_PX: u32 = 500;

    /// Minimum name length after trimming
    pub const NAME_MIN_LEN: usize = 2;
    /// Minimum number of contact digits
    pub const CONTACT_MIN_DIGITS: usize = 10;

    /// Submit button labels
    pub const ADD_LABEL: &str = "Add Student";
    pub const UPDATE_LABEL: &str = "Update Student";
}
