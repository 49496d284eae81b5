//! Student record data model
//!
//! The persisted JSON shape uses the page's established field names
//! (`studentName`, `studentId`, `emailId`, `contactNumber`) so existing
//! LocalStorage blobs load unchanged.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Session-local stable identifier assigned by the store.
///
/// Never persisted; reassigned on every load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordKey(pub u32);

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One student's registration data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    /// Letters and spaces, at least 2 characters
    #[serde(rename = "studentName")]
    pub name: String,
    /// Digits only, unique across the store
    #[serde(rename = "studentId")]
    pub id: String,
    #[serde(rename = "emailId")]
    pub email: String,
    /// Digits only, at least 10 of them
    #[serde(rename = "contactNumber")]
    pub contact: String,
}

impl StudentRecord {
    pub fn new(
        name: impl Into<String>,
        id: impl Into<String>,
        email: impl Into<String>,
        contact: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            email: email.into(),
            contact: contact.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_with_legacy_field_names() {
        let record = StudentRecord::new("Ann Lee", "101", "a@b.co", "1234567890");
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"studentName":"Ann Lee","studentId":"101","emailId":"a@b.co","contactNumber":"1234567890"}"#
        );
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let result = serde_json::from_str::<StudentRecord>(r#"{"studentName":"Ann"}"#);
        assert!(result.is_err());
    }
}
