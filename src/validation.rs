//! Per-field input validation
//!
//! Every rule trims its input first. The `Display` text of each
//! `FieldError` is the message shown next to the field.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::consts::{CONTACT_MIN_DIGITS, NAME_MIN_LEN};
use crate::store::RecordStore;

static NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z\s]+$").expect("valid name regex"));
static DIGITS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").expect("valid digits regex"));
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});
static CONTACT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("^[0-9]{{{CONTACT_MIN_DIGITS},}}$")).expect("valid contact regex")
});

/// Form input fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Id,
    Email,
    Contact,
}

impl Field {
    /// All fields in form order
    pub const ALL: [Field; 4] = [Field::Name, Field::Id, Field::Email, Field::Contact];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Id => "id",
            Field::Email => "email",
            Field::Contact => "contact",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "name" => Some(Field::Name),
            "id" => Some(Field::Id),
            "email" => Some(Field::Email),
            "contact" => Some(Field::Contact),
            _ => None,
        }
    }
}

/// A single field's validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("Student name is required")]
    NameRequired,
    #[error("Name must contain only letters and spaces")]
    NameCharacters,
    #[error("Name must be at least 2 characters long")]
    NameTooShort,
    #[error("Student ID is required")]
    IdRequired,
    #[error("Student ID must contain only numbers")]
    IdNotNumeric,
    #[error("This Student ID already exists")]
    IdDuplicate,
    #[error("Email ID is required")]
    EmailRequired,
    #[error("Please enter a valid email address")]
    EmailInvalid,
    #[error("Contact number is required")]
    ContactRequired,
    #[error("Contact number must be at least 10 digits")]
    ContactInvalid,
}

pub fn validate_name(value: &str) -> Result<(), FieldError> {
    let value = value.trim();
    if value.is_empty() {
        Err(FieldError::NameRequired)
    } else if !NAME_RE.is_match(value) {
        Err(FieldError::NameCharacters)
    } else if value.chars().count() < NAME_MIN_LEN {
        Err(FieldError::NameTooShort)
    } else {
        Ok(())
    }
}

/// Validate a student ID against the store.
///
/// `exclude_index` is the position of the record being edited, which may
/// keep its own ID.
pub fn validate_id(
    value: &str,
    store: &RecordStore,
    exclude_index: Option<usize>,
) -> Result<(), FieldError> {
    let value = value.trim();
    if value.is_empty() {
        Err(FieldError::IdRequired)
    } else if !DIGITS_RE.is_match(value) {
        Err(FieldError::IdNotNumeric)
    } else if store.find_duplicate_id(value, exclude_index) {
        Err(FieldError::IdDuplicate)
    } else {
        Ok(())
    }
}

pub fn validate_email(value: &str) -> Result<(), FieldError> {
    let value = value.trim();
    if value.is_empty() {
        Err(FieldError::EmailRequired)
    } else if !EMAIL_RE.is_match(value) {
        Err(FieldError::EmailInvalid)
    } else {
        Ok(())
    }
}

pub fn validate_contact(value: &str) -> Result<(), FieldError> {
    let value = value.trim();
    if value.is_empty() {
        Err(FieldError::ContactRequired)
    } else if !CONTACT_RE.is_match(value) {
        Err(FieldError::ContactInvalid)
    } else {
        Ok(())
    }
}

/// Validate one field's raw input
pub fn validate_field(
    field: Field,
    value: &str,
    store: &RecordStore,
    exclude_index: Option<usize>,
) -> Result<(), FieldError> {
    match field {
        Field::Name => validate_name(value),
        Field::Id => validate_id(value, store, exclude_index),
        Field::Email => validate_email(value),
        Field::Contact => validate_contact(value),
    }
}

/// Whether a key press should reach the input.
///
/// Named keys (`Enter`, `Tab`, ...) always pass so they keep working in
/// filtered inputs.
pub fn accepts_keystroke(field: Field, key: &str) -> bool {
    let mut chars = key.chars();
    let (Some(ch), None) = (chars.next(), chars.next()) else {
        return true;
    };
    match field {
        Field::Id | Field::Contact => ch.is_ascii_digit(),
        Field::Name => ch.is_ascii_alphabetic() || ch.is_whitespace(),
        Field::Email => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::StudentRecord;

    #[test]
    fn test_name_rules() {
        assert_eq!(validate_name("   "), Err(FieldError::NameRequired));
        assert_eq!(validate_name("Ann3"), Err(FieldError::NameCharacters));
        assert_eq!(validate_name("O'Neil"), Err(FieldError::NameCharacters));
        assert_eq!(validate_name(" A "), Err(FieldError::NameTooShort));
        assert_eq!(validate_name("  Ann Lee "), Ok(()));
    }

    #[test]
    fn test_id_rules() {
        let store = RecordStore::from_records(vec![StudentRecord::new(
            "Ann Lee",
            "101",
            "a@b.co",
            "1234567890",
        )]);
        assert_eq!(validate_id("", &store, None), Err(FieldError::IdRequired));
        assert_eq!(validate_id("10a", &store, None), Err(FieldError::IdNotNumeric));
        assert_eq!(validate_id("-1", &store, None), Err(FieldError::IdNotNumeric));
        assert_eq!(validate_id(" 101 ", &store, None), Err(FieldError::IdDuplicate));
        assert_eq!(validate_id("101", &store, Some(0)), Ok(()));
        assert_eq!(validate_id("102", &store, None), Ok(()));
    }

    #[test]
    fn test_email_rules() {
        assert_eq!(validate_email(""), Err(FieldError::EmailRequired));
        assert_eq!(validate_email("a@b.co"), Ok(()));
        assert_eq!(validate_email("first.last-1@mail.example.org"), Ok(()));
        assert_eq!(validate_email("a@b.c"), Err(FieldError::EmailInvalid));
        assert_eq!(validate_email("a+b@c.com"), Err(FieldError::EmailInvalid));
        assert_eq!(validate_email("no-at-sign.com"), Err(FieldError::EmailInvalid));
        assert_eq!(validate_email("a@b.c0"), Err(FieldError::EmailInvalid));
    }

    #[test]
    fn test_contact_rules() {
        assert_eq!(validate_contact(" "), Err(FieldError::ContactRequired));
        assert_eq!(validate_contact("123456789"), Err(FieldError::ContactInvalid));
        assert_eq!(validate_contact("12345 67890"), Err(FieldError::ContactInvalid));
        assert_eq!(validate_contact("1234567890"), Ok(()));
        assert_eq!(validate_contact("123456789012345"), Ok(()));
    }

    #[test]
    fn test_messages() {
        assert_eq!(FieldError::IdDuplicate.to_string(), "This Student ID already exists");
        assert_eq!(
            FieldError::ContactInvalid.to_string(),
            "Contact number must be at least 10 digits"
        );
    }

    #[test]
    fn test_keystroke_filter() {
        assert!(accepts_keystroke(Field::Id, "7"));
        assert!(!accepts_keystroke(Field::Id, "x"));
        assert!(!accepts_keystroke(Field::Contact, "+"));
        assert!(accepts_keystroke(Field::Name, "q"));
        assert!(accepts_keystroke(Field::Name, " "));
        assert!(!accepts_keystroke(Field::Name, "4"));
        assert!(accepts_keystroke(Field::Email, "@"));
        assert!(accepts_keystroke(Field::Id, "Enter"));
    }

    #[test]
    fn test_field_from_str() {
        assert_eq!(Field::from_str("Email"), Some(Field::Email));
        assert_eq!(Field::from_str("phone"), None);
        for field in Field::ALL {
            assert_eq!(Field::from_str(field.as_str()), Some(field));
        }
    }
}
