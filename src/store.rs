//! Ordered in-memory record store
//!
//! Records keep their insertion order. Each record also gets a stable
//! `RecordKey` so callers can target it across deletes; positions are only
//! resolved here.

use log::debug;
use thiserror::Error;

use crate::record::{RecordKey, StudentRecord};

/// Errors raised by store operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("index {index} is out of range for a store of {len} records")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("no record with key {0}")]
    UnknownKey(RecordKey),
    /// Persisted text could not be parsed; the store was reset to empty
    #[error("malformed record data: {0}")]
    Malformed(String),
    #[error("failed to serialize records: {0}")]
    Serialize(String),
}

#[derive(Debug, Clone)]
struct Entry {
    key: RecordKey,
    record: StudentRecord,
}

/// In-memory ordered sequence of student records
#[derive(Debug, Clone)]
pub struct RecordStore {
    entries: Vec<Entry>,
    next_key: u32,
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_key: 1,
        }
    }

    /// Build a store from plain records, assigning fresh keys in order
    pub fn from_records(records: impl IntoIterator<Item = StudentRecord>) -> Self {
        let mut store = Self::new();
        for record in records {
            store.append(record);
        }
        store
    }

    fn next_record_key(&mut self) -> RecordKey {
        let key = RecordKey(self.next_key);
        self.next_key += 1;
        key
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add a record at the end. Callers must validate uniqueness first.
    pub fn append(&mut self, record: StudentRecord) -> RecordKey {
        let key = self.next_record_key();
        self.entries.push(Entry { key, record });
        key
    }

    /// Replace the record at `index`, keeping its key
    pub fn replace_at(&mut self, index: usize, record: StudentRecord) -> Result<(), StoreError> {
        let len = self.entries.len();
        let entry = self
            .entries
            .get_mut(index)
            .ok_or(StoreError::IndexOutOfRange { index, len })?;
        entry.record = record;
        Ok(())
    }

    /// Remove the record at `index`; later records shift down by one.
    pub fn remove_at(&mut self, index: usize) -> Result<StudentRecord, StoreError> {
        if index >= self.entries.len() {
            return Err(StoreError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            });
        }
        Ok(self.entries.remove(index).record)
    }

    /// True if any record other than the one at `exclude_index` has `id`
    pub fn find_duplicate_id(&self, id: &str, exclude_index: Option<usize>) -> bool {
        self.entries
            .iter()
            .enumerate()
            .any(|(index, entry)| Some(index) != exclude_index && entry.record.id == id)
    }

    pub fn get(&self, index: usize) -> Option<&StudentRecord> {
        self.entries.get(index).map(|entry| &entry.record)
    }

    pub fn key_at(&self, index: usize) -> Option<RecordKey> {
        self.entries.get(index).map(|entry| entry.key)
    }

    /// Current position of the record with `key`
    pub fn position_of(&self, key: RecordKey) -> Option<usize> {
        self.entries.iter().position(|entry| entry.key == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (RecordKey, &StudentRecord)> {
        self.entries.iter().map(|entry| (entry.key, &entry.record))
    }

    /// Plain records in store order
    pub fn records(&self) -> Vec<StudentRecord> {
        self.entries.iter().map(|entry| entry.record.clone()).collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Serialize the full sequence as a JSON array
    pub fn serialize(&self) -> Result<String, StoreError> {
        let records: Vec<&StudentRecord> = self.entries.iter().map(|entry| &entry.record).collect();
        serde_json::to_string(&records).map_err(|e| StoreError::Serialize(e.to_string()))
    }

    /// Replace the contents with records parsed from `text`.
    ///
    /// Malformed input leaves the store empty and returns `Malformed`.
    pub fn deserialize(&mut self, text: &str) -> Result<(), StoreError> {
        self.entries.clear();
        let records: Vec<StudentRecord> =
            serde_json::from_str(text).map_err(|e| StoreError::Malformed(e.to_string()))?;
        for record in records {
            self.append(record);
        }
        debug!("Deserialized {} records", self.entries.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn record(name: &str, id: &str) -> StudentRecord {
        StudentRecord::new(name, id, "a@b.co", "1234567890")
    }

    fn arb_record() -> impl Strategy<Value = StudentRecord> {
        (
            "[A-Za-z ]{2,16}",
            "[0-9]{1,6}",
            "[a-z0-9._-]{1,8}@[a-z]{1,8}\\.[a-z]{2,4}",
            "[0-9]{10,13}",
        )
            .prop_map(|(name, id, email, contact)| StudentRecord::new(name, id, email, contact))
    }

    #[test]
    fn test_append_assigns_increasing_keys() {
        let mut store = RecordStore::new();
        let a = store.append(record("Ann", "1"));
        let b = store.append(record("Bob", "2"));
        assert!(b > a);
        assert_eq!(store.len(), 2);
        assert_eq!(store.position_of(b), Some(1));
    }

    #[test]
    fn test_append_does_not_check_uniqueness() {
        let mut store = RecordStore::new();
        store.append(record("Ann", "1"));
        store.append(record("Bob", "1"));
        assert_eq!(store.len(), 2);
        assert!(store.find_duplicate_id("1", Some(0)));
    }

    #[test]
    fn test_replace_at_keeps_key() {
        let mut store = RecordStore::new();
        let key = store.append(record("Ann", "1"));
        store.replace_at(0, record("Annie", "1")).unwrap();
        assert_eq!(store.get(0).unwrap().name, "Annie");
        assert_eq!(store.key_at(0), Some(key));
    }

    #[test]
    fn test_replace_at_out_of_range() {
        let mut store = RecordStore::new();
        store.append(record("Ann", "1"));
        let err = store.replace_at(1, record("Bob", "2")).unwrap_err();
        assert_eq!(err, StoreError::IndexOutOfRange { index: 1, len: 1 });
        assert_eq!(store.get(0).unwrap().name, "Ann");
    }

    #[test]
    fn test_remove_at_shifts_and_rejects_bad_index() {
        let mut store = RecordStore::from_records(vec![
            record("Ann", "1"),
            record("Bob", "2"),
            record("Cat", "3"),
        ]);
        let cat = store.key_at(2).unwrap();
        let removed = store.remove_at(1).unwrap();
        assert_eq!(removed.name, "Bob");
        assert_eq!(store.get(1).unwrap().name, "Cat");
        assert_eq!(store.position_of(cat), Some(1));
        assert!(matches!(
            store.remove_at(5),
            Err(StoreError::IndexOutOfRange { index: 5, len: 2 })
        ));
    }

    #[test]
    fn test_find_duplicate_id() {
        let store = RecordStore::from_records(vec![record("Ann", "101"), record("Bob", "102")]);
        assert!(store.find_duplicate_id("101", None));
        assert!(store.find_duplicate_id("101", Some(1)));
        assert!(!store.find_duplicate_id("101", Some(0)));
        assert!(!store.find_duplicate_id("999", None));
    }

    #[test]
    fn test_deserialize_malformed_resets_to_empty() {
        let mut store = RecordStore::from_records(vec![record("Ann", "1")]);
        let err = store.deserialize("{not json").unwrap_err();
        assert!(matches!(err, StoreError::Malformed(_)));
        assert!(store.is_empty());

        store.append(record("Ann", "1"));
        assert!(store.deserialize(r#"[{"studentName":"x"}]"#).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn test_deserialize_accepts_legacy_blob() {
        let blob = r#"[{"studentName":"Ann Lee","studentId":"101","emailId":"a@b.co","contactNumber":"1234567890"}]"#;
        let mut store = RecordStore::new();
        store.deserialize(blob).unwrap();
        assert_eq!(
            store.get(0),
            Some(&StudentRecord::new("Ann Lee", "101", "a@b.co", "1234567890"))
        );
    }

    proptest! {
        #[test]
        fn prop_serialize_roundtrip(records in prop::collection::vec(arb_record(), 0..8)) {
            let store = RecordStore::from_records(records.clone());
            let text = store.serialize().unwrap();
            let mut loaded = RecordStore::new();
            loaded.deserialize(&text).unwrap();
            prop_assert_eq!(loaded.records(), records);
        }

        #[test]
        fn prop_remove_shifts_later_indices(
            records in prop::collection::vec(arb_record(), 1..8),
            pick in any::<prop::sample::Index>(),
        ) {
            let mut store = RecordStore::from_records(records.clone());
            let i = pick.index(records.len());
            store.remove_at(i).unwrap();
            prop_assert_eq!(store.len(), records.len() - 1);
            for j in (i + 1)..records.len() {
                prop_assert_eq!(store.get(j - 1), Some(&records[j]));
            }
        }

        #[test]
        fn prop_record_is_never_its_own_duplicate(
            records in prop::collection::vec(arb_record(), 1..8),
            pick in any::<prop::sample::Index>(),
        ) {
            let store = RecordStore::from_records(records.clone());
            let i = pick.index(records.len());
            let others_share_id = records
                .iter()
                .enumerate()
                .any(|(j, r)| j != i && r.id == records[i].id);
            prop_assert_eq!(store.find_duplicate_id(&records[i].id, Some(i)), others_share_id);
        }
    }
}
