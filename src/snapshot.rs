// src/snapshot.rs
//
// Canonical data: one `ListingRecord` per unit, collected into an immutable
// `Snapshot`. Construction validates the two invariants the rest of the
// pipeline relies on: keys are unique, and every record carries exactly the
// snapshot's columns in the snapshot's order.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};

use crate::error::{Result, WatchError};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListingRecord {
    key: String,
    fields: Vec<(String, String)>,
}

impl ListingRecord {
    pub fn new(key: impl Into<String>, fields: Vec<(String, String)>) -> Self {
        Self { key: key.into(), fields }
    }

    pub fn key(&self) -> &str { &self.key }

    /// `(column, value)` pairs in column order.
    pub fn fields(&self) -> &[(String, String)] { &self.fields }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.iter().find(|(c, _)| c == column).map(|(_, v)| v.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(_, v)| v.as_str())
    }
}

#[derive(Clone, Debug)]
pub struct Snapshot {
    captured_at: DateTime<Utc>,
    columns: Vec<String>,
    records: Vec<ListingRecord>,
    index: HashMap<String, usize>,
}

impl Snapshot {
    /// Records are kept in the given (display) order.
    pub fn new(
        captured_at: DateTime<Utc>,
        columns: Vec<String>,
        records: Vec<ListingRecord>,
    ) -> Result<Self> {
        let mut index = HashMap::with_capacity(records.len());
        for (i, rec) in records.iter().enumerate() {
            let same_columns = rec.fields.len() == columns.len()
                && rec.fields.iter().zip(&columns).all(|((c, _), want)| c == want);
            if !same_columns {
                return Err(WatchError::schema(format!(
                    "record {:?} does not match snapshot columns {:?}",
                    rec.key, columns
                )));
            }
            if index.insert(rec.key.clone(), i).is_some() {
                return Err(WatchError::schema(format!("duplicate key {:?}", rec.key)));
            }
        }
        Ok(Self { captured_at, columns, records, index })
    }

    /// Baseline used when there is no history yet.
    pub fn empty(captured_at: DateTime<Utc>) -> Self {
        Self { captured_at, columns: Vec::new(), records: Vec::new(), index: HashMap::new() }
    }

    pub fn captured_at(&self) -> DateTime<Utc> { self.captured_at }
    pub fn columns(&self) -> &[String] { &self.columns }
    pub fn records(&self) -> &[ListingRecord] { &self.records }
    pub fn len(&self) -> usize { self.records.len() }
    pub fn is_empty(&self) -> bool { self.records.is_empty() }

    pub fn get(&self, key: &str) -> Option<&ListingRecord> {
        self.index.get(key).map(|&i| &self.records[i])
    }

    pub fn contains(&self, key: &str) -> bool { self.index.contains_key(key) }

    /// Keys in display order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.key())
    }

    pub fn key_set(&self) -> BTreeSet<&str> {
        self.keys().collect()
    }
}

/// Same keys and same values per key. Capture time and record order are
/// not part of the comparison.
impl PartialEq for Snapshot {
    fn eq(&self, other: &Self) -> bool {
        self.columns == other.columns
            && self.len() == other.len()
            && self.records.iter().all(|r| other.get(r.key()) == Some(r))
    }
}

impl Eq for Snapshot {}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(key: &str, bed: &str) -> ListingRecord {
        ListingRecord::new(key, vec![(s!("Rent"), s!("$1")), (s!("Bedroom"), s!(bed))])
    }

    fn cols() -> Vec<String> { vec![s!("Rent"), s!("Bedroom")] }

    #[test]
    fn lookup_by_key_and_column() {
        let snap = Snapshot::new(Utc::now(), cols(), vec![rec("A 1", "2"), rec("A 2", "1")]).unwrap();
        assert_eq!(snap.len(), 2);
        assert_eq!(snap.get("A 2").and_then(|r| r.get("Bedroom")), Some("1"));
        assert!(snap.get("A 3").is_none());
        assert_eq!(snap.keys().collect::<Vec<_>>(), vec!["A 1", "A 2"]);
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let err = Snapshot::new(Utc::now(), cols(), vec![rec("A 1", "2"), rec("A 1", "1")]).unwrap_err();
        assert!(matches!(err, WatchError::Schema(ref m) if m.contains("duplicate")));
    }

    #[test]
    fn heterogeneous_records_are_rejected() {
        let odd = ListingRecord::new("B 1", vec![(s!("Bedroom"), s!("1")), (s!("Rent"), s!("$1"))]);
        assert!(Snapshot::new(Utc::now(), cols(), vec![rec("A 1", "2"), odd]).is_err());
    }

    #[test]
    fn equality_ignores_order_and_time() {
        let a = Snapshot::new(Utc::now(), cols(), vec![rec("A 1", "2"), rec("A 2", "1")]).unwrap();
        let b = Snapshot::new(DateTime::<Utc>::UNIX_EPOCH, cols(), vec![rec("A 2", "1"), rec("A 1", "2")]).unwrap();
        assert_eq!(a, b);
        let c = Snapshot::new(Utc::now(), cols(), vec![rec("A 2", "3"), rec("A 1", "2")]).unwrap();
        assert_ne!(a, c);
    }
}
