// src/diff.rs
//
// Key-presence diff between two snapshots. A unit whose key exists on both
// sides is unchanged here even if its rent or other values moved: only
// additions and removals are tracked.

use crate::snapshot::Snapshot;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Diff {
    /// In `current` but not in `previous`, sorted.
    pub added: Vec<String>,
    /// In `previous` but not in `current`, sorted.
    pub removed: Vec<String>,
}

impl Diff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    pub fn is_added(&self, key: &str) -> bool {
        self.added.binary_search_by(|k| k.as_str().cmp(key)).is_ok()
    }
}

pub fn compute(current: &Snapshot, previous: &Snapshot) -> Diff {
    let cur = current.key_set();
    let prev = previous.key_set();

    let diff = Diff {
        added: cur.difference(&prev).map(|k| s!(*k)).collect(),
        removed: prev.difference(&cur).map(|k| s!(*k)).collect(),
    };
    logf!(added = diff.added.len(), removed = diff.removed.len(), "computed diff");
    diff
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::ListingRecord;
    use chrono::Utc;

    fn snap(keys: &[&str]) -> Snapshot {
        let recs = keys.iter().map(|k| ListingRecord::new(*k, vec![(s!("Bedroom"), s!("1"))])).collect();
        Snapshot::new(Utc::now(), vec![s!("Bedroom")], recs).unwrap()
    }

    #[test]
    fn added_and_removed() {
        let d = compute(&snap(&["B", "C", "D"]), &snap(&["A", "B", "C"]));
        assert_eq!(d.added, vec!["D"]);
        assert_eq!(d.removed, vec!["A"]);
        assert!(d.is_added("D"));
        assert!(!d.is_added("B"));
    }

    #[test]
    fn empty_baseline_adds_everything_sorted() {
        let d = compute(&snap(&["Y", "X"]), &Snapshot::empty(Utc::now()));
        assert_eq!(d.added, vec!["X", "Y"]);
        assert!(d.removed.is_empty());
    }

    #[test]
    fn self_diff_is_empty() {
        let s = snap(&["A", "B"]);
        assert!(compute(&s, &s).is_empty());
    }

    #[test]
    fn value_changes_are_not_reported() {
        let before = snap(&["A"]);
        let after = Snapshot::new(
            Utc::now(),
            vec![s!("Bedroom")],
            vec![ListingRecord::new("A", vec![(s!("Bedroom"), s!("3"))])],
        )
        .unwrap();
        assert!(compute(&after, &before).is_empty());
    }
}
