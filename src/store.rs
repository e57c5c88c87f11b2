// src/store.rs
//
// Snapshot history: one CSV table per capture in a single directory.
//
// File names carry the capture time (UTC, second resolution) and, when two
// captures land in the same second, a numeric suffix:
//
//   20261016-093000.csv, 20261016-093000_2.csv, 20261016-093105.csv
//
// Recency is decided from the name alone, never from filesystem metadata, so
// copying or restoring a history directory keeps its order.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime, Timelike, Utc};

use crate::config::consts::{SNAPSHOT_EXT, STAMP_FORMAT};
use crate::error::{Result, WatchError};
use crate::snapshot::Snapshot;
use crate::table::{csv_error, read_table, write_table};

const MAX_SAME_SECOND: u32 = 10_000;

/// Orderable identity of a persisted snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SnapshotId {
    pub captured: NaiveDateTime,
    /// 1 for the first capture in a given second.
    pub seq: u32,
}

impl SnapshotId {
    pub fn for_capture(at: DateTime<Utc>) -> Self {
        let naive = at.naive_utc();
        // Second resolution: what the file name can express.
        let captured = naive.with_nanosecond(0).unwrap_or(naive);
        Self { captured, seq: 1 }
    }

    pub fn file_name(&self) -> String {
        let stamp = self.captured.format(STAMP_FORMAT).to_string();
        if self.seq <= 1 {
            join!(&stamp, ".", SNAPSHOT_EXT)
        } else {
            format!("{stamp}_{}.{SNAPSHOT_EXT}", self.seq)
        }
    }

    pub fn parse(file_name: &str) -> Option<Self> {
        let stem = file_name.strip_suffix(SNAPSHOT_EXT)?.strip_suffix('.')?;
        let (stamp, seq) = match stem.split_once('_') {
            Some((stamp, n)) => {
                let seq: u32 = n.parse().ok()?;
                if seq < 2 { return None; }
                (stamp, seq)
            }
            None => (stem, 1),
        };
        let captured = NaiveDateTime::parse_from_str(stamp, STAMP_FORMAT).ok()?;
        Some(Self { captured, seq })
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured.and_utc()
    }

    fn next(self) -> Self {
        Self { seq: self.seq + 1, ..self }
    }
}

/* ---------------- Writing ---------------- */

/// Persist `snap` as a new file in `dir` (created if missing). Never
/// overwrites: a name that already exists gets the next suffix.
pub fn save(snap: &Snapshot, dir: &Path) -> Result<PathBuf> {
    ensure_directory(dir)?;

    let mut id = SnapshotId::for_capture(snap.captured_at());
    if let Some((newest, _)) = list(dir)?.first() {
        if *newest >= id {
            logw!(newest = %newest.file_name(), capture = %id.file_name(), "capture time is not newer than existing history");
        }
    }

    let (path, file) = loop {
        let path = dir.join(id.file_name());
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => break (path, file),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists && id.seq < MAX_SAME_SECOND => {
                id = id.next();
            }
            Err(e) => return Err(WatchError::io(&path, e)),
        }
    };

    let mut out = BufWriter::new(file);
    let written = write_table(&mut out, snap)
        .map_err(|e| csv_error(&path, e))
        .and_then(|_| out.flush().map_err(|e| WatchError::io(&path, e)));
    if let Err(e) = written {
        drop(out);
        // Never leave a half-written table behind to become the next baseline.
        let _ = fs::remove_file(&path);
        return Err(e);
    }

    logf!(path = %path.display(), records = snap.len(), "saved snapshot");
    Ok(path)
}

fn ensure_directory(dir: &Path) -> Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(WatchError::io(
            dir,
            io::Error::new(io::ErrorKind::InvalidInput, "path exists but is not a directory"),
        ));
    }
    fs::create_dir_all(dir).map_err(|e| WatchError::io(dir, e))
}

/* ---------------- Reading ---------------- */

/// Persisted snapshots in `dir`, newest first. A missing directory is an
/// empty history; files that are not snapshot tables are ignored.
pub fn list(dir: &Path) -> Result<Vec<(SnapshotId, PathBuf)>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let entries = fs::read_dir(dir).map_err(|e| WatchError::io(dir, e))?;

    let mut out = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| WatchError::io(dir, e))?.path();
        if !path.is_file() { continue; }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else { continue };
        match SnapshotId::parse(name) {
            Some(id) => out.push((id, path)),
            None => logd!(file = %path.display(), "ignoring non-snapshot file"),
        }
    }
    out.sort_by(|a, b| b.0.cmp(&a.0));
    Ok(out)
}

/// Path of the most recent snapshot, or `NoHistory`.
pub fn latest_path(dir: &Path) -> Result<PathBuf> {
    list(dir)?
        .into_iter()
        .next()
        .map(|(_, path)| path)
        .ok_or_else(|| WatchError::NoHistory(dir.to_path_buf()))
}

/// Most recent snapshot in `dir`, or `NoHistory`.
pub fn load_latest(dir: &Path) -> Result<Snapshot> {
    load(&latest_path(dir)?)
}

/// Baseline for diffing: the latest snapshot and its path, or an empty
/// snapshot when there is no history yet.
pub fn load_baseline(dir: &Path) -> Result<(Snapshot, Option<PathBuf>)> {
    match latest_path(dir) {
        Ok(path) => Ok((load(&path)?, Some(path))),
        Err(WatchError::NoHistory(_)) => {
            logf!(dir = %dir.display(), "no snapshot history; using empty baseline");
            Ok((Snapshot::empty(Utc::now()), None))
        }
        Err(e) => Err(e),
    }
}

/// Load one snapshot file. Its capture time comes from the file name.
pub fn load(path: &Path) -> Result<Snapshot> {
    let id = path
        .file_name()
        .and_then(|n| n.to_str())
        .and_then(SnapshotId::parse)
        .ok_or_else(|| WatchError::StorageFormat {
            path: path.to_path_buf(),
            reason: s!("file name is not a snapshot capture stamp"),
        })?;

    let file = File::open(path).map_err(|e| WatchError::io(path, e))?;
    let (columns, records) = read_table(BufReader::new(file), path)?;
    Snapshot::new(id.captured_at(), columns, records).map_err(|e| WatchError::StorageFormat {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::ListingRecord;
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, h, m, s).unwrap()
    }

    fn snap(when: DateTime<Utc>, keys: &[&str]) -> Snapshot {
        let recs = keys
            .iter()
            .map(|k| ListingRecord::new(*k, vec![(s!("Rent"), s!("$1,000")), (s!("Bedroom"), s!("2"))]))
            .collect();
        Snapshot::new(when, vec![s!("Rent"), s!("Bedroom")], recs).unwrap()
    }

    #[test]
    fn id_names_round_trip() {
        let id = SnapshotId::for_capture(at(9, 30, 5));
        assert_eq!(id.file_name(), "20261016-093005.csv");
        assert_eq!(SnapshotId::parse(&id.file_name()), Some(id));
        let second = id.next();
        assert_eq!(second.file_name(), "20261016-093005_2.csv");
        assert_eq!(SnapshotId::parse("20261016-093005_2.csv"), Some(second));
        assert!(second > id);
    }

    #[test]
    fn foreign_names_do_not_parse() {
        for name in ["notes.txt", "20261016-093005.tsv", "2026-10-16.csv", "20261016-093005_1.csv", "20261016-093005_x.csv"] {
            assert_eq!(SnapshotId::parse(name), None, "{name}");
        }
    }

    #[test]
    fn empty_dir_has_no_history() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(load_latest(dir.path()), Err(WatchError::NoHistory(_))));
        let missing = dir.path().join("nope");
        assert!(matches!(load_latest(&missing), Err(WatchError::NoHistory(_))));
        let (base, path) = load_baseline(dir.path()).unwrap();
        assert!(base.is_empty());
        assert!(path.is_none());
    }

    #[test]
    fn save_then_load_latest_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let s = snap(at(8, 0, 0), &["Tower 101", "Tower 102"]);
        let path = save(&s, dir.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), "20261016-080000.csv");

        let back = load_latest(dir.path()).unwrap();
        assert_eq!(back, s);
        assert_eq!(back.captured_at(), at(8, 0, 0));
    }

    #[test]
    fn same_second_saves_get_suffixes_and_latest_wins() {
        let dir = tempfile::tempdir().unwrap();
        let first = save(&snap(at(8, 0, 0), &["A 1"]), dir.path()).unwrap();
        let second = save(&snap(at(8, 0, 0), &["A 2"]), dir.path()).unwrap();
        assert_ne!(first, second);
        assert_eq!(second.file_name().unwrap(), "20261016-080000_2.csv");

        let latest = load_latest(dir.path()).unwrap();
        assert!(latest.contains("A 2"));
    }

    #[test]
    fn recency_comes_from_names_not_mtime() {
        let dir = tempfile::tempdir().unwrap();
        save(&snap(at(10, 0, 0), &["New 1"]), dir.path()).unwrap();
        // Written later, but captured earlier.
        save(&snap(at(9, 0, 0), &["Old 1"]), dir.path()).unwrap();
        fs::write(dir.path().join("README.txt"), "not a snapshot").unwrap();

        let ids: Vec<String> = list(dir.path()).unwrap().iter().map(|(id, _)| id.file_name()).collect();
        assert_eq!(ids, vec!["20261016-100000.csv", "20261016-090000.csv"]);
        assert!(load_latest(dir.path()).unwrap().contains("New 1"));
    }

    #[test]
    fn corrupt_latest_is_a_format_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("20261016-080000.csv"), "Key,A\nx,1,2\n").unwrap();
        assert!(matches!(load_latest(dir.path()), Err(WatchError::StorageFormat { .. })));
    }

    #[test]
    fn store_path_that_is_a_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("history");
        fs::write(&file, "x").unwrap();
        assert!(matches!(save(&snap(at(8, 0, 0), &["A 1"]), &file), Err(WatchError::StorageIo { .. })));
    }
}
