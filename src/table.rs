// src/table.rs
//
// Snapshot table codec: one header row ("Key", then the snapshot columns),
// one row per record in display order.

use std::io::{Read, Write};
use std::path::Path;

use crate::config::consts::KEY_HEADER;
use crate::error::{Result, WatchError};
use crate::snapshot::{ListingRecord, Snapshot};

/* ---------------- Writing ---------------- */

pub fn write_table<W: Write>(w: W, snap: &Snapshot) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(w);

    let header = std::iter::once(KEY_HEADER).chain(snap.columns().iter().map(String::as_str));
    wtr.write_record(header)?;

    for rec in snap.records() {
        wtr.write_record(std::iter::once(rec.key()).chain(rec.values()))?;
    }
    wtr.flush()?;
    Ok(())
}

/* ---------------- Reading ---------------- */

/// Parse a snapshot table. `path` is only used for error context.
/// The first header cell names the key column and may be anything
/// (including empty).
pub fn read_table<R: Read>(r: R, path: &Path) -> Result<(Vec<String>, Vec<ListingRecord>)> {
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(r);

    let header = rdr.headers().map_err(|e| csv_error(path, e))?.clone();
    if header.is_empty() {
        return Err(format_error(path, "missing header row"));
    }
    let columns: Vec<String> = header.iter().skip(1).map(|c| s!(c)).collect();
    for (i, c) in columns.iter().enumerate() {
        if columns[..i].contains(c) {
            return Err(format_error(path, &format!("duplicate column {c:?}")));
        }
    }

    let mut records = Vec::new();
    for row in rdr.records() {
        let row = row.map_err(|e| csv_error(path, e))?;
        let mut cells = row.iter();
        let key = cells.next().unwrap_or_default();
        let fields = columns.iter().cloned().zip(cells.map(|v| s!(v))).collect();
        records.push(ListingRecord::new(key, fields));
    }
    Ok((columns, records))
}

fn format_error(path: &Path, reason: &str) -> WatchError {
    WatchError::StorageFormat { path: path.to_path_buf(), reason: s!(reason) }
}

/// I/O failures stay I/O failures; everything else is a format problem.
pub fn csv_error(path: &Path, e: csv::Error) -> WatchError {
    let reason = e.to_string();
    match e.into_kind() {
        csv::ErrorKind::Io(source) => WatchError::io(path, source),
        _ => WatchError::StorageFormat { path: path.to_path_buf(), reason },
    }
}
