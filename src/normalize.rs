// src/normalize.rs
//
// Raw groups → one canonical Snapshot. Pure: no I/O, nothing persisted.
//
// Per group:
//   1. the row-label contract (configured, or the group's first row) must be
//      matched exactly by every row;
//   2. key = "<group name><sep><unit id>";
//   3. fields = row columns minus unit/noise columns, then the group's shared
//      features from the heading descriptor.
// All groups must end up with the same final column list.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::config::NormalizeOptions;
use crate::error::{Result, WatchError};
use crate::features::parse_descriptor;
use crate::snapshot::{ListingRecord, Snapshot};
use crate::specs::listing::{GroupHeading, ParsedPage, RawRow};

pub fn normalize(
    page: &ParsedPage,
    opts: &NormalizeOptions,
    captured_at: DateTime<Utc>,
) -> Result<Snapshot> {
    if page.is_empty() {
        return Err(WatchError::EmptySnapshot);
    }

    let mut columns: Option<(String, Vec<String>)> = None;
    let mut records: Vec<ListingRecord> = Vec::new();

    for (heading, rows) in page.iter() {
        if rows.is_empty() {
            logw!(group = %heading.name, "group has no rows");
            continue;
        }

        let (group_columns, group_records) = normalize_group(heading, rows, opts)?;

        if let Some((first_group, expected)) = &columns {
            if *expected != group_columns {
                return Err(WatchError::schema(format!(
                    "inconsistent columns across groups: {:?} has {:?}, {:?} has {:?}",
                    first_group, expected, heading.name, group_columns
                )));
            }
        } else {
            columns = Some((heading.name.clone(), group_columns));
        }
        records.extend(group_records);
    }

    // Every group empty: saving this would report all units as removed.
    let Some((_, columns)) = columns else {
        return Err(WatchError::EmptySnapshot);
    };
    if !columns.iter().any(|c| *c == opts.sort_field) {
        logd!(field = %opts.sort_field, "sort field not present; keeping page order");
    }
    sort_for_display(&mut records, &opts.sort_field);

    let snapshot = Snapshot::new(captured_at, columns, records)?;
    logf!(groups = page.len(), records = snapshot.len(), "normalized listing page");
    Ok(snapshot)
}

fn normalize_group(
    heading: &GroupHeading,
    rows: &[RawRow],
    opts: &NormalizeOptions,
) -> Result<(Vec<String>, Vec<ListingRecord>)> {
    let labels: Vec<&str> = match &opts.expected_columns {
        Some(expected) => expected.iter().map(String::as_str).collect(),
        None => rows[0].iter().map(|(l, _)| l.as_str()).collect(),
    };

    for (i, row) in rows.iter().enumerate() {
        let row_labels = row.iter().map(|(l, _)| l.as_str());
        if !row_labels.eq(labels.iter().copied()) {
            return Err(WatchError::schema(format!(
                "inconsistent columns in group {:?}: row {} has {:?}, expected {:?}",
                heading.name,
                i + 1,
                row.iter().map(|(l, _)| l.as_str()).collect::<Vec<_>>(),
                labels
            )));
        }
    }

    let unit_ix = labels
        .iter()
        .position(|l| *l == opts.unit_column)
        .ok_or_else(|| {
            WatchError::schema(format!(
                "unit column {:?} missing in group {:?}",
                opts.unit_column, heading.name
            ))
        })?;

    let kept: Vec<usize> = (0..labels.len())
        .filter(|&i| i != unit_ix && !opts.excluded_columns.iter().any(|x| x == labels[i]))
        .collect();
    let features = parse_descriptor(&heading.descriptor)?;

    let mut group_columns: Vec<String> = kept.iter().map(|&i| s!(labels[i])).collect();
    for f in &features {
        if group_columns.contains(&f.field) {
            return Err(WatchError::schema(format!(
                "feature {:?} of group {:?} collides with a row column",
                f.field, heading.name
            )));
        }
        group_columns.push(f.field.clone());
    }

    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        let unit = row[unit_ix].1.as_str();
        if unit.is_empty() {
            return Err(WatchError::schema(format!("empty unit id in group {:?}", heading.name)));
        }
        let key = join!(&heading.name, &opts.key_separator, unit);

        let mut fields: Vec<(String, String)> = kept.iter().map(|&i| row[i].clone()).collect();
        fields.extend(features.iter().map(|f| (f.field.clone(), f.value.clone())));
        records.push(ListingRecord::new(key, fields));
    }
    Ok((group_columns, records))
}

/// Stable sort: numeric `field` values descending first, then everything
/// else in page order.
fn sort_for_display(records: &mut [ListingRecord], field: &str) {
    let rank = |r: &ListingRecord| {
        r.get(field)
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite())
    };
    records.sort_by(|a, b| match (rank(a), rank(b)) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}
