// src/runner.rs
//
// One watch run, start to finish:
//
//   parse → normalize → load baseline → diff → render → save → deliver
//
// Everything that can reject the page happens before `save`, so a bad page
// never becomes the next baseline. The baseline is read before the new
// snapshot is written. Delivery runs last; its failure is reported with the
// path of the snapshot that was already kept.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::config::AppOptions;
use crate::diff::{self, Diff};
use crate::error::{Result, WatchError};
use crate::normalize::normalize;
use crate::progress::{Progress, Stage};
use crate::report;
use crate::snapshot::Snapshot;
use crate::specs::listing::parse_document;
use crate::store;
use crate::transport::Transport;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunFlags {
    /// Parse, diff and render only: nothing is saved or delivered.
    pub dry_run: bool,
}

/// What a run produced.
#[derive(Debug)]
pub struct RunSummary {
    pub current: Snapshot,
    pub diff: Diff,
    pub report: String,
    /// Snapshot written by this run (`None` on a dry run).
    pub snapshot_path: Option<PathBuf>,
    /// Snapshot compared against (`None` when there was no history).
    pub baseline_path: Option<PathBuf>,
    pub delivered: bool,
}

/// Read the listing page from `input` and run the pipeline on it.
pub fn run_file(
    input: &Path,
    opts: &AppOptions,
    flags: RunFlags,
    transport: Option<&mut dyn Transport>,
    progress: Option<&mut dyn Progress>,
) -> Result<RunSummary> {
    let markup = fs::read_to_string(input).map_err(|source| WatchError::Input {
        path: input.to_path_buf(),
        source,
    })?;
    logf!(input = %input.display(), bytes = markup.len(), "read listing page");
    run(&markup, opts, flags, transport, progress)
}

/// Top-level runner. `transport` and `progress` may be `None`.
pub fn run(
    markup: &str,
    opts: &AppOptions,
    flags: RunFlags,
    transport: Option<&mut dyn Transport>,
    mut progress: Option<&mut dyn Progress>,
) -> Result<RunSummary> {
    if let Some(p) = progress.as_deref_mut() {
        p.begin(planned_stages(opts, flags, transport.is_some()));
    }
    let result = run_stages(markup, opts, flags, transport, progress.as_deref_mut());
    if let Some(p) = progress.as_deref_mut() {
        if let Err(e) = &result {
            p.log(&format!("run failed: {e}"));
        }
        p.finish();
    }
    result
}

fn planned_stages(opts: &AppOptions, flags: RunFlags, has_transport: bool) -> usize {
    let mut n = Stage::ALL.len();
    if flags.dry_run {
        n -= 2;
    } else if !has_transport || opts.mail.recipients.is_empty() {
        n -= 1;
    }
    n
}

fn run_stages(
    markup: &str,
    opts: &AppOptions,
    flags: RunFlags,
    transport: Option<&mut dyn Transport>,
    mut progress: Option<&mut (dyn Progress + '_)>,
) -> Result<RunSummary> {
    let mut done = |stage: Stage| {
        logd!(stage = stage.label(), "stage done");
        if let Some(p) = progress.as_deref_mut() {
            p.stage_done(stage);
        }
    };

    let page = parse_document(markup, &opts.parse)?;
    done(Stage::Parse);

    let current = normalize(&page, &opts.normalize, Utc::now())?;
    done(Stage::Normalize);

    let (previous, baseline_path) = store::load_baseline(&opts.store.dir)?;
    done(Stage::LoadBaseline);

    let diff = diff::compute(&current, &previous);
    done(Stage::Diff);

    let report = report::render(&current, &diff, &opts.report);
    done(Stage::Render);

    let mut summary = RunSummary {
        current,
        diff,
        report,
        snapshot_path: None,
        baseline_path,
        delivered: false,
    };
    if flags.dry_run {
        logf!("dry run: nothing saved or delivered");
        return Ok(summary);
    }

    let saved = store::save(&summary.current, &opts.store.dir)?;
    summary.snapshot_path = Some(saved.clone());
    done(Stage::Save);

    let recipients = &opts.mail.recipients;
    match transport {
        Some(t) if !recipients.is_empty() => {
            t.deliver(recipients, &summary.report)
                .map_err(|source| {
                    loge!(error = %source, "delivery failed");
                    WatchError::Transport { snapshot: saved, source }
                })?;
            summary.delivered = true;
            done(Stage::Deliver);
        }
        Some(_) => logw!("no recipients configured; report not delivered"),
        None => logd!("no transport; report not delivered"),
    }

    Ok(summary)
}
