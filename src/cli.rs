// src/cli.rs
use std::path::PathBuf;

use clap::Parser;

use crate::config::AppOptions;
use crate::error::WatchError;
use crate::progress::{Progress, Stage};
use crate::runner::{self, RunFlags};
use crate::transport::OutboxTransport;

/// Snapshot a listing page, diff it against the last capture and queue an
/// HTML report of additions and removals.
#[derive(Debug, Parser)]
#[command(name = "listing_watch", version, about)]
pub struct Args {
    /// Saved listing page (HTML).
    #[arg(short, long)]
    pub input: PathBuf,

    /// TOML config file; flags below override it.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Snapshot history directory.
    #[arg(long)]
    pub store: Option<PathBuf>,

    /// Report recipient (repeatable).
    #[arg(long = "to", value_name = "ADDRESS")]
    pub recipients: Vec<String>,

    /// Pickup directory for outgoing report messages.
    #[arg(long)]
    pub outbox: Option<PathBuf>,

    /// Print the report to stdout.
    #[arg(long)]
    pub print: bool,

    /// Do not save a snapshot or queue a report.
    #[arg(long)]
    pub dry_run: bool,

    /// Append logs to this file instead of stderr.
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// More logging (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// No progress lines on stderr.
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Config file (or defaults) with command-line overrides applied.
    pub fn options(&self) -> Result<AppOptions, WatchError> {
        let mut opts = match &self.config {
            Some(path) => AppOptions::load(path)?,
            None => AppOptions::default(),
        };
        if let Some(dir) = &self.store {
            opts.store.dir = dir.clone();
        }
        if !self.recipients.is_empty() {
            opts.mail.recipients = self.recipients.clone();
        }
        if let Some(dir) = &self.outbox {
            opts.mail.outbox_dir = dir.clone();
        }
        Ok(opts)
    }
}

/// Stage lines on stderr.
struct ConsoleProgress {
    total: usize,
    done: usize,
}

impl Progress for ConsoleProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
    }

    fn log(&mut self, msg: &str) {
        eprintln!("{msg}");
    }

    fn stage_done(&mut self, stage: Stage) {
        self.done += 1;
        eprintln!("[{}/{}] {}", self.done, self.total, stage.label());
    }
}

pub fn run() -> Result<(), WatchError> {
    run_with(Args::parse())
}

pub fn run_with(args: Args) -> Result<(), WatchError> {
    crate::log::init(args.verbose, args.log_file.as_deref())?;
    let opts = args.options()?;

    let mut transport = OutboxTransport::from_options(&opts.mail);
    let mut console = ConsoleProgress { total: 0, done: 0 };
    let progress = if args.quiet { None } else { Some(&mut console as &mut dyn Progress) };

    let summary = runner::run_file(
        &args.input,
        &opts,
        RunFlags { dry_run: args.dry_run },
        Some(&mut transport),
        progress,
    )?;

    if args.print {
        println!("{}", summary.report);
    }
    if !args.quiet {
        eprintln!(
            "{} records, {} added, {} removed",
            summary.current.len(),
            summary.diff.added.len(),
            summary.diff.removed.len()
        );
        if let Some(path) = &summary.snapshot_path {
            eprintln!("snapshot: {}", path.display());
        }
        if let Some(path) = transport.written().last() {
            eprintln!("report queued: {}", path.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config_defaults() {
        let args = Args::try_parse_from([
            "listing_watch", "-i", "page.html", "--store", "snaps",
            "--to", "a@example.com", "--to", "b@example.com", "-vv", "--dry-run",
        ])
        .unwrap();
        assert_eq!(args.verbose, 2);
        assert!(args.dry_run);

        let opts = args.options().unwrap();
        assert_eq!(opts.store.dir, PathBuf::from("snaps"));
        assert_eq!(opts.mail.recipients, vec!["a@example.com", "b@example.com"]);
        assert_eq!(opts.mail.outbox_dir, AppOptions::default().mail.outbox_dir);
    }

    #[test]
    fn input_is_required() {
        assert!(Args::try_parse_from(["listing_watch"]).is_err());
    }
}
