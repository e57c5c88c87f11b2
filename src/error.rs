// src/error.rs
//! Error taxonomy for the watch pipeline.
//!
//! Everything up to and including normalization is fatal and happens before
//! any file is written. `NoHistory` is the only variant the pipeline recovers
//! from (it becomes an empty baseline). `Transport` is raised after the
//! snapshot has already been persisted and carries the path that was written.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, WatchError>;

#[derive(Debug, Error)]
pub enum WatchError {
    /// Markup is missing the structure the parser expects.
    #[error("parse error: {0}")]
    Parse(String),

    /// Rows or groups disagree on their column layout, or keys collide.
    #[error("schema error: {0}")]
    Schema(String),

    #[error("no groups found in the listing page")]
    EmptySnapshot,

    #[error("no snapshot history in {}", .0.display())]
    NoHistory(PathBuf),

    #[error("storage I/O error at {}: {source}", path.display())]
    StorageIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A snapshot file exists but cannot be read back as a snapshot table.
    #[error("malformed snapshot file {}: {reason}", path.display())]
    StorageFormat { path: PathBuf, reason: String },

    /// The listing page itself could not be read.
    #[error("cannot read input {}: {source}", path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("config error: {0}")]
    Config(String),

    #[error("report delivery failed (snapshot kept at {}): {source}", snapshot.display())]
    Transport {
        snapshot: PathBuf,
        #[source]
        source: TransportError,
    },
}

impl WatchError {
    pub fn parse(msg: impl Into<String>) -> Self {
        WatchError::Parse(msg.into())
    }

    pub fn schema(msg: impl Into<String>) -> Self {
        WatchError::Schema(msg.into())
    }

    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        WatchError::StorageIo { path: path.as_ref().to_path_buf(), source }
    }

    /// True for errors that abort a run before anything is persisted.
    pub fn is_pre_persistence(&self) -> bool {
        matches!(
            self,
            WatchError::Parse(_) | WatchError::Schema(_) | WatchError::EmptySnapshot
        )
    }
}

/// Failures of the delivery collaborator, split by the stage that failed.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("could not reach {target}: {reason}")]
    Connect { target: String, reason: String },

    #[error("authentication rejected for {user}")]
    Auth { user: String },

    #[error("send failed: {0}")]
    Send(String),
}
