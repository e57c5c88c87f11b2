// src/lib.rs
//! Snapshot a listing page, keep a history of captures and report which
//! units appeared or disappeared since the previous one.

#[macro_use]
pub mod macros;
#[macro_use]
pub mod log;

pub mod config;
pub mod core;
pub mod error;
pub mod specs;

pub mod diff;
pub mod features;
pub mod normalize;
pub mod progress;
pub mod report;
pub mod runner;
pub mod snapshot;
pub mod store;
pub mod table;
pub mod transport;

#[cfg(feature = "cli")]
pub mod cli;

#[doc(hidden)]
pub use tracing as __tracing;

pub use error::{Result, TransportError, WatchError};
pub use runner::{RunFlags, RunSummary};
