// src/specs/mod.rs
//! # Page layouts
//!
//! Each module here knows *where the ground truth lives in one page's HTML* and how to
//! pull it out as raw, untyped rows. They only extract:
//!
//! - **No normalization**: keys, excluded columns and shared features are the
//!   job of `normalize`.
//! - **No persistence**: snapshots are written by `store`, after the whole
//!   page has been normalized successfully.
//!
//! ## Typical call chain
//! ```text
//! runner::run → specs::listing::parse_document → ParsedPage
//!             → normalize::normalize          → Snapshot
//! ```
//!
//! ## Conventions
//! - Case-insensitive tag detection via `core::html`; no full-document regexes.
//! - Scan locally inside known blocks (container → table → tbody → tr → td).
//! - Fail loudly when the layout is not what we expect; a silently empty page
//!   would be reported as "everything was removed".
//! - Testable offline against saved fixtures.
pub mod listing;
