// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for treasure hunts.
//!
//! Every treasure hunt is stored as one JSON file named after its title in a
//! single storage directory. The directory is owned exclusively by this
//! crate; no other writer is assumed.
//!
//! ## Operations
//!
//! - **Save** writes `{title}{extension}` through a temporary file. A save
//!   carrying an old title deletes the old file afterwards, which is how a
//!   hunt is renamed.
//! - **Load** reads every file with the configured extension. A corrupt file
//!   is logged and skipped; the rest of the batch still loads.
//! - **Remove** deletes a hunt's file and is a no-op if it is absent.
//!
//! ## Failure Semantics
//!
//! I/O and serialization failures are logged and reported as completion
//! events. Nothing is retried automatically; the next explicit save is the
//! retry path.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod error;
mod service;
mod store;

#[cfg(test)]
mod tests;

pub use error::PersistenceError;
pub use service::{PersistenceEvent, PersistenceService};
pub use store::{
    DEFAULT_EXTENSION, StorageConfig, load_from_dir, read_hunt_file, remove_from_dir, save_to_dir,
};
