// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The treasure hunt engine.
//!
//! [`HuntManager`] owns every treasure hunt in memory, tracks what the player
//! or author has selected, enforces the solving and hint rules, and queues
//! saves on the [`PersistenceService`](treasure_hunt_persistence::PersistenceService).
//! State changes are announced as [`HuntEvent`]s.
//!
//! [`LocationTracker`] polls a [`LocationProvider`] and reports when a task's
//! target location is reached.

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
mod event;
mod location;
mod manager;
mod selection;
mod settings;

#[cfg(test)]
mod tests;

pub use error::CoreError;
pub use event::{HuntEvent, HuntEvents};
pub use location::{
    LocationEvent, LocationProvider, LocationStatus, LocationTracker, TrackerHandle,
};
pub use manager::HuntManager;
pub use selection::Selection;
pub use settings::{Settings, TrackerSettings, UNNAMED_TREASURE_HUNT};
