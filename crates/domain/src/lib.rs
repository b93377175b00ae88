// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

mod error;
mod geo;
mod types;
mod validation;

#[cfg(test)]
mod tests;

// Re-export public types
pub use error::DomainError;
pub use geo::{EARTH_RADIUS_METERS, distance_meters, is_target_reached, is_within_geofence};
pub use types::{
    Coordinates, DEFAULT_LOCATION_RADIUS, Hint, Location, Problem, Solution, Task, TreasureHunt,
};
pub use validation::{
    MAX_HINT_POINTS, MIN_HINT_POINTS, TaskDraft, clamp_hint_points, validate_password,
    validate_task_draft, validate_title, validate_unique_hunt_title,
};
