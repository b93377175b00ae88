// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::validation::validate_title;
use serde::{Deserialize, Serialize};

/// Acceptance radius, in meters, used when a location solution does not specify one.
pub const DEFAULT_LOCATION_RADIUS: f64 = 100.0;

const fn default_radius() -> f64 {
    DEFAULT_LOCATION_RADIUS
}

/// A point on the globe in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in degrees, `-90..=90`.
    pub latitude: f64,
    /// Longitude in degrees, `-180..=180`.
    pub longitude: f64,
}

impl Coordinates {
    /// Creates a new coordinate pair.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// A geofenced target: a coordinate plus an acceptance radius in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Acceptance radius in meters.
    #[serde(default = "default_radius")]
    pub radius: f64,
}

impl Location {
    /// Creates a new location, validating coordinate ranges and the radius.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidLocation` if the latitude is outside
    /// `-90..=90`, the longitude is outside `-180..=180`, or the radius is not
    /// a positive finite number.
    pub fn new(latitude: f64, longitude: f64, radius: f64) -> Result<Self, DomainError> {
        let location: Self = Self {
            latitude,
            longitude,
            radius,
        };
        location.validate()?;
        Ok(location)
    }

    /// Creates a new location with the default acceptance radius.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidLocation` if the coordinates are out of range.
    pub fn with_default_radius(latitude: f64, longitude: f64) -> Result<Self, DomainError> {
        Self::new(latitude, longitude, DEFAULT_LOCATION_RADIUS)
    }

    /// Returns the target coordinates.
    #[must_use]
    pub const fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    /// Checks coordinate ranges and the radius.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidLocation` describing the first bad value.
    pub fn validate(&self) -> Result<(), DomainError> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(DomainError::InvalidLocation {
                reason: format!("latitude {} is outside -90..=90", self.latitude),
            });
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(DomainError::InvalidLocation {
                reason: format!("longitude {} is outside -180..=180", self.longitude),
            });
        }
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(DomainError::InvalidLocation {
                reason: format!("radius {} must be a positive number of meters", self.radius),
            });
        }
        Ok(())
    }
}

/// An auxiliary clue, revealed at a hint-point cost.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Hint {
    /// The hint text. Empty only while the hint is an unsaved draft.
    pub text: String,
}

impl Hint {
    /// Creates a hint with the given text.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Returns true if the hint has no meaningful text yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// The correctness criterion for a task.
///
/// A task is solved by a matching text answer or by reaching the location,
/// whichever comes first.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Solution {
    /// The expected text answer, compared trimmed and case-insensitively.
    pub text_solution: String,
    /// The optional geofenced target.
    #[serde(default)]
    pub location_solution: Option<Location>,
}

impl Solution {
    /// Creates a text-only solution.
    #[must_use]
    pub fn new(text_solution: impl Into<String>) -> Self {
        Self {
            text_solution: text_solution.into(),
            location_solution: None,
        }
    }

    /// Creates a solution accepting either the text or the location.
    #[must_use]
    pub fn with_location(text_solution: impl Into<String>, location: Location) -> Self {
        Self {
            text_solution: text_solution.into(),
            location_solution: Some(location),
        }
    }

    /// Returns true if a location target is configured.
    #[must_use]
    pub const fn has_location_solution(&self) -> bool {
        self.location_solution.is_some()
    }

    /// Compares a candidate answer against the text solution.
    ///
    /// Both sides are trimmed and lower-cased before comparison.
    #[must_use]
    pub fn matches_text(&self, candidate: &str) -> bool {
        normalize_answer(&self.text_solution) == normalize_answer(candidate)
    }
}

fn normalize_answer(value: &str) -> String {
    value.trim().to_lowercase()
}

/// The atomic puzzle unit: a clue, a solution and optional hints.
///
/// Hints are stored in authoring order together with the number of hints
/// already revealed. Revealing always takes the first unrevealed hint, so the
/// revealed hints are exactly the leading `revealed_hints_count` entries and
/// every hint belongs to exactly one of the two views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// The task title.
    pub title: String,
    /// The prompt shown to the player.
    pub text_clue: String,
    /// How the task is solved.
    pub solution: Solution,
    is_solved: bool,
    hints: Vec<Hint>,
    revealed_hints_count: usize,
}

impl Task {
    /// Creates an unsolved task with an empty clue, solution and no hints.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text_clue: String::new(),
            solution: Solution::default(),
            is_solved: false,
            hints: Vec::new(),
            revealed_hints_count: 0,
        }
    }

    /// Renames the task. No validation at this layer.
    pub fn change_title(&mut self, new_title: impl Into<String>) {
        self.title = new_title.into();
    }

    /// Returns true once the task has been solved.
    #[must_use]
    pub const fn is_solved(&self) -> bool {
        self.is_solved
    }

    /// Marks the task solved.
    ///
    /// Returns true if this call performed the `Unsolved -> Solved` transition.
    pub const fn mark_solved(&mut self) -> bool {
        let transitioned: bool = !self.is_solved;
        self.is_solved = true;
        transitioned
    }

    /// All hints in authoring order.
    #[must_use]
    pub fn all_hints(&self) -> &[Hint] {
        &self.hints
    }

    /// Hints the player has already paid for, in reveal order.
    #[must_use]
    pub fn revealed_hints(&self) -> &[Hint] {
        &self.hints[..self.revealed_split()]
    }

    /// Hints still hidden from the player, next-to-reveal first.
    #[must_use]
    pub fn unrevealed_hints(&self) -> &[Hint] {
        &self.hints[self.revealed_split()..]
    }

    fn revealed_split(&self) -> usize {
        self.revealed_hints_count.min(self.hints.len())
    }

    /// Returns true if the task has at least one hint.
    #[must_use]
    pub fn has_hints(&self) -> bool {
        !self.hints.is_empty()
    }

    /// Returns true if the hint at `index` of `all_hints` has been revealed.
    #[must_use]
    pub const fn is_hint_revealed(&self, index: usize) -> bool {
        index < self.revealed_hints_count
    }

    /// Appends a hint to the unrevealed hints and returns its index in `all_hints`.
    pub fn add_hint(&mut self, hint: Hint) -> usize {
        self.hints.push(hint);
        self.hints.len() - 1
    }

    /// Mutable access to a hint by its index in `all_hints`.
    pub fn hint_mut(&mut self, index: usize) -> Option<&mut Hint> {
        self.hints.get_mut(index)
    }

    /// Moves the first unrevealed hint to the revealed hints.
    ///
    /// Returns the index of the revealed hint in `all_hints`, or `None` if every
    /// hint is already revealed.
    pub const fn reveal_next_hint(&mut self) -> Option<usize> {
        if self.revealed_hints_count >= self.hints.len() {
            return None;
        }
        self.revealed_hints_count += 1;
        Some(self.revealed_hints_count - 1)
    }

    /// Removes the hint at `index` of `all_hints` from whichever view holds it.
    pub fn remove_hint(&mut self, index: usize) -> Option<Hint> {
        if index >= self.hints.len() {
            return None;
        }
        if index < self.revealed_hints_count {
            self.revealed_hints_count -= 1;
        }
        Some(self.hints.remove(index))
    }

    fn check_integrity(&self) -> Result<(), String> {
        if self.revealed_hints_count > self.hints.len() {
            return Err(format!(
                "task '{}' claims {} revealed hints but has only {}",
                self.title,
                self.revealed_hints_count,
                self.hints.len()
            ));
        }
        if let Some(location) = &self.solution.location_solution {
            location
                .validate()
                .map_err(|e| format!("task '{}': {e}", self.title))?;
        }
        Ok(())
    }
}

/// A named group of tasks; solving all of them grants `hint_points`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    /// The problem title. Unique by convention only.
    pub title: String,
    /// Tasks in authoring order.
    pub tasks: Vec<Task>,
    /// Reward added to the hunt's pool once the problem is solved.
    pub hint_points: u32,
}

impl Problem {
    /// Creates an empty problem with no reward.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            tasks: Vec::new(),
            hint_points: 0,
        }
    }

    /// Renames the problem. No validation at this layer.
    pub fn change_title(&mut self, new_title: impl Into<String>) {
        self.title = new_title.into();
    }

    /// A problem is solved when every task is solved; vacuously true without tasks.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.tasks.iter().all(Task::is_solved)
    }
}

/// The top-level aggregate and unit of persistence, identified by its title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreasureHunt {
    /// The unique title, also used as the file name.
    pub title: String,
    /// Problems in authoring order.
    pub problems: Vec<Problem>,
    /// Hint points the player starts with.
    pub starting_hint_points: u32,
    used_hint_points: u32,
    #[serde(default)]
    password: Option<String>,
}

impl TreasureHunt {
    /// Creates an empty, unprotected treasure hunt.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            problems: Vec::new(),
            starting_hint_points: 0,
            used_hint_points: 0,
            password: None,
        }
    }

    /// Renames the hunt. Uniqueness is checked by the caller.
    pub fn change_title(&mut self, new_title: impl Into<String>) {
        self.title = new_title.into();
    }

    /// A hunt is completed when every problem is solved; vacuously true without problems.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.problems.iter().all(Problem::is_solved)
    }

    /// Number of solved problems.
    #[must_use]
    pub fn solved_problem_count(&self) -> usize {
        self.problems.iter().filter(|p| p.is_solved()).count()
    }

    /// Fraction of solved problems in `0.0..=1.0`; zero when there are no problems.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn percent_complete(&self) -> f64 {
        if self.problems.is_empty() {
            return 0.0;
        }
        self.solved_problem_count() as f64 / self.problems.len() as f64
    }

    /// Hint points spent on reveals so far. Never decreases.
    #[must_use]
    pub const fn used_hint_points(&self) -> u32 {
        self.used_hint_points
    }

    /// Records one spent hint point.
    pub const fn spend_hint_point(&mut self) {
        self.used_hint_points = self.used_hint_points.saturating_add(1);
    }

    /// Starting points plus rewards of solved problems minus spent points, floored at zero.
    #[must_use]
    pub fn hint_points_available(&self) -> u32 {
        let rewards: i64 = self
            .problems
            .iter()
            .filter(|p| p.is_solved())
            .map(|p| i64::from(p.hint_points))
            .sum();
        let available: i64 =
            i64::from(self.starting_hint_points) + rewards - i64::from(self.used_hint_points);
        u32::try_from(available.max(0)).unwrap_or(u32::MAX)
    }

    /// Returns true if the hunt requires a password to play.
    #[must_use]
    pub const fn is_password_protected(&self) -> bool {
        self.password.is_some()
    }

    /// The stored password hash, if any.
    #[must_use]
    pub fn password_hash(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// Replaces the stored password hash. `None` removes protection.
    pub fn set_password_hash(&mut self, hash: Option<String>) {
        self.password = hash;
    }

    /// Verifies structural invariants of an aggregate read from storage.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::IntegrityViolation` if the title is not a valid
    /// file name, a task's revealed hint count exceeds its hints, or a location
    /// solution is invalid.
    pub fn check_integrity(&self) -> Result<(), DomainError> {
        validate_title(&self.title).map_err(|err| DomainError::IntegrityViolation {
            title: self.title.clone(),
            reason: err.to_string(),
        })?;
        for task in self.problems.iter().flat_map(|p| p.tasks.iter()) {
            task.check_integrity()
                .map_err(|reason| DomainError::IntegrityViolation {
                    title: self.title.clone(),
                    reason,
                })?;
        }
        Ok(())
    }
}
