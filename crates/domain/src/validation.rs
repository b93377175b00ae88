// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::{Location, TreasureHunt};

/// Lowest hint-point value a hunt or problem may hold.
pub const MIN_HINT_POINTS: u32 = 0;
/// Highest hint-point value a hunt or problem may hold.
pub const MAX_HINT_POINTS: u32 = 100;

/// An authoring-side edit of a task waiting to be committed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TaskDraft {
    /// The clue shown to the player.
    pub text_clue: String,
    /// The expected text answer.
    pub text_solution: String,
    /// Optional geofenced target.
    pub location: Option<Location>,
    /// Text of the hint currently being edited, if one is open.
    pub hint_text: Option<String>,
}

/// Validates a title before it is used for an entity.
///
/// Titles of treasure hunts double as file names, so the same rules apply to
/// every titled entity.
///
/// # Errors
///
/// Returns `DomainError::InvalidTitle` if the title is blank, contains a path
/// separator, or starts with a dot.
pub fn validate_title(title: &str) -> Result<(), DomainError> {
    if title.trim().is_empty() {
        return Err(DomainError::InvalidTitle(String::from(
            "Title cannot be empty",
        )));
    }

    if title.contains(['/', '\\']) {
        return Err(DomainError::InvalidTitle(format!(
            "Title '{title}' cannot contain path separators"
        )));
    }

    if title.starts_with('.') {
        return Err(DomainError::InvalidTitle(format!(
            "Title '{title}' cannot start with a dot"
        )));
    }

    Ok(())
}

/// Validates that no hunt already uses `title`.
///
/// The comparison is exact and case-sensitive.
///
/// # Errors
///
/// Returns `DomainError::DuplicateTitle` if a hunt with this title exists.
pub fn validate_unique_hunt_title(hunts: &[TreasureHunt], title: &str) -> Result<(), DomainError> {
    if hunts.iter().any(|h| h.title == title) {
        return Err(DomainError::DuplicateTitle(title.to_string()));
    }
    Ok(())
}

/// Validates a task draft before it is committed.
///
/// Rules are checked in order and the first failure wins: clue, answer,
/// then the pending hint.
///
/// # Errors
///
/// Returns `EmptyTaskClue`, `EmptyAnswer`, `EmptyHint`, or
/// `InvalidLocation` for the first violated rule.
pub fn validate_task_draft(draft: &TaskDraft) -> Result<(), DomainError> {
    if draft.text_clue.trim().is_empty() {
        return Err(DomainError::EmptyTaskClue);
    }

    if draft.text_solution.trim().is_empty() {
        return Err(DomainError::EmptyAnswer);
    }

    if draft
        .hint_text
        .as_deref()
        .is_some_and(|text| text.trim().is_empty())
    {
        return Err(DomainError::EmptyHint);
    }

    if let Some(location) = &draft.location {
        location.validate()?;
    }

    Ok(())
}

/// Validates a new password.
///
/// # Errors
///
/// Returns `DomainError::EmptyPassword` if the password is empty.
pub fn validate_password(password: &str) -> Result<(), DomainError> {
    if password.is_empty() {
        return Err(DomainError::EmptyPassword);
    }
    Ok(())
}

/// Clamps a hint-point value into `MIN_HINT_POINTS..=MAX_HINT_POINTS`.
#[must_use]
pub fn clamp_hint_points(value: i64) -> u32 {
    let clamped: i64 = value.clamp(i64::from(MIN_HINT_POINTS), i64::from(MAX_HINT_POINTS));
    u32::try_from(clamped).unwrap_or(MIN_HINT_POINTS)
}
