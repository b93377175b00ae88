// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A title is empty or cannot be used as a file name.
    InvalidTitle(String),
    /// A treasure hunt with this title already exists.
    DuplicateTitle(String),
    /// A task cannot be saved without a clue.
    EmptyTaskClue,
    /// A task cannot be saved without an answer.
    EmptyAnswer,
    /// A hint cannot be saved without text.
    EmptyHint,
    /// Password cannot be empty.
    EmptyPassword,
    /// Location coordinates or radius are out of range.
    InvalidLocation {
        /// Description of the offending value.
        reason: String,
    },
    /// A deserialized aggregate breaks a structural invariant.
    IntegrityViolation {
        /// The title of the offending treasure hunt.
        title: String,
        /// Description of the violation.
        reason: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTitle(msg) => write!(f, "Invalid title: {msg}"),
            Self::DuplicateTitle(title) => {
                write!(f, "A treasure hunt with the name '{title}' already exists")
            }
            Self::EmptyTaskClue => write!(
                f,
                "You cannot save an empty task. Please write some clue or delete the task"
            ),
            Self::EmptyAnswer => write!(f, "You cannot save a task without an answer"),
            Self::EmptyHint => write!(
                f,
                "You cannot save an empty hint. Please either add some text or remove the hint"
            ),
            Self::EmptyPassword => write!(f, "Password cannot be empty"),
            Self::InvalidLocation { reason } => write!(f, "Invalid location: {reason}"),
            Self::IntegrityViolation { title, reason } => {
                write!(f, "Treasure hunt '{title}' is inconsistent: {reason}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
