// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use treasure_hunt_domain::DomainError;
use treasure_hunt_persistence::PersistenceError;

/// Errors that can occur during hunt manager operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A domain rule was violated.
    DomainViolation(DomainError),
    /// Treasure hunts have not finished loading yet.
    NotLoaded,
    /// The operation needs a current selection that is not set.
    InvalidState {
        /// The missing selection, e.g. "treasure hunt" or "task".
        missing: &'static str,
    },
    /// An index does not refer to an existing item.
    IndexOutOfRange {
        /// The kind of item addressed.
        kind: &'static str,
        /// The requested index.
        index: usize,
        /// The number of items available.
        len: usize,
    },
    /// The caller invoked an operation whose precondition does not hold.
    PreconditionViolation(String),
    /// A persistence request could not be queued.
    Persistence(PersistenceError),
    /// Hashing or verifying a password failed.
    PasswordHash(String),
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::NotLoaded => write!(f, "Treasure hunts are not loaded yet"),
            Self::InvalidState { missing } => write!(f, "No current {missing} is selected"),
            Self::IndexOutOfRange { kind, index, len } => {
                write!(f, "No {kind} at index {index} (there are {len})")
            }
            Self::PreconditionViolation(msg) => write!(f, "Precondition violated: {msg}"),
            Self::Persistence(err) => write!(f, "Persistence error: {err}"),
            Self::PasswordHash(msg) => write!(f, "Password hashing failed: {msg}"),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}

impl From<PersistenceError> for CoreError {
    fn from(err: PersistenceError) -> Self {
        Self::Persistence(err)
    }
}

impl From<bcrypt::BcryptError> for CoreError {
    fn from(err: bcrypt::BcryptError) -> Self {
        Self::PasswordHash(err.to_string())
    }
}
