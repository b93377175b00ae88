// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Notifications raised by the hunt manager.
//!
//! Events are facts about what changed; the presentation layer re-renders
//! in response but must still read the manager for current state.

use tokio::sync::broadcast;
use tracing::debug;

/// Maximum number of events buffered per subscriber.
/// A subscriber that falls further behind loses the oldest events.
const EVENT_BUFFER_SIZE: usize = 256;

/// Something the presentation layer may want to react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuntEvent {
    /// A treasure hunt was created and selected.
    TreasureHuntCreated {
        /// The generated title.
        title: String,
    },
    /// A problem was created in the current hunt and selected.
    ProblemCreated {
        /// Index of the new problem.
        index: usize,
    },
    /// A task was created in the current problem and selected.
    TaskCreated {
        /// Index of the new task.
        index: usize,
    },
    /// A hint was created in the current task and selected.
    HintCreated {
        /// Index of the new hint among all hints.
        index: usize,
    },
    /// The current hint was removed.
    HintRemoved {
        /// Index the hint had among all hints.
        index: usize,
    },
    /// The next hint of the current task was revealed and selected.
    HintRevealed {
        /// Index of the revealed hint among all hints.
        index: usize,
    },
    /// The current task was solved.
    TaskSolved {
        /// True when solved by reaching the target location.
        by_location: bool,
    },
    /// Solving a task also solved its problem.
    ProblemSolved {
        /// Hint points the problem adds to the hunt's pool.
        reward: u32,
    },
    /// Solving a task completed the whole hunt.
    TreasureHuntCompleted {
        /// The hunt's title.
        title: String,
    },
    /// Stored treasure hunts finished loading.
    TreasureHuntsLoaded {
        /// Number of hunts loaded.
        count: usize,
    },
    /// A save of a treasure hunt was queued.
    TreasureHuntSaveStarted {
        /// The hunt's title.
        title: String,
    },
    /// A treasure hunt was written to storage.
    TreasureHuntSaved {
        /// The hunt's title.
        title: String,
    },
    /// Writing a treasure hunt failed.
    TreasureHuntSaveFailed {
        /// The hunt's title.
        title: String,
        /// Why the save failed.
        reason: String,
    },
    /// A removed treasure hunt's file was deleted.
    TreasureHuntRemoved {
        /// The hunt's title.
        title: String,
    },
    /// Deleting a removed treasure hunt's file failed.
    TreasureHuntRemoveFailed {
        /// The hunt's title.
        title: String,
        /// Why the delete failed.
        reason: String,
    },
}

/// Fan-out of hunt events to any number of subscribers.
///
/// This is a thin wrapper around `tokio::sync::broadcast`.
#[derive(Clone)]
pub struct HuntEvents {
    tx: broadcast::Sender<HuntEvent>,
}

impl HuntEvents {
    /// Creates a new event fan-out with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(EVENT_BUFFER_SIZE);
        Self { tx }
    }

    /// Sends an event to every subscriber.
    ///
    /// With no subscribers the event is dropped.
    pub fn broadcast(&self, event: &HuntEvent) {
        match self.tx.send(event.clone()) {
            Ok(count) => {
                debug!(?event, receivers = count, "Broadcast hunt event");
            }
            Err(_) => {
                // No receivers, which is fine
                debug!(?event, "No receivers for hunt event");
            }
        }
    }

    /// Subscribes to events raised from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<HuntEvent> {
        self.tx.subscribe()
    }
}

impl Default for HuntEvents {
    fn default() -> Self {
        Self::new()
    }
}
