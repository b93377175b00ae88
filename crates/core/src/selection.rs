// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// The player's or author's current position in the content tree.
///
/// Each level is an index into its parent's collection. Selecting a level
/// clears every deeper level; removals shift or clear indices so the
/// selection never points at a different item than the one chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    /// Index into all treasure hunts.
    pub treasure_hunt: Option<usize>,
    /// Index into the current hunt's problems.
    pub problem: Option<usize>,
    /// Index into the current problem's tasks.
    pub task: Option<usize>,
    /// Index into the current task's hints.
    pub hint: Option<usize>,
}

impl Selection {
    pub(crate) const fn select_treasure_hunt(&mut self, index: usize) {
        *self = Self {
            treasure_hunt: Some(index),
            problem: None,
            task: None,
            hint: None,
        };
    }

    pub(crate) const fn select_problem(&mut self, index: usize) {
        self.problem = Some(index);
        self.task = None;
        self.hint = None;
    }

    pub(crate) const fn select_task(&mut self, index: usize) {
        self.task = Some(index);
        self.hint = None;
    }

    pub(crate) const fn select_hint(&mut self, index: usize) {
        self.hint = Some(index);
    }

    pub(crate) const fn clear_treasure_hunt(&mut self) {
        *self = Self {
            treasure_hunt: None,
            problem: None,
            task: None,
            hint: None,
        };
    }

    pub(crate) const fn clear_problem(&mut self) {
        self.problem = None;
        self.task = None;
        self.hint = None;
    }

    pub(crate) const fn clear_task(&mut self) {
        self.task = None;
        self.hint = None;
    }

    pub(crate) const fn clear_hint(&mut self) {
        self.hint = None;
    }

    pub(crate) const fn treasure_hunt_removed(&mut self, index: usize) {
        if shift_on_removal(&mut self.treasure_hunt, index) {
            self.clear_treasure_hunt();
        }
    }

    pub(crate) const fn problem_removed(&mut self, index: usize) {
        if shift_on_removal(&mut self.problem, index) {
            self.clear_problem();
        }
    }

    pub(crate) const fn task_removed(&mut self, index: usize) {
        if shift_on_removal(&mut self.task, index) {
            self.clear_task();
        }
    }
}

/// Adjusts `slot` for removal of the item at `removed`.
///
/// Returns true if the selected item itself was removed.
const fn shift_on_removal(slot: &mut Option<usize>, removed: usize) -> bool {
    match *slot {
        Some(current) if current == removed => {
            *slot = None;
            true
        }
        Some(current) if current > removed => {
            *slot = Some(current - 1);
            false
        }
        _ => false,
    }
}
