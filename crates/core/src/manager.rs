// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::CoreError;
use crate::event::{HuntEvent, HuntEvents};
use crate::selection::Selection;
use crate::settings::Settings;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};
use treasure_hunt_domain::{
    Coordinates, DomainError, Hint, Location, Problem, Solution, Task, TaskDraft, TreasureHunt,
    clamp_hint_points, is_target_reached, validate_password, validate_task_draft, validate_title,
    validate_unique_hunt_title,
};
use treasure_hunt_persistence::{PersistenceError, PersistenceEvent, PersistenceService};

/// The stateful service that owns every treasure hunt in memory.
///
/// The manager is the only writer of the content model. Every mutating
/// operation queues a save of the affected hunt and raises a [`HuntEvent`].
/// Persistence completions are applied when the owning task calls
/// [`pump`](Self::pump) or awaits [`next_completion`](Self::next_completion).
///
/// Hunts are loaded in the background at construction; until that finishes
/// any operation that needs them fails with [`CoreError::NotLoaded`].
pub struct HuntManager {
    settings: Settings,
    persistence: PersistenceService,
    events: HuntEvents,
    hunts: Option<Vec<TreasureHunt>>,
    selection: Selection,
    pending_writes: usize,
}

impl HuntManager {
    /// Creates the manager and requests the start-up load of all hunts.
    ///
    /// # Errors
    ///
    /// Returns an error if the load request cannot be queued.
    pub fn new(settings: Settings, persistence: PersistenceService) -> Result<Self, CoreError> {
        persistence.load_treasure_hunts()?;
        Ok(Self {
            settings,
            persistence,
            events: HuntEvents::new(),
            hunts: None,
            selection: Selection::default(),
            pending_writes: 0,
        })
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    /// Subscribes to events raised from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<HuntEvent> {
        self.events.subscribe()
    }

    /// The settings the manager was created with.
    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Returns true once the start-up load has completed.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.hunts.is_some()
    }

    /// All treasure hunts, or `None` until loading completes.
    #[must_use]
    pub fn all_treasure_hunts(&self) -> Option<&[TreasureHunt]> {
        self.hunts.as_deref()
    }

    /// The current selection.
    #[must_use]
    pub const fn selection(&self) -> Selection {
        self.selection
    }

    /// Number of saves and deletes queued but not yet completed.
    #[must_use]
    pub const fn pending_writes(&self) -> usize {
        self.pending_writes
    }

    /// The selected treasure hunt.
    #[must_use]
    pub fn current_treasure_hunt(&self) -> Option<&TreasureHunt> {
        self.hunts.as_ref()?.get(self.selection.treasure_hunt?)
    }

    /// The selected problem.
    #[must_use]
    pub fn current_problem(&self) -> Option<&Problem> {
        self.current_treasure_hunt()?
            .problems
            .get(self.selection.problem?)
    }

    /// The selected task.
    #[must_use]
    pub fn current_task(&self) -> Option<&Task> {
        self.current_problem()?.tasks.get(self.selection.task?)
    }

    /// The selected hint.
    #[must_use]
    pub fn current_hint(&self) -> Option<&Hint> {
        self.current_task()?.all_hints().get(self.selection.hint?)
    }

    /// Exact, case-sensitive membership test over all hunt titles.
    #[must_use]
    pub fn contains_treasure_hunt_title(&self, title: &str) -> bool {
        self.hunts
            .as_ref()
            .is_some_and(|hunts| hunts.iter().any(|h| h.title == title))
    }

    /// The location solution of the current task, for starting a tracker.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` if no task is selected.
    pub fn current_location_target(&self) -> Result<Option<Location>, CoreError> {
        let task: &Task = self
            .current_task()
            .ok_or(CoreError::InvalidState { missing: "task" })?;
        Ok(task.solution.location_solution)
    }

    // ---------------------------------------------------------------------
    // Selection
    // ---------------------------------------------------------------------

    /// Selects a treasure hunt and clears deeper selections.
    ///
    /// # Errors
    ///
    /// Returns an error if hunts are not loaded or the index is out of range.
    pub fn select_treasure_hunt(&mut self, index: usize) -> Result<(), CoreError> {
        let len: usize = self.loaded_hunts()?.len();
        check_index("treasure hunt", index, len)?;
        self.selection.select_treasure_hunt(index);
        Ok(())
    }

    /// Selects a problem of the current hunt and clears deeper selections.
    ///
    /// # Errors
    ///
    /// Returns an error if no hunt is selected or the index is out of range.
    pub fn select_problem(&mut self, index: usize) -> Result<(), CoreError> {
        let len: usize = self.require_hunt()?.problems.len();
        check_index("problem", index, len)?;
        self.selection.select_problem(index);
        Ok(())
    }

    /// Selects a task of the current problem and clears the hint selection.
    ///
    /// # Errors
    ///
    /// Returns an error if no problem is selected or the index is out of range.
    pub fn select_task(&mut self, index: usize) -> Result<(), CoreError> {
        let len: usize = self.require_problem()?.tasks.len();
        check_index("task", index, len)?;
        self.selection.select_task(index);
        Ok(())
    }

    /// Selects a hint of the current task by its index among all hints.
    ///
    /// # Errors
    ///
    /// Returns an error if no task is selected or the index is out of range.
    pub fn select_hint(&mut self, index: usize) -> Result<(), CoreError> {
        let len: usize = self.require_task()?.all_hints().len();
        check_index("hint", index, len)?;
        self.selection.select_hint(index);
        Ok(())
    }

    /// Clears the whole selection.
    pub const fn clear_treasure_hunt(&mut self) {
        self.selection.clear_treasure_hunt();
    }

    /// Clears the problem, task and hint selections.
    pub const fn clear_problem(&mut self) {
        self.selection.clear_problem();
    }

    /// Clears the task and hint selections.
    pub const fn clear_task(&mut self) {
        self.selection.clear_task();
    }

    /// Clears the hint selection.
    pub const fn clear_hint(&mut self) {
        self.selection.clear_hint();
    }

    // ---------------------------------------------------------------------
    // Create
    // ---------------------------------------------------------------------

    /// Creates a new treasure hunt with a generated unique title, selects it
    /// and saves it.
    ///
    /// # Errors
    ///
    /// Returns `NotLoaded` before the start-up load completes.
    pub fn create_treasure_hunt(&mut self) -> Result<usize, CoreError> {
        let title: String = self.next_unnamed_title()?;
        let hunts: &mut Vec<TreasureHunt> = self.loaded_hunts_mut()?;
        hunts.push(TreasureHunt::new(title.clone()));
        let index: usize = hunts.len() - 1;
        self.selection.select_treasure_hunt(index);

        info!("Created treasure hunt '{}'", title);
        self.events
            .broadcast(&HuntEvent::TreasureHuntCreated { title });
        self.save_treasure_hunt(None)?;
        Ok(index)
    }

    /// Creates a new problem in the current hunt, selects it and saves.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` if no hunt is selected.
    pub fn create_problem(&mut self) -> Result<usize, CoreError> {
        let hunt: &mut TreasureHunt = self.require_hunt_mut()?;
        let title: String = format!("Problem {}", hunt.problems.len() + 1);
        hunt.problems.push(Problem::new(title));
        let index: usize = hunt.problems.len() - 1;
        self.selection.select_problem(index);

        debug!("Created problem {}", index);
        self.events.broadcast(&HuntEvent::ProblemCreated { index });
        self.save_treasure_hunt(None)?;
        Ok(index)
    }

    /// Creates a new task in the current problem, selects it and saves.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` if no problem is selected.
    pub fn create_task(&mut self) -> Result<usize, CoreError> {
        let problem: &mut Problem = self.require_problem_mut()?;
        let title: String = format!("Task {}", problem.tasks.len() + 1);
        problem.tasks.push(Task::new(title));
        let index: usize = problem.tasks.len() - 1;
        self.selection.select_task(index);

        debug!("Created task {}", index);
        self.events.broadcast(&HuntEvent::TaskCreated { index });
        self.save_treasure_hunt(None)?;
        Ok(index)
    }

    /// Creates an empty, unrevealed hint in the current task, selects it and saves.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` if no task is selected.
    pub fn create_hint(&mut self) -> Result<usize, CoreError> {
        let index: usize = self.require_task_mut()?.add_hint(Hint::default());
        self.selection.select_hint(index);

        debug!("Created hint {}", index);
        self.events.broadcast(&HuntEvent::HintCreated { index });
        self.save_treasure_hunt(None)?;
        Ok(index)
    }

    // ---------------------------------------------------------------------
    // Remove
    // ---------------------------------------------------------------------

    /// Removes a treasure hunt and requests deletion of its file.
    ///
    /// The hunt does not need to be selected.
    ///
    /// # Errors
    ///
    /// Returns an error if hunts are not loaded or the index is out of range.
    pub fn remove_treasure_hunt(&mut self, index: usize) -> Result<TreasureHunt, CoreError> {
        let hunts: &[TreasureHunt] = self.loaded_hunts()?;
        check_index("treasure hunt", index, hunts.len())?;
        // The hunt stays in memory unless its file deletion is queued
        self.persistence.remove_treasure_hunt(&hunts[index].title)?;
        self.pending_writes += 1;

        let hunt: TreasureHunt = self.loaded_hunts_mut()?.remove(index);
        self.selection.treasure_hunt_removed(index);
        info!("Removed treasure hunt '{}'", hunt.title);
        Ok(hunt)
    }

    /// Removes a problem from the current hunt and saves.
    ///
    /// # Errors
    ///
    /// Returns an error if no hunt is selected or the index is out of range.
    pub fn remove_problem(&mut self, index: usize) -> Result<Problem, CoreError> {
        let hunt: &mut TreasureHunt = self.require_hunt_mut()?;
        check_index("problem", index, hunt.problems.len())?;
        let problem: Problem = hunt.problems.remove(index);
        self.selection.problem_removed(index);

        debug!("Removed problem '{}'", problem.title);
        self.save_treasure_hunt(None)?;
        Ok(problem)
    }

    /// Removes a task from the current problem and saves.
    ///
    /// # Errors
    ///
    /// Returns an error if no problem is selected or the index is out of range.
    pub fn remove_task(&mut self, index: usize) -> Result<Task, CoreError> {
        let problem: &mut Problem = self.require_problem_mut()?;
        check_index("task", index, problem.tasks.len())?;
        let task: Task = problem.tasks.remove(index);
        self.selection.task_removed(index);

        debug!("Removed task '{}'", task.title);
        self.save_treasure_hunt(None)?;
        Ok(task)
    }

    /// Removes a hint from the current task without raising an event.
    ///
    /// Clears the hint selection and saves.
    ///
    /// # Errors
    ///
    /// Returns an error if no task is selected or the index is out of range.
    pub fn remove_hint_silently(&mut self, index: usize) -> Result<Hint, CoreError> {
        let task: &mut Task = self.require_task_mut()?;
        let len: usize = task.all_hints().len();
        let hint: Hint = task
            .remove_hint(index)
            .ok_or(CoreError::IndexOutOfRange {
                kind: "hint",
                index,
                len,
            })?;
        self.selection.clear_hint();

        debug!("Removed hint {}", index);
        self.save_treasure_hunt(None)?;
        Ok(hint)
    }

    /// Removes the current hint, saves and raises `HintRemoved`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` if no hint is selected.
    pub fn remove_current_hint(&mut self) -> Result<Hint, CoreError> {
        self.require_task()?;
        let index: usize = self
            .selection
            .hint
            .ok_or(CoreError::InvalidState { missing: "hint" })?;
        let hint: Hint = self.remove_hint_silently(index)?;
        self.events.broadcast(&HuntEvent::HintRemoved { index });
        Ok(hint)
    }

    // ---------------------------------------------------------------------
    // Authoring edits
    // ---------------------------------------------------------------------

    /// Renames the current treasure hunt.
    ///
    /// Saving with the old title deletes the old file. Renaming to the
    /// current title is a plain save.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTitle` or `DuplicateTitle` domain violations, or
    /// `InvalidState` if no hunt is selected.
    pub fn rename_treasure_hunt(&mut self, new_title: &str) -> Result<(), CoreError> {
        validate_title(new_title)?;
        let old_title: String = self.require_hunt()?.title.clone();
        if old_title == new_title {
            return self.save_treasure_hunt(None);
        }
        validate_unique_hunt_title(self.loaded_hunts()?, new_title)?;

        self.require_hunt_mut()?.change_title(new_title);
        info!("Renamed treasure hunt '{}' to '{}'", old_title, new_title);
        self.save_treasure_hunt(Some(&old_title))
    }

    /// Renames the current problem and saves.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTitle` for a blank title or `InvalidState` if no
    /// problem is selected.
    pub fn rename_problem(&mut self, new_title: &str) -> Result<(), CoreError> {
        require_non_blank_title(new_title)?;
        self.require_problem_mut()?.change_title(new_title);
        self.save_treasure_hunt(None)
    }

    /// Renames the current task and saves.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTitle` for a blank title or `InvalidState` if no task
    /// is selected.
    pub fn rename_task(&mut self, new_title: &str) -> Result<(), CoreError> {
        require_non_blank_title(new_title)?;
        self.require_task_mut()?.change_title(new_title);
        self.save_treasure_hunt(None)
    }

    /// Commits an edit of the current task and saves.
    ///
    /// The draft replaces the clue and the solution. Its hint text, if any,
    /// is written to the current hint.
    ///
    /// # Errors
    ///
    /// Returns the first violated validation rule, or `InvalidState` if no
    /// task is selected or the draft carries hint text without a current hint.
    pub fn save_task(&mut self, draft: TaskDraft) -> Result<(), CoreError> {
        validate_task_draft(&draft)?;
        let hint_index: Option<usize> = self.selection.hint;
        if draft.hint_text.is_some() && hint_index.is_none() {
            return Err(CoreError::InvalidState { missing: "hint" });
        }

        let task: &mut Task = self.require_task_mut()?;
        task.text_clue = draft.text_clue;
        let mut solution: Solution = Solution::new(draft.text_solution);
        solution.location_solution = draft.location;
        task.solution = solution;
        let hint: Option<&mut Hint> = hint_index.and_then(|i| task.hint_mut(i));
        if let (Some(text), Some(hint)) = (draft.hint_text, hint) {
            hint.text = text;
        }

        debug!("Saved task '{}'", task.title);
        self.save_treasure_hunt(None)
    }

    /// Sets the current hunt's starting hint points, clamped to the allowed range.
    ///
    /// Saves only if the value changed; returns whether it did.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` if no hunt is selected.
    pub fn change_treasure_hunt_hint_points(&mut self, points: u32) -> Result<bool, CoreError> {
        let points: u32 = clamp_hint_points(i64::from(points));
        let hunt: &mut TreasureHunt = self.require_hunt_mut()?;
        if hunt.starting_hint_points == points {
            return Ok(false);
        }
        hunt.starting_hint_points = points;
        self.save_treasure_hunt(None)?;
        Ok(true)
    }

    /// Sets the current problem's reward, clamped to the allowed range.
    ///
    /// Saves only if the value changed; returns whether it did.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` if no problem is selected.
    pub fn change_problem_hint_points(&mut self, points: u32) -> Result<bool, CoreError> {
        let points: u32 = clamp_hint_points(i64::from(points));
        let problem: &mut Problem = self.require_problem_mut()?;
        if problem.hint_points == points {
            return Ok(false);
        }
        problem.hint_points = points;
        self.save_treasure_hunt(None)?;
        Ok(true)
    }

    /// Adjusts the selected problem's reward, or the hunt's starting points
    /// when no problem is selected, by `delta`.
    ///
    /// Returns the new, clamped value.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` if no hunt is selected.
    pub fn change_hint_points_by(&mut self, delta: i64) -> Result<u32, CoreError> {
        if self.selection.problem.is_some() {
            let current: u32 = self.require_problem()?.hint_points;
            let points: u32 = clamp_hint_points(i64::from(current).saturating_add(delta));
            self.change_problem_hint_points(points)?;
            Ok(points)
        } else {
            let current: u32 = self.require_hunt()?.starting_hint_points;
            let points: u32 = clamp_hint_points(i64::from(current).saturating_add(delta));
            self.change_treasure_hunt_hint_points(points)?;
            Ok(points)
        }
    }

    /// Protects the current hunt with a password, or removes protection with `None`.
    ///
    /// Only a bcrypt hash is stored.
    ///
    /// # Errors
    ///
    /// Returns `EmptyPassword` for an empty password, `InvalidState` if no
    /// hunt is selected, or `PasswordHash` if hashing fails.
    pub fn set_treasure_hunt_password(&mut self, password: Option<&str>) -> Result<(), CoreError> {
        self.require_hunt()?;
        let cost: u32 = self.settings.password_cost;
        let hash: Option<String> = password
            .map(|password| -> Result<String, CoreError> {
                validate_password(password)?;
                Ok(bcrypt::hash(password, cost)?)
            })
            .transpose()?;
        let hunt: &mut TreasureHunt = self.require_hunt_mut()?;
        hunt.set_password_hash(hash);
        info!(
            "Treasure hunt '{}' password protection: {}",
            hunt.title,
            hunt.is_password_protected()
        );
        self.save_treasure_hunt(None)
    }

    /// Checks `candidate` against the password of the hunt at `index`.
    ///
    /// A hunt without a password accepts any candidate.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is out of range or the stored hash is unusable.
    pub fn verify_treasure_hunt_password(
        &self,
        index: usize,
        candidate: &str,
    ) -> Result<bool, CoreError> {
        let hunts: &[TreasureHunt] = self.loaded_hunts()?;
        check_index("treasure hunt", index, hunts.len())?;
        hunts[index]
            .password_hash()
            .map_or(Ok(true), |hash| Ok(bcrypt::verify(candidate, hash)?))
    }

    // ---------------------------------------------------------------------
    // Playing
    // ---------------------------------------------------------------------

    /// Compares `candidate` with the current task's text solution, ignoring
    /// surrounding whitespace and case. On a match the task is solved.
    ///
    /// A wrong answer changes nothing and raises no event.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` if no task is selected.
    pub fn check_text_solution(&mut self, candidate: &str) -> Result<bool, CoreError> {
        let task: &Task = self.require_task()?;
        if candidate.trim().is_empty() || !task.solution.matches_text(candidate) {
            debug!("Wrong answer for task '{}'", task.title);
            return Ok(false);
        }
        self.solve_current_task(false)?;
        Ok(true)
    }

    /// Checks manually entered coordinates against the current task's target.
    ///
    /// A task without a location solution is never solved this way.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` if no task is selected.
    pub fn check_coordinates(&mut self, latitude: f64, longitude: f64) -> Result<bool, CoreError> {
        let Some(target) = self.require_task()?.solution.location_solution else {
            return Ok(false);
        };
        if !is_target_reached(Coordinates::new(latitude, longitude), &target) {
            return Ok(false);
        }
        self.solve_current_task(true)?;
        Ok(true)
    }

    /// Solves the current task because the player reached its target.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` if no task is selected.
    pub fn target_location_reached(&mut self) -> Result<(), CoreError> {
        self.solve_current_task(true)
    }

    /// Reveals the next hint of the current task for one hint point.
    ///
    /// Hints are revealed in authoring order. The revealed hint becomes the
    /// current hint. Returns its index among all hints.
    ///
    /// # Errors
    ///
    /// Returns `PreconditionViolation` if the task is solved, has no
    /// unrevealed hints, or the hunt has no hint points left.
    pub fn reveal_hint(&mut self) -> Result<usize, CoreError> {
        let available: u32 = self.require_hunt()?.hint_points_available();
        let task: &Task = self.require_task()?;
        if task.is_solved() {
            return Err(CoreError::PreconditionViolation(String::from(
                "the task is already solved",
            )));
        }
        if task.unrevealed_hints().is_empty() {
            return Err(CoreError::PreconditionViolation(String::from(
                "the task has no unrevealed hints",
            )));
        }
        if available == 0 {
            return Err(CoreError::PreconditionViolation(String::from(
                "no hint points are available",
            )));
        }

        let index: usize = self
            .require_task_mut()?
            .reveal_next_hint()
            .ok_or_else(|| {
                CoreError::PreconditionViolation(String::from("the task has no unrevealed hints"))
            })?;
        self.require_hunt_mut()?.spend_hint_point();
        self.selection.select_hint(index);

        debug!("Revealed hint {}", index);
        self.save_treasure_hunt(None)?;
        self.events.broadcast(&HuntEvent::HintRevealed { index });
        Ok(index)
    }

    fn solve_current_task(&mut self, by_location: bool) -> Result<(), CoreError> {
        let task: &mut Task = self.require_task_mut()?;
        if !task.mark_solved() {
            debug!("Task '{}' was already solved", task.title);
            return Ok(());
        }
        info!(
            "Solved task '{}' by {}",
            task.title,
            if by_location { "location" } else { "text" }
        );

        // The task was unsolved until now, so its problem and hunt can only
        // have become solved by this transition.
        let reward: Option<u32> = self
            .current_problem()
            .filter(|p| p.is_solved())
            .map(|p| p.hint_points);
        let completed: Option<String> = self
            .current_treasure_hunt()
            .filter(|h| h.is_completed())
            .map(|h| h.title.clone());

        self.save_treasure_hunt(None)?;
        self.events.broadcast(&HuntEvent::TaskSolved { by_location });
        if let Some(reward) = reward {
            self.events.broadcast(&HuntEvent::ProblemSolved { reward });
        }
        if let Some(title) = completed {
            info!("Treasure hunt '{}' completed", title);
            self.events
                .broadcast(&HuntEvent::TreasureHuntCompleted { title });
        }
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------------

    /// Queues a save of the current hunt, deleting the file of `old_title`
    /// afterwards if given.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` if no hunt is selected, or an error if the
    /// request cannot be queued.
    pub fn save_treasure_hunt(&mut self, old_title: Option<&str>) -> Result<(), CoreError> {
        let hunt: &TreasureHunt = self.require_hunt()?;
        self.persistence.save_treasure_hunt(hunt, old_title)?;
        let title: String = hunt.title.clone();
        self.pending_writes += 1;
        self.events
            .broadcast(&HuntEvent::TreasureHuntSaveStarted { title });
        Ok(())
    }

    /// Applies every persistence completion that is ready, without waiting.
    ///
    /// Call once per tick of the owning loop. Returns the number applied.
    pub fn pump(&mut self) -> usize {
        let mut applied: usize = 0;
        while let Some(event) = self.persistence.try_next_event() {
            self.apply_completion(event);
            applied += 1;
        }
        applied
    }

    /// Waits for the next persistence completion and applies it.
    ///
    /// Returns the event raised for it, or `None` if persistence has stopped.
    pub async fn next_completion(&mut self) -> Option<HuntEvent> {
        let event: PersistenceEvent = self.persistence.next_event().await?;
        Some(self.apply_completion(event))
    }

    /// Waits until the start-up load has completed.
    ///
    /// Returns the number of hunts loaded.
    ///
    /// # Errors
    ///
    /// Returns an error if persistence stops before loading completes.
    pub async fn wait_until_loaded(&mut self) -> Result<usize, CoreError> {
        while !self.is_loaded() {
            self.next_completion()
                .await
                .ok_or(CoreError::Persistence(PersistenceError::WorkerStopped))?;
        }
        Ok(self.hunts.as_ref().map_or(0, Vec::len))
    }

    /// Waits until every queued save and delete has completed.
    ///
    /// # Errors
    ///
    /// Returns an error if persistence stops with writes outstanding.
    pub async fn flush(&mut self) -> Result<(), CoreError> {
        while self.pending_writes > 0 {
            self.next_completion()
                .await
                .ok_or(CoreError::Persistence(PersistenceError::WorkerStopped))?;
        }
        Ok(())
    }

    fn apply_completion(&mut self, event: PersistenceEvent) -> HuntEvent {
        let hunt_event: HuntEvent = match event {
            PersistenceEvent::Saved { title } => {
                self.write_completed();
                HuntEvent::TreasureHuntSaved { title }
            }
            PersistenceEvent::SaveFailed { title, error } => {
                self.write_completed();
                error!("Treasure hunt '{}' was not saved: {}", title, error);
                HuntEvent::TreasureHuntSaveFailed {
                    title,
                    reason: error.to_string(),
                }
            }
            PersistenceEvent::Removed { title } => {
                self.write_completed();
                HuntEvent::TreasureHuntRemoved { title }
            }
            PersistenceEvent::RemoveFailed { title, error } => {
                self.write_completed();
                error!("Treasure hunt '{}' file was not deleted: {}", title, error);
                HuntEvent::TreasureHuntRemoveFailed {
                    title,
                    reason: error.to_string(),
                }
            }
            PersistenceEvent::Loaded(hunts) => {
                let count: usize = hunts.len();
                info!("{} treasure hunts ready", count);
                self.hunts = Some(hunts);
                self.selection = Selection::default();
                HuntEvent::TreasureHuntsLoaded { count }
            }
            PersistenceEvent::LoadFailed(error) => {
                error!("Loading treasure hunts failed: {}", error);
                let count: usize = self.hunts.get_or_insert_with(Vec::new).len();
                HuntEvent::TreasureHuntsLoaded { count }
            }
        };
        self.events.broadcast(&hunt_event);
        hunt_event
    }

    const fn write_completed(&mut self) {
        self.pending_writes = self.pending_writes.saturating_sub(1);
    }

    // ---------------------------------------------------------------------
    // Lookup helpers
    // ---------------------------------------------------------------------

    fn next_unnamed_title(&self) -> Result<String, CoreError> {
        let hunts: &[TreasureHunt] = self.loaded_hunts()?;
        let base: &str = &self.settings.unnamed_hunt_title;
        let title: String = (hunts.len() + 1..)
            .map(|n| format!("{base} {n}"))
            .find(|title| !hunts.iter().any(|h| &h.title == title))
            .unwrap_or_else(|| format!("{base} {}", hunts.len() + 1));
        Ok(title)
    }

    fn loaded_hunts(&self) -> Result<&[TreasureHunt], CoreError> {
        self.hunts.as_deref().ok_or(CoreError::NotLoaded)
    }

    fn loaded_hunts_mut(&mut self) -> Result<&mut Vec<TreasureHunt>, CoreError> {
        self.hunts.as_mut().ok_or(CoreError::NotLoaded)
    }

    fn require_hunt(&self) -> Result<&TreasureHunt, CoreError> {
        let hunts: &[TreasureHunt] = self.loaded_hunts()?;
        self.selection
            .treasure_hunt
            .and_then(|i| hunts.get(i))
            .ok_or(CoreError::InvalidState {
                missing: "treasure hunt",
            })
    }

    fn require_problem(&self) -> Result<&Problem, CoreError> {
        let hunt: &TreasureHunt = self.require_hunt()?;
        self.selection
            .problem
            .and_then(|i| hunt.problems.get(i))
            .ok_or(CoreError::InvalidState { missing: "problem" })
    }

    fn require_task(&self) -> Result<&Task, CoreError> {
        let problem: &Problem = self.require_problem()?;
        self.selection
            .task
            .and_then(|i| problem.tasks.get(i))
            .ok_or(CoreError::InvalidState { missing: "task" })
    }

    fn require_hunt_mut(&mut self) -> Result<&mut TreasureHunt, CoreError> {
        let index: Option<usize> = self.selection.treasure_hunt;
        let hunts: &mut Vec<TreasureHunt> = self.loaded_hunts_mut()?;
        index
            .and_then(|i| hunts.get_mut(i))
            .ok_or(CoreError::InvalidState {
                missing: "treasure hunt",
            })
    }

    fn require_problem_mut(&mut self) -> Result<&mut Problem, CoreError> {
        let index: Option<usize> = self.selection.problem;
        let hunt: &mut TreasureHunt = self.require_hunt_mut()?;
        index
            .and_then(|i| hunt.problems.get_mut(i))
            .ok_or(CoreError::InvalidState { missing: "problem" })
    }

    fn require_task_mut(&mut self) -> Result<&mut Task, CoreError> {
        let index: Option<usize> = self.selection.task;
        let problem: &mut Problem = self.require_problem_mut()?;
        index
            .and_then(|i| problem.tasks.get_mut(i))
            .ok_or(CoreError::InvalidState { missing: "task" })
    }
}

const fn check_index(kind: &'static str, index: usize, len: usize) -> Result<(), CoreError> {
    if index < len {
        Ok(())
    } else {
        Err(CoreError::IndexOutOfRange { kind, index, len })
    }
}

fn require_non_blank_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        warn!("Rejected blank title");
        return Err(CoreError::DomainViolation(DomainError::InvalidTitle(
            String::from("Title cannot be empty"),
        )));
    }
    Ok(())
}
