// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{HuntEvent, HuntManager, LocationProvider, LocationStatus, Settings};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;
use tokio::sync::broadcast;
use treasure_hunt_domain::{Coordinates, Hint, Location, Problem, Solution, Task, TreasureHunt};
use treasure_hunt_persistence::{PersistenceService, StorageConfig, save_to_dir};

pub fn create_test_settings(dir: &TempDir) -> Settings {
    Settings {
        storage: StorageConfig::new(dir.path()),
        password_cost: 4,
        ..Settings::default()
    }
}

/// Starts a manager over `settings` and waits for the start-up load.
pub async fn create_manager(settings: Settings) -> HuntManager {
    let persistence: PersistenceService = PersistenceService::start(settings.storage.clone());
    let mut manager: HuntManager = HuntManager::new(settings, persistence).unwrap();
    manager.wait_until_loaded().await.unwrap();
    manager
}

/// A loaded manager over an empty temporary directory.
pub async fn create_loaded_manager() -> (TempDir, HuntManager) {
    let dir: TempDir = TempDir::new().unwrap();
    let manager: HuntManager = create_manager(create_test_settings(&dir)).await;
    (dir, manager)
}

/// A loaded manager whose directory already holds `hunts`.
pub async fn create_manager_with(hunts: &[TreasureHunt]) -> (TempDir, HuntManager) {
    let dir: TempDir = TempDir::new().unwrap();
    let settings: Settings = create_test_settings(&dir);
    for hunt in hunts {
        save_to_dir(&settings.storage, hunt, None).await.unwrap();
    }
    let manager: HuntManager = create_manager(settings).await;
    (dir, manager)
}

pub fn target_location() -> Location {
    Location::new(45.0, 15.0, 80.0).unwrap()
}

/// One problem worth 2 points with two tasks, starting with 3 hint points.
///
/// Task 1 answers "Glorfindel", has a location solution and two hints.
/// Task 2 answers "Balrog" and has no hints or location.
pub fn create_playable_hunt(title: &str) -> TreasureHunt {
    let mut first: Task = Task::new("Task 1");
    first.text_clue = String::from("Who fought the Balrog at Cirith Thoronath?");
    first.solution = Solution::with_location("Glorfindel", target_location());
    first.add_hint(Hint::new("He returned from Mandos"));
    first.add_hint(Hint::new("He met Frodo at the Ford of Bruinen"));

    let mut second: Task = Task::new("Task 2");
    second.text_clue = String::from("What did Gandalf face at Khazad-dum?");
    second.solution = Solution::new("Balrog");

    let mut problem: Problem = Problem::new("Problem 1");
    problem.hint_points = 2;
    problem.tasks.push(first);
    problem.tasks.push(second);

    let mut hunt: TreasureHunt = TreasureHunt::new(title);
    hunt.starting_hint_points = 3;
    hunt.problems.push(problem);
    hunt
}

/// A loaded manager holding one playable hunt with its first task selected.
pub async fn create_manager_at_first_task() -> (TempDir, HuntManager) {
    let (dir, mut manager) = create_manager_with(&[create_playable_hunt("Gondolin")]).await;
    manager.select_treasure_hunt(0).unwrap();
    manager.select_problem(0).unwrap();
    manager.select_task(0).unwrap();
    (dir, manager)
}

/// Every event currently buffered on `rx`.
pub fn drain_events(rx: &mut broadcast::Receiver<HuntEvent>) -> Vec<HuntEvent> {
    let mut events: Vec<HuntEvent> = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// Scripted location provider.
///
/// Status and position queues advance one step per call; the last entry of
/// each repeats once the rest are used up.
pub struct MockProvider {
    enabled: bool,
    started: Mutex<bool>,
    statuses: Mutex<VecDeque<LocationStatus>>,
    positions: Mutex<VecDeque<Coordinates>>,
    stop_calls: AtomicUsize,
}

impl MockProvider {
    pub fn new(statuses: &[LocationStatus], positions: &[Coordinates]) -> Self {
        Self {
            enabled: true,
            started: Mutex::new(false),
            statuses: Mutex::new(statuses.iter().copied().collect()),
            positions: Mutex::new(positions.iter().copied().collect()),
            stop_calls: AtomicUsize::new(0),
        }
    }

    pub fn running(positions: &[Coordinates]) -> Self {
        Self::new(&[LocationStatus::Running], positions)
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::running(&[])
        }
    }

    pub fn was_started(&self) -> bool {
        *self.started.lock().unwrap()
    }

    pub fn stop_calls(&self) -> usize {
        self.stop_calls.load(Ordering::SeqCst)
    }
}

fn advance<T: Copy>(queue: &Mutex<VecDeque<T>>) -> Option<T> {
    let mut queue = queue.lock().unwrap();
    if queue.len() > 1 {
        queue.pop_front()
    } else {
        queue.front().copied()
    }
}

impl LocationProvider for MockProvider {
    fn is_enabled_by_user(&self) -> bool {
        self.enabled
    }

    fn start(&self, _desired_accuracy_meters: f64, _update_distance_meters: f64) {
        *self.started.lock().unwrap() = true;
    }

    fn status(&self) -> LocationStatus {
        if !self.was_started() {
            return LocationStatus::Stopped;
        }
        advance(&self.statuses).unwrap_or(LocationStatus::Failed)
    }

    fn last_known_position(&self) -> Option<Coordinates> {
        advance(&self.positions)
    }

    fn stop(&self) {
        *self.started.lock().unwrap() = false;
        self.stop_calls.fetch_add(1, Ordering::SeqCst);
    }
}
