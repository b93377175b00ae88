// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]


use tempfile::TempDir;
use treasure_hunt_domain::{Hint, Location, Problem, Solution, Task, TreasureHunt};

use crate::StorageConfig;

pub fn create_test_storage() -> (TempDir, StorageConfig) {
    let dir: TempDir = TempDir::new().unwrap();
    let config: StorageConfig = StorageConfig::new(dir.path());
    (dir, config)
}

/// Builds a hunt with `problems` problems of `tasks` tasks with `hints` hints each.
///
/// The first task of the first problem is solved and has one revealed hint.
pub fn create_test_hunt(title: &str, problems: usize, tasks: usize, hints: usize) -> TreasureHunt {
    let mut hunt: TreasureHunt = TreasureHunt::new(title);
    hunt.starting_hint_points = 3;

    for p in 0..problems {
        let mut problem: Problem = Problem::new(format!("Problem {}", p + 1));
        problem.hint_points = 2;
        for t in 0..tasks {
            let mut task: Task = Task::new(format!("Task {}", t + 1));
            task.text_clue = String::from("Where did Bilbo find the ring?");
            task.solution = Solution::with_location(
                "Misty Mountains",
                Location::new(45.0, 15.0, 80.0).unwrap(),
            );
            for h in 0..hints {
                task.add_hint(Hint::new(format!("hint {}", h + 1)));
            }
            problem.tasks.push(task);
        }
        hunt.problems.push(problem);
    }

    if let Some(task) = hunt.problems.first_mut().and_then(|p| p.tasks.first_mut()) {
        task.mark_solved();
        if task.reveal_next_hint().is_some() {
            hunt.spend_hint_point();
        }
    }

    hunt
}
