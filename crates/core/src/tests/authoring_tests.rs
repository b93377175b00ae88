// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{
    create_loaded_manager, create_manager_at_first_task, create_manager_with,
    create_playable_hunt, drain_events,
};
use crate::{CoreError, HuntEvent};
use tokio::sync::broadcast;
use treasure_hunt_domain::{DomainError, Location, TaskDraft};

fn complete_draft() -> TaskDraft {
    TaskDraft {
        text_clue: String::from("Which elf-lord rode Asfaloth?"),
        text_solution: String::from("Glorfindel"),
        location: None,
        hint_text: None,
    }
}

#[tokio::test]
async fn test_rename_treasure_hunt_moves_its_file() {
    let (dir, mut manager) = create_manager_with(&[create_playable_hunt("Gondolin")]).await;
    manager.select_treasure_hunt(0).unwrap();

    manager.rename_treasure_hunt("Tuor's Journey").unwrap();
    manager.flush().await.unwrap();

    assert_eq!(
        manager.current_treasure_hunt().unwrap().title,
        "Tuor's Journey"
    );
    assert!(dir.path().join("Tuor's Journey.th").exists());
    assert!(!dir.path().join("Gondolin.th").exists());
}

#[tokio::test]
async fn test_rename_to_existing_title_is_rejected() {
    let (_dir, mut manager) = create_manager_with(&[
        create_playable_hunt("Doriath"),
        create_playable_hunt("Gondolin"),
    ])
    .await;
    manager.select_treasure_hunt(1).unwrap();

    assert_eq!(
        manager.rename_treasure_hunt("Doriath"),
        Err(CoreError::DomainViolation(DomainError::DuplicateTitle(
            String::from("Doriath")
        )))
    );
    assert_eq!(manager.current_treasure_hunt().unwrap().title, "Gondolin");
}

#[tokio::test]
async fn test_rename_to_same_title_is_a_plain_save() {
    let (dir, mut manager) = create_manager_with(&[create_playable_hunt("Gondolin")]).await;
    manager.select_treasure_hunt(0).unwrap();

    manager.rename_treasure_hunt("Gondolin").unwrap();
    manager.flush().await.unwrap();

    assert!(dir.path().join("Gondolin.th").exists());
}

#[tokio::test]
async fn test_rename_rejects_titles_that_are_not_file_names() {
    let (_dir, mut manager) = create_loaded_manager().await;
    manager.create_treasure_hunt().unwrap();

    for title in ["", "   ", "Nargothrond/Gate", ".hidden"] {
        assert!(matches!(
            manager.rename_treasure_hunt(title),
            Err(CoreError::DomainViolation(DomainError::InvalidTitle(_)))
        ));
    }
}

#[tokio::test]
async fn test_rename_problem_and_task() {
    let (_dir, mut manager) = create_manager_at_first_task().await;

    manager.rename_task("The Fall").unwrap();
    manager.rename_problem("Gondolin Falls").unwrap();

    assert_eq!(manager.current_task().unwrap().title, "The Fall");
    assert_eq!(manager.current_problem().unwrap().title, "Gondolin Falls");
    assert!(matches!(
        manager.rename_task("  "),
        Err(CoreError::DomainViolation(DomainError::InvalidTitle(_)))
    ));
}

#[tokio::test]
async fn test_save_task_rejects_drafts_in_rule_order() {
    let (_dir, mut manager) = create_manager_at_first_task().await;

    let draft: TaskDraft = TaskDraft::default();
    assert_eq!(
        manager.save_task(draft),
        Err(CoreError::DomainViolation(DomainError::EmptyTaskClue))
    );

    let draft: TaskDraft = TaskDraft {
        text_solution: String::new(),
        ..complete_draft()
    };
    assert_eq!(
        manager.save_task(draft),
        Err(CoreError::DomainViolation(DomainError::EmptyAnswer))
    );

    manager.select_hint(0).unwrap();
    let draft: TaskDraft = TaskDraft {
        hint_text: Some(String::from("  ")),
        ..complete_draft()
    };
    assert_eq!(
        manager.save_task(draft),
        Err(CoreError::DomainViolation(DomainError::EmptyHint))
    );
}

#[tokio::test]
async fn test_save_task_writes_clue_solution_and_current_hint() {
    let (_dir, mut manager) = create_manager_at_first_task().await;
    manager.select_hint(1).unwrap();
    let mut rx: broadcast::Receiver<HuntEvent> = manager.subscribe();

    let location: Location = Location::with_default_radius(47.5, 19.0).unwrap();
    manager
        .save_task(TaskDraft {
            location: Some(location),
            hint_text: Some(String::from("Think of a golden-haired elf")),
            ..complete_draft()
        })
        .unwrap();

    let task = manager.current_task().unwrap();
    assert_eq!(task.text_clue, "Which elf-lord rode Asfaloth?");
    assert_eq!(task.solution.location_solution, Some(location));
    assert!((location.radius - 100.0).abs() < f64::EPSILON);
    assert_eq!(task.all_hints()[1].text, "Think of a golden-haired elf");
    assert_eq!(
        drain_events(&mut rx),
        vec![HuntEvent::TreasureHuntSaveStarted {
            title: String::from("Gondolin")
        }]
    );
}

#[tokio::test]
async fn test_save_task_without_location_clears_it() {
    let (_dir, mut manager) = create_manager_at_first_task().await;

    manager.save_task(complete_draft()).unwrap();

    assert!(
        !manager
            .current_task()
            .unwrap()
            .solution
            .has_location_solution()
    );
}

#[tokio::test]
async fn test_save_task_with_hint_text_needs_current_hint() {
    let (_dir, mut manager) = create_manager_at_first_task().await;

    assert_eq!(
        manager.save_task(TaskDraft {
            hint_text: Some(String::from("Asfaloth")),
            ..complete_draft()
        }),
        Err(CoreError::InvalidState { missing: "hint" })
    );
}

#[tokio::test]
async fn test_hint_point_setters_clamp_and_report_change() {
    let (_dir, mut manager) = create_manager_at_first_task().await;

    assert!(manager.change_treasure_hunt_hint_points(150).unwrap());
    assert_eq!(
        manager.current_treasure_hunt().unwrap().starting_hint_points,
        100
    );
    assert!(!manager.change_treasure_hunt_hint_points(100).unwrap());

    assert!(manager.change_problem_hint_points(5).unwrap());
    assert!(!manager.change_problem_hint_points(5).unwrap());
    assert_eq!(manager.current_problem().unwrap().hint_points, 5);
}

#[tokio::test]
async fn test_change_hint_points_by_targets_problem_or_hunt() {
    let (_dir, mut manager) = create_manager_at_first_task().await;

    assert_eq!(manager.change_hint_points_by(3).unwrap(), 5);
    assert_eq!(manager.current_problem().unwrap().hint_points, 5);

    manager.clear_problem();
    assert_eq!(manager.change_hint_points_by(-10).unwrap(), 0);
    assert_eq!(
        manager.current_treasure_hunt().unwrap().starting_hint_points,
        0
    );
    assert_eq!(manager.change_hint_points_by(1_000).unwrap(), 100);
}

#[tokio::test]
async fn test_unchanged_hint_points_do_not_save() {
    let (_dir, mut manager) = create_manager_at_first_task().await;
    let mut rx: broadcast::Receiver<HuntEvent> = manager.subscribe();

    manager.change_problem_hint_points(2).unwrap();

    assert!(drain_events(&mut rx).is_empty());
    assert_eq!(manager.pending_writes(), 0);
}
