// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    DomainError, Location, MAX_HINT_POINTS, MIN_HINT_POINTS, TaskDraft, TreasureHunt,
    clamp_hint_points, validate_password, validate_task_draft, validate_title,
    validate_unique_hunt_title,
};

fn create_test_draft() -> TaskDraft {
    TaskDraft {
        text_clue: String::from("Who slew the Balrog of Gondolin?"),
        text_solution: String::from("Glorfindel"),
        location: None,
        hint_text: None,
    }
}

#[test]
fn test_validate_title_accepts_plain_title() {
    assert!(validate_title("The Lonely Mountain").is_ok());
}

#[test]
fn test_validate_title_rejects_blank_title() {
    let result: Result<(), DomainError> = validate_title("   ");
    assert!(matches!(result, Err(DomainError::InvalidTitle(_))));
}

#[test]
fn test_validate_title_rejects_path_separators() {
    assert!(validate_title("../escape").is_err());
    assert!(validate_title("a\\b").is_err());
}

#[test]
fn test_validate_title_rejects_leading_dot() {
    assert!(validate_title(".hidden").is_err());
}

#[test]
fn test_validate_unique_hunt_title_is_case_sensitive() {
    let hunts: Vec<TreasureHunt> = vec![TreasureHunt::new("Mordor")];

    assert_eq!(
        validate_unique_hunt_title(&hunts, "Mordor"),
        Err(DomainError::DuplicateTitle(String::from("Mordor")))
    );
    assert!(validate_unique_hunt_title(&hunts, "mordor").is_ok());
    assert!(validate_unique_hunt_title(&hunts, "Rohan").is_ok());
}

#[test]
fn test_validate_task_draft_accepts_complete_draft() {
    assert!(validate_task_draft(&create_test_draft()).is_ok());
}

#[test]
fn test_validate_task_draft_rejects_empty_clue_first() {
    let draft: TaskDraft = TaskDraft {
        text_clue: String::new(),
        text_solution: String::new(),
        ..create_test_draft()
    };
    assert_eq!(validate_task_draft(&draft), Err(DomainError::EmptyTaskClue));
}

#[test]
fn test_validate_task_draft_rejects_empty_answer() {
    let draft: TaskDraft = TaskDraft {
        text_solution: String::from("  "),
        ..create_test_draft()
    };
    assert_eq!(validate_task_draft(&draft), Err(DomainError::EmptyAnswer));
}

#[test]
fn test_validate_task_draft_rejects_empty_pending_hint() {
    let draft: TaskDraft = TaskDraft {
        hint_text: Some(String::new()),
        ..create_test_draft()
    };
    assert_eq!(validate_task_draft(&draft), Err(DomainError::EmptyHint));
}

#[test]
fn test_validate_task_draft_rejects_bad_location() {
    let draft: TaskDraft = TaskDraft {
        location: Some(Location {
            latitude: 91.0,
            longitude: 0.0,
            radius: 100.0,
        }),
        ..create_test_draft()
    };
    assert!(matches!(
        validate_task_draft(&draft),
        Err(DomainError::InvalidLocation { .. })
    ));
}

#[test]
fn test_validate_password_rejects_empty() {
    assert_eq!(validate_password(""), Err(DomainError::EmptyPassword));
    assert!(validate_password("mellon").is_ok());
}

#[test]
fn test_clamp_hint_points() {
    assert_eq!(clamp_hint_points(-5), MIN_HINT_POINTS);
    assert_eq!(clamp_hint_points(42), 42);
    assert_eq!(clamp_hint_points(1_000), MAX_HINT_POINTS);
}
