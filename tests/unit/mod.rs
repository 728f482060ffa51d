/// Unit tests against the public library interface
use chrono::NaiveDate;
use habit_tracker_api::service::suggestions::{self, ExtractError};
use habit_tracker_api::*;
use tempfile::NamedTempFile;

#[test]
fn test_habit_creation() {
    let habit = Habit::new(
        "Test Habit".to_string(),
        Some("A test habit".to_string()),
    );

    assert!(habit.is_ok());
    let habit = habit.unwrap();
    assert_eq!(habit.name, "Test Habit");
    assert!(habit.is_active);
}

#[test]
fn test_habit_empty_name_rejected() {
    assert!(Habit::new(String::new(), None).is_err());
}

#[test]
fn test_completion_log_creation() {
    let habit_id = HabitId::new();
    let date = NaiveDate::from_ymd_opt(2026, 5, 1).unwrap();

    let log = CompletionLog::new(habit_id.clone(), date);
    assert_eq!(log.habit_id, habit_id);
    assert_eq!(log.completed_on, date);
}

#[test]
fn test_storage_creation() {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    let storage = SqliteStore::new(temp_file.path().to_path_buf());
    assert!(storage.is_ok());
}

#[test]
fn test_suggestion_extraction_from_fenced_reply() {
    let raw = "Here:\n```json\n{\"habits\":[\"Drink water\",\"Walk 10 min\"]}\n```";
    let habits = suggestions::extract_habits(raw).unwrap();
    assert_eq!(habits, vec!["Drink water", "Walk 10 min"]);
}

#[test]
fn test_suggestion_extraction_rejects_prose() {
    assert_eq!(
        suggestions::extract_habits("not json at all"),
        Err(ExtractError::NotJson)
    );
}
