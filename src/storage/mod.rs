/// Storage layer for persisting habit data
///
/// This module handles all database operations using SQLite. It provides
/// a clean interface for storing and retrieving habits and their
/// completion logs.

pub mod migrations;
pub mod sqlite;

// Re-export the main storage types
pub use sqlite::*;

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::{CompletionLog, Habit, HabitId};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Habit not found: {habit_id}")]
    HabitNotFound { habit_id: String },

    #[error("Duplicate log: habit {habit_id} already completed on {date}")]
    DuplicateLog { habit_id: String, date: String },

    #[error("Migration error: {0}")]
    Migration(String),
}

/// Trait defining the storage interface for habits
///
/// This trait decouples the service layer from SQLite so other stores can
/// be swapped in (and fakes used in tests) without touching the services.
pub trait HabitStore: Send + Sync {
    /// Persist a new habit
    fn create_habit(&self, habit: &Habit) -> Result<(), StorageError>;

    /// Persist several habits atomically; none survive a partial failure
    fn create_habits(&self, habits: &[Habit]) -> Result<(), StorageError>;

    /// Get a habit by ID
    fn get_habit(&self, habit_id: &HabitId) -> Result<Habit, StorageError>;

    /// List active habits in storage order, paginated by offset/limit
    fn list_habits(&self, offset: u32, limit: u32) -> Result<Vec<Habit>, StorageError>;

    /// Permanently delete a habit; its completion logs go with it
    fn delete_habit(&self, habit_id: &HabitId) -> Result<(), StorageError>;

    /// Persist a new completion log
    fn create_log(&self, log: &CompletionLog) -> Result<(), StorageError>;

    /// Remove a single completion log
    fn delete_log(&self, log: &CompletionLog) -> Result<(), StorageError>;

    /// Find the log for a specific (habit, date) pair, if any
    fn find_log(
        &self,
        habit_id: &HabitId,
        date: NaiveDate,
    ) -> Result<Option<CompletionLog>, StorageError>;

    /// All logs for a habit, in ascending date order
    fn logs_for_habit(&self, habit_id: &HabitId) -> Result<Vec<CompletionLog>, StorageError>;
}
