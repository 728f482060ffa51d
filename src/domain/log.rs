/// CompletionLog entity for tracking habit completions
///
/// A completion log records that a habit was performed on one specific
/// calendar date. The toggle operation is the only mutator: it inserts a
/// log when the date is absent and removes it when present.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{HabitId, LogId};

/// A record that a habit was completed on a specific day
///
/// At most one log exists per (habit, date) pair; the storage layer
/// enforces this with a unique index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionLog {
    /// Unique identifier for this entry
    pub id: LogId,
    /// Which habit this entry belongs to
    pub habit_id: HabitId,
    /// The calendar date the habit was completed on
    pub completed_on: NaiveDate,
}

impl CompletionLog {
    /// Create a new completion log for the given habit and date
    pub fn new(habit_id: HabitId, completed_on: NaiveDate) -> Self {
        Self {
            id: LogId::new(),
            habit_id,
            completed_on,
        }
    }

    /// Create a log from existing data (used when loading from the database)
    pub fn from_existing(id: LogId, habit_id: HabitId, completed_on: NaiveDate) -> Self {
        Self {
            id,
            habit_id,
            completed_on,
        }
    }
}
