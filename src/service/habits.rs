/// Habit lifecycle operations
///
/// Create, list, toggle, and delete. Toggle is the only mutator of
/// completion state: an idempotent flip of one (habit, date) pair.

use chrono::{NaiveDate, Utc};

use crate::domain::{CompletionLog, Habit, HabitId};
use crate::service::ServiceError;
use crate::storage::HabitStore;

/// A habit together with its completion logs, ascending by date
///
/// This is the shape every habit-returning operation produces, regardless
/// of how completions are stored.
#[derive(Debug, Clone)]
pub struct HabitWithLogs {
    pub habit: Habit,
    pub logs: Vec<CompletionLog>,
}

fn with_logs<S: HabitStore + ?Sized>(
    store: &S,
    habit: Habit,
) -> Result<HabitWithLogs, ServiceError> {
    let logs = store.logs_for_habit(&habit.id)?;
    Ok(HabitWithLogs { habit, logs })
}

/// Parse a route identifier; anything unparseable cannot name an existing
/// habit, so it reports as not found rather than a validation error.
pub fn parse_habit_id(raw: &str) -> Result<HabitId, ServiceError> {
    HabitId::from_string(raw).map_err(|_| ServiceError::NotFound(raw.to_string()))
}

/// Create a new habit with zero completions
///
/// No duplicate-name check is performed.
pub fn create_habit<S: HabitStore + ?Sized>(
    store: &S,
    name: String,
    description: Option<String>,
) -> Result<HabitWithLogs, ServiceError> {
    let habit = Habit::new(name, description)?;
    store.create_habit(&habit)?;

    tracing::info!("Created habit '{}' ({})", habit.name, habit.id);
    Ok(HabitWithLogs {
        habit,
        logs: Vec::new(),
    })
}

/// List active habits in storage order with their logs
pub fn list_habits<S: HabitStore + ?Sized>(
    store: &S,
    offset: u32,
    limit: u32,
) -> Result<Vec<HabitWithLogs>, ServiceError> {
    let habits = store.list_habits(offset, limit)?;

    let mut result = Vec::with_capacity(habits.len());
    for habit in habits {
        result.push(with_logs(store, habit)?);
    }
    Ok(result)
}

/// Flip the completion state of one habit for one date
///
/// If a log exists for (habit, date) it is removed; otherwise one is
/// inserted. When the caller supplies no date, the server's current UTC
/// date is used. Returns the refreshed habit with its full log set.
pub fn toggle_habit<S: HabitStore + ?Sized>(
    store: &S,
    habit_id: &HabitId,
    date: Option<NaiveDate>,
) -> Result<HabitWithLogs, ServiceError> {
    let habit = store.get_habit(habit_id)?;
    let date = date.unwrap_or_else(|| Utc::now().date_naive());

    match store.find_log(habit_id, date)? {
        Some(existing) => {
            store.delete_log(&existing)?;
            tracing::debug!("Unmarked {} for {}", habit.name, date);
        }
        None => {
            store.create_log(&CompletionLog::new(habit_id.clone(), date))?;
            tracing::debug!("Marked {} complete for {}", habit.name, date);
        }
    }

    with_logs(store, habit)
}

/// Permanently delete a habit and all its completion logs
pub fn delete_habit<S: HabitStore + ?Sized>(
    store: &S,
    habit_id: &HabitId,
) -> Result<(), ServiceError> {
    store.delete_habit(habit_id)?;
    tracing::info!("Deleted habit {}", habit_id);
    Ok(())
}
