/// SQLite implementation of the habit storage interface
///
/// This module provides the concrete SQLite implementation for storing
/// and retrieving habit data. It handles all SQL queries and data
/// conversion. The connection sits behind a mutex so the store can be
/// shared across request handlers.

use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection};

use crate::domain::{CompletionLog, Habit, HabitId, LogId};
use crate::storage::{migrations, HabitStore, StorageError};

/// SQLite-based storage implementation
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Create a new SQLite storage instance
    ///
    /// This opens the database file and runs any necessary migrations
    /// to ensure the schema is up to date.
    pub fn new(db_path: PathBuf) -> Result<Self, StorageError> {
        let conn = Connection::open(&db_path)
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;

        Self::prepare(conn, Some(&db_path))
    }

    /// Create an in-memory store (used by tests)
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;

        Self::prepare(conn, None)
    }

    fn prepare(conn: Connection, db_path: Option<&PathBuf>) -> Result<Self, StorageError> {
        // Foreign keys must be on for the log cascade to fire on delete
        conn.execute("PRAGMA foreign_keys = ON", [])
            .map_err(|e| StorageError::Connection(format!("Failed to enable foreign keys: {}", e)))?;

        migrations::initialize_database(&conn)?;

        if let Some(path) = db_path {
            tracing::info!("SQLite storage initialized at: {:?}", path);
        }

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn
            .lock()
            .map_err(|_| StorageError::Connection("Database mutex poisoned".to_string()))
    }

    fn habit_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Habit> {
        let id_str: String = row.get(0)?;
        let id = HabitId::from_string(&id_str).map_err(|_| {
            rusqlite::Error::InvalidColumnType(0, "Invalid UUID".to_string(), rusqlite::types::Type::Text)
        })?;

        let created_at_str: String = row.get(3)?;
        let created_at = DateTime::parse_from_rfc3339(&created_at_str)
            .map_err(|_| {
                rusqlite::Error::InvalidColumnType(3, "Invalid datetime".to_string(), rusqlite::types::Type::Text)
            })?
            .with_timezone(&Utc);

        let updated_at_str: Option<String> = row.get(4)?;
        let updated_at = match updated_at_str {
            Some(s) => Some(
                DateTime::parse_from_rfc3339(&s)
                    .map_err(|_| {
                        rusqlite::Error::InvalidColumnType(4, "Invalid datetime".to_string(), rusqlite::types::Type::Text)
                    })?
                    .with_timezone(&Utc),
            ),
            None => None,
        };

        Ok(Habit::from_existing(
            id,
            row.get(1)?, // name
            row.get(2)?, // description
            created_at,
            updated_at,
            row.get(5)?, // is_active
        ))
    }

    fn log_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<CompletionLog> {
        let log_id_str: String = row.get(0)?;
        let log_id = LogId::from_string(&log_id_str).map_err(|_| {
            rusqlite::Error::InvalidColumnType(0, "Invalid UUID".to_string(), rusqlite::types::Type::Text)
        })?;

        let habit_id_str: String = row.get(1)?;
        let habit_id = HabitId::from_string(&habit_id_str).map_err(|_| {
            rusqlite::Error::InvalidColumnType(1, "Invalid UUID".to_string(), rusqlite::types::Type::Text)
        })?;

        let completed_on_str: String = row.get(2)?;
        let completed_on = NaiveDate::parse_from_str(&completed_on_str, "%Y-%m-%d").map_err(|_| {
            rusqlite::Error::InvalidColumnType(2, "Invalid date".to_string(), rusqlite::types::Type::Text)
        })?;

        Ok(CompletionLog::from_existing(log_id, habit_id, completed_on))
    }

    fn insert_habit(conn: &Connection, habit: &Habit) -> Result<(), StorageError> {
        conn.execute(
            "INSERT INTO habits (id, name, description, created_at, updated_at, is_active)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                habit.id.to_string(),
                habit.name,
                habit.description,
                habit.created_at.to_rfc3339(),
                habit.updated_at.map(|t| t.to_rfc3339()),
                habit.is_active
            ],
        )?;

        tracing::debug!("Created habit: {} ({})", habit.name, habit.id);
        Ok(())
    }
}

impl HabitStore for SqliteStore {
    /// Create a new habit in the database
    fn create_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        let conn = self.conn()?;
        Self::insert_habit(&conn, habit)
    }

    /// Create several habits inside one transaction
    ///
    /// If any insert fails the transaction rolls back and none of the
    /// habits from this call are retained.
    fn create_habits(&self, habits: &[Habit]) -> Result<(), StorageError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        for habit in habits {
            if let Err(e) = Self::insert_habit(&tx, habit) {
                // Dropping the transaction rolls it back; make it explicit
                tx.rollback()?;
                return Err(e);
            }
        }

        tx.commit()?;
        Ok(())
    }

    /// Get a habit by its ID
    fn get_habit(&self, habit_id: &HabitId) -> Result<Habit, StorageError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, description, created_at, updated_at, is_active
             FROM habits WHERE id = ?1",
        )?;

        let result = stmt.query_row(params![habit_id.to_string()], Self::habit_from_row);

        match result {
            Ok(habit) => Ok(habit),
            Err(rusqlite::Error::QueryReturnedNoRows) => Err(StorageError::HabitNotFound {
                habit_id: habit_id.to_string(),
            }),
            Err(e) => Err(StorageError::Query(e)),
        }
    }

    /// List active habits in storage order, paginated by offset/limit
    fn list_habits(&self, offset: u32, limit: u32) -> Result<Vec<Habit>, StorageError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, description, created_at, updated_at, is_active
             FROM habits WHERE is_active = 1
             ORDER BY created_at ASC
             LIMIT ?1 OFFSET ?2",
        )?;

        let habit_iter = stmt.query_map(params![limit, offset], Self::habit_from_row)?;

        let mut habits = Vec::new();
        for habit in habit_iter {
            habits.push(habit?);
        }

        Ok(habits)
    }

    /// Permanently delete a habit
    ///
    /// The foreign-key cascade removes the habit's completion logs in the
    /// same statement.
    fn delete_habit(&self, habit_id: &HabitId) -> Result<(), StorageError> {
        let conn = self.conn()?;
        let rows_affected = conn.execute(
            "DELETE FROM habits WHERE id = ?1",
            params![habit_id.to_string()],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::HabitNotFound {
                habit_id: habit_id.to_string(),
            });
        }

        tracing::debug!("Deleted habit: {}", habit_id);
        Ok(())
    }

    /// Create a new completion log
    fn create_log(&self, log: &CompletionLog) -> Result<(), StorageError> {
        let conn = self.conn()?;
        let result = conn.execute(
            "INSERT INTO completion_logs (id, habit_id, completed_on) VALUES (?1, ?2, ?3)",
            params![
                log.id.to_string(),
                log.habit_id.to_string(),
                log.completed_on.to_string()
            ],
        );

        match result {
            Ok(_) => {
                tracing::debug!("Created log {} for habit {}", log.id, log.habit_id);
                Ok(())
            }
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(StorageError::DuplicateLog {
                    habit_id: log.habit_id.to_string(),
                    date: log.completed_on.to_string(),
                })
            }
            Err(e) => Err(StorageError::Query(e)),
        }
    }

    /// Remove a single completion log
    fn delete_log(&self, log: &CompletionLog) -> Result<(), StorageError> {
        let conn = self.conn()?;
        conn.execute(
            "DELETE FROM completion_logs WHERE id = ?1",
            params![log.id.to_string()],
        )?;

        tracing::debug!("Deleted log {} for habit {}", log.id, log.habit_id);
        Ok(())
    }

    /// Find the log for a specific (habit, date) pair, if any
    fn find_log(
        &self,
        habit_id: &HabitId,
        date: NaiveDate,
    ) -> Result<Option<CompletionLog>, StorageError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, habit_id, completed_on FROM completion_logs
             WHERE habit_id = ?1 AND completed_on = ?2",
        )?;

        let result = stmt.query_row(
            params![habit_id.to_string(), date.to_string()],
            Self::log_from_row,
        );

        match result {
            Ok(log) => Ok(Some(log)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StorageError::Query(e)),
        }
    }

    /// All logs for a habit, in ascending date order
    fn logs_for_habit(&self, habit_id: &HabitId) -> Result<Vec<CompletionLog>, StorageError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, habit_id, completed_on FROM completion_logs
             WHERE habit_id = ?1
             ORDER BY completed_on ASC",
        )?;

        let log_iter = stmt.query_map(params![habit_id.to_string()], Self::log_from_row)?;

        let mut logs = Vec::new();
        for log in log_iter {
            logs.push(log?);
        }

        Ok(logs)
    }
}
