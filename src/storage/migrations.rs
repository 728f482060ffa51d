/// Database migration management
///
/// This module handles creating and updating the SQLite database schema.
/// It ensures the database has all the required tables and indexes.

use rusqlite::Connection;

use crate::storage::StorageError;

/// Current database schema version
///
/// Increment this when you add new migrations
const CURRENT_VERSION: i32 = 1;

/// Initialize the database schema
///
/// This creates all required tables and indexes if they don't exist.
/// It also sets up the version tracking for future migrations.
pub fn initialize_database(conn: &Connection) -> Result<(), StorageError> {
    // Create version tracking table first
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        )",
        [],
    )?;

    let current_version = get_current_version(conn)?;

    if current_version < CURRENT_VERSION {
        run_migrations(conn, current_version)?;
        set_version(conn, CURRENT_VERSION)?;
    }

    Ok(())
}

/// Get the current database schema version
fn get_current_version(conn: &Connection) -> Result<i32, StorageError> {
    let version = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get::<_, i32>(0)
        })
        .unwrap_or(0); // Default to version 0 if no version record exists

    Ok(version)
}

/// Set the database schema version
fn set_version(conn: &Connection, version: i32) -> Result<(), StorageError> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}

/// Run database migrations from the current version to the latest
fn run_migrations(conn: &Connection, from_version: i32) -> Result<(), StorageError> {
    if from_version < 1 {
        migration_v1(conn)?;
    }

    // Future migrations would go here:
    // if from_version < 2 {
    //     migration_v2(conn)?;
    // }

    Ok(())
}

/// Migration to version 1: Create initial tables
///
/// This creates the habits table and the completion_logs table that
/// references it. Logs are owned by their habit and removed with it.
fn migration_v1(conn: &Connection) -> Result<(), StorageError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS habits (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT,
            is_active BOOLEAN DEFAULT TRUE
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS completion_logs (
            id TEXT PRIMARY KEY,
            habit_id TEXT NOT NULL,
            completed_on TEXT NOT NULL,
            FOREIGN KEY (habit_id) REFERENCES habits (id) ON DELETE CASCADE
        )",
        [],
    )?;

    create_indexes_v1(conn)?;

    tracing::info!("Applied migration v1: Created initial database schema");
    Ok(())
}

/// Create database indexes for version 1
fn create_indexes_v1(conn: &Connection) -> Result<(), StorageError> {
    // Index for the toggle path (find log by habit and date)
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_completion_logs_habit_date
         ON completion_logs (habit_id, completed_on)",
        [],
    )?;

    // Index for filtering active habits
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_habits_active
         ON habits (is_active)",
        [],
    )?;

    // At most one log per habit per calendar date
    conn.execute(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_completion_logs_unique
         ON completion_logs (habit_id, completed_on)",
        [],
    )?;

    tracing::info!("Created database indexes for v1");
    Ok(())
}
