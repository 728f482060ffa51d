/// Main entry point for the habit tracker API server
///
/// Loads the environment, parses configuration, sets up logging, resolves
/// the database path, and serves the HTTP API.

use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use habit_tracker_api::{Args, HabitApiServer};

/// Get the default database path with robust fallback strategy
fn get_default_database_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
    // Try various locations in order of preference
    let potential_paths = [
        // 1. User's home directory (preferred)
        dirs::home_dir().map(|mut p| {
            p.push(".habit_tracker");
            p
        }),
        // 2. User's data directory (platform-specific)
        dirs::data_dir().map(|mut p| {
            p.push("habit_tracker");
            p
        }),
        // 3. User's config directory
        dirs::config_dir().map(|mut p| {
            p.push("habit_tracker");
            p
        }),
        // 4. Current working directory (last resort)
        std::env::current_dir().ok().map(|mut p| {
            p.push(".habit_tracker");
            p
        }),
    ];

    for potential_path in potential_paths.iter().flatten() {
        // Try to create the directory
        if let Ok(()) = std::fs::create_dir_all(potential_path) {
            // Test if we can write to this directory
            let test_file = potential_path.join(".test_write");
            if std::fs::write(&test_file, "test").is_ok() {
                let _ = std::fs::remove_file(&test_file); // Clean up test file
                let mut db_path = potential_path.clone();
                db_path.push("habits.db");
                return Ok(db_path);
            }
        }
    }

    // Ultimate fallback: use a temporary directory
    let mut temp_path = std::env::temp_dir();
    temp_path.push("habit_tracker");
    std::fs::create_dir_all(&temp_path)?;
    temp_path.push("habits.db");

    tracing::warn!("Using temporary directory for database: {}", temp_path.display());
    Ok(temp_path)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Pick up a local .env before reading configuration
    dotenvy::dotenv().ok();

    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "habit_tracker_api={},tower_http={}",
            args.log_level, args.log_level
        ))
        .init();

    info!("Starting habit tracker API server");

    // Determine database path
    let db_path = match args.database.clone() {
        Some(path) => {
            // Validate and prepare the provided path
            if let Some(parent) = path.parent() {
                if !parent.exists() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            path
        }
        None => get_default_database_path()?,
    };

    info!("Using database at: {}", db_path.display());

    let server = HabitApiServer::from_config(&args, db_path)?;
    server.run().await?;

    info!("Habit tracker API server shutdown complete");
    Ok(())
}
