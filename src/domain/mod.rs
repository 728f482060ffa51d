/// Domain module containing core business entities and validation
///
/// This module defines the core entities (Habit, CompletionLog) and the
/// identifier types they use. These types represent the fundamental
/// concepts in the habit tracking system.

pub mod habit;
pub mod log;
pub mod types;

// Re-export public types for easy access
pub use habit::*;
pub use log::*;
pub use types::*;

use thiserror::Error;

/// Errors that can occur during domain operations
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid habit name: {0}")]
    InvalidHabitName(String),
}
