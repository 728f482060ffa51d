/// Habit entity and related functionality
///
/// This module defines the core Habit struct that represents a recurring
/// activity a user wants to track, along with its validation rules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, HabitId};

/// A habit represents something the user wants to do regularly
///
/// This is the core entity in the system. Completion state lives in
/// separate `CompletionLog` rows owned by the habit, not on the habit
/// itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    /// Unique identifier for this habit
    pub id: HabitId,
    /// Display name (e.g., "Morning Run", "Read for 30min")
    pub name: String,
    /// Optional detailed description
    pub description: Option<String>,
    /// When this habit was created
    pub created_at: DateTime<Utc>,
    /// When this habit was last modified, if ever
    pub updated_at: Option<DateTime<Utc>>,
    /// Soft-delete marker; listings only show active habits
    pub is_active: bool,
}

impl Habit {
    /// Create a new habit with validation
    ///
    /// A freshly created habit is active and has no completions.
    pub fn new(name: String, description: Option<String>) -> Result<Self, DomainError> {
        Self::validate_name(&name)?;
        Self::validate_description(&description)?;

        Ok(Self {
            id: HabitId::new(),
            name: name.trim().to_string(),
            description,
            created_at: Utc::now(),
            updated_at: None,
            is_active: true,
        })
    }

    /// Create a habit from existing data (used when loading from the database)
    ///
    /// Assumes the data was validated when it was first written.
    pub fn from_existing(
        id: HabitId,
        name: String,
        description: Option<String>,
        created_at: DateTime<Utc>,
        updated_at: Option<DateTime<Utc>>,
        is_active: bool,
    ) -> Self {
        Self {
            id,
            name,
            description,
            created_at,
            updated_at,
            is_active,
        }
    }

    /// Validate habit name according to business rules
    fn validate_name(name: &str) -> Result<(), DomainError> {
        let trimmed = name.trim();

        if trimmed.is_empty() {
            return Err(DomainError::InvalidHabitName(
                "Habit name cannot be empty".to_string(),
            ));
        }

        if trimmed.len() > 200 {
            return Err(DomainError::InvalidHabitName(
                "Habit name cannot be longer than 200 characters".to_string(),
            ));
        }

        Ok(())
    }

    /// Validate optional description
    fn validate_description(description: &Option<String>) -> Result<(), DomainError> {
        if let Some(desc) = description {
            if desc.len() > 500 {
                return Err(DomainError::Validation {
                    message: "Description cannot be longer than 500 characters".to_string(),
                });
            }
        }
        Ok(())
    }
}
