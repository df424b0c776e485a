//! Core error types for League RS
//!
//! Client-input errors carry the entity name and an error key so the API
//! layer can render them the same way for every resource.

use std::collections::BTreeMap;
use thiserror::Error;

/// Core error type for all League operations
#[derive(Error, Debug)]
pub enum LeagueError {
    /// Rejected request on a mutation endpoint (`idexists`, `idnull`, ...)
    #[error("{message}")]
    BadRequestAlert {
        message: String,
        entity_name: &'static str,
        error_key: &'static str,
    },

    #[error("Not found: {entity} with id={id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl LeagueError {
    pub fn bad_request_alert(
        message: impl Into<String>,
        entity_name: &'static str,
        error_key: &'static str,
    ) -> Self {
        LeagueError::BadRequestAlert {
            message: message.into(),
            entity_name,
            error_key,
        }
    }

    pub fn not_found(entity: &'static str, id: impl std::fmt::Display) -> Self {
        LeagueError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            LeagueError::BadRequestAlert { .. }
            | LeagueError::BadRequest(_)
            | LeagueError::Validation(_) => 400,
            LeagueError::NotFound { .. } => 404,
            LeagueError::Database(_) | LeagueError::Internal(_) | LeagueError::Config(_) => 500,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            LeagueError::BadRequestAlert { error_key, .. } => *error_key,
            LeagueError::NotFound { .. } => "not_found",
            LeagueError::BadRequest(_) => "bad_request",
            LeagueError::Validation(_) => "validation_failed",
            LeagueError::Database(_) => "database_error",
            LeagueError::Internal(_) => "internal_error",
            LeagueError::Config(_) => "configuration_error",
        }
    }
}

/// Result type for League operations
pub type LeagueResult<T> = Result<T, LeagueError>;

/// Field-level validation errors
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ValidationErrors {
    /// Field-specific errors: field_name -> messages
    pub errors: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Check if there are errors for a specific field
    pub fn has_error(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn full_messages(&self) -> Vec<String> {
        let mut messages = Vec::new();
        for (field, field_messages) in &self.errors {
            for msg in field_messages {
                messages.push(format!("{} {}", field, msg));
            }
        }
        messages
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.full_messages().join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_request_alert_maps_to_400() {
        let err = LeagueError::bad_request_alert("A new player cannot already have an ID", "player", "idexists");
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.error_code(), "idexists");
        assert_eq!(err.to_string(), "A new player cannot already have an ID");
    }

    #[test]
    fn test_not_found() {
        let err = LeagueError::not_found("Team", 7);
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.to_string(), "Not found: Team with id=7");
    }

    #[test]
    fn test_validation_errors_messages() {
        let mut errors = ValidationErrors::new();
        errors.add("name", "is too long");
        errors.add("city", "is too long");

        assert!(errors.has_error("name"));
        assert_eq!(
            errors.full_messages(),
            vec!["city is too long".to_string(), "name is too long".to_string()]
        );
        assert_eq!(LeagueError::from(errors).status_code(), 400);
    }
}
