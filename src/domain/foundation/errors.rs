//! Error types for the domain layer.

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;
use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: String,
        min: i64,
        max: i64,
        actual: i64,
    },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates an out of range validation error.
    pub fn out_of_range(field: impl Into<String>, min: i64, max: i64, actual: i64) -> Self {
        ValidationError::OutOfRange {
            field: field.into(),
            min,
            max,
            actual,
        }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Error codes organized by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Validation errors
    ValidationFailed,
    InvalidGroupSize,

    // Input errors
    EventNotFound,
    EmptyRoster,
    NoRestaurants,
    NoCapacity,
    DistributionExists,
    DistributionNotFound,

    // Collaborator errors
    CollaboratorError,
    AIProviderError,

    // Infrastructure errors
    DatabaseError,
    InternalError,
}

impl ErrorCode {
    /// Returns true for errors caused by the caller's input.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ErrorCode::ValidationFailed
                | ErrorCode::InvalidGroupSize
                | ErrorCode::EventNotFound
                | ErrorCode::EmptyRoster
                | ErrorCode::NoRestaurants
                | ErrorCode::NoCapacity
                | ErrorCode::DistributionExists
                | ErrorCode::DistributionNotFound
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::InvalidGroupSize => "INVALID_GROUP_SIZE",
            ErrorCode::EventNotFound => "EVENT_NOT_FOUND",
            ErrorCode::EmptyRoster => "EMPTY_ROSTER",
            ErrorCode::NoRestaurants => "NO_RESTAURANTS",
            ErrorCode::NoCapacity => "NO_CAPACITY",
            ErrorCode::DistributionExists => "DISTRIBUTION_EXISTS",
            ErrorCode::DistributionNotFound => "DISTRIBUTION_NOT_FOUND",
            ErrorCode::CollaboratorError => "COLLABORATOR_ERROR",
            ErrorCode::AIProviderError => "AI_PROVIDER_ERROR",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", s)
    }
}

/// Standard domain error with code, message, and optional details.
#[derive(Debug, Clone)]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
    pub details: BTreeMap<String, String>,
}

impl DomainError {
    /// Creates a new domain error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: BTreeMap::new(),
        }
    }

    /// Creates a validation error for a specific field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message).with_detail("field", field.into())
    }

    /// Adds a detail to the error.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for DomainError {}

impl From<ValidationError> for DomainError {
    fn from(err: ValidationError) -> Self {
        DomainError::new(ErrorCode::ValidationFailed, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_out_of_range_displays_correctly() {
        let err = ValidationError::out_of_range("group_size", 1, 64, 0);
        assert_eq!(
            format!("{}", err),
            "Field 'group_size' must be between 1 and 64, got 0"
        );
    }

    #[test]
    fn domain_error_displays_code_and_message() {
        let err = DomainError::new(ErrorCode::EmptyRoster, "No confirmed guests");
        assert_eq!(format!("{}", err), "[EMPTY_ROSTER] No confirmed guests");
    }

    #[test]
    fn domain_error_with_detail_adds_detail() {
        let err = DomainError::new(ErrorCode::EventNotFound, "Event not found")
            .with_detail("event_id", "evt-1");

        assert_eq!(err.details.get("event_id"), Some(&"evt-1".to_string()));
    }

    #[test]
    fn validation_error_converts_to_domain_error() {
        let err: DomainError = ValidationError::empty_field("guest_id").into();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert!(err.message().contains("guest_id"));
    }

    #[test]
    fn input_errors_are_classified() {
        assert!(ErrorCode::NoRestaurants.is_input_error());
        assert!(ErrorCode::NoCapacity.is_input_error());
        assert!(!ErrorCode::DatabaseError.is_input_error());
        assert!(!ErrorCode::CollaboratorError.is_input_error());
    }
}
