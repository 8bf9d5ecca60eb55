//! Engine error types.
//!
//! Every command validates before it mutates, so an `Err` always means
//! the engine state is exactly what it was before the call.

use thiserror::Error;

use crate::validation::ValidationError;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Coarse classification of a rejected command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unknown train, route, station, or platform reference.
    NotFound,
    /// Platform already held by another active train.
    Conflict,
    /// Command is illegal for the train's current status.
    InvalidState,
    /// Malformed argument or snapshot.
    InvalidInput,
}

/// Errors returned by engine commands.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Unknown reference.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Platform occupied by another active train.
    #[error("Conflict: platform {platform} is held by active train {holder}")]
    Conflict { platform: String, holder: String },

    /// Command not legal from the current status.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Malformed argument.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Snapshot or topology failed structural validation.
    #[error("Validation failed: {}", format_validation(.0))]
    Validation(Vec<ValidationError>),

    /// Snapshot could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl EngineError {
    /// Returns the error kind reported to callers.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::InvalidState(_) => ErrorKind::InvalidState,
            Self::InvalidInput(_) | Self::Validation(_) | Self::Serialization(_) => {
                ErrorKind::InvalidInput
            }
        }
    }

    pub(crate) fn not_found(what: &str, id: &str) -> Self {
        Self::NotFound(format!("{what} '{id}'"))
    }
}

impl From<Vec<ValidationError>> for EngineError {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self::Validation(errors)
    }
}

fn format_validation(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            EngineError::not_found("train", "T9").kind(),
            ErrorKind::NotFound
        );
        let conflict = EngineError::Conflict {
            platform: "central:1".into(),
            holder: "T1".into(),
        };
        assert_eq!(conflict.kind(), ErrorKind::Conflict);
        assert!(conflict.to_string().contains("central:1"));
        assert_eq!(
            EngineError::InvalidState("moving".into()).kind(),
            ErrorKind::InvalidState
        );
    }

    #[test]
    fn test_validation_maps_to_invalid_input() {
        let err = EngineError::from(vec![ValidationError::new(
            ValidationErrorKind::DuplicateId,
            "Duplicate train ID: T1",
        )]);
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(err.to_string().contains("Duplicate train ID: T1"));
    }
}
