//! Error types for the resource manager.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResmanError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Forbidden: {reason}")]
    Forbidden { reason: String },

    #[error("Unauthorized: {reason}")]
    Unauthorized { reason: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResmanError {
    pub fn not_found(entity: &str, id: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn forbidden(reason: impl Into<String>) -> Self {
        Self::Forbidden {
            reason: reason.into(),
        }
    }

    pub fn unauthorized(reason: impl Into<String>) -> Self {
        Self::Unauthorized {
            reason: reason.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

/// Flattens derived field and schema errors into one message, using each
/// error's own message when it has one.
impl From<validator::ValidationErrors> for ResmanError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                let field: &str = &field;
                errs.iter()
                    .map(|err| match &err.message {
                        Some(message) => message.to_string(),
                        None => format!("{field} is invalid ({})", err.code),
                    })
                    .collect::<Vec<_>>()
            })
            .collect();
        messages.sort();
        Self::validation(messages.join("; "))
    }
}

pub type ResmanResult<T> = Result<T, ResmanError>;

#[cfg(test)]
mod tests {
    use validator::{ValidationError, ValidationErrors};

    use super::*;

    #[test]
    fn validation_errors_keep_their_messages() {
        let mut errors = ValidationErrors::new();
        errors.add(
            "name",
            ValidationError::new("length").with_message("name is too short".into()),
        );
        errors.add("budget", ValidationError::new("range"));

        let ResmanError::Validation { message } = ResmanError::from(errors) else {
            panic!("expected a validation error");
        };
        assert_eq!(message, "budget is invalid (range); name is too short");
    }
}
