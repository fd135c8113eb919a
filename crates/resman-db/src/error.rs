//! Database-specific error types and conversions.

use resman_core::error::ResmanError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Malformed record: {0}")]
    Decode(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Unique constraint violated: {0}")]
    Duplicate(String),
}

impl DbError {
    /// Classifies a failed statement. Unique index violations become
    /// [`DbError::Duplicate`] carrying `conflict_message`; anything else
    /// is a query failure.
    pub(crate) fn from_statement(err: surrealdb::Error, conflict_message: &str) -> Self {
        let text = err.to_string();
        if is_unique_violation(&text) {
            DbError::Duplicate(conflict_message.to_string())
        } else {
            DbError::Query(text)
        }
    }
}

/// SurrealDB reports unique index violations as
/// "Database index `idx` already contains ...".
fn is_unique_violation(message: &str) -> bool {
    message.contains("already contains")
}

impl From<DbError> for ResmanError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ResmanError::NotFound { entity, id },
            DbError::Duplicate(message) => ResmanError::Conflict { message },
            other => ResmanError::Database(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_violation_detection() {
        assert!(is_unique_violation(
            "Database index `idx_user_email` already contains 'a@b.io', with record `user:x`"
        ));
        assert!(!is_unique_violation("Parse error: unexpected token"));
    }

    #[test]
    fn duplicate_maps_to_conflict() {
        let err: ResmanError = DbError::Duplicate("Assignment already exists".into()).into();
        assert!(matches!(err, ResmanError::Conflict { .. }));

        let err: ResmanError = DbError::NotFound {
            entity: "project".into(),
            id: "42".into(),
        }
        .into();
        assert!(matches!(err, ResmanError::NotFound { .. }));

        let err: ResmanError = DbError::Query("boom".into()).into();
        assert!(matches!(err, ResmanError::Database(_)));
    }
}
