//! SurrealDB repository implementations.

mod assignment;
mod project;
mod user;

use std::str::FromStr;

use uuid::Uuid;

use crate::error::DbError;

pub use assignment::SurrealAssignmentRepository;
pub use project::SurrealProjectRepository;
pub use user::SurrealUserRepository;

fn parse_uuid(field: &str, value: &str) -> Result<Uuid, DbError> {
    Uuid::parse_str(value).map_err(|e| DbError::Decode(format!("{field}: {e}")))
}

fn parse_enum<T: FromStr>(field: &str, value: &str) -> Result<T, DbError> {
    value
        .parse()
        .map_err(|_| DbError::Decode(format!("{field}: unknown value '{value}'")))
}

/// Takes the single row a keyed statement returns.
fn single<T>(rows: Vec<T>, entity: &str, id: impl ToString) -> Result<T, DbError> {
    rows.into_iter().next().ok_or_else(|| DbError::NotFound {
        entity: entity.into(),
        id: id.to_string(),
    })
}

/// Joins filter clauses into a `WHERE` suffix; empty when there are none.
fn where_clause(conditions: &[&str]) -> String {
    if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    }
}
