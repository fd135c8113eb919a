//! Schema definitions and migration runner.
//!
//! Tables are SCHEMAFULL. UUIDs and enums are stored as strings; enum
//! fields carry ASSERT constraints listing their wire values.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct AppliedMigration {
    version: u32,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "resource_schema",
    sql: SCHEMA_V1,
}];

const SCHEMA_V1: &str = "\
-- Identities. Engineer attributes live on every record.
DEFINE TABLE user SCHEMAFULL;
DEFINE FIELD name ON TABLE user TYPE string;
DEFINE FIELD email ON TABLE user TYPE string;
DEFINE FIELD password_hash ON TABLE user TYPE string;
DEFINE FIELD role ON TABLE user TYPE string \
    ASSERT $value IN ['admin', 'project_manager', 'team_lead', 'engineer', 'user'];
DEFINE FIELD skills ON TABLE user TYPE array<string> DEFAULT [];
DEFINE FIELD experience ON TABLE user TYPE int ASSERT $value >= 0;
DEFINE FIELD hourly_rate ON TABLE user TYPE float ASSERT $value >= 0;
DEFINE FIELD availability ON TABLE user TYPE string \
    ASSERT $value IN ['available', 'partially_available', 'unavailable'];
DEFINE FIELD department ON TABLE user TYPE string;
DEFINE FIELD phone ON TABLE user TYPE option<string>;
DEFINE FIELD location ON TABLE user TYPE option<string>;
DEFINE FIELD bio ON TABLE user TYPE option<string>;
DEFINE FIELD created_at ON TABLE user TYPE datetime DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE user TYPE datetime DEFAULT time::now();
DEFINE INDEX idx_user_email ON TABLE user COLUMNS email UNIQUE;
DEFINE INDEX idx_user_role ON TABLE user COLUMNS role;

DEFINE TABLE project SCHEMAFULL;
DEFINE FIELD name ON TABLE project TYPE string;
DEFINE FIELD description ON TABLE project TYPE string;
DEFINE FIELD status ON TABLE project TYPE string \
    ASSERT $value IN ['planning', 'active', 'on-hold', 'completed', 'cancelled'];
DEFINE FIELD start_date ON TABLE project TYPE datetime;
DEFINE FIELD end_date ON TABLE project TYPE datetime;
DEFINE FIELD priority ON TABLE project TYPE string \
    ASSERT $value IN ['low', 'medium', 'high', 'critical'];
DEFINE FIELD budget ON TABLE project TYPE float ASSERT $value >= 0;
DEFINE FIELD technologies ON TABLE project TYPE array<string> DEFAULT [];
DEFINE FIELD project_manager ON TABLE project TYPE string;
DEFINE FIELD created_at ON TABLE project TYPE datetime DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE project TYPE datetime DEFAULT time::now();
DEFINE INDEX idx_project_status ON TABLE project COLUMNS status;
DEFINE INDEX idx_project_manager ON TABLE project COLUMNS project_manager;

-- One assignment per (engineer, project) pair, whatever its status.
DEFINE TABLE assignment SCHEMAFULL;
DEFINE FIELD engineer_id ON TABLE assignment TYPE string;
DEFINE FIELD project_id ON TABLE assignment TYPE string;
DEFINE FIELD role ON TABLE assignment TYPE string \
    ASSERT $value IN ['lead', 'developer', 'tester', 'analyst'];
DEFINE FIELD allocation_percentage ON TABLE assignment TYPE float \
    ASSERT $value >= 0 AND $value <= 100;
DEFINE FIELD start_date ON TABLE assignment TYPE datetime;
DEFINE FIELD end_date ON TABLE assignment TYPE datetime;
DEFINE FIELD status ON TABLE assignment TYPE string \
    ASSERT $value IN ['active', 'completed', 'on-hold', 'cancelled'];
DEFINE FIELD hours_allocated ON TABLE assignment TYPE float \
    ASSERT $value >= 0;
DEFINE FIELD hours_worked ON TABLE assignment TYPE float \
    ASSERT $value >= 0;
DEFINE FIELD hourly_rate ON TABLE assignment TYPE float ASSERT $value >= 0;
DEFINE FIELD notes ON TABLE assignment TYPE option<string>;
DEFINE FIELD assigned_by ON TABLE assignment TYPE string;
DEFINE FIELD created_at ON TABLE assignment TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE assignment TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_assignment_pair ON TABLE assignment \
    COLUMNS engineer_id, project_id UNIQUE;
DEFINE INDEX idx_assignment_project ON TABLE assignment COLUMNS project_id;
DEFINE INDEX idx_assignment_status ON TABLE assignment COLUMNS status;
";

/// Applies every migration newer than the recorded schema version.
/// Safe to call on every start.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    let mut result = db
        .query("SELECT version FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let applied: Vec<AppliedMigration> = result.take(0)?;
    let current_version = applied.first().map_or(0, |m| m.version);

    for migration in MIGRATIONS
        .iter()
        .filter(|m| m.version > current_version)
    {
        info!(
            version = migration.version,
            name = migration.name,
            "Applying migration"
        );
        db.query(migration.sql).await?.check().map_err(|e| {
            DbError::Migration(format!(
                "v{} '{}' failed: {e}",
                migration.version, migration.name
            ))
        })?;

        db.query("CREATE _migration SET version = $version, name = $name")
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "could not record v{}: {e}",
                    migration.version
                ))
            })?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_ordered() {
        for window in MIGRATIONS.windows(2) {
            assert!(window[0].version < window[1].version);
        }
    }

    #[test]
    fn schema_declares_unique_indexes() {
        assert!(SCHEMA_V1.contains("idx_user_email ON TABLE user COLUMNS email UNIQUE"));
        assert!(SCHEMA_V1.contains("COLUMNS engineer_id, project_id UNIQUE"));
    }
}
