//! SurrealDB implementation of [`AssignmentRepository`].

use chrono::{DateTime, Utc};
use resman_core::error::ResmanResult;
use resman_core::models::assignment::{
    Assignment, AssignmentFilter, CreateAssignment, UpdateAssignment,
};
use resman_core::repository::AssignmentRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::{parse_enum, parse_uuid, single, where_clause};
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct AssignmentRow {
    engineer_id: String,
    project_id: String,
    role: String,
    allocation_percentage: f64,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    status: String,
    hours_allocated: f64,
    hours_worked: f64,
    hourly_rate: f64,
    notes: Option<String>,
    assigned_by: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct AssignmentRowWithId {
    record_id: String,
    engineer_id: String,
    project_id: String,
    role: String,
    allocation_percentage: f64,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    status: String,
    hours_allocated: f64,
    hours_worked: f64,
    hourly_rate: f64,
    notes: Option<String>,
    assigned_by: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AssignmentRow {
    fn into_assignment(self, id: Uuid) -> Result<Assignment, DbError> {
        Ok(Assignment {
            id,
            engineer_id: parse_uuid("engineer_id", &self.engineer_id)?,
            project_id: parse_uuid("project_id", &self.project_id)?,
            role: parse_enum("role", &self.role)?,
            allocation_percentage: self.allocation_percentage,
            start_date: self.start_date,
            end_date: self.end_date,
            status: parse_enum("status", &self.status)?,
            hours_allocated: self.hours_allocated,
            hours_worked: self.hours_worked,
            hourly_rate: self.hourly_rate,
            notes: self.notes,
            assigned_by: parse_uuid("assigned_by", &self.assigned_by)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl AssignmentRowWithId {
    fn try_into_assignment(self) -> Result<Assignment, DbError> {
        let id = parse_uuid("assignment id", &self.record_id)?;
        AssignmentRow {
            engineer_id: self.engineer_id,
            project_id: self.project_id,
            role: self.role,
            allocation_percentage: self.allocation_percentage,
            start_date: self.start_date,
            end_date: self.end_date,
            status: self.status,
            hours_allocated: self.hours_allocated,
            hours_worked: self.hours_worked,
            hourly_rate: self.hourly_rate,
            notes: self.notes,
            assigned_by: self.assigned_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
        .into_assignment(id)
    }
}

fn collect(rows: Vec<AssignmentRowWithId>) -> Result<Vec<Assignment>, DbError> {
    rows.into_iter()
        .map(AssignmentRowWithId::try_into_assignment)
        .collect()
}

const DUPLICATE_PAIR: &str = "Engineer is already assigned to this project";

#[derive(Clone)]
pub struct SurrealAssignmentRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealAssignmentRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> AssignmentRepository for SurrealAssignmentRepository<C> {
    async fn create(&self, input: CreateAssignment) -> ResmanResult<Assignment> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('assignment', $id) SET \
                 engineer_id = $engineer_id, project_id = $project_id, \
                 role = $role, allocation_percentage = $allocation, \
                 start_date = $start_date, end_date = $end_date, \
                 status = $status, hours_allocated = $hours_allocated, \
                 hours_worked = 0.0, hourly_rate = $hourly_rate, \
                 notes = $notes, assigned_by = $assigned_by",
            )
            .bind(("id", id_str.clone()))
            .bind(("engineer_id", input.engineer_id.to_string()))
            .bind(("project_id", input.project_id.to_string()))
            .bind(("role", input.role.as_str()))
            .bind(("allocation", input.allocation_percentage))
            .bind(("start_date", input.start_date))
            .bind(("end_date", input.end_date))
            .bind(("status", input.status.as_str()))
            .bind(("hours_allocated", input.hours_allocated))
            .bind(("hourly_rate", input.hourly_rate))
            .bind(("notes", input.notes))
            .bind(("assigned_by", input.assigned_by.to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::from_statement(e, DUPLICATE_PAIR))?;

        let rows: Vec<AssignmentRow> = result.take(0).map_err(DbError::from)?;
        Ok(single(rows, "assignment", id_str)?.into_assignment(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> ResmanResult<Assignment> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('assignment', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AssignmentRow> = result.take(0).map_err(DbError::from)?;
        Ok(single(rows, "assignment", id_str)?.into_assignment(id)?)
    }

    async fn get_by_pair(&self, engineer_id: Uuid, project_id: Uuid) -> ResmanResult<Assignment> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM assignment \
                 WHERE engineer_id = $engineer_id AND project_id = $project_id",
            )
            .bind(("engineer_id", engineer_id.to_string()))
            .bind(("project_id", project_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AssignmentRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = single(
            rows,
            "assignment",
            format!("engineer={engineer_id},project={project_id}"),
        )?;
        Ok(row.try_into_assignment()?)
    }

    async fn update(&self, id: Uuid, input: UpdateAssignment) -> ResmanResult<Assignment> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.role.is_some() {
            sets.push("role = $role");
        }
        if input.allocation_percentage.is_some() {
            sets.push("allocation_percentage = $allocation");
        }
        if input.start_date.is_some() {
            sets.push("start_date = $start_date");
        }
        if input.end_date.is_some() {
            sets.push("end_date = $end_date");
        }
        if input.status.is_some() {
            sets.push("status = $status");
        }
        if input.hours_allocated.is_some() {
            sets.push("hours_allocated = $hours_allocated");
        }
        if input.hours_worked.is_some() {
            sets.push("hours_worked = $hours_worked");
        }
        if input.hourly_rate.is_some() {
            sets.push("hourly_rate = $hourly_rate");
        }
        if input.notes.is_some() {
            sets.push("notes = $notes");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('assignment', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));
        if let Some(role) = input.role {
            builder = builder.bind(("role", role.as_str()));
        }
        if let Some(allocation) = input.allocation_percentage {
            builder = builder.bind(("allocation", allocation));
        }
        if let Some(start_date) = input.start_date {
            builder = builder.bind(("start_date", start_date));
        }
        if let Some(end_date) = input.end_date {
            builder = builder.bind(("end_date", end_date));
        }
        if let Some(status) = input.status {
            builder = builder.bind(("status", status.as_str()));
        }
        if let Some(hours) = input.hours_allocated {
            builder = builder.bind(("hours_allocated", hours));
        }
        if let Some(hours) = input.hours_worked {
            builder = builder.bind(("hours_worked", hours));
        }
        if let Some(rate) = input.hourly_rate {
            builder = builder.bind(("hourly_rate", rate));
        }
        if let Some(notes) = input.notes {
            builder = builder.bind(("notes", notes));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<AssignmentRow> = result.take(0).map_err(DbError::from)?;
        Ok(single(rows, "assignment", id_str)?.into_assignment(id)?)
    }

    async fn delete(&self, id: Uuid) -> ResmanResult<()> {
        self.db
            .query("DELETE type::record('assignment', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        Ok(())
    }

    async fn list(&self, filter: AssignmentFilter) -> ResmanResult<Vec<Assignment>> {
        let mut conditions = Vec::new();
        if filter.engineer_id.is_some() {
            conditions.push("engineer_id = $engineer_id");
        }
        if filter.project_id.is_some() {
            conditions.push("project_id = $project_id");
        }
        if filter.status.is_some() {
            conditions.push("status = $status");
        }

        let query = format!(
            "SELECT meta::id(id) AS record_id, * FROM assignment{} ORDER BY created_at ASC",
            where_clause(&conditions)
        );

        let mut builder = self.db.query(&query);
        if let Some(engineer_id) = filter.engineer_id {
            builder = builder.bind(("engineer_id", engineer_id.to_string()));
        }
        if let Some(project_id) = filter.project_id {
            builder = builder.bind(("project_id", project_id.to_string()));
        }
        if let Some(status) = filter.status {
            builder = builder.bind(("status", status.as_str()));
        }

        let mut result = builder.await.map_err(DbError::from)?;
        let rows: Vec<AssignmentRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(collect(rows)?)
    }
}
