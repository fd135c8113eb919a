//! SurrealDB implementation of [`ProjectRepository`].

use chrono::{DateTime, Utc};
use resman_core::error::ResmanResult;
use resman_core::models::project::{CreateProject, Project, ProjectFilter, UpdateProject};
use resman_core::repository::ProjectRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::{parse_enum, parse_uuid, single, where_clause};
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct ProjectRow {
    name: String,
    description: String,
    status: String,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    priority: String,
    budget: f64,
    technologies: Vec<String>,
    project_manager: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct ProjectRowWithId {
    record_id: String,
    name: String,
    description: String,
    status: String,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    priority: String,
    budget: f64,
    technologies: Vec<String>,
    project_manager: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProjectRow {
    fn into_project(self, id: Uuid) -> Result<Project, DbError> {
        Ok(Project {
            id,
            name: self.name,
            description: self.description,
            status: parse_enum("status", &self.status)?,
            start_date: self.start_date,
            end_date: self.end_date,
            priority: parse_enum("priority", &self.priority)?,
            budget: self.budget,
            technologies: self.technologies,
            project_manager: parse_uuid("project_manager", &self.project_manager)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl ProjectRowWithId {
    fn try_into_project(self) -> Result<Project, DbError> {
        let id = parse_uuid("project id", &self.record_id)?;
        ProjectRow {
            name: self.name,
            description: self.description,
            status: self.status,
            start_date: self.start_date,
            end_date: self.end_date,
            priority: self.priority,
            budget: self.budget,
            technologies: self.technologies,
            project_manager: self.project_manager,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
        .into_project(id)
    }
}

#[derive(Clone)]
pub struct SurrealProjectRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealProjectRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ProjectRepository for SurrealProjectRepository<C> {
    async fn create(&self, input: CreateProject) -> ResmanResult<Project> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('project', $id) SET \
                 name = $name, description = $description, \
                 status = 'planning', start_date = $start_date, \
                 end_date = $end_date, priority = $priority, \
                 budget = $budget, technologies = $technologies, \
                 project_manager = $project_manager",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", input.name.trim().to_string()))
            .bind(("description", input.description))
            .bind(("start_date", input.start_date))
            .bind(("end_date", input.end_date))
            .bind(("priority", input.priority.as_str()))
            .bind(("budget", input.budget))
            .bind(("technologies", input.technologies))
            .bind(("project_manager", input.project_manager.to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<ProjectRow> = result.take(0).map_err(DbError::from)?;
        Ok(single(rows, "project", id_str)?.into_project(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> ResmanResult<Project> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('project', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ProjectRow> = result.take(0).map_err(DbError::from)?;
        Ok(single(rows, "project", id_str)?.into_project(id)?)
    }

    async fn update(&self, id: Uuid, input: UpdateProject) -> ResmanResult<Project> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.description.is_some() {
            sets.push("description = $description");
        }
        if input.status.is_some() {
            sets.push("status = $status");
        }
        if input.start_date.is_some() {
            sets.push("start_date = $start_date");
        }
        if input.end_date.is_some() {
            sets.push("end_date = $end_date");
        }
        if input.priority.is_some() {
            sets.push("priority = $priority");
        }
        if input.budget.is_some() {
            sets.push("budget = $budget");
        }
        if input.technologies.is_some() {
            sets.push("technologies = $technologies");
        }
        if input.project_manager.is_some() {
            sets.push("project_manager = $project_manager");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('project', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));
        if let Some(name) = input.name {
            builder = builder.bind(("name", name.trim().to_string()));
        }
        if let Some(description) = input.description {
            builder = builder.bind(("description", description));
        }
        if let Some(status) = input.status {
            builder = builder.bind(("status", status.as_str()));
        }
        if let Some(start_date) = input.start_date {
            builder = builder.bind(("start_date", start_date));
        }
        if let Some(end_date) = input.end_date {
            builder = builder.bind(("end_date", end_date));
        }
        if let Some(priority) = input.priority {
            builder = builder.bind(("priority", priority.as_str()));
        }
        if let Some(budget) = input.budget {
            builder = builder.bind(("budget", budget));
        }
        if let Some(technologies) = input.technologies {
            builder = builder.bind(("technologies", technologies));
        }
        if let Some(manager) = input.project_manager {
            builder = builder.bind(("project_manager", manager.to_string()));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<ProjectRow> = result.take(0).map_err(DbError::from)?;
        Ok(single(rows, "project", id_str)?.into_project(id)?)
    }

    async fn delete(&self, id: Uuid) -> ResmanResult<()> {
        self.db
            .query(
                "BEGIN TRANSACTION; \
                 DELETE assignment WHERE project_id = $id; \
                 DELETE type::record('project', $id); \
                 COMMIT TRANSACTION;",
            )
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        Ok(())
    }

    async fn list(&self, filter: ProjectFilter) -> ResmanResult<Vec<Project>> {
        let mut conditions = Vec::new();
        if !filter.statuses.is_empty() {
            conditions.push("status IN $statuses");
        }
        if filter.project_manager.is_some() {
            conditions.push("project_manager = $project_manager");
        }

        let query = format!(
            "SELECT meta::id(id) AS record_id, * FROM project{} ORDER BY created_at DESC",
            where_clause(&conditions)
        );

        let statuses: Vec<String> = filter
            .statuses
            .iter()
            .map(|s| s.as_str().to_string())
            .collect();
        let mut builder = self.db.query(&query).bind(("statuses", statuses));
        if let Some(manager) = filter.project_manager {
            builder = builder.bind(("project_manager", manager.to_string()));
        }

        let mut result = builder.await.map_err(DbError::from)?;
        let rows: Vec<ProjectRowWithId> = result.take(0).map_err(DbError::from)?;
        let projects = rows
            .into_iter()
            .map(ProjectRowWithId::try_into_project)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(projects)
    }
}
