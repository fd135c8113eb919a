use chrono::Utc;
use resman_core::capacity::{self, DateRange, ProjectProgress};
use resman_core::error::{ResmanError, ResmanResult};
use resman_core::models::assignment::{
    Assignment, AssignmentDetail, AssignmentFilter, AssignmentStatus, CreateAssignment, LogHours,
    NewAssignment, UpdateAssignment,
};
use resman_core::models::user::UserSummary;
use resman_core::policy::{Action, Actor, Resource, authorize};
use resman_core::repository::{AssignmentRepository, ProjectRepository, UserRepository};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::ResourceService;

/// Capacity of one engineer with the contributing assignments resolved.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineerCapacityView {
    pub engineer: UserSummary,
    pub total_allocation: f64,
    pub available_capacity: f64,
    pub assignments: Vec<AssignmentDetail>,
}

/// Resource totals of one project over all of its assignments.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectAllocation {
    #[serde(flatten)]
    pub progress: ProjectProgress,
    pub assignments: Vec<AssignmentDetail>,
}

fn assignment_resource(assignment: &Assignment) -> Resource {
    Resource::Assignment {
        engineer_id: assignment.engineer_id,
    }
}

impl<U, P, A> ResourceService<U, P, A>
where
    U: UserRepository,
    P: ProjectRepository,
    A: AssignmentRepository,
{
    pub async fn list_assignments(
        &self,
        filter: AssignmentFilter,
    ) -> ResmanResult<Vec<AssignmentDetail>> {
        let assignments = self.assignments.list(filter).await?;
        let directory = self.directory().await?;
        Ok(directory.details(assignments))
    }

    /// The hourly rate falls back to the engineer's own rate. Over-allocation
    /// is allowed; a second assignment for the same pair is a `Conflict`.
    pub async fn create_assignment(
        &self,
        actor: &Actor,
        input: NewAssignment,
    ) -> ResmanResult<AssignmentDetail> {
        authorize(actor, Action::CreateAssignment, &Resource::Global)?;
        input.validate()?;

        let engineer = self.users.get_by_id(input.engineer_id).await?;
        if !engineer.role.is_assignable() {
            return Err(ResmanError::validation(
                "User is not authorized to be assigned as engineer",
            ));
        }
        self.projects.get_by_id(input.project_id).await?;

        let assignment = self
            .assignments
            .create(CreateAssignment {
                engineer_id: input.engineer_id,
                project_id: input.project_id,
                role: input.role,
                allocation_percentage: input.allocation_percentage,
                start_date: input.start_date,
                end_date: input.end_date,
                status: AssignmentStatus::Active,
                hours_allocated: input.hours_allocated,
                hourly_rate: input.hourly_rate.unwrap_or(engineer.hourly_rate),
                notes: input.notes,
                assigned_by: actor.id,
            })
            .await?;
        info!(
            assignment_id = %assignment.id,
            engineer_id = %assignment.engineer_id,
            project_id = %assignment.project_id,
            allocation = assignment.allocation_percentage,
            "Assignment created"
        );

        self.populate(assignment).await
    }

    pub async fn update_assignment(
        &self,
        actor: &Actor,
        id: Uuid,
        input: UpdateAssignment,
    ) -> ResmanResult<AssignmentDetail> {
        let current = self.assignments.get_by_id(id).await?;
        authorize(actor, Action::UpdateAssignment, &assignment_resource(&current))?;
        input.validate_against(&current)?;

        let assignment = self.assignments.update(id, input).await?;
        info!(assignment_id = %id, status = %assignment.status, "Assignment updated");
        self.populate(assignment).await
    }

    pub async fn delete_assignment(&self, actor: &Actor, id: Uuid) -> ResmanResult<()> {
        let assignment = self.assignments.get_by_id(id).await?;
        authorize(actor, Action::DeleteAssignment, &assignment_resource(&assignment))?;

        self.assignments.delete(id).await?;
        info!(assignment_id = %id, actor = %actor.id, "Assignment deleted");
        Ok(())
    }

    /// Sets the hours worked. Open to the assigned engineer.
    pub async fn log_hours(
        &self,
        actor: &Actor,
        id: Uuid,
        input: LogHours,
    ) -> ResmanResult<AssignmentDetail> {
        let current = self.assignments.get_by_id(id).await?;
        authorize(actor, Action::LogHours, &assignment_resource(&current))?;
        input.validate()?;

        let assignment = self
            .assignments
            .update(
                id,
                UpdateAssignment {
                    hours_worked: Some(input.hours_worked),
                    ..UpdateAssignment::default()
                },
            )
            .await?;
        info!(assignment_id = %id, hours_worked = input.hours_worked, "Hours logged");
        self.populate(assignment).await
    }

    pub async fn engineer_capacity(
        &self,
        engineer_id: Uuid,
        range: Option<DateRange>,
    ) -> ResmanResult<EngineerCapacityView> {
        let engineer = self.users.get_by_id(engineer_id).await?;
        let assignments = self
            .assignments
            .list(AssignmentFilter::engineer(engineer_id))
            .await?;

        let figures = capacity::engineer_capacity(&assignments, range.as_ref());
        let directory = self.directory().await?;

        Ok(EngineerCapacityView {
            engineer: UserSummary::from(&engineer),
            total_allocation: figures.total_allocation,
            available_capacity: figures.available_capacity,
            assignments: directory.details(figures.assignments),
        })
    }

    pub async fn project_allocation(&self, project_id: Uuid) -> ResmanResult<ProjectAllocation> {
        let project = self.projects.get_by_id(project_id).await?;
        let assignments = self
            .assignments
            .list(AssignmentFilter::project(project_id))
            .await?;

        let progress = capacity::project_progress(&project, &assignments, Utc::now());
        let directory = self.directory().await?;

        Ok(ProjectAllocation {
            progress,
            assignments: directory.details(assignments),
        })
    }
}
