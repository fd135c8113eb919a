//! Resource service: the operations behind every authenticated endpoint.
//!
//! Each operation loads the entities it touches (missing → `NotFound`),
//! consults the access policy (`Forbidden`), then mutates through the
//! repositories. Capacity figures always come from
//! [`resman_core::capacity`].

mod assignments;
mod dashboard;
mod projects;
mod users;

use std::collections::HashMap;

use resman_core::error::{ResmanError, ResmanResult};
use resman_core::models::assignment::{Assignment, AssignmentDetail};
use resman_core::models::project::{ProjectFilter, ProjectSummary};
use resman_core::models::user::{UserFilter, UserSummary};
use resman_core::repository::{AssignmentRepository, ProjectRepository, UserRepository};
use uuid::Uuid;

pub use assignments::{EngineerCapacityView, ProjectAllocation};
pub use dashboard::{
    CapacityAssignment, CapacitySummary, DashboardStats, EngineerAnalytics, EngineerCapacityRow,
    EngineerFigures, FleetTotals, ProjectAnalytics, ProjectFigures, ResourceCapacity,
};
pub use projects::ProjectView;
pub use users::{AvailableEngineer, UserDashboard};

pub struct ResourceService<U, P, A> {
    users: U,
    projects: P,
    assignments: A,
}

impl<U, P, A> ResourceService<U, P, A>
where
    U: UserRepository,
    P: ProjectRepository,
    A: AssignmentRepository,
{
    pub fn new(users: U, projects: P, assignments: A) -> Self {
        Self {
            users,
            projects,
            assignments,
        }
    }

    /// Summaries of every identity and project, for populating responses.
    async fn directory(&self) -> ResmanResult<Directory> {
        let users = self.users.list(UserFilter::default()).await?;
        let projects = self.projects.list(ProjectFilter::default()).await?;
        Ok(Directory {
            users: users.iter().map(|u| (u.id, UserSummary::from(u))).collect(),
            projects: projects
                .iter()
                .map(|p| (p.id, ProjectSummary::from(p)))
                .collect(),
        })
    }

    /// Resolves one assignment's engineer and project.
    async fn populate(&self, assignment: Assignment) -> ResmanResult<AssignmentDetail> {
        let engineer = optional(self.users.get_by_id(assignment.engineer_id).await)?;
        let project = optional(self.projects.get_by_id(assignment.project_id).await)?;
        Ok(AssignmentDetail {
            engineer: engineer.as_ref().map(UserSummary::from),
            project: project.as_ref().map(ProjectSummary::from),
            assignment,
        })
    }
}

/// Treats `NotFound` as absence.
fn optional<T>(result: ResmanResult<T>) -> ResmanResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(ResmanError::NotFound { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Id-to-summary lookup tables. References to deleted records resolve to
/// `None`.
struct Directory {
    users: HashMap<Uuid, UserSummary>,
    projects: HashMap<Uuid, ProjectSummary>,
}

impl Directory {
    fn user(&self, id: Uuid) -> Option<UserSummary> {
        self.users.get(&id).cloned()
    }

    fn detail(&self, assignment: Assignment) -> AssignmentDetail {
        AssignmentDetail {
            engineer: self.user(assignment.engineer_id),
            project: self.projects.get(&assignment.project_id).cloned(),
            assignment,
        }
    }

    fn details(&self, assignments: impl IntoIterator<Item = Assignment>) -> Vec<AssignmentDetail> {
        assignments.into_iter().map(|a| self.detail(a)).collect()
    }
}
