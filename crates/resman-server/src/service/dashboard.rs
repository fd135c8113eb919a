use std::collections::HashMap;

use chrono::{DateTime, Duration, Months, Utc};
use resman_core::capacity::{self, DateRange, ProjectProgress};
use resman_core::error::ResmanResult;
use resman_core::models::assignment::{
    AssignmentDetail, AssignmentFilter, AssignmentRole, AssignmentStatus,
};
use resman_core::models::project::{ProjectFilter, ProjectStatus};
use resman_core::models::user::{Availability, Role, User, UserFilter, UserSummary};
use resman_core::policy::{Action, Actor, Resource, authorize};
use resman_core::repository::{AssignmentRepository, ProjectRepository, UserRepository};
use serde::Serialize;
use uuid::Uuid;

use super::{ProjectView, ResourceService};

const RECENT_PROJECTS: usize = 5;
const ENDING_SOON_DAYS: i64 = 30;
const RECENT_ASSIGNMENT_MONTHS: u32 = 6;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetTotals {
    pub total_projects: usize,
    pub total_engineers: usize,
    pub total_assignments: usize,
    pub active_projects: usize,
    pub average_utilization: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub stats: FleetTotals,
    pub project_status_stats: HashMap<ProjectStatus, usize>,
    pub engineer_availability_stats: HashMap<Availability, usize>,
    pub recent_projects: Vec<ProjectView>,
    pub projects_ending_soon: Vec<ProjectView>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFigures {
    #[serde(flatten)]
    pub progress: ProjectProgress,
    pub role_distribution: HashMap<AssignmentRole, usize>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectAnalytics {
    pub project: ProjectView,
    pub analytics: ProjectFigures,
    pub assignments: Vec<AssignmentDetail>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineerFigures {
    pub total_projects: usize,
    pub active_projects: usize,
    pub total_hours_worked: f64,
    pub current_allocation: f64,
    pub project_status_distribution: HashMap<ProjectStatus, usize>,
    pub role_distribution: HashMap<AssignmentRole, usize>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineerAnalytics {
    pub engineer: User,
    pub analytics: EngineerFigures,
    /// Assignments that started within the last six months.
    pub assignments: Vec<AssignmentDetail>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CapacityAssignment {
    pub project_id: Uuid,
    pub project_name: Option<String>,
    pub project_status: Option<ProjectStatus>,
    pub allocation: f64,
    pub role: AssignmentRole,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineerCapacityRow {
    pub engineer: UserSummary,
    pub total_allocation: f64,
    pub available_capacity: f64,
    pub assignments: Vec<CapacityAssignment>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CapacitySummary {
    pub total_engineers: usize,
    pub average_utilization: f64,
    pub underutilized_engineers: usize,
    pub overutilized_engineers: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceCapacity {
    pub capacity_data: Vec<EngineerCapacityRow>,
    pub summary: CapacitySummary,
}

/// Active or planned projects whose end falls within the next
/// `ENDING_SOON_DAYS` days.
fn ends_soon(project: &ProjectView, now: DateTime<Utc>) -> bool {
    let horizon = now + Duration::days(ENDING_SOON_DAYS);
    matches!(
        project.project.status,
        ProjectStatus::Active | ProjectStatus::Planning
    ) && project.project.end_date >= now
        && project.project.end_date <= horizon
}

impl<U, P, A> ResourceService<U, P, A>
where
    U: UserRepository,
    P: ProjectRepository,
    A: AssignmentRepository,
{
    pub async fn dashboard_stats(&self, actor: &Actor) -> ResmanResult<DashboardStats> {
        authorize(actor, Action::ViewDashboard, &Resource::Global)?;
        let now = Utc::now();

        let projects = self.list_projects(ProjectFilter::default()).await?;
        let engineers = self
            .users
            .list(UserFilter::with_roles(Role::ASSIGNABLE))
            .await?;
        let assignments = self.assignments.list(AssignmentFilter::default()).await?;

        let total_assignments = assignments.len();
        let by_engineer = capacity::group_by_engineer(assignments);
        let utilization = capacity::utilization_summary(&engineers, &by_engineer, None);

        let stats = FleetTotals {
            total_projects: projects.len(),
            total_engineers: engineers.len(),
            total_assignments,
            active_projects: projects
                .iter()
                .filter(|p| p.project.status == ProjectStatus::Active)
                .count(),
            average_utilization: utilization.average_utilization,
        };

        let project_status_stats =
            capacity::distribution(projects.iter().map(|p| p.project.status));
        let engineer_availability_stats =
            capacity::distribution(engineers.iter().map(|e| e.availability));
        let projects_ending_soon = projects.iter().filter(|p| ends_soon(p, now)).cloned().collect();
        let recent_projects = projects.into_iter().take(RECENT_PROJECTS).collect();

        Ok(DashboardStats {
            stats,
            project_status_stats,
            engineer_availability_stats,
            recent_projects,
            projects_ending_soon,
        })
    }

    /// Progress figures over all of the project's assignments.
    pub async fn project_analytics(
        &self,
        actor: &Actor,
        project_id: Uuid,
    ) -> ResmanResult<ProjectAnalytics> {
        let project = self.projects.get_by_id(project_id).await?;
        authorize(actor, Action::ViewDashboard, &Resource::Global)?;

        let assignments = self
            .assignments
            .list(AssignmentFilter::project(project_id))
            .await?;
        let analytics = ProjectFigures {
            progress: capacity::project_progress(&project, &assignments, Utc::now()),
            role_distribution: capacity::distribution(assignments.iter().map(|a| a.role)),
        };

        let directory = self.directory().await?;
        Ok(ProjectAnalytics {
            project: self.project_view(project).await?,
            analytics,
            assignments: directory.details(assignments),
        })
    }

    pub async fn engineer_analytics(
        &self,
        actor: &Actor,
        engineer_id: Uuid,
    ) -> ResmanResult<EngineerAnalytics> {
        let engineer = self.users.get_by_id(engineer_id).await?;
        authorize(actor, Action::ViewDashboard, &Resource::Global)?;

        let assignments = self
            .assignments
            .list(AssignmentFilter::engineer(engineer_id))
            .await?;
        let directory = self.directory().await?;

        let analytics = EngineerFigures {
            total_projects: assignments.len(),
            active_projects: assignments
                .iter()
                .filter(|a| a.status == AssignmentStatus::Active)
                .count(),
            total_hours_worked: assignments.iter().map(|a| a.hours_worked).sum(),
            current_allocation: capacity::engineer_capacity(&assignments, None).total_allocation,
            project_status_distribution: capacity::distribution(
                assignments
                    .iter()
                    .filter_map(|a| directory.projects.get(&a.project_id))
                    .map(|p| p.status),
            ),
            role_distribution: capacity::distribution(assignments.iter().map(|a| a.role)),
        };

        let now = Utc::now();
        let since = now
            .checked_sub_months(Months::new(RECENT_ASSIGNMENT_MONTHS))
            .unwrap_or(now);
        let recent = assignments.into_iter().filter(|a| a.start_date >= since);

        Ok(EngineerAnalytics {
            engineer,
            analytics,
            assignments: directory.details(recent),
        })
    }

    /// Utilization of every engineer and team lead over `range`.
    pub async fn resource_capacity(
        &self,
        actor: &Actor,
        range: Option<DateRange>,
    ) -> ResmanResult<ResourceCapacity> {
        authorize(actor, Action::ViewDashboard, &Resource::Global)?;

        let engineers = self
            .users
            .list(UserFilter::with_roles(Role::ASSIGNABLE))
            .await?;
        let active = self
            .assignments
            .list(AssignmentFilter::default().active())
            .await?;
        let by_engineer = capacity::group_by_engineer(active);
        let utilization = capacity::utilization_summary(&engineers, &by_engineer, range.as_ref());
        let directory = self.directory().await?;

        let capacity_data = engineers
            .iter()
            .zip(utilization.engineers)
            .map(|(engineer, row)| EngineerCapacityRow {
                engineer: UserSummary::from(engineer),
                total_allocation: row.capacity.total_allocation,
                available_capacity: row.capacity.available_capacity,
                assignments: row
                    .capacity
                    .assignments
                    .iter()
                    .map(|a| {
                        let project = directory.projects.get(&a.project_id);
                        CapacityAssignment {
                            project_id: a.project_id,
                            project_name: project.map(|p| p.name.clone()),
                            project_status: project.map(|p| p.status),
                            allocation: a.allocation_percentage,
                            role: a.role,
                        }
                    })
                    .collect(),
            })
            .collect();

        Ok(ResourceCapacity {
            capacity_data,
            summary: CapacitySummary {
                total_engineers: utilization.total_engineers,
                average_utilization: utilization.average_utilization,
                underutilized_engineers: utilization.underutilized_engineers,
                overutilized_engineers: utilization.overutilized_engineers,
            },
        })
    }
}
