use resman_core::capacity::{self, DateRange};
use resman_core::error::{ResmanError, ResmanResult};
use resman_core::models::assignment::{AssignmentDetail, AssignmentFilter};
use resman_core::models::user::{Availability, Role, UpdateUser, User, UserFilter};
use resman_core::policy::{Action, Actor, Resource, authorize};
use resman_core::repository::{AssignmentRepository, ProjectRepository, UserRepository};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::{ProjectView, ResourceService};

/// An engineer with free capacity over the requested range.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableEngineer {
    #[serde(flatten)]
    pub engineer: User,
    pub current_allocation: f64,
    pub available_capacity: f64,
}

/// Personal overview of one identity.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDashboard {
    pub user: User,
    pub assignments: Vec<AssignmentDetail>,
    pub total_projects: usize,
    pub total_hours: f64,
    pub current_allocation: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub managed_projects: Option<Vec<ProjectView>>,
}

impl<U, P, A> ResourceService<U, P, A>
where
    U: UserRepository,
    P: ProjectRepository,
    A: AssignmentRepository,
{
    pub async fn list_users(&self, actor: &Actor, filter: UserFilter) -> ResmanResult<Vec<User>> {
        authorize(actor, Action::ListUsers, &Resource::Global)?;
        self.users.list(filter).await
    }

    /// Engineers and team leads.
    pub async fn list_engineers(
        &self,
        availability: Option<Availability>,
        skills: Vec<String>,
    ) -> ResmanResult<Vec<User>> {
        self.users
            .list(UserFilter {
                availability,
                skills_any: skills,
                ..UserFilter::with_roles(Role::ASSIGNABLE)
            })
            .await
    }

    pub async fn list_project_managers(&self) -> ResmanResult<Vec<User>> {
        self.users.list(UserFilter::with_roles(Role::MANAGERS)).await
    }

    /// Assignable engineers who are not marked unavailable, with their
    /// capacity over `range`. `min_capacity` drops engineers with less
    /// free capacity.
    pub async fn available_engineers(
        &self,
        range: Option<DateRange>,
        skills: Vec<String>,
        min_capacity: Option<f64>,
    ) -> ResmanResult<Vec<AvailableEngineer>> {
        let engineers = self
            .users
            .list(UserFilter {
                exclude_availability: Some(Availability::Unavailable),
                skills_any: skills,
                ..UserFilter::with_roles(Role::ASSIGNABLE)
            })
            .await?;
        let active = self
            .assignments
            .list(AssignmentFilter::default().active())
            .await?;
        let by_engineer = capacity::group_by_engineer(active);

        Ok(engineers
            .into_iter()
            .map(|engineer| {
                let figures = capacity::engineer_capacity(
                    by_engineer.get(&engineer.id).into_iter().flatten(),
                    range.as_ref(),
                );
                AvailableEngineer {
                    engineer,
                    current_allocation: figures.total_allocation,
                    available_capacity: figures.available_capacity,
                }
            })
            .filter(|e| min_capacity.is_none_or(|min| e.available_capacity >= min))
            .collect())
    }

    pub async fn get_user(&self, actor: &Actor, id: Uuid) -> ResmanResult<User> {
        let user = self.users.get_by_id(id).await?;
        authorize(actor, Action::ViewUser, &Resource::User { id })?;
        Ok(user)
    }

    /// Changing the role additionally requires `ChangeUserRole`.
    pub async fn update_user(
        &self,
        actor: &Actor,
        id: Uuid,
        input: UpdateUser,
    ) -> ResmanResult<User> {
        let current = self.users.get_by_id(id).await?;
        let resource = Resource::User { id };
        authorize(actor, Action::UpdateUser, &resource)?;
        if input.role.is_some_and(|role| role != current.role) {
            authorize(actor, Action::ChangeUserRole, &resource)?;
        }
        input.validate()?;

        let user = self.users.update(id, input).await?;
        info!(user_id = %id, actor = %actor.id, "User updated");
        Ok(user)
    }

    /// Refused while the identity holds an active assignment.
    pub async fn delete_user(&self, actor: &Actor, id: Uuid) -> ResmanResult<()> {
        self.users.get_by_id(id).await?;
        authorize(actor, Action::DeleteUser, &Resource::User { id })?;

        let active = self
            .assignments
            .list(AssignmentFilter::engineer(id).active())
            .await?;
        if !active.is_empty() {
            return Err(ResmanError::conflict(
                "Cannot delete user with active assignments",
            ));
        }

        self.users.delete(id).await?;
        info!(user_id = %id, actor = %actor.id, "User deleted");
        Ok(())
    }

    /// Assignments and hours for engineers, managed projects for managers.
    pub async fn user_dashboard(&self, actor: &Actor, id: Uuid) -> ResmanResult<UserDashboard> {
        let user = self.get_user(actor, id).await?;

        let mut dashboard = UserDashboard {
            assignments: Vec::new(),
            total_projects: 0,
            total_hours: 0.0,
            current_allocation: 0.0,
            managed_projects: None,
            user,
        };

        if dashboard.user.role.is_assignable() {
            let assignments = self
                .assignments
                .list(AssignmentFilter::engineer(id))
                .await?;
            dashboard.total_projects = assignments.len();
            dashboard.total_hours = assignments.iter().map(|a| a.hours_worked).sum();
            dashboard.current_allocation =
                capacity::engineer_capacity(&assignments, None).total_allocation;
            dashboard.assignments = self.directory().await?.details(assignments);
        }

        if dashboard.user.role.can_own_projects() {
            let managed = self.managed_projects(id).await?;
            dashboard.total_projects = managed.len();
            dashboard.managed_projects = Some(managed);
        }

        Ok(dashboard)
    }
}
