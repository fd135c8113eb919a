use chrono::Utc;
use resman_core::error::{ResmanError, ResmanResult};
use resman_core::models::assignment::{
    AssignEngineer, Assignment, AssignmentFilter, AssignmentStatus, CreateAssignment,
};
use resman_core::models::project::{
    AssignedEngineer, CreateProject, Project, ProjectFilter, UpdateProject,
};
use resman_core::models::user::{User, UserSummary};
use resman_core::policy::{Action, Actor, Resource, authorize};
use resman_core::repository::{AssignmentRepository, ProjectRepository, UserRepository};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::{Directory, ResourceService};

/// A project with its manager and its roster of active assignments.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectView {
    #[serde(flatten)]
    pub project: Project,
    pub manager: Option<UserSummary>,
    pub assigned_engineers: Vec<AssignedEngineer>,
}

impl ProjectView {
    fn compose(project: Project, assignments: &[Assignment], directory: &Directory) -> Self {
        let roster = AssignedEngineer::roster(
            assignments.iter().filter(|a| a.project_id == project.id),
            |id| directory.user(id),
        );
        Self {
            manager: directory.user(project.project_manager),
            assigned_engineers: roster,
            project,
        }
    }
}

fn project_resource(project: &Project) -> Resource {
    Resource::Project {
        manager_id: project.project_manager,
    }
}

/// A project manager must hold a role that can own projects.
fn check_manager(manager: &User) -> ResmanResult<()> {
    if manager.role.can_own_projects() {
        Ok(())
    } else {
        Err(ResmanError::validation(
            "User is not authorized to be a project manager",
        ))
    }
}

impl<U, P, A> ResourceService<U, P, A>
where
    U: UserRepository,
    P: ProjectRepository,
    A: AssignmentRepository,
{
    async fn project_views(&self, projects: Vec<Project>) -> ResmanResult<Vec<ProjectView>> {
        let directory = self.directory().await?;
        let active = self
            .assignments
            .list(AssignmentFilter::default().active())
            .await?;
        Ok(projects
            .into_iter()
            .map(|p| ProjectView::compose(p, &active, &directory))
            .collect())
    }

    pub(super) async fn project_view(&self, project: Project) -> ResmanResult<ProjectView> {
        let directory = self.directory().await?;
        let assignments = self
            .assignments
            .list(AssignmentFilter::project(project.id).active())
            .await?;
        Ok(ProjectView::compose(project, &assignments, &directory))
    }

    pub async fn list_projects(&self, filter: ProjectFilter) -> ResmanResult<Vec<ProjectView>> {
        let projects = self.projects.list(filter).await?;
        self.project_views(projects).await
    }

    pub async fn get_project(&self, id: Uuid) -> ResmanResult<ProjectView> {
        let project = self.projects.get_by_id(id).await?;
        self.project_view(project).await
    }

    pub async fn create_project(
        &self,
        actor: &Actor,
        input: CreateProject,
    ) -> ResmanResult<ProjectView> {
        authorize(actor, Action::CreateProject, &Resource::Global)?;
        input.validate()?;
        check_manager(&self.users.get_by_id(input.project_manager).await?)?;

        let project = self.projects.create(input).await?;
        info!(project_id = %project.id, actor = %actor.id, "Project created");
        self.project_view(project).await
    }

    pub async fn update_project(
        &self,
        actor: &Actor,
        id: Uuid,
        input: UpdateProject,
    ) -> ResmanResult<ProjectView> {
        let current = self.projects.get_by_id(id).await?;
        authorize(actor, Action::UpdateProject, &project_resource(&current))?;
        input.validate_against(&current)?;
        if let Some(manager_id) = input.project_manager {
            check_manager(&self.users.get_by_id(manager_id).await?)?;
        }

        let project = self.projects.update(id, input).await?;
        info!(project_id = %id, actor = %actor.id, "Project updated");
        self.project_view(project).await
    }

    /// Refused while any active assignment references the project.
    pub async fn delete_project(&self, actor: &Actor, id: Uuid) -> ResmanResult<()> {
        let project = self.projects.get_by_id(id).await?;
        authorize(actor, Action::DeleteProject, &project_resource(&project))?;

        let active = self
            .assignments
            .list(AssignmentFilter::project(id).active())
            .await?;
        if !active.is_empty() {
            return Err(ResmanError::conflict(
                "Cannot delete project with active assignments",
            ));
        }

        self.projects.delete(id).await?;
        info!(project_id = %id, actor = %actor.id, "Project deleted");
        Ok(())
    }

    /// Creates the assignment backing a roster entry.
    pub async fn assign_engineer(
        &self,
        actor: &Actor,
        project_id: Uuid,
        request: AssignEngineer,
    ) -> ResmanResult<ProjectView> {
        let project = self.projects.get_by_id(project_id).await?;
        authorize(actor, Action::ManageProjectEngineers, &project_resource(&project))?;

        let engineer = self.users.get_by_id(request.engineer_id).await?;
        if !engineer.role.is_assignable() {
            return Err(ResmanError::validation(
                "User is not authorized to be assigned as engineer",
            ));
        }

        let new = request.into_new_assignment(&project);
        new.validate()?;
        let assignment = self
            .assignments
            .create(CreateAssignment {
                engineer_id: engineer.id,
                project_id,
                role: new.role,
                allocation_percentage: new.allocation_percentage,
                start_date: new.start_date,
                end_date: new.end_date,
                status: AssignmentStatus::Active,
                hours_allocated: new.hours_allocated,
                hourly_rate: engineer.hourly_rate,
                notes: None,
                assigned_by: actor.id,
            })
            .await?;
        info!(
            assignment_id = %assignment.id,
            project_id = %project_id,
            engineer_id = %engineer.id,
            "Engineer assigned"
        );

        self.project_view(project).await
    }

    /// Deletes the (engineer, project) assignment.
    pub async fn remove_engineer(
        &self,
        actor: &Actor,
        project_id: Uuid,
        engineer_id: Uuid,
    ) -> ResmanResult<ProjectView> {
        let project = self.projects.get_by_id(project_id).await?;
        authorize(actor, Action::ManageProjectEngineers, &project_resource(&project))?;

        let assignment = self.assignments.get_by_pair(engineer_id, project_id).await?;
        self.assignments.delete(assignment.id).await?;
        info!(
            assignment_id = %assignment.id,
            project_id = %project_id,
            engineer_id = %engineer_id,
            "Engineer removed"
        );

        self.project_view(project).await
    }

    pub(super) async fn managed_projects(
        &self,
        manager_id: Uuid,
    ) -> ResmanResult<Vec<ProjectView>> {
        let projects = self
            .projects
            .list(ProjectFilter {
                project_manager: Some(manager_id),
                ..ProjectFilter::default()
            })
            .await?;
        self.project_views(projects).await
    }
}

#[cfg(test)]
mod tests {
    use resman_core::models::user::Role;

    use super::*;

    #[test]
    fn only_managers_may_own_projects() {
        let now = Utc::now();
        let mut user = User {
            id: Uuid::new_v4(),
            name: "Pat".into(),
            email: "pat@example.com".into(),
            password_hash: String::new(),
            role: Role::TeamLead,
            skills: vec![],
            experience: 0,
            hourly_rate: 0.0,
            availability: Default::default(),
            department: "Engineering".into(),
            phone: None,
            location: None,
            bio: None,
            created_at: now,
            updated_at: now,
        };
        assert!(matches!(
            check_manager(&user),
            Err(ResmanError::Validation { .. })
        ));
        user.role = Role::ProjectManager;
        assert!(check_manager(&user).is_ok());
    }
}
