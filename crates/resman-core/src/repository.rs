//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async and atomic per record. Uniqueness
//! of user emails and of (engineer, project) assignment pairs is enforced
//! by the store; implementations report violations as
//! [`ResmanError::Conflict`](crate::error::ResmanError::Conflict).

use uuid::Uuid;

use crate::error::ResmanResult;
use crate::models::{
    assignment::{Assignment, AssignmentFilter, CreateAssignment, UpdateAssignment},
    project::{CreateProject, Project, ProjectFilter, UpdateProject},
    user::{CreateUser, UpdateUser, User, UserFilter},
};

pub trait UserRepository: Send + Sync {
    fn create(&self, input: CreateUser) -> impl Future<Output = ResmanResult<User>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = ResmanResult<User>> + Send;
    fn get_by_email(&self, email: &str) -> impl Future<Output = ResmanResult<User>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateUser,
    ) -> impl Future<Output = ResmanResult<User>> + Send;
    /// Deletes the identity together with any assignments still
    /// referencing it, in one transaction. Callers decide beforehand
    /// whether deletion is allowed.
    fn delete(&self, id: Uuid) -> impl Future<Output = ResmanResult<()>> + Send;
    fn list(&self, filter: UserFilter) -> impl Future<Output = ResmanResult<Vec<User>>> + Send;
}

pub trait ProjectRepository: Send + Sync {
    fn create(&self, input: CreateProject) -> impl Future<Output = ResmanResult<Project>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = ResmanResult<Project>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateProject,
    ) -> impl Future<Output = ResmanResult<Project>> + Send;
    /// Deletes the project together with any assignments still
    /// referencing it, in one transaction.
    fn delete(&self, id: Uuid) -> impl Future<Output = ResmanResult<()>> + Send;
    /// Newest first.
    fn list(
        &self,
        filter: ProjectFilter,
    ) -> impl Future<Output = ResmanResult<Vec<Project>>> + Send;
}

pub trait AssignmentRepository: Send + Sync {
    /// Fails with `Conflict` when the (engineer, project) pair already
    /// has an assignment, whatever its dates or status.
    fn create(
        &self,
        input: CreateAssignment,
    ) -> impl Future<Output = ResmanResult<Assignment>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = ResmanResult<Assignment>> + Send;
    fn get_by_pair(
        &self,
        engineer_id: Uuid,
        project_id: Uuid,
    ) -> impl Future<Output = ResmanResult<Assignment>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateAssignment,
    ) -> impl Future<Output = ResmanResult<Assignment>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = ResmanResult<()>> + Send;
    fn list(
        &self,
        filter: AssignmentFilter,
    ) -> impl Future<Output = ResmanResult<Vec<Assignment>>> + Send;
}
