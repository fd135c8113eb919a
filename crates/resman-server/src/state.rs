//! Shared application state.

use std::sync::Arc;

use resman_auth::{AuthConfig, AuthService};
use resman_db::repository::{
    SurrealAssignmentRepository, SurrealProjectRepository, SurrealUserRepository,
};
use surrealdb::Surreal;
use surrealdb::engine::any::Any;

use crate::service::ResourceService;

pub type Users = SurrealUserRepository<Any>;
pub type Projects = SurrealProjectRepository<Any>;
pub type Assignments = SurrealAssignmentRepository<Any>;
pub type Resources = ResourceService<Users, Projects, Assignments>;

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService<Users>>,
    pub resources: Arc<Resources>,
}

impl AppState {
    pub fn new(db: Surreal<Any>, auth_config: AuthConfig) -> Self {
        let users = SurrealUserRepository::new(db.clone());
        Self {
            auth: Arc::new(AuthService::new(users.clone(), auth_config)),
            resources: Arc::new(ResourceService::new(
                users,
                SurrealProjectRepository::new(db.clone()),
                SurrealAssignmentRepository::new(db),
            )),
        }
    }
}
