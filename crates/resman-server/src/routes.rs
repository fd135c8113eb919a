//! Route table.

use axum::Router;
use axum::routing::{delete, get, post, put};

use crate::handlers::{assignments, auth, dashboard, projects, users};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/ping", get(crate::handlers::ping))
        .nest("/auth", auth_routes())
        .nest("/projects", project_routes())
        .nest("/assignments", assignment_routes())
        .nest("/users", user_routes())
        .nest("/dashboard", dashboard_routes())
        .with_state(state)
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
}

fn project_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(projects::list).post(projects::create))
        .route("/status/{status}", get(projects::list_by_status))
        .route(
            "/{id}",
            get(projects::get)
                .put(projects::update)
                .delete(projects::delete),
        )
        .route("/{id}/assign-engineer", post(projects::assign_engineer))
        .route(
            "/{id}/remove-engineer/{engineer_id}",
            delete(projects::remove_engineer),
        )
}

fn assignment_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(assignments::list).post(assignments::create))
        .route("/engineer/{engineer_id}", get(assignments::by_engineer))
        .route("/project/{project_id}", get(assignments::by_project))
        .route(
            "/project/{project_id}/resource-allocation",
            get(assignments::resource_allocation),
        )
        .route("/capacity/{engineer_id}", get(assignments::capacity))
        .route(
            "/{id}",
            put(assignments::update).delete(assignments::delete),
        )
        .route("/{id}/hours", put(assignments::log_hours))
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list))
        .route("/engineers", get(users::engineers))
        .route("/project-managers", get(users::project_managers))
        .route("/available-engineers", get(users::available_engineers))
        .route("/dashboard/{id}", get(users::dashboard))
        .route(
            "/{id}",
            get(users::get).put(users::update).delete(users::delete),
        )
}

fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/stats", get(dashboard::stats))
        .route("/project/{id}/analytics", get(dashboard::project_analytics))
        .route("/engineer/{id}/analytics", get(dashboard::engineer_analytics))
        .route("/resource-capacity", get(dashboard::resource_capacity))
}
