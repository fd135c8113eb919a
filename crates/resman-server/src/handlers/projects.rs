use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use resman_core::models::assignment::AssignEngineer;
use resman_core::models::project::{CreateProject, ProjectFilter, ProjectStatus, UpdateProject};
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use super::envelope;
use crate::error::ApiResult;
use crate::extract::{AuthUser, ValidJson, ValidPath, ValidQuery};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ProjectQuery {
    pub status: Option<ProjectStatus>,
}

pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    ValidQuery(query): ValidQuery<ProjectQuery>,
) -> ApiResult<Json<Value>> {
    let filter = ProjectFilter {
        statuses: query.status.into_iter().collect(),
        ..ProjectFilter::default()
    };
    let projects = state.resources.list_projects(filter).await?;
    envelope(None, json!({ "projects": projects }))
}

pub async fn list_by_status(
    State(state): State<AppState>,
    _user: AuthUser,
    ValidPath(status): ValidPath<ProjectStatus>,
) -> ApiResult<Json<Value>> {
    let filter = ProjectFilter {
        statuses: vec![status],
        ..ProjectFilter::default()
    };
    let projects = state.resources.list_projects(filter).await?;
    envelope(None, json!({ "projects": projects }))
}

pub async fn get(
    State(state): State<AppState>,
    _user: AuthUser,
    ValidPath(id): ValidPath<Uuid>,
) -> ApiResult<Json<Value>> {
    let project = state.resources.get_project(id).await?;
    envelope(None, json!({ "project": project }))
}

pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    ValidJson(input): ValidJson<CreateProject>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let project = state.resources.create_project(&user.actor(), input).await?;
    let body = envelope(Some("Project created successfully"), json!({ "project": project }))?;
    Ok((StatusCode::CREATED, body))
}

pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    ValidPath(id): ValidPath<Uuid>,
    ValidJson(input): ValidJson<UpdateProject>,
) -> ApiResult<Json<Value>> {
    let project = state.resources.update_project(&user.actor(), id, input).await?;
    envelope(Some("Project updated successfully"), json!({ "project": project }))
}

pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    ValidPath(id): ValidPath<Uuid>,
) -> ApiResult<Json<Value>> {
    state.resources.delete_project(&user.actor(), id).await?;
    envelope(Some("Project deleted successfully"), ())
}

pub async fn assign_engineer(
    State(state): State<AppState>,
    user: AuthUser,
    ValidPath(id): ValidPath<Uuid>,
    ValidJson(request): ValidJson<AssignEngineer>,
) -> ApiResult<Json<Value>> {
    let project = state
        .resources
        .assign_engineer(&user.actor(), id, request)
        .await?;
    envelope(Some("Engineer assigned successfully"), json!({ "project": project }))
}

pub async fn remove_engineer(
    State(state): State<AppState>,
    user: AuthUser,
    ValidPath((id, engineer_id)): ValidPath<(Uuid, Uuid)>,
) -> ApiResult<Json<Value>> {
    let project = state
        .resources
        .remove_engineer(&user.actor(), id, engineer_id)
        .await?;
    envelope(Some("Engineer removed successfully"), json!({ "project": project }))
}
