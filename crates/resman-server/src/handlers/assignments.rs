use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use resman_core::models::assignment::{
    AssignmentFilter, AssignmentStatus, LogHours, NewAssignment, UpdateAssignment,
};
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use super::{RangeQuery, envelope};
use crate::error::ApiResult;
use crate::extract::{AuthUser, ValidJson, ValidPath, ValidQuery};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct AssignmentQuery {
    pub status: Option<AssignmentStatus>,
}

pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    ValidQuery(query): ValidQuery<AssignmentQuery>,
) -> ApiResult<Json<Value>> {
    let filter = AssignmentFilter {
        status: query.status,
        ..AssignmentFilter::default()
    };
    let assignments = state.resources.list_assignments(filter).await?;
    envelope(None, json!({ "assignments": assignments }))
}

pub async fn by_engineer(
    State(state): State<AppState>,
    _user: AuthUser,
    ValidPath(engineer_id): ValidPath<Uuid>,
) -> ApiResult<Json<Value>> {
    let assignments = state
        .resources
        .list_assignments(AssignmentFilter::engineer(engineer_id))
        .await?;
    envelope(None, json!({ "assignments": assignments }))
}

pub async fn by_project(
    State(state): State<AppState>,
    _user: AuthUser,
    ValidPath(project_id): ValidPath<Uuid>,
) -> ApiResult<Json<Value>> {
    let assignments = state
        .resources
        .list_assignments(AssignmentFilter::project(project_id))
        .await?;
    envelope(None, json!({ "assignments": assignments }))
}

pub async fn capacity(
    State(state): State<AppState>,
    _user: AuthUser,
    ValidPath(engineer_id): ValidPath<Uuid>,
    ValidQuery(query): ValidQuery<RangeQuery>,
) -> ApiResult<Json<Value>> {
    let view = state
        .resources
        .engineer_capacity(engineer_id, query.range()?)
        .await?;
    envelope(None, view)
}

pub async fn resource_allocation(
    State(state): State<AppState>,
    _user: AuthUser,
    ValidPath(project_id): ValidPath<Uuid>,
) -> ApiResult<Json<Value>> {
    let allocation = state.resources.project_allocation(project_id).await?;
    envelope(None, allocation)
}

pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    ValidJson(input): ValidJson<NewAssignment>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let assignment = state
        .resources
        .create_assignment(&user.actor(), input)
        .await?;
    let body = envelope(
        Some("Assignment created successfully"),
        json!({ "assignment": assignment }),
    )?;
    Ok((StatusCode::CREATED, body))
}

pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    ValidPath(id): ValidPath<Uuid>,
    ValidJson(input): ValidJson<UpdateAssignment>,
) -> ApiResult<Json<Value>> {
    let assignment = state
        .resources
        .update_assignment(&user.actor(), id, input)
        .await?;
    envelope(
        Some("Assignment updated successfully"),
        json!({ "assignment": assignment }),
    )
}

pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    ValidPath(id): ValidPath<Uuid>,
) -> ApiResult<Json<Value>> {
    state.resources.delete_assignment(&user.actor(), id).await?;
    envelope(Some("Assignment deleted successfully"), ())
}

pub async fn log_hours(
    State(state): State<AppState>,
    user: AuthUser,
    ValidPath(id): ValidPath<Uuid>,
    ValidJson(input): ValidJson<LogHours>,
) -> ApiResult<Json<Value>> {
    let assignment = state.resources.log_hours(&user.actor(), id, input).await?;
    envelope(
        Some("Hours updated successfully"),
        json!({ "assignment": assignment }),
    )
}
