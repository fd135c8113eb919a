use axum::Json;
use axum::extract::State;
use serde_json::Value;
use uuid::Uuid;

use super::{RangeQuery, envelope};
use crate::error::ApiResult;
use crate::extract::{AuthUser, ValidPath, ValidQuery};
use crate::state::AppState;

pub async fn stats(State(state): State<AppState>, user: AuthUser) -> ApiResult<Json<Value>> {
    let stats = state.resources.dashboard_stats(&user.actor()).await?;
    envelope(None, stats)
}

pub async fn project_analytics(
    State(state): State<AppState>,
    user: AuthUser,
    ValidPath(id): ValidPath<Uuid>,
) -> ApiResult<Json<Value>> {
    let analytics = state.resources.project_analytics(&user.actor(), id).await?;
    envelope(None, analytics)
}

pub async fn engineer_analytics(
    State(state): State<AppState>,
    user: AuthUser,
    ValidPath(id): ValidPath<Uuid>,
) -> ApiResult<Json<Value>> {
    let analytics = state.resources.engineer_analytics(&user.actor(), id).await?;
    envelope(None, analytics)
}

pub async fn resource_capacity(
    State(state): State<AppState>,
    user: AuthUser,
    ValidQuery(query): ValidQuery<RangeQuery>,
) -> ApiResult<Json<Value>> {
    let capacity = state
        .resources
        .resource_capacity(&user.actor(), query.range()?)
        .await?;
    envelope(None, capacity)
}
