use axum::Json;
use axum::extract::State;
use resman_core::models::user::{Availability, Role, UpdateUser, UserFilter};
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use super::{RangeQuery, envelope, split_csv};
use crate::error::ApiResult;
use crate::extract::{AuthUser, ValidJson, ValidPath, ValidQuery};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct UserQuery {
    pub role: Option<Role>,
    pub department: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EngineerQuery {
    pub availability: Option<Availability>,
    /// Comma-separated.
    pub skills: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub skills: Option<String>,
    pub min_capacity: Option<f64>,
}

pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    ValidQuery(query): ValidQuery<UserQuery>,
) -> ApiResult<Json<Value>> {
    let filter = UserFilter {
        roles: query.role.into_iter().collect(),
        department: query.department,
        ..UserFilter::default()
    };
    let users = state.resources.list_users(&user.actor(), filter).await?;
    envelope(None, json!({ "users": users }))
}

pub async fn engineers(
    State(state): State<AppState>,
    _user: AuthUser,
    ValidQuery(query): ValidQuery<EngineerQuery>,
) -> ApiResult<Json<Value>> {
    let engineers = state
        .resources
        .list_engineers(query.availability, split_csv(query.skills.as_deref()))
        .await?;
    envelope(None, json!({ "engineers": engineers }))
}

pub async fn project_managers(
    State(state): State<AppState>,
    _user: AuthUser,
) -> ApiResult<Json<Value>> {
    let managers = state.resources.list_project_managers().await?;
    envelope(None, json!({ "projectManagers": managers }))
}

pub async fn available_engineers(
    State(state): State<AppState>,
    _user: AuthUser,
    ValidQuery(query): ValidQuery<AvailabilityQuery>,
) -> ApiResult<Json<Value>> {
    let range = RangeQuery {
        start_date: query.start_date,
        end_date: query.end_date,
    }
    .range()?;
    let engineers = state
        .resources
        .available_engineers(
            range,
            split_csv(query.skills.as_deref()),
            query.min_capacity,
        )
        .await?;
    envelope(None, json!({ "engineers": engineers }))
}

pub async fn dashboard(
    State(state): State<AppState>,
    user: AuthUser,
    ValidPath(id): ValidPath<Uuid>,
) -> ApiResult<Json<Value>> {
    let dashboard = state.resources.user_dashboard(&user.actor(), id).await?;
    envelope(None, json!({ "dashboardData": dashboard }))
}

pub async fn get(
    State(state): State<AppState>,
    user: AuthUser,
    ValidPath(id): ValidPath<Uuid>,
) -> ApiResult<Json<Value>> {
    let found = state.resources.get_user(&user.actor(), id).await?;
    envelope(None, json!({ "user": found }))
}

pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    ValidPath(id): ValidPath<Uuid>,
    ValidJson(input): ValidJson<UpdateUser>,
) -> ApiResult<Json<Value>> {
    let updated = state
        .resources
        .update_user(&user.actor(), id, input)
        .await?;
    envelope(Some("User updated successfully"), json!({ "user": updated }))
}

pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    ValidPath(id): ValidPath<Uuid>,
) -> ApiResult<Json<Value>> {
    state.resources.delete_user(&user.actor(), id).await?;
    envelope(Some("User deleted successfully"), ())
}
