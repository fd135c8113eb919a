use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use resman_auth::{LoginInput, SignupInput};
use serde_json::{Value, json};

use super::envelope;
use crate::error::ApiResult;
use crate::extract::ValidJson;
use crate::state::AppState;

pub async fn signup(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<SignupInput>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let user = state.auth.signup(input).await?;
    let body = envelope(Some("User created successfully"), json!({ "user": user }))?;
    Ok((StatusCode::CREATED, body))
}

pub async fn login(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<LoginInput>,
) -> ApiResult<Json<Value>> {
    let login = state.auth.login(input).await?;
    envelope(
        Some("Successfully logged in"),
        json!({
            "token": login.token,
            "expiresIn": login.expires_in,
            "id": login.user.id,
            "email": login.user.email,
            "name": login.user.name,
            "role": login.user.role,
        }),
    )
}
