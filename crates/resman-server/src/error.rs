//! API error type mapping domain errors onto HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use resman_core::error::ResmanError;
use serde_json::json;
use tracing::error;

/// Wraps [`ResmanError`] so handlers can return it with `?`.
#[derive(Debug)]
pub struct ApiError(pub ResmanError);

pub type ApiResult<T> = Result<T, ApiError>;

impl From<ResmanError> for ApiError {
    fn from(err: ResmanError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match &self.0 {
            ResmanError::NotFound { .. } => StatusCode::NOT_FOUND,
            ResmanError::Conflict { .. } => StatusCode::CONFLICT,
            ResmanError::Forbidden { .. } => StatusCode::FORBIDDEN,
            ResmanError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            ResmanError::Validation { .. } => StatusCode::BAD_REQUEST,
            ResmanError::Database(_) | ResmanError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// "project" -> "Project"
fn capitalize(entity: &str) -> String {
    let mut chars = entity.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self.0 {
            ResmanError::NotFound { entity, .. } => json!({
                "success": false,
                "message": format!("{} not found", capitalize(&entity)),
            }),
            ResmanError::Conflict { message } => json!({
                "success": false,
                "message": message,
            }),
            ResmanError::Forbidden { reason } | ResmanError::Unauthorized { reason } => json!({
                "success": false,
                "message": reason,
            }),
            ResmanError::Validation { message } => json!({
                "success": false,
                "message": "Bad request",
                "error": message,
            }),
            ResmanError::Database(cause) | ResmanError::Internal(cause) => {
                error!(error = %cause, "Request failed");
                json!({
                    "success": false,
                    "message": "Internal Server Error",
                })
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        let cases = [
            (ResmanError::not_found("project", 1), StatusCode::NOT_FOUND),
            (ResmanError::conflict("dup"), StatusCode::CONFLICT),
            (ResmanError::forbidden("no"), StatusCode::FORBIDDEN),
            (ResmanError::unauthorized("who"), StatusCode::UNAUTHORIZED),
            (ResmanError::validation("bad"), StatusCode::BAD_REQUEST),
            (
                ResmanError::Database("down".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ResmanError::Internal("oops".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError(err).status_code(), status);
        }
    }

    #[test]
    fn entity_names_are_capitalized() {
        assert_eq!(capitalize("assignment"), "Assignment");
        assert_eq!(capitalize(""), "");
    }
}
