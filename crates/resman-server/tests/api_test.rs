//! End-to-end checks through the axum router.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use resman_auth::AuthConfig;
use resman_server::{AppState, build_router};
use serde_json::{Value, json};
use surrealdb::engine::any;
use tower::ServiceExt;

async fn app() -> Router {
    let db = any::connect("mem://").await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    resman_db::run_migrations(&db).await.unwrap();
    let config = AuthConfig {
        jwt_secret: "test-secret-with-enough-entropy".into(),
        ..AuthConfig::default()
    };
    build_router(AppState::new(db, config))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn post(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::post(uri).header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn put(uri: &str, token: &str, body: Value) -> Request<Body> {
    Request::put(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::get(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

/// Signs up and logs in, returning the token and identity id.
async fn login_as(app: &Router, name: &str, email: &str, role: &str) -> (String, String) {
    let (status, _) = send(
        app,
        post(
            "/auth/signup",
            None,
            json!({"name": name, "email": email, "password": "hunter22", "role": role}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        app,
        post("/auth/login", None, json!({"email": email, "password": "hunter22"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    (
        body["token"].as_str().unwrap().to_string(),
        body["id"].as_str().unwrap().to_string(),
    )
}

#[tokio::test]
async fn ping_answers_pong() {
    let app = app().await;
    let response = app.oneshot(get("/ping", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"pong");
}

#[tokio::test]
async fn signup_then_login_returns_identity_fields() {
    let app = app().await;
    let (status, body) = send(
        &app,
        post(
            "/auth/signup",
            None,
            json!({
                "name": "Eve Engineer",
                "email": "Eve@Example.com",
                "password": "hunter22",
                "role": "engineer",
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["email"], "eve@example.com");
    assert!(body["user"].get("passwordHash").is_none());

    let (status, body) = send(
        &app,
        post("/auth/login", None, json!({"email": "eve@example.com", "password": "hunter22"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Eve Engineer");
    assert_eq!(body["role"], "engineer");
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
}

#[tokio::test]
async fn duplicate_signup_conflicts_and_bad_password_is_unauthorized() {
    let app = app().await;
    login_as(&app, "Eve Engineer", "eve@example.com", "engineer").await;

    let (status, body) = send(
        &app,
        post(
            "/auth/signup",
            None,
            json!({"name": "Eve Again", "email": "eve@example.com", "password": "hunter22"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);

    let (status, body) = send(
        &app,
        post("/auth/login", None, json!({"email": "eve@example.com", "password": "wrong-one"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid email or password");
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let app = app().await;
    let (status, body) = send(&app, get("/projects", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "No token provided");

    let (status, _) = send(&app, get("/projects", Some("not-a-jwt"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn malformed_input_is_a_bad_request() {
    let app = app().await;
    let (token, _) = login_as(&app, "Pat Manager", "pat@example.com", "project_manager").await;

    let (status, body) = send(&app, post("/projects", Some(&token), json!({"name": "x"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Bad request");
    assert!(body["error"].is_string());

    let (status, _) = send(&app, get("/projects/not-a-uuid", Some(&token))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_project_is_not_found() {
    let app = app().await;
    let (token, _) = login_as(&app, "Eve Engineer", "eve@example.com", "engineer").await;

    let uri = format!("/projects/{}", uuid::Uuid::new_v4());
    let (status, body) = send(&app, get(&uri, Some(&token))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Project not found");
}

#[tokio::test]
async fn project_lifecycle_over_http() {
    let app = app().await;
    let (token, pm_id) = login_as(&app, "Pat Manager", "pat@example.com", "project_manager").await;
    let (_, engineer_id) = login_as(&app, "Eve Engineer", "eve@example.com", "engineer").await;

    let (status, body) = send(
        &app,
        post(
            "/projects",
            Some(&token),
            json!({
                "name": "Apollo",
                "description": "Platform migration work",
                "startDate": "2099-01-01T00:00:00Z",
                "endDate": "2099-06-01T00:00:00Z",
                "projectManager": pm_id,
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["project"]["status"], "planning");
    let project_id = body["project"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        post(
            &format!("/projects/{project_id}/assign-engineer"),
            Some(&token),
            json!({"engineerId": engineer_id, "allocationPercentage": 40}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["project"]["assignedEngineers"][0]["engineerId"], engineer_id.as_str());

    let (status, body) = send(
        &app,
        get(
            &format!("/assignments/capacity/{engineer_id}?startDate=2099-02-01&endDate=2099-03-01"),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalAllocation"], 40.0);
    assert_eq!(body["availableCapacity"], 60.0);

    let (status, body) = send(&app, get("/projects/status/planning", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["projects"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn engineers_cannot_see_the_fleet_dashboard() {
    let app = app().await;
    let (token, _) = login_as(&app, "Eve Engineer", "eve@example.com", "engineer").await;

    let (status, body) = send(&app, get("/dashboard/stats", Some(&token))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "You don't have permission to perform this action");
}

#[tokio::test]
async fn date_picker_values_and_edit_form_round_trip() {
    let app = app().await;
    let (token, pm_id) = login_as(&app, "Pat Manager", "pat@example.com", "project_manager").await;
    let (_, engineer_id) = login_as(&app, "Eve Engineer", "eve@example.com", "engineer").await;
    let (_, other_id) = login_as(&app, "Olli Other", "olli@example.com", "engineer").await;

    let (status, body) = send(
        &app,
        post(
            "/projects",
            Some(&token),
            json!({
                "name": "Apollo",
                "description": "Platform migration work",
                "startDate": "2099-01-01",
                "endDate": "2099-06-01",
                "projectManager": pm_id,
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(
        body["project"]["startDate"]
            .as_str()
            .is_some_and(|d| d.starts_with("2099-01-01T00:00:00"))
    );
    let project_id = body["project"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        post(
            "/assignments",
            Some(&token),
            json!({
                "engineerId": engineer_id,
                "projectId": project_id,
                "allocationPercentage": 50,
                "startDate": "2099-01-01",
                "endDate": "2099-03-01",
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let assignment_id = body["assignment"]["id"].as_str().unwrap().to_string();
    let uri = format!("/assignments/{assignment_id}");

    let mut form = json!({
        "engineerId": engineer_id,
        "projectId": project_id,
        "role": "lead",
        "allocationPercentage": 75,
        "startDate": "2099-01-15",
        "endDate": "2099-04-01",
        "hoursAllocated": 120,
        "hourlyRate": 95,
        "notes": "",
    });
    let (status, body) = send(&app, put(&uri, &token, form.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["assignment"]["role"], "lead");
    assert_eq!(body["assignment"]["allocationPercentage"], 75.0);
    assert_eq!(body["assignment"]["engineerId"], engineer_id.as_str());

    form["engineerId"] = json!(other_id);
    let (status, body) = send(&app, put(&uri, &token, form)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}
