//! Integration tests for the assignment repository using in-memory SurrealDB.

use chrono::{TimeZone, Utc};
use resman_core::error::ResmanError;
use resman_core::models::assignment::{
    AssignmentFilter, AssignmentRole, AssignmentStatus, CreateAssignment, UpdateAssignment,
};
use resman_core::models::project::{CreateProject, Priority};
use resman_core::repository::{AssignmentRepository, ProjectRepository};
use resman_db::repository::{SurrealAssignmentRepository, SurrealProjectRepository};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

async fn setup() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    resman_db::run_migrations(&db).await.unwrap();
    db
}

fn new_assignment(engineer_id: Uuid, project_id: Uuid, allocation: f64) -> CreateAssignment {
    CreateAssignment {
        engineer_id,
        project_id,
        role: AssignmentRole::Developer,
        allocation_percentage: allocation,
        start_date: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        end_date: Utc.with_ymd_and_hms(2025, 6, 30, 0, 0, 0).unwrap(),
        status: AssignmentStatus::Active,
        hours_allocated: 120.0,
        hourly_rate: 90.0,
        notes: None,
        assigned_by: Uuid::new_v4(),
    }
}

#[tokio::test]
async fn create_and_fetch_by_id_and_pair() {
    let repo = SurrealAssignmentRepository::new(setup().await);
    let engineer = Uuid::new_v4();
    let project = Uuid::new_v4();

    let created = repo
        .create(new_assignment(engineer, project, 40.0))
        .await
        .unwrap();
    assert_eq!(created.hours_worked, 0.0);
    assert_eq!(created.allocation_percentage, 40.0);
    assert!(created.is_active());

    let by_id = repo.get_by_id(created.id).await.unwrap();
    assert_eq!(by_id, created);

    let by_pair = repo.get_by_pair(engineer, project).await.unwrap();
    assert_eq!(by_pair.id, created.id);

    let err = repo.get_by_pair(engineer, Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, ResmanError::NotFound { .. }));
}

#[tokio::test]
async fn duplicate_pair_is_a_conflict_even_when_inactive() {
    let repo = SurrealAssignmentRepository::new(setup().await);
    let engineer = Uuid::new_v4();
    let project = Uuid::new_v4();

    let first = repo
        .create(new_assignment(engineer, project, 50.0))
        .await
        .unwrap();
    repo.update(
        first.id,
        UpdateAssignment {
            status: Some(AssignmentStatus::Completed),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let err = repo
        .create(new_assignment(engineer, project, 20.0))
        .await
        .unwrap_err();
    assert!(matches!(err, ResmanError::Conflict { .. }), "got {err:?}");

    // A different project for the same engineer is fine.
    repo.create(new_assignment(engineer, Uuid::new_v4(), 20.0))
        .await
        .unwrap();
}

#[tokio::test]
async fn update_logs_hours() {
    let repo = SurrealAssignmentRepository::new(setup().await);
    let created = repo
        .create(new_assignment(Uuid::new_v4(), Uuid::new_v4(), 60.0))
        .await
        .unwrap();

    let updated = repo
        .update(
            created.id,
            UpdateAssignment {
                hours_worked: Some(12.5),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.hours_worked, 12.5);
    assert_eq!(updated.allocation_percentage, 60.0);
}

#[tokio::test]
async fn list_by_engineer_project_and_status() {
    let repo = SurrealAssignmentRepository::new(setup().await);
    let engineer = Uuid::new_v4();
    let project_a = Uuid::new_v4();
    let project_b = Uuid::new_v4();

    let a = repo
        .create(new_assignment(engineer, project_a, 40.0))
        .await
        .unwrap();
    repo.create(new_assignment(engineer, project_b, 30.0))
        .await
        .unwrap();
    repo.create(new_assignment(Uuid::new_v4(), project_a, 100.0))
        .await
        .unwrap();

    repo.update(
        a.id,
        UpdateAssignment {
            status: Some(AssignmentStatus::OnHold),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(
        repo.list(AssignmentFilter::engineer(engineer))
            .await
            .unwrap()
            .len(),
        2
    );
    assert_eq!(
        repo.list(AssignmentFilter::engineer(engineer).active())
            .await
            .unwrap()
            .len(),
        1
    );
    assert_eq!(
        repo.list(AssignmentFilter::project(project_a))
            .await
            .unwrap()
            .len(),
        2
    );
    assert_eq!(repo.list(AssignmentFilter::default()).await.unwrap().len(), 3);
}

#[tokio::test]
async fn deleting_a_project_removes_its_assignments() {
    let db = setup().await;
    let projects = SurrealProjectRepository::new(db.clone());
    let assignments = SurrealAssignmentRepository::new(db);

    let start = Utc::now() + chrono::Duration::days(1);
    let project = projects
        .create(CreateProject {
            name: "Atlas".into(),
            description: "Internal platform rebuild".into(),
            start_date: start,
            end_date: start + chrono::Duration::days(30),
            priority: Priority::Medium,
            budget: 0.0,
            technologies: vec![],
            project_manager: Uuid::new_v4(),
        })
        .await
        .unwrap();

    let engineer = Uuid::new_v4();
    assignments
        .create(new_assignment(engineer, project.id, 50.0))
        .await
        .unwrap();

    projects.delete(project.id).await.unwrap();

    assert!(
        assignments
            .list(AssignmentFilter::project(project.id))
            .await
            .unwrap()
            .is_empty()
    );
    // The pair is free again.
    assignments
        .create(new_assignment(engineer, project.id, 50.0))
        .await
        .unwrap();
}
