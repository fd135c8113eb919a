//! Project domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::assignment::{Assignment, AssignmentRole, AssignmentStatus};
use super::dates;
use super::user::UserSummary;
use crate::error::{ResmanError, ResmanResult};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    #[default]
    Planning,
    Active,
    OnHold,
    Completed,
    Cancelled,
}

string_enum!(ProjectStatus {
    Planning => "planning",
    Active => "active",
    OnHold => "on-hold",
    Completed => "completed",
    Cancelled => "cancelled",
});

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

string_enum!(Priority {
    Low => "low",
    Medium => "medium",
    High => "high",
    Critical => "critical",
});

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub status: ProjectStatus,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub priority: Priority,
    pub budget: f64,
    pub technologies: Vec<String>,
    pub project_manager: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Compact project view embedded in assignment responses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub status: ProjectStatus,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl From<&Project> for ProjectSummary {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id,
            name: project.name.clone(),
            description: project.description.clone(),
            status: project.status,
            start_date: project.start_date,
            end_date: project.end_date,
        }
    }
}

/// One row of a project's engineer roster, derived from an active
/// assignment at read time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssignedEngineer {
    pub assignment_id: Uuid,
    pub engineer_id: Uuid,
    pub engineer: Option<UserSummary>,
    pub role: AssignmentRole,
    pub allocation_percentage: f64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl AssignedEngineer {
    /// Builds the roster from a project's assignments. Only active
    /// assignments appear on the roster.
    pub fn roster<'a>(
        assignments: impl IntoIterator<Item = &'a Assignment>,
        lookup: impl Fn(Uuid) -> Option<UserSummary>,
    ) -> Vec<Self> {
        assignments
            .into_iter()
            .filter(|a| a.status == AssignmentStatus::Active)
            .map(|a| Self {
                assignment_id: a.id,
                engineer_id: a.engineer_id,
                engineer: lookup(a.engineer_id),
                role: a.role,
                allocation_percentage: a.allocation_percentage,
                start_date: a.start_date,
                end_date: a.end_date,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "future_schedule"))]
pub struct CreateProject {
    #[validate(length(
        min = 3,
        max = 100,
        message = "name must be between 3 and 100 characters"
    ))]
    pub name: String,
    #[validate(length(
        min = 10,
        max = 1000,
        message = "description must be between 10 and 1000 characters"
    ))]
    pub description: String,
    #[serde(deserialize_with = "dates::deserialize")]
    pub start_date: DateTime<Utc>,
    #[serde(deserialize_with = "dates::deserialize")]
    pub end_date: DateTime<Utc>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "budget must be a non-negative number"))]
    pub budget: f64,
    #[serde(default)]
    pub technologies: Vec<String>,
    pub project_manager: Uuid,
}

/// A new project must start in the future and end after it starts.
fn future_schedule(input: &CreateProject) -> Result<(), ValidationError> {
    if input.start_date <= Utc::now() {
        return Err(ValidationError::new("start_in_past")
            .with_message("startDate must be in the future".into()));
    }
    ordered_schedule(input.start_date, input.end_date)
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateProject {
    #[validate(length(
        min = 3,
        max = 100,
        message = "name must be between 3 and 100 characters"
    ))]
    pub name: Option<String>,
    #[validate(length(
        min = 10,
        max = 1000,
        message = "description must be between 10 and 1000 characters"
    ))]
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    #[serde(default, deserialize_with = "dates::deserialize_opt")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "dates::deserialize_opt")]
    pub end_date: Option<DateTime<Utc>>,
    pub priority: Option<Priority>,
    #[validate(range(min = 0.0, message = "budget must be a non-negative number"))]
    pub budget: Option<f64>,
    pub technologies: Option<Vec<String>>,
    pub project_manager: Option<Uuid>,
}

impl UpdateProject {
    /// Field checks, then the timeline merged with the stored project must
    /// still end after it starts.
    pub fn validate_against(&self, current: &Project) -> ResmanResult<()> {
        self.validate()?;
        check_timeline(
            self.start_date.unwrap_or(current.start_date),
            self.end_date.unwrap_or(current.end_date),
        )
    }
}

/// Filter for project listings.
#[derive(Debug, Clone, Default)]
pub struct ProjectFilter {
    pub statuses: Vec<ProjectStatus>,
    pub project_manager: Option<Uuid>,
}

pub(crate) fn ordered_schedule(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<(), ValidationError> {
    if end <= start {
        return Err(ValidationError::new("timeline")
            .with_message("endDate must be after startDate".into()));
    }
    Ok(())
}

pub(crate) fn check_timeline(start: DateTime<Utc>, end: DateTime<Utc>) -> ResmanResult<()> {
    ordered_schedule(start, end).map_err(|err| {
        ResmanError::validation(err.message.map(|m| m.to_string()).unwrap_or_default())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn create_input(start_in_days: i64, end_in_days: i64) -> CreateProject {
        let now = Utc::now();
        CreateProject {
            name: "Apollo".into(),
            description: "Moon landing tooling".into(),
            start_date: now + Duration::days(start_in_days),
            end_date: now + Duration::days(end_in_days),
            priority: Priority::High,
            budget: 1000.0,
            technologies: vec!["rust".into()],
            project_manager: Uuid::new_v4(),
        }
    }

    #[test]
    fn status_uses_kebab_case() {
        assert_eq!(
            serde_json::to_string(&ProjectStatus::OnHold).unwrap(),
            "\"on-hold\""
        );
        assert_eq!(
            "on-hold".parse::<ProjectStatus>().unwrap(),
            ProjectStatus::OnHold
        );
    }

    #[test]
    fn create_requires_future_start_and_ordered_dates() {
        assert!(create_input(1, 30).validate().is_ok());
        assert!(create_input(-1, 30).validate().is_err());
        assert!(create_input(30, 30).validate().is_err());
        assert!(create_input(30, 10).validate().is_err());
        let err = ResmanError::from(create_input(30, 10).validate().unwrap_err());
        assert_eq!(
            err.to_string(),
            "Validation error: endDate must be after startDate"
        );
    }

    #[test]
    fn create_rejects_short_description() {
        let mut input = create_input(1, 30);
        input.description = "short".into();
        assert!(input.validate().is_err());
        input.description = "Long enough description".into();
        input.budget = -5.0;
        assert!(input.validate().is_err());
    }

    #[test]
    fn create_defaults_priority_budget_and_technologies() {
        let json = serde_json::json!({
            "name": "Apollo",
            "description": "Moon landing tooling",
            "startDate": "2030-01-01T00:00:00Z",
            "endDate": "2030-06-01T00:00:00Z",
            "projectManager": Uuid::nil(),
        });
        let input: CreateProject = serde_json::from_value(json).unwrap();
        assert_eq!(input.priority, Priority::Medium);
        assert_eq!(input.budget, 0.0);
        assert!(input.technologies.is_empty());
    }

    #[test]
    fn update_checks_merged_timeline() {
        let now = Utc::now();
        let project = Project {
            id: Uuid::new_v4(),
            name: "Apollo".into(),
            description: "Moon landing tooling".into(),
            status: ProjectStatus::Planning,
            start_date: now,
            end_date: now + Duration::days(10),
            priority: Priority::Medium,
            budget: 0.0,
            technologies: vec![],
            project_manager: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
        };
        let bad = UpdateProject {
            end_date: Some(now - Duration::days(1)),
            ..Default::default()
        };
        assert!(bad.validate_against(&project).is_err());

        let good = UpdateProject {
            start_date: Some(now + Duration::days(2)),
            ..Default::default()
        };
        assert!(good.validate_against(&project).is_ok());
    }

    #[test]
    fn bodies_accept_plain_dates() {
        let json = serde_json::json!({
            "name": "Apollo",
            "description": "Moon landing tooling",
            "startDate": "2030-01-01",
            "endDate": "2030-06-01",
            "projectManager": Uuid::nil(),
        });
        let input: CreateProject = serde_json::from_value(json).unwrap();
        assert_eq!(input.start_date.to_rfc3339(), "2030-01-01T00:00:00+00:00");
        assert!(input.validate().is_ok());

        let update: UpdateProject =
            serde_json::from_value(serde_json::json!({"endDate": "2030-07-01"})).unwrap();
        assert!(update.start_date.is_none());
        assert!(update.end_date.is_some());
    }
}
