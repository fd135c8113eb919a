//! Assignment domain model: the authoritative link between one engineer
//! and one project.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::dates;
use super::project::{Project, ProjectSummary, check_timeline, ordered_schedule};
use super::user::UserSummary;
use crate::error::{ResmanError, ResmanResult};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentRole {
    Lead,
    #[default]
    Developer,
    Tester,
    Analyst,
}

string_enum!(AssignmentRole {
    Lead => "lead",
    Developer => "developer",
    Tester => "tester",
    Analyst => "analyst",
});

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum AssignmentStatus {
    #[default]
    Active,
    Completed,
    OnHold,
    Cancelled,
}

string_enum!(AssignmentStatus {
    Active => "active",
    Completed => "completed",
    OnHold => "on-hold",
    Cancelled => "cancelled",
});

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: Uuid,
    pub engineer_id: Uuid,
    pub project_id: Uuid,
    pub role: AssignmentRole,
    /// Share of the engineer's time, 0 to 100.
    pub allocation_percentage: f64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: AssignmentStatus,
    pub hours_allocated: f64,
    pub hours_worked: f64,
    pub hourly_rate: f64,
    pub notes: Option<String>,
    pub assigned_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Assignment {
    pub fn is_active(&self) -> bool {
        self.status == AssignmentStatus::Active
    }
}

/// An assignment with its engineer and project resolved for display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentDetail {
    #[serde(flatten)]
    pub assignment: Assignment,
    pub engineer: Option<UserSummary>,
    pub project: Option<ProjectSummary>,
}

fn default_allocation() -> f64 {
    100.0
}

/// Request body for creating an assignment.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "assignment_schedule"))]
pub struct NewAssignment {
    pub engineer_id: Uuid,
    pub project_id: Uuid,
    #[serde(default)]
    pub role: AssignmentRole,
    #[serde(default = "default_allocation")]
    #[validate(range(
        min = 0.0,
        max = 100.0,
        message = "allocationPercentage must be between 0 and 100"
    ))]
    pub allocation_percentage: f64,
    #[serde(deserialize_with = "dates::deserialize")]
    pub start_date: DateTime<Utc>,
    #[serde(deserialize_with = "dates::deserialize")]
    pub end_date: DateTime<Utc>,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "hoursAllocated must be a non-negative number"))]
    pub hours_allocated: f64,
    /// Falls back to the engineer's hourly rate when absent.
    #[serde(default)]
    #[validate(range(min = 0.0, message = "hourlyRate must be a non-negative number"))]
    pub hourly_rate: Option<f64>,
    #[serde(default)]
    #[validate(length(max = 500, message = "notes must be at most 500 characters"))]
    pub notes: Option<String>,
}

fn assignment_schedule(input: &NewAssignment) -> Result<(), ValidationError> {
    ordered_schedule(input.start_date, input.end_date)
}

/// Request body for putting an engineer on a project. Dates default to the
/// project's own timeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignEngineer {
    pub engineer_id: Uuid,
    #[serde(default)]
    pub role: AssignmentRole,
    #[serde(default = "default_allocation")]
    pub allocation_percentage: f64,
    #[serde(default, deserialize_with = "dates::deserialize_opt")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "dates::deserialize_opt")]
    pub end_date: Option<DateTime<Utc>>,
}

impl AssignEngineer {
    pub fn into_new_assignment(self, project: &Project) -> NewAssignment {
        NewAssignment {
            engineer_id: self.engineer_id,
            project_id: project.id,
            role: self.role,
            allocation_percentage: self.allocation_percentage,
            start_date: self.start_date.unwrap_or(project.start_date),
            end_date: self.end_date.unwrap_or(project.end_date),
            hours_allocated: 0.0,
            hourly_rate: None,
            notes: None,
        }
    }
}

/// Fields required to store a new assignment.
#[derive(Debug, Clone)]
pub struct CreateAssignment {
    pub engineer_id: Uuid,
    pub project_id: Uuid,
    pub role: AssignmentRole,
    pub allocation_percentage: f64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: AssignmentStatus,
    pub hours_allocated: f64,
    pub hourly_rate: f64,
    pub notes: Option<String>,
    pub assigned_by: Uuid,
}

/// Partial update of an assignment. The edit form sends the whole record
/// back, so `engineerId` and `projectId` are accepted but must match the
/// stored pair.
#[derive(Debug, Clone, Serialize, Deserialize, Default, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateAssignment {
    pub engineer_id: Option<Uuid>,
    pub project_id: Option<Uuid>,
    pub role: Option<AssignmentRole>,
    #[validate(range(
        min = 0.0,
        max = 100.0,
        message = "allocationPercentage must be between 0 and 100"
    ))]
    pub allocation_percentage: Option<f64>,
    #[serde(default, deserialize_with = "dates::deserialize_opt")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "dates::deserialize_opt")]
    pub end_date: Option<DateTime<Utc>>,
    pub status: Option<AssignmentStatus>,
    #[validate(range(min = 0.0, message = "hoursAllocated must be a non-negative number"))]
    pub hours_allocated: Option<f64>,
    #[validate(range(min = 0.0, message = "hoursWorked must be a non-negative number"))]
    pub hours_worked: Option<f64>,
    #[validate(range(min = 0.0, message = "hourlyRate must be a non-negative number"))]
    pub hourly_rate: Option<f64>,
    #[validate(length(max = 500, message = "notes must be at most 500 characters"))]
    pub notes: Option<String>,
}

impl UpdateAssignment {
    /// Validates the update against the stored record: the engineer and
    /// project cannot move, and the merged date range must keep
    /// `end > start`.
    pub fn validate_against(&self, current: &Assignment) -> ResmanResult<()> {
        self.validate()?;
        if self.engineer_id.is_some_and(|id| id != current.engineer_id) {
            return Err(ResmanError::validation("engineerId cannot be changed"));
        }
        if self.project_id.is_some_and(|id| id != current.project_id) {
            return Err(ResmanError::validation("projectId cannot be changed"));
        }
        check_timeline(
            self.start_date.unwrap_or(current.start_date),
            self.end_date.unwrap_or(current.end_date),
        )
    }
}

/// Request body for logging hours.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LogHours {
    #[validate(range(min = 0.0, message = "hoursWorked must be a non-negative number"))]
    pub hours_worked: f64,
}

/// Filter for assignment listings. Date ranges are not part of the filter;
/// they are applied by [`crate::capacity::overlap_filter`].
#[derive(Debug, Clone, Default)]
pub struct AssignmentFilter {
    pub engineer_id: Option<Uuid>,
    pub project_id: Option<Uuid>,
    pub status: Option<AssignmentStatus>,
}

impl AssignmentFilter {
    pub fn engineer(engineer_id: Uuid) -> Self {
        Self {
            engineer_id: Some(engineer_id),
            ..Self::default()
        }
    }

    pub fn project(project_id: Uuid) -> Self {
        Self {
            project_id: Some(project_id),
            ..Self::default()
        }
    }

    pub fn active(mut self) -> Self {
        self.status = Some(AssignmentStatus::Active);
        self
    }
}
