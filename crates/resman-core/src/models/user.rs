//! Identity domain model.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    ProjectManager,
    TeamLead,
    Engineer,
    #[default]
    User,
}

string_enum!(Role {
    Admin => "admin",
    ProjectManager => "project_manager",
    TeamLead => "team_lead",
    Engineer => "engineer",
    User => "user",
});

impl Role {
    /// Roles whose holders can be assigned to projects.
    pub const ASSIGNABLE: &'static [Role] = &[Role::Engineer, Role::TeamLead];

    /// Roles whose holders can own a project.
    pub const MANAGERS: &'static [Role] = &[Role::Admin, Role::ProjectManager];

    pub fn is_assignable(&self) -> bool {
        Self::ASSIGNABLE.contains(self)
    }

    pub fn can_own_projects(&self) -> bool {
        Self::MANAGERS.contains(self)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    #[default]
    Available,
    PartiallyAvailable,
    Unavailable,
}

string_enum!(Availability {
    Available => "available",
    PartiallyAvailable => "partially_available",
    Unavailable => "unavailable",
});

pub const DEFAULT_DEPARTMENT: &str = "Engineering";

/// A person known to the system. Engineer-specific attributes are present
/// on every identity and simply unused for non-engineers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// Argon2id PHC string. Never serialized.
    #[serde(skip)]
    pub password_hash: String,
    pub role: Role,
    pub skills: Vec<String>,
    pub experience: u32,
    pub hourly_rate: f64,
    pub availability: Availability,
    pub department: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Compact identity view embedded in other responses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub skills: Vec<String>,
    pub availability: Availability,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            skills: user.skills.clone(),
            availability: user.availability,
        }
    }
}

/// Optional leading `+`, then up to 16 digits without a leading zero.
static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[1-9][0-9]{0,15}$").expect("phone pattern compiles"));

/// Fields required to store a new identity. The password has already been
/// hashed by the auth layer, which also trims the name and lowercases the
/// email.
#[derive(Debug, Clone, Validate)]
pub struct CreateUser {
    #[validate(length(
        min = 3,
        max = 100,
        message = "name must be between 3 and 100 characters"
    ))]
    pub name: String,
    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub skills: Vec<String>,
    pub experience: u32,
    #[validate(range(min = 0.0, message = "hourlyRate must be a non-negative number"))]
    pub hourly_rate: f64,
    pub availability: Availability,
    pub department: String,
    #[validate(regex(path = *PHONE, message = "phone must be a valid phone number"))]
    pub phone: Option<String>,
    pub location: Option<String>,
    #[validate(length(max = 500, message = "bio must be at most 500 characters"))]
    pub bio: Option<String>,
}

/// Profile update. The credential hash cannot be changed here.
#[derive(Debug, Clone, Serialize, Deserialize, Default, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateUser {
    #[validate(length(
        min = 3,
        max = 100,
        message = "name must be between 3 and 100 characters"
    ))]
    pub name: Option<String>,
    pub role: Option<Role>,
    pub skills: Option<Vec<String>>,
    pub experience: Option<u32>,
    #[validate(range(min = 0.0, message = "hourlyRate must be a non-negative number"))]
    pub hourly_rate: Option<f64>,
    pub availability: Option<Availability>,
    pub department: Option<String>,
    #[validate(regex(path = *PHONE, message = "phone must be a valid phone number"))]
    pub phone: Option<String>,
    pub location: Option<String>,
    #[validate(length(max = 500, message = "bio must be at most 500 characters"))]
    pub bio: Option<String>,
}

/// Filter for identity listings. Empty fields match everything.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub roles: Vec<Role>,
    pub department: Option<String>,
    pub availability: Option<Availability>,
    /// Exclude identities with this availability.
    pub exclude_availability: Option<Availability>,
    /// Match identities holding at least one of these skills.
    pub skills_any: Vec<String>,
}

impl UserFilter {
    pub fn with_roles(roles: &[Role]) -> Self {
        Self {
            roles: roles.to_vec(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResmanError;

    #[test]
    fn role_round_trips_through_wire_string() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), *role);
        }
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn role_serializes_snake_case() {
        let json = serde_json::to_string(&Role::ProjectManager).unwrap();
        assert_eq!(json, "\"project_manager\"");
    }

    #[test]
    fn password_hash_is_not_serialized() {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password_hash: "$argon2id$secret".into(),
            role: Role::Engineer,
            skills: vec!["rust".into()],
            experience: 3,
            hourly_rate: 80.0,
            availability: Availability::Available,
            department: DEFAULT_DEPARTMENT.into(),
            phone: None,
            location: None,
            bio: None,
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["hourlyRate"], 80.0);
    }

    fn create_input() -> CreateUser {
        CreateUser {
            name: "Ada Lovelace".into(),
            email: "ada@example.com".into(),
            password_hash: "$argon2id$stub".into(),
            role: Role::Engineer,
            skills: vec![],
            experience: 0,
            hourly_rate: 0.0,
            availability: Availability::Available,
            department: DEFAULT_DEPARTMENT.into(),
            phone: None,
            location: None,
            bio: None,
        }
    }

    #[test]
    fn phone_validation() {
        for (phone, ok) in [
            ("+4915112345678", true),
            ("5551234", true),
            ("0123", false),
            ("+", false),
            ("555-1234", false),
            ("12345678901234567", false),
        ] {
            let input = CreateUser {
                phone: Some(phone.into()),
                ..create_input()
            };
            assert_eq!(input.validate().is_ok(), ok, "{phone}");
        }
    }

    #[test]
    fn email_validation() {
        assert!(create_input().validate().is_ok());
        for email in ["no-at-sign", "a b@c.io", "@example.com"] {
            let input = CreateUser {
                email: email.into(),
                ..create_input()
            };
            assert!(input.validate().is_err(), "{email}");
        }
    }

    #[test]
    fn create_checks_name_rate_and_bio() {
        let short = CreateUser {
            name: "Al".into(),
            ..create_input()
        };
        let err = ResmanError::from(short.validate().unwrap_err());
        assert_eq!(
            err.to_string(),
            "Validation error: name must be between 3 and 100 characters"
        );

        let negative = CreateUser {
            hourly_rate: -1.0,
            ..create_input()
        };
        assert!(negative.validate().is_err());

        let long_bio = CreateUser {
            bio: Some("x".repeat(501)),
            ..create_input()
        };
        assert!(long_bio.validate().is_err());
    }

    #[test]
    fn update_validates_only_present_fields() {
        assert!(UpdateUser::default().validate().is_ok());
        let update = UpdateUser {
            phone: Some("not a phone".into()),
            ..UpdateUser::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn update_rejects_unknown_fields() {
        let result: Result<UpdateUser, _> =
            serde_json::from_str(r#"{"password": "hunter2"}"#);
        assert!(result.is_err());
    }
}
