//! SurrealDB implementation of [`UserRepository`].

use chrono::{DateTime, Utc};
use resman_core::error::ResmanResult;
use resman_core::models::user::{CreateUser, UpdateUser, User, UserFilter};
use resman_core::repository::UserRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::{parse_enum, single, where_clause};
use crate::error::DbError;

/// Row for statements addressing a known record id.
#[derive(Debug, SurrealValue)]
struct UserRow {
    name: String,
    email: String,
    password_hash: String,
    role: String,
    skills: Vec<String>,
    experience: u32,
    hourly_rate: f64,
    availability: String,
    department: String,
    phone: Option<String>,
    location: Option<String>,
    bio: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Row carrying the record id via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct UserRowWithId {
    record_id: String,
    name: String,
    email: String,
    password_hash: String,
    role: String,
    skills: Vec<String>,
    experience: u32,
    hourly_rate: f64,
    availability: String,
    department: String,
    phone: Option<String>,
    location: Option<String>,
    bio: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self, id: Uuid) -> Result<User, DbError> {
        Ok(User {
            id,
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
            role: parse_enum("role", &self.role)?,
            skills: self.skills,
            experience: self.experience,
            hourly_rate: self.hourly_rate,
            availability: parse_enum("availability", &self.availability)?,
            department: self.department,
            phone: self.phone,
            location: self.location,
            bio: self.bio,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl UserRowWithId {
    fn try_into_user(self) -> Result<User, DbError> {
        let id = super::parse_uuid("user id", &self.record_id)?;
        UserRow {
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
            role: self.role,
            skills: self.skills,
            experience: self.experience,
            hourly_rate: self.hourly_rate,
            availability: self.availability,
            department: self.department,
            phone: self.phone,
            location: self.location,
            bio: self.bio,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
        .into_user(id)
    }
}

const DUPLICATE_EMAIL: &str = "User with this email already exists";

/// SurrealDB implementation of the user repository.
#[derive(Clone)]
pub struct SurrealUserRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealUserRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> UserRepository for SurrealUserRepository<C> {
    async fn create(&self, input: CreateUser) -> ResmanResult<User> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('user', $id) SET \
                 name = $name, email = $email, \
                 password_hash = $password_hash, role = $role, \
                 skills = $skills, experience = $experience, \
                 hourly_rate = $hourly_rate, availability = $availability, \
                 department = $department, phone = $phone, \
                 location = $location, bio = $bio",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", input.name))
            .bind(("email", input.email.to_lowercase()))
            .bind(("password_hash", input.password_hash))
            .bind(("role", input.role.as_str()))
            .bind(("skills", input.skills))
            .bind(("experience", input.experience))
            .bind(("hourly_rate", input.hourly_rate))
            .bind(("availability", input.availability.as_str()))
            .bind(("department", input.department))
            .bind(("phone", input.phone))
            .bind(("location", input.location))
            .bind(("bio", input.bio))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::from_statement(e, DUPLICATE_EMAIL))?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        Ok(single(rows, "user", id_str)?.into_user(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> ResmanResult<User> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('user', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        Ok(single(rows, "user", id_str)?.into_user(id)?)
    }

    async fn get_by_email(&self, email: &str) -> ResmanResult<User> {
        let mut result = self
            .db
            .query("SELECT meta::id(id) AS record_id, * FROM user WHERE email = $email")
            .bind(("email", email.to_lowercase()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(single(rows, "user", format!("email={email}"))?.try_into_user()?)
    }

    async fn update(&self, id: Uuid, input: UpdateUser) -> ResmanResult<User> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.role.is_some() {
            sets.push("role = $role");
        }
        if input.skills.is_some() {
            sets.push("skills = $skills");
        }
        if input.experience.is_some() {
            sets.push("experience = $experience");
        }
        if input.hourly_rate.is_some() {
            sets.push("hourly_rate = $hourly_rate");
        }
        if input.availability.is_some() {
            sets.push("availability = $availability");
        }
        if input.department.is_some() {
            sets.push("department = $department");
        }
        if input.phone.is_some() {
            sets.push("phone = $phone");
        }
        if input.location.is_some() {
            sets.push("location = $location");
        }
        if input.bio.is_some() {
            sets.push("bio = $bio");
        }
        sets.push("updated_at = time::now()");

        let query = format!("UPDATE type::record('user', $id) SET {}", sets.join(", "));

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));
        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(role) = input.role {
            builder = builder.bind(("role", role.as_str()));
        }
        if let Some(skills) = input.skills {
            builder = builder.bind(("skills", skills));
        }
        if let Some(experience) = input.experience {
            builder = builder.bind(("experience", experience));
        }
        if let Some(hourly_rate) = input.hourly_rate {
            builder = builder.bind(("hourly_rate", hourly_rate));
        }
        if let Some(availability) = input.availability {
            builder = builder.bind(("availability", availability.as_str()));
        }
        if let Some(department) = input.department {
            builder = builder.bind(("department", department));
        }
        if let Some(phone) = input.phone {
            builder = builder.bind(("phone", phone));
        }
        if let Some(location) = input.location {
            builder = builder.bind(("location", location));
        }
        if let Some(bio) = input.bio {
            builder = builder.bind(("bio", bio));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::from_statement(e, DUPLICATE_EMAIL))?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        Ok(single(rows, "user", id_str)?.into_user(id)?)
    }

    async fn delete(&self, id: Uuid) -> ResmanResult<()> {
        self.db
            .query(
                "BEGIN TRANSACTION; \
                 DELETE assignment WHERE engineer_id = $id; \
                 DELETE type::record('user', $id); \
                 COMMIT TRANSACTION;",
            )
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        Ok(())
    }

    async fn list(&self, filter: UserFilter) -> ResmanResult<Vec<User>> {
        let mut conditions = Vec::new();
        if !filter.roles.is_empty() {
            conditions.push("role IN $roles");
        }
        if filter.department.is_some() {
            conditions.push("department = $department");
        }
        if filter.availability.is_some() {
            conditions.push("availability = $availability");
        }
        if filter.exclude_availability.is_some() {
            conditions.push("availability != $excluded_availability");
        }
        if !filter.skills_any.is_empty() {
            conditions.push("skills CONTAINSANY $skills");
        }

        let query = format!(
            "SELECT meta::id(id) AS record_id, * FROM user{} ORDER BY created_at ASC",
            where_clause(&conditions)
        );

        let roles: Vec<String> = filter.roles.iter().map(|r| r.as_str().to_string()).collect();
        let mut builder = self.db.query(&query).bind(("roles", roles));
        if let Some(department) = filter.department {
            builder = builder.bind(("department", department));
        }
        if let Some(availability) = filter.availability {
            builder = builder.bind(("availability", availability.as_str()));
        }
        if let Some(excluded) = filter.exclude_availability {
            builder = builder.bind(("excluded_availability", excluded.as_str()));
        }
        builder = builder.bind(("skills", filter.skills_any));

        let mut result = builder.await.map_err(DbError::from)?;
        let rows: Vec<UserRowWithId> = result.take(0).map_err(DbError::from)?;
        let users = rows
            .into_iter()
            .map(UserRowWithId::try_into_user)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }
}
