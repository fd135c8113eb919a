//! Authentication service: signup, login and bearer-token resolution.

use resman_core::error::{ResmanError, ResmanResult};
use resman_core::models::user::{Availability, CreateUser, DEFAULT_DEPARTMENT, Role, User};
use resman_core::repository::UserRepository;
use serde::Deserialize;
use tracing::{debug, info};
use validator::Validate;

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::password;
use crate::token;

/// Signup request. Profile fields other than name, email and password
/// are optional.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupInput {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience: u32,
    #[serde(default)]
    pub hourly_rate: f64,
    #[serde(default)]
    pub availability: Availability,
    pub department: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug)]
pub struct LoginOutput {
    /// Signed HS256 access token.
    pub token: String,
    pub user: User,
    /// Token lifetime in seconds.
    pub expires_in: u64,
}

/// Authentication service.
///
/// Generic over the user repository so that the auth layer has no
/// dependency on the database crate.
pub struct AuthService<U: UserRepository> {
    user_repo: U,
    config: AuthConfig,
}

impl<U: UserRepository> AuthService<U> {
    pub fn new(user_repo: U, config: AuthConfig) -> Self {
        Self { user_repo, config }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Creates an identity with a hashed credential. A taken email is
    /// reported as `Conflict` by the repository.
    pub async fn signup(&self, input: SignupInput) -> ResmanResult<User> {
        if input.password.chars().count() < self.config.min_password_length {
            return Err(AuthError::WeakPassword(self.config.min_password_length).into());
        }

        let mut create = CreateUser {
            name: input.name.trim().to_string(),
            email: input.email.trim().to_lowercase(),
            password_hash: String::new(),
            role: input.role,
            skills: input.skills,
            experience: input.experience,
            hourly_rate: input.hourly_rate,
            availability: input.availability,
            department: input
                .department
                .unwrap_or_else(|| DEFAULT_DEPARTMENT.to_string()),
            phone: input.phone,
            location: input.location,
            bio: input.bio,
        };
        create.validate()?;
        create.password_hash =
            password::hash_password(&input.password, self.config.pepper.as_deref())?;

        let user = self.user_repo.create(create).await?;
        info!(user_id = %user.id, role = %user.role, "Identity created");
        Ok(user)
    }

    /// Verifies credentials and issues an access token. Unknown emails and
    /// wrong passwords are indistinguishable to the caller.
    pub async fn login(&self, input: LoginInput) -> ResmanResult<LoginOutput> {
        let user = match self
            .user_repo
            .get_by_email(&input.email.trim().to_lowercase())
            .await
        {
            Ok(user) => user,
            Err(ResmanError::NotFound { .. }) => {
                debug!("Login attempt for unknown email");
                return Err(AuthError::InvalidCredentials.into());
            }
            Err(e) => return Err(e),
        };

        let valid = password::verify_password(
            &input.password,
            &user.password_hash,
            self.config.pepper.as_deref(),
        )?;
        if !valid {
            debug!(user_id = %user.id, "Login attempt with wrong password");
            return Err(AuthError::InvalidCredentials.into());
        }

        let token = token::issue_access_token(user.id, &user.email, &self.config)?;
        info!(user_id = %user.id, "Login succeeded");

        Ok(LoginOutput {
            token,
            user,
            expires_in: self.config.token_lifetime_secs,
        })
    }

    /// Resolves a bearer token to its identity. Tokens whose identity has
    /// since been deleted are rejected.
    pub async fn authenticate(&self, bearer: &str) -> ResmanResult<User> {
        let claims = token::decode_access_token(bearer, &self.config)?;
        let user_id = claims.user_id()?;

        match self.user_repo.get_by_id(user_id).await {
            Ok(user) => Ok(user),
            Err(ResmanError::NotFound { .. }) => {
                Err(ResmanError::unauthorized("Token subject no longer exists"))
            }
            Err(e) => Err(e),
        }
    }
}
