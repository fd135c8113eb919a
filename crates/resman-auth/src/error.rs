//! Authentication error types.

use resman_core::error::ResmanError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("token has expired")]
    TokenExpired,

    #[error("invalid token: {0}")]
    TokenInvalid(String),

    #[error("password must be at least {0} characters")]
    WeakPassword(usize),

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<AuthError> for ResmanError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials
            | AuthError::TokenExpired
            | AuthError::TokenInvalid(_) => ResmanError::Unauthorized {
                reason: err.to_string(),
            },
            AuthError::WeakPassword(_) => ResmanError::Validation {
                message: err.to_string(),
            },
            AuthError::Crypto(msg) => ResmanError::Internal(msg),
        }
    }
}
