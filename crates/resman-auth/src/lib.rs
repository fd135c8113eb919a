//! Resource manager auth: Argon2id password hashing, HS256 access tokens
//! and the signup/login/authenticate flows.

pub mod config;
pub mod error;
pub mod password;
pub mod service;
pub mod token;

pub use config::AuthConfig;
pub use error::AuthError;
pub use service::{AuthService, LoginInput, LoginOutput, SignupInput};
pub use token::AccessTokenClaims;
