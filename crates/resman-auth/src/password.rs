//! Password hashing and verification using Argon2id.
//!
//! Hashing uses OWASP-recommended parameters (memory: 19 MiB,
//! iterations: 2, parallelism: 1) with a random salt per hash. An optional
//! pepper is prepended to the password on both paths.

use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHasher, PasswordVerifier};

use crate::error::AuthError;

fn hasher() -> Result<Argon2<'static>, AuthError> {
    let params = argon2::Params::new(19456, 2, 1, None)
        .map_err(|e| AuthError::Crypto(format!("argon2 params: {e}")))?;
    Ok(Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        params,
    ))
}

fn peppered(password: &str, pepper: Option<&str>) -> Vec<u8> {
    match pepper {
        Some(p) => format!("{p}{password}").into_bytes(),
        None => password.as_bytes().to_vec(),
    }
}

/// Hash a password into a PHC-format Argon2id string.
pub fn hash_password(password: &str, pepper: Option<&str>) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = hasher()?
        .hash_password(&peppered(password, pepper), &salt)
        .map_err(|e| AuthError::Crypto(format!("password hash: {e}")))?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a PHC-format hash.
///
/// Returns `Ok(false)` on mismatch and `Err(AuthError::Crypto)` when the
/// stored hash is malformed.
pub fn verify_password(
    password: &str,
    hash: &str,
    pepper: Option<&str>,
) -> Result<bool, AuthError> {
    let parsed = argon2::PasswordHash::new(hash)
        .map_err(|e| AuthError::Crypto(format!("invalid hash format: {e}")))?;

    match Argon2::default().verify_password(&peppered(password, pepper), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AuthError::Crypto(format!("verify error: {e}"))),
    }
}
