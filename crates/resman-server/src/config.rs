//! Server configuration loaded from `RESMAN_*` environment variables.

use std::env;
use std::net::SocketAddr;

use resman_auth::AuthConfig;
use resman_db::DbConfig;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub db: DbConfig,
    pub auth: AuthConfig,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source. Unset
    /// variables fall back to defaults, except the JWT secret.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let bind_addr = match var("RESMAN_BIND_ADDR") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                name: "RESMAN_BIND_ADDR",
                value,
            })?,
            None => SocketAddr::from(([0, 0, 0, 0], 8080)),
        };

        let db_defaults = DbConfig::default();
        let db = DbConfig {
            url: var("RESMAN_DB_URL").unwrap_or(db_defaults.url),
            namespace: var("RESMAN_DB_NAMESPACE").unwrap_or(db_defaults.namespace),
            database: var("RESMAN_DB_DATABASE").unwrap_or(db_defaults.database),
            username: var("RESMAN_DB_USER").or(db_defaults.username),
            password: var("RESMAN_DB_PASSWORD").or(db_defaults.password),
        };

        let auth_defaults = AuthConfig::default();
        let token_lifetime_secs = match var("RESMAN_TOKEN_LIFETIME_SECS") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                name: "RESMAN_TOKEN_LIFETIME_SECS",
                value,
            })?,
            None => auth_defaults.token_lifetime_secs,
        };
        let auth = AuthConfig {
            jwt_secret: var("RESMAN_JWT_SECRET").ok_or(ConfigError::Missing("RESMAN_JWT_SECRET"))?,
            token_lifetime_secs,
            jwt_issuer: var("RESMAN_JWT_ISSUER").unwrap_or(auth_defaults.jwt_issuer),
            pepper: var("RESMAN_PASSWORD_PEPPER"),
            min_password_length: auth_defaults.min_password_length,
        };

        Ok(Self {
            bind_addr,
            db,
            auth,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn from_pairs(pairs: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn jwt_secret_is_required() {
        let err = from_pairs(&[]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("RESMAN_JWT_SECRET")));

        let err = from_pairs(&[("RESMAN_JWT_SECRET", "  ")]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(_)));
    }

    #[test]
    fn defaults_apply() {
        let config = from_pairs(&[("RESMAN_JWT_SECRET", "s")]).unwrap();
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.db.url, "ws://127.0.0.1:8000");
        assert_eq!(config.auth.token_lifetime_secs, 86_400);
        assert!(config.auth.pepper.is_none());
    }

    #[test]
    fn overrides_are_read() {
        let config = from_pairs(&[
            ("RESMAN_JWT_SECRET", "s"),
            ("RESMAN_BIND_ADDR", "127.0.0.1:9000"),
            ("RESMAN_DB_URL", "mem://"),
            ("RESMAN_TOKEN_LIFETIME_SECS", "3600"),
            ("RESMAN_PASSWORD_PEPPER", "pep"),
        ])
        .unwrap();
        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.db.url, "mem://");
        assert_eq!(config.auth.token_lifetime_secs, 3600);
        assert_eq!(config.auth.pepper.as_deref(), Some("pep"));
    }

    #[test]
    fn malformed_values_are_rejected() {
        let err = from_pairs(&[
            ("RESMAN_JWT_SECRET", "s"),
            ("RESMAN_TOKEN_LIFETIME_SECS", "a day"),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                name: "RESMAN_TOKEN_LIFETIME_SECS",
                ..
            }
        ));
    }
}
