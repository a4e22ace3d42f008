use crate::{ConfigError, Environment, FromEnv};
use std::env;

/// Fallback signing secret. Only acceptable for local development.
pub const INSECURE_DEFAULT_SECRET: &str = "my secret";

/// Cookie session configuration
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// Source material for the cookie signing key
    pub secret: String,
    /// Set the `Secure` attribute on session cookies
    pub secure_cookies: bool,
}

impl SessionConfig {
    pub fn new(secret: impl Into<String>, secure_cookies: bool) -> Self {
        Self {
            secret: secret.into(),
            secure_cookies,
        }
    }

    pub fn uses_default_secret(&self) -> bool {
        self.secret == INSECURE_DEFAULT_SECRET
    }
}

impl FromEnv for SessionConfig {
    /// Reads `SESSION_SECRET`, falling back to an insecure constant.
    /// Cookies are marked `Secure` when `APP_ENV=production`.
    fn from_env() -> Result<Self, ConfigError> {
        let secret = match env::var("SESSION_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ => {
                tracing::warn!("SESSION_SECRET is not set, falling back to an insecure default");
                INSECURE_DEFAULT_SECRET.to_string()
            }
        };

        Ok(Self {
            secret,
            secure_cookies: Environment::from_env().use_https(),
        })
    }
}
