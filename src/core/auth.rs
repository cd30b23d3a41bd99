//! Identity seam for the admin surface.
//!
//! Real identity lives with an external provider; [`LocalIdentityProvider`]
//! is the single-admin stand-in configured from `config.toml`.  Admin
//! operations go through [`AdminGuard::require`].

use std::cell::RefCell;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::error::AuthError;

pub const MIN_PASSWORD_LEN: usize = 6;

/// An authenticated admin session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub email: String,
    pub issued_at: DateTime<Utc>,
}

pub trait IdentityProvider {
    fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError>;
    fn sign_out(&self, session: &Session);
    /// Request a reset mail; returns a user-facing confirmation.
    fn reset_password(&self, email: &str) -> Result<String, AuthError>;
    fn update_password(&self, session: &Session, new_password: &str) -> Result<(), AuthError>;
}

#[derive(Debug, Clone)]
struct Credential {
    email: String,
    password: String,
}

/// One admin account held in memory.
#[derive(Debug, Default)]
pub struct LocalIdentityProvider {
    credential: RefCell<Option<Credential>>,
    active: RefCell<Vec<String>>,
}

impl LocalIdentityProvider {
    /// With `None` (or blank values) every sign-in fails.
    pub fn new(email: Option<&str>, password: Option<&str>) -> Self {
        let credential = match (email, password) {
            (Some(e), Some(p)) if !e.trim().is_empty() && !p.is_empty() => Some(Credential {
                email: e.trim().to_lowercase(),
                password: p.to_string(),
            }),
            _ => None,
        };
        Self {
            credential: RefCell::new(credential),
            active: RefCell::new(Vec::new()),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.credential.borrow().is_some()
    }

    /// Whether `session` was issued here and not signed out.
    pub fn is_active(&self, session: &Session) -> bool {
        self.active.borrow().iter().any(|t| *t == session.token)
    }
}

/// Compare without short-circuiting on the first differing byte.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

impl IdentityProvider for LocalIdentityProvider {
    fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let guard = self.credential.borrow();
        let Some(cred) = guard.as_ref() else {
            return Err(AuthError::NotConfigured);
        };
        let email = email.trim().to_lowercase();
        let email_ok = constant_time_eq(email.as_bytes(), cred.email.as_bytes());
        let password_ok = constant_time_eq(password.as_bytes(), cred.password.as_bytes());
        if !(email_ok && password_ok) {
            tracing::warn!("admin sign-in rejected");
            return Err(AuthError::InvalidCredentials);
        }

        let session = Session {
            token: Uuid::new_v4().simple().to_string(),
            email,
            issued_at: Utc::now(),
        };
        self.active.borrow_mut().push(session.token.clone());
        tracing::info!(email = %session.email, "admin signed in");
        Ok(session)
    }

    fn sign_out(&self, session: &Session) {
        self.active.borrow_mut().retain(|t| *t != session.token);
        tracing::info!(email = %session.email, "admin signed out");
    }

    fn reset_password(&self, _email: &str) -> Result<String, AuthError> {
        Err(AuthError::Unsupported("password reset"))
    }

    fn update_password(&self, session: &Session, new_password: &str) -> Result<(), AuthError> {
        if !self.is_active(session) {
            return Err(AuthError::Unauthenticated);
        }
        if new_password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword(MIN_PASSWORD_LEN));
        }
        if let Some(cred) = self.credential.borrow_mut().as_mut() {
            cred.password = new_password.to_string();
        }
        Ok(())
    }
}

/// Gate for admin-only operations.
pub struct AdminGuard;

impl AdminGuard {
    pub fn require(session: Option<&Session>) -> Result<&Session, AuthError> {
        session.ok_or(AuthError::Unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> LocalIdentityProvider {
        LocalIdentityProvider::new(Some("Admin@Example.com"), Some("correct horse"))
    }

    #[test]
    fn sign_in_with_matching_credentials() {
        let idp = provider();
        let session = idp.sign_in(" admin@example.com ", "correct horse").unwrap();
        assert_eq!(session.email, "admin@example.com");
        assert!(idp.is_active(&session));
    }

    #[test]
    fn wrong_password_is_rejected() {
        let idp = provider();
        assert_eq!(
            idp.sign_in("admin@example.com", "battery staple"),
            Err(AuthError::InvalidCredentials)
        );
    }

    #[test]
    fn unconfigured_provider_rejects_everyone() {
        let idp = LocalIdentityProvider::new(None, None);
        assert!(!idp.is_configured());
        assert_eq!(idp.sign_in("a@b.c", "x"), Err(AuthError::NotConfigured));
        let blank = LocalIdentityProvider::new(Some("  "), Some("pw"));
        assert!(!blank.is_configured());
    }

    #[test]
    fn sign_out_ends_the_session() {
        let idp = provider();
        let session = idp.sign_in("admin@example.com", "correct horse").unwrap();
        idp.sign_out(&session);
        assert!(!idp.is_active(&session));
        assert_eq!(
            idp.update_password(&session, "a much longer one"),
            Err(AuthError::Unauthenticated)
        );
    }

    #[test]
    fn update_password_enforces_length_and_takes_effect() {
        let idp = provider();
        let session = idp.sign_in("admin@example.com", "correct horse").unwrap();
        assert_eq!(
            idp.update_password(&session, "short"),
            Err(AuthError::WeakPassword(MIN_PASSWORD_LEN))
        );
        idp.update_password(&session, "new secret phrase").unwrap();
        assert!(idp.sign_in("admin@example.com", "correct horse").is_err());
        assert!(idp.sign_in("admin@example.com", "new secret phrase").is_ok());
        idp.update_password(&session, "sixsix").unwrap();
        assert!(idp.sign_in("admin@example.com", "sixsix").is_ok());
    }

    #[test]
    fn reset_is_delegated() {
        assert_eq!(
            provider().reset_password("admin@example.com"),
            Err(AuthError::Unsupported("password reset"))
        );
    }

    #[test]
    fn guard_requires_a_session() {
        assert_eq!(AdminGuard::require(None), Err(AuthError::Unauthenticated));
        let idp = provider();
        let session = idp.sign_in("admin@example.com", "correct horse").unwrap();
        assert_eq!(AdminGuard::require(Some(&session)).unwrap(), &session);
    }
}
