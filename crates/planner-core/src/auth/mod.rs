//! Sign-in and the signed-in session.
//!
//! Sign-in runs an OAuth2 authorization-code flow in the system browser and
//! looks up the user's profile. The session (profile plus tokens) lives in
//! the OS keyring so it survives restarts. Interested parties subscribe to
//! [`AuthState`] and hear about every sign-in and sign-out.

mod oauth;
mod session;

pub use oauth::{OAuthConfig, OAuthTokens};
pub use session::{AuthListener, AuthSession, AuthState, AuthUser};

/// Thin wrapper around the OS keyring for credential storage.
pub mod keyring_store {
    use crate::error::AuthError;

    const SERVICE: &str = "student-planner";

    pub fn get(key: &str) -> Result<Option<String>, AuthError> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        match entry.get_password() {
            Ok(pw) => Ok(Some(pw)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn set(key: &str, value: &str) -> Result<(), AuthError> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        entry.set_password(value)?;
        Ok(())
    }

    pub fn delete(key: &str) -> Result<(), AuthError> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        match entry.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
