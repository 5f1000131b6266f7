use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::keyring_store;
use super::oauth::{self, OAuthConfig, OAuthTokens};
use crate::error::AuthError;
use crate::store::Store;
use crate::sync;

const SESSION_KEY: &str = "session";

/// The signed-in user's profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub uid: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub photo_url: Option<String>,
}

impl AuthUser {
    /// Display name, else email, else the user id.
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.email.as_deref().filter(|s| !s.is_empty()))
            .unwrap_or(&self.uid)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
    pub user: AuthUser,
    pub tokens: OAuthTokens,
}

impl AuthSession {
    pub fn bearer(&self) -> &str {
        &self.tokens.access_token
    }

    /// The session persisted by the last sign-in, if any.
    pub fn load() -> Option<Self> {
        keyring_store::get(SESSION_KEY)
            .ok()
            .flatten()
            .and_then(|json| serde_json::from_str(&json).ok())
    }

    pub fn save(&self) -> Result<(), AuthError> {
        let json = serde_json::to_string(self).map_err(|e| AuthError::Keyring(e.to_string()))?;
        keyring_store::set(SESSION_KEY, &json)
    }

    pub fn clear() -> Result<(), AuthError> {
        keyring_store::delete(SESSION_KEY)
    }
}

/// Notified after every sign-in and sign-out, with the store so it can act
/// on the record.
pub trait AuthListener: Send {
    fn on_auth_changed(&self, session: Option<&AuthSession>, store: &mut Store);
}

/// Who is signed in, and who wants to know.
#[derive(Default)]
pub struct AuthState {
    session: Option<AuthSession>,
    listeners: Vec<Box<dyn AuthListener>>,
}

impl AuthState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: Box<dyn AuthListener>) {
        self.listeners.push(listener);
    }

    pub fn session(&self) -> Option<&AuthSession> {
        self.session.as_ref()
    }

    pub fn user(&self) -> Option<&AuthUser> {
        self.session.as_ref().map(|s| &s.user)
    }

    /// Replaces the current session and notifies every listener in
    /// subscription order.
    pub fn set_session(&mut self, session: Option<AuthSession>, store: &mut Store) {
        match &session {
            Some(s) => info!(uid = %s.user.uid, "signed in"),
            None => info!("signed out"),
        }
        self.session = session;
        for listener in &self.listeners {
            listener.on_auth_changed(self.session.as_ref(), store);
        }
    }

    /// Picks up a session persisted by an earlier run. Expired sessions are
    /// dropped. Returns whether someone is now signed in.
    pub fn restore(&mut self, store: &mut Store) -> bool {
        match AuthSession::load() {
            Some(s) if s.tokens.is_expired() => {
                warn!(uid = %s.user.uid, "stored session expired, sign in again");
                false
            }
            Some(s) => {
                self.set_session(Some(s), store);
                true
            }
            None => false,
        }
    }

    /// Interactive sign-in through the system browser.
    ///
    /// # Errors
    ///
    /// Any failure in the flow; nothing changes when sign-in fails.
    pub fn sign_in(&mut self, config: &OAuthConfig, store: &mut Store) -> Result<AuthUser, AuthError> {
        let rt = sync::runtime()?;
        let session = rt.block_on(async {
            let tokens = oauth::authorize(config).await?;
            let user = oauth::fetch_profile(config, &tokens).await?;
            Ok::<_, AuthError>(AuthSession { user, tokens })
        })?;
        drop(rt);

        session.save()?;
        let user = session.user.clone();
        self.set_session(Some(session), store);
        Ok(user)
    }

    pub fn sign_out(&mut self, store: &mut Store) -> Result<(), AuthError> {
        AuthSession::clear()?;
        self.set_session(None, store);
        Ok(())
    }
}
