use std::sync::{Arc, Mutex};

use tracing::{error, info, warn};

use super::RemoteStore;
use crate::auth::{AuthListener, AuthSession};
use crate::error::Result;
use crate::store::{SaveHook, Store, StoreData};

/// Keeps the cloud document in step with the local store.
///
/// Registered twice: as a [`SaveHook`] on the store (push after every save)
/// and as an [`AuthListener`] (pull and merge on sign-in). Clones share the
/// signed-in session.
#[derive(Clone)]
pub struct CloudBridge {
    remote: Arc<dyn RemoteStore>,
    session: Arc<Mutex<Option<AuthSession>>>,
}

impl CloudBridge {
    pub fn new(remote: Arc<dyn RemoteStore>) -> Self {
        Self {
            remote,
            session: Arc::new(Mutex::new(None)),
        }
    }

    fn current(&self) -> Option<AuthSession> {
        match self.session.lock() {
            Ok(guard) => guard.clone(),
            Err(_) => None,
        }
    }

    pub fn signed_in_uid(&self) -> Option<String> {
        self.current().map(|s| s.user.uid)
    }

    /// Fetches the user's document and merges it over the local record.
    /// Returns whether anything was merged; signed out or no document is
    /// `false`.
    pub fn pull(&self, store: &mut Store) -> Result<bool> {
        let Some(session) = self.current() else {
            return Ok(false);
        };
        match self.remote.fetch(&session.user.uid, session.bearer())? {
            Some(doc) => {
                store.merge_remote(&doc)?;
                info!(uid = %session.user.uid, "merged cloud document");
                Ok(true)
            }
            None => {
                info!(uid = %session.user.uid, "no cloud document yet");
                Ok(false)
            }
        }
    }

    /// Replaces the user's document with `data`. No-op while signed out.
    pub fn push(&self, data: &StoreData) -> Result<bool> {
        let Some(session) = self.current() else {
            return Ok(false);
        };
        let doc = data.to_value()?;
        self.remote.push(&session.user.uid, session.bearer(), &doc)?;
        Ok(true)
    }
}

impl SaveHook for CloudBridge {
    fn name(&self) -> &str {
        "cloud"
    }

    fn after_save(&self, data: &StoreData) {
        if let Err(e) = self.push(data) {
            error!(error = %e, "cloud save failed");
        }
    }
}

impl AuthListener for CloudBridge {
    fn on_auth_changed(&self, session: Option<&AuthSession>, store: &mut Store) {
        match self.session.lock() {
            Ok(mut guard) => *guard = session.cloned(),
            Err(_) => {
                warn!("cloud session lock poisoned");
                return;
            }
        }
        if session.is_some() {
            if let Err(e) = self.pull(store) {
                error!(error = %e, "cloud load failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthUser, OAuthTokens};
    use crate::calendar::FixedClock;
    use crate::error::SyncError;
    use crate::storage::MemoryMedium;
    use serde_json::{json, Value};
    use std::collections::HashMap;

    #[derive(Default)]
    struct InMemoryRemote {
        docs: Mutex<HashMap<String, Value>>,
        pushes: Mutex<usize>,
    }

    impl RemoteStore for InMemoryRemote {
        fn fetch(&self, uid: &str, _token: &str) -> std::result::Result<Option<Value>, SyncError> {
            Ok(self.docs.lock().unwrap().get(uid).cloned())
        }

        fn push(&self, uid: &str, _token: &str, doc: &Value) -> std::result::Result<(), SyncError> {
            *self.pushes.lock().unwrap() += 1;
            self.docs.lock().unwrap().insert(uid.to_string(), doc.clone());
            Ok(())
        }
    }

    fn session(uid: &str) -> AuthSession {
        AuthSession {
            user: AuthUser {
                uid: uid.into(),
                ..AuthUser::default()
            },
            tokens: OAuthTokens {
                access_token: "tok".into(),
                refresh_token: None,
                expires_at: None,
                token_type: "Bearer".into(),
                scope: None,
            },
        }
    }

    fn store_with(bridge: &CloudBridge) -> Store {
        let mut store = Store::new(
            Box::new(MemoryMedium::new()),
            Arc::new(FixedClock::at(2024, 3, 4, 9, 0)),
        );
        store.register_hook(Box::new(bridge.clone()));
        store
    }

    #[test]
    fn signed_out_saves_push_nothing() {
        let remote = Arc::new(InMemoryRemote::default());
        let bridge = CloudBridge::new(remote.clone());
        let mut store = store_with(&bridge);
        store.add_task("Read");
        assert_eq!(*remote.pushes.lock().unwrap(), 0);
    }

    #[test]
    fn sign_in_merges_remote_and_pushes_result() {
        let remote = Arc::new(InMemoryRemote::default());
        remote
            .docs
            .lock()
            .unwrap()
            .insert("u1".into(), json!({"darkMode": true, "tasks": [{"id": 9, "title": "Remote", "completed": false}]}));
        let bridge = CloudBridge::new(remote.clone());
        let mut store = store_with(&bridge);
        store.add_note("local only");

        bridge.on_auth_changed(Some(&session("u1")), &mut store);

        assert!(store.data().dark_mode);
        assert_eq!(store.data().tasks.len(), 1);
        assert_eq!(store.data().notes.len(), 1);
        let pushed = remote.docs.lock().unwrap().get("u1").cloned().unwrap();
        assert_eq!(pushed["notes"][0]["text"], "local only");
    }

    #[test]
    fn sign_out_stops_pushing() {
        let remote = Arc::new(InMemoryRemote::default());
        let bridge = CloudBridge::new(remote.clone());
        let mut store = store_with(&bridge);
        bridge.on_auth_changed(Some(&session("u1")), &mut store);
        store.add_task("one");
        let before = *remote.pushes.lock().unwrap();

        bridge.on_auth_changed(None, &mut store);
        store.add_task("two");
        assert_eq!(*remote.pushes.lock().unwrap(), before);
        assert_eq!(bridge.signed_in_uid(), None);
    }
}
