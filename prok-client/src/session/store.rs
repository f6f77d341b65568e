use std::sync::{Arc, Mutex, MutexGuard};

use shared::models::SessionUser;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::storage::{Storage, StorageError};

/// Storage key of the JSON-encoded signed-in user.
pub const USER_KEY: &str = "user";
/// Storage key of the raw access token.
pub const ACCESS_TOKEN_KEY: &str = "access_token";

/// Failures while changing the session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no access token has been stored for this session")]
    MissingCredential,

    #[error("access token must not be empty")]
    EmptyCredential,

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("failed to encode session user: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Default, Clone)]
struct SessionState {
    user: Option<SessionUser>,
    access_token: Option<String>,
}

/// Shared handle to the authenticated session.
///
/// Clones share state. The user and the access token are either both present
/// or both absent once a mutation completes.
#[derive(Debug, Clone)]
pub struct SessionStore {
    state: Arc<Mutex<SessionState>>,
    storage: Arc<dyn Storage>,
}

impl SessionStore {
    /// Build a store over `storage`, restoring any persisted session.
    ///
    /// Missing, unreadable or malformed state yields an empty session.
    pub fn initialize(storage: Arc<dyn Storage>) -> Self {
        let state = restore(storage.as_ref()).unwrap_or_default();
        if let Some(user) = &state.user {
            info!(user_id = user.id, username = %user.username, "restored session");
        }
        Self {
            state: Arc::new(Mutex::new(state)),
            storage,
        }
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Persist the credential issued by the server ahead of [`login`](Self::login).
    ///
    /// # Errors
    /// Fails on an empty token or when storage cannot be written.
    pub fn persist_credential(&self, token: &str) -> Result<(), SessionError> {
        if token.trim().is_empty() {
            return Err(SessionError::EmptyCredential);
        }
        self.storage.set(ACCESS_TOKEN_KEY, token)?;
        debug!("stored access token");
        Ok(())
    }

    /// Mark `user` as signed in.
    ///
    /// The credential must already be persisted; otherwise the state is left
    /// untouched.
    ///
    /// # Errors
    /// [`SessionError::MissingCredential`] when no credential is stored, or a
    /// storage failure.
    pub fn login(&self, user: SessionUser) -> Result<(), SessionError> {
        let token = self
            .storage
            .get(ACCESS_TOKEN_KEY)?
            .filter(|token| !token.trim().is_empty())
            .ok_or(SessionError::MissingCredential)?;

        let encoded = serde_json::to_string(&user)?;
        self.storage.set(USER_KEY, &encoded)?;

        info!(user_id = user.id, username = %user.username, "signed in");
        *self.state() = SessionState {
            user: Some(user),
            access_token: Some(token),
        };
        Ok(())
    }

    /// Persist `token` and sign `user` in.
    ///
    /// # Errors
    /// See [`persist_credential`](Self::persist_credential) and [`login`](Self::login).
    pub fn establish(&self, user: SessionUser, token: &str) -> Result<(), SessionError> {
        self.persist_credential(token)?;
        self.login(user)
    }

    /// Clear the session in memory and in storage.
    ///
    /// Storage failures are logged; the in-memory session is always cleared.
    pub fn logout(&self) {
        let previous = std::mem::take(&mut *self.state());
        for key in [USER_KEY, ACCESS_TOKEN_KEY] {
            if let Err(err) = self.storage.remove(key) {
                warn!(error = %err, key, "failed to erase persisted session value");
            }
        }
        if let Some(user) = previous.user {
            info!(user_id = user.id, "signed out");
        }
    }

    /// The signed-in user, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<SessionUser> {
        self.state().user.clone()
    }

    /// The stored bearer token, if any.
    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.state().access_token.clone()
    }

    /// True when both a user and a token are held.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        let state = self.state();
        state.user.is_some() && state.access_token.is_some()
    }
}

fn restore(storage: &dyn Storage) -> Option<SessionState> {
    let token = match storage.get(ACCESS_TOKEN_KEY) {
        Ok(token) => token.filter(|token| !token.trim().is_empty())?,
        Err(err) => {
            warn!(error = %err, "could not read persisted access token");
            return None;
        }
    };
    let raw_user = match storage.get(USER_KEY) {
        Ok(user) => user?,
        Err(err) => {
            warn!(error = %err, "could not read persisted user");
            return None;
        }
    };
    match serde_json::from_str::<SessionUser>(&raw_user) {
        Ok(user) => Some(SessionState {
            user: Some(user),
            access_token: Some(token),
        }),
        Err(err) => {
            warn!(error = %err, "discarding malformed persisted user");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{FileStorage, MemoryStorage};
    use tempfile::TempDir;

    fn user() -> SessionUser {
        SessionUser {
            id: 7,
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
        }
    }

    fn memory() -> Arc<MemoryStorage> {
        Arc::new(MemoryStorage::new())
    }

    #[test]
    fn starts_empty_without_persisted_state() {
        let store = SessionStore::initialize(memory());
        assert!(!store.is_authenticated());
        assert_eq!(store.current_user(), None);
        assert_eq!(store.access_token(), None);
    }

    #[test]
    fn login_requires_persisted_credential() {
        let storage = memory();
        let store = SessionStore::initialize(storage.clone());

        let err = store.login(user()).unwrap_err();
        assert!(matches!(err, SessionError::MissingCredential));
        assert!(!store.is_authenticated());
        assert_eq!(storage.get(USER_KEY).unwrap(), None);
    }

    #[test]
    fn establish_persists_both_keys() {
        let storage = memory();
        let store = SessionStore::initialize(storage.clone());

        store.establish(user(), "tok-1").unwrap();

        assert!(store.is_authenticated());
        assert_eq!(store.current_user(), Some(user()));
        assert_eq!(store.access_token().as_deref(), Some("tok-1"));
        assert_eq!(storage.get(ACCESS_TOKEN_KEY).unwrap().as_deref(), Some("tok-1"));
        let stored: SessionUser =
            serde_json::from_str(&storage.get(USER_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(stored, user());
    }

    #[test]
    fn empty_credential_is_refused() {
        let store = SessionStore::initialize(memory());
        assert!(matches!(
            store.establish(user(), "  "),
            Err(SessionError::EmptyCredential)
        ));
        assert!(!store.is_authenticated());
    }

    #[test]
    fn logout_clears_memory_and_storage() {
        let storage = memory();
        let store = SessionStore::initialize(storage.clone());
        store.establish(user(), "tok-1").unwrap();

        let other_handle = store.clone();
        other_handle.logout();

        assert!(!store.is_authenticated());
        assert_eq!(storage.get(USER_KEY).unwrap(), None);
        assert_eq!(storage.get(ACCESS_TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn restores_persisted_session() {
        let temp_dir = TempDir::new().unwrap();
        let storage = Arc::new(FileStorage::new(temp_dir.path()));
        SessionStore::initialize(storage.clone())
            .establish(user(), "tok-2")
            .unwrap();

        let restored = SessionStore::initialize(storage);
        assert!(restored.is_authenticated());
        assert_eq!(restored.current_user(), Some(user()));
        assert_eq!(restored.access_token().as_deref(), Some("tok-2"));
    }

    #[test]
    fn half_persisted_session_is_treated_as_empty() {
        let storage = memory();
        storage
            .set(USER_KEY, &serde_json::to_string(&user()).unwrap())
            .unwrap();
        assert!(!SessionStore::initialize(storage.clone()).is_authenticated());

        let storage = memory();
        storage.set(ACCESS_TOKEN_KEY, "tok").unwrap();
        assert!(!SessionStore::initialize(storage).is_authenticated());
    }

    #[test]
    fn logout_erases_orphaned_credential() {
        let storage = memory();
        storage.set(ACCESS_TOKEN_KEY, "tok").unwrap();
        let session = SessionStore::initialize(storage.clone());
        assert!(session.current_user().is_none());

        session.logout();
        assert_eq!(storage.get(ACCESS_TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn malformed_user_is_treated_as_empty() {
        let storage = memory();
        storage.set(ACCESS_TOKEN_KEY, "tok").unwrap();
        storage.set(USER_KEY, "{not json").unwrap();

        let store = SessionStore::initialize(storage);
        assert!(!store.is_authenticated());
        assert_eq!(store.current_user(), None);
    }
}
