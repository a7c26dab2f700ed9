use tracing::debug;

use crate::data::store::{KeyValueStore, StoreError};
use crate::domain::error::DomainError;
use crate::domain::session::{Role, Session};

/// Store key holding the persisted session record.
pub const SESSION_KEY: &str = "techflow_user";

// Fixed demo credential pair for the single-admin deployment. A real
// deployment replaces this with a credential-verification collaborator
// behind the same manager.
const ADMIN_USERNAME: &str = "admin";
const ADMIN_PASSWORD: &str = "admin";

/// Owns the current admin session: initialized from the persisted record at
/// startup, mutated only through `login`/`logout`.
pub struct SessionManager<S: KeyValueStore> {
    store: S,
    session: Option<Session>,
}

impl<S: KeyValueStore> SessionManager<S> {
    /// Reads any persisted session record into memory. An absent or corrupt
    /// record means signed out.
    pub fn init(store: S) -> Result<Self, DomainError> {
        let session = store
            .get(SESSION_KEY)?
            .and_then(|raw| serde_json::from_str(&raw).ok());
        Ok(Self { store, session })
    }

    /// Returns `Ok(true)` only for the fixed credential pair; any other
    /// input returns `Ok(false)` and leaves state unchanged.
    pub fn login(&mut self, username: &str, password: &str) -> Result<bool, DomainError> {
        if username != ADMIN_USERNAME || password != ADMIN_PASSWORD {
            return Ok(false);
        }

        let session = Session {
            username: username.to_string(),
            role: Role::Admin,
        };
        let raw = serde_json::to_string(&session).map_err(|err| StoreError::Encode {
            key: SESSION_KEY.to_string(),
            message: err.to_string(),
        })?;
        self.store.set(SESSION_KEY, &raw)?;
        self.session = Some(session);
        debug!(%username, "admin signed in");
        Ok(true)
    }

    /// Clears the in-memory session and removes the persisted record.
    /// Idempotent.
    pub fn logout(&mut self) -> Result<(), DomainError> {
        self.session = None;
        self.store.remove(SESSION_KEY)?;
        debug!("admin signed out");
        Ok(())
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn current_session(&self) -> Option<&Session> {
        self.session.as_ref()
    }
}
