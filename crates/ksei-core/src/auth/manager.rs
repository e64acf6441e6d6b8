//! Credential lifecycle manager.
//!
//! Owns the login protocol and the token cache. The cache has two layers:
//! an in-memory credential for the life of the manager, and an optional
//! [`CredentialStore`] so a token survives process restarts.
//!
//! Refresh is single-flight: concurrent callers that all see an expired
//! token queue on one refresh lock, and only the first performs a login.

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use super::{challenge, AuthError, Credential, Identity};
use crate::api::ApiClient;
use crate::store::CredentialStore;

pub struct CredentialManager {
    identity: Identity,
    api: ApiClient,
    store: Option<Arc<dyn CredentialStore>>,
    /// Current credential, read without the refresh lock on the fast path.
    current: RwLock<Option<Credential>>,
    /// Serializes store lookups and logins.
    refresh_lock: Mutex<()>,
}

impl CredentialManager {
    pub fn new(identity: Identity, api: ApiClient) -> Self {
        Self {
            identity,
            api,
            store: None,
            current: RwLock::new(None),
            refresh_lock: Mutex::new(()),
        }
    }

    /// Persist credentials in `store` and reuse them across instances.
    pub fn with_store(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn username(&self) -> &str {
        &self.identity.username
    }

    /// Snapshot of the in-memory credential, valid or not.
    pub async fn current_credential(&self) -> Option<Credential> {
        self.current.read().await.clone()
    }

    /// Return a credential whose embedded expiry is still in the future,
    /// logging in if needed.
    ///
    /// Safe to call from many tasks at once; at most one login runs at a
    /// time per manager.
    pub async fn ensure_valid_credential(&self) -> Result<Credential, AuthError> {
        if let Some(credential) = self.valid_in_memory().await {
            return Ok(credential);
        }

        let _guard = self.refresh_lock.lock().await;

        // Another caller may have refreshed while we waited for the lock
        if let Some(credential) = self.valid_in_memory().await {
            debug!("Credential refreshed by a concurrent caller");
            return Ok(credential);
        }

        if let Some(credential) = self.load_persisted() {
            debug!(store = self.store_name(), "Adopted persisted credential");
            *self.current.write().await = Some(credential.clone());
            return Ok(credential);
        }

        let credential = Credential::new(self.login().await?);
        if credential.expires_at().is_none() {
            warn!(
                username = %self.identity.username,
                "Issued token has no readable expiry; it will not be reused"
            );
        }
        self.persist(&credential);
        *self.current.write().await = Some(credential.clone());
        Ok(credential)
    }

    async fn valid_in_memory(&self) -> Option<Credential> {
        self.current
            .read()
            .await
            .as_ref()
            .filter(|c| c.is_valid())
            .cloned()
    }

    fn store_name(&self) -> &str {
        self.store.as_ref().map(|s| s.name()).unwrap_or("none")
    }

    /// Look up a usable token in the store. Read failures count as a miss.
    fn load_persisted(&self) -> Option<Credential> {
        let store = self.store.as_ref()?;
        match store.get(&self.identity.username) {
            Ok(Some(token)) => {
                let credential = Credential::new(token);
                if credential.is_valid() {
                    Some(credential)
                } else {
                    debug!("Persisted credential expired or unreadable");
                    None
                }
            }
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, store = store.name(), "Failed to read persisted credential");
                None
            }
        }
    }

    /// Write a fresh token to the store. A failed write only costs a login
    /// in the next process, so it is logged rather than returned.
    fn persist(&self, credential: &Credential) {
        let Some(store) = self.store.as_ref() else {
            return;
        };
        if let Err(e) = store.set(&self.identity.username, credential.token()) {
            warn!(error = %e, store = store.name(), "Failed to persist credential");
        }
    }

    /// Run the challenge (when the password is plaintext) and login steps.
    async fn login(&self) -> Result<String, AuthError> {
        let hashed_password = if self.identity.plain_password {
            let param = challenge::fresh_challenge(&self.identity.password);
            self.api
                .generate_hashed_password(&param)
                .await
                .map_err(AuthError::Challenge)?
        } else {
            self.identity.password.clone()
        };

        let token = self
            .api
            .login(&self.identity.username, &hashed_password)
            .await
            .map_err(AuthError::Login)?;

        info!(username = %self.identity.username, "Logged in to AKSes");
        Ok(token)
    }
}
