//! Persisted session credentials.
//!
//! A session is two storage keys, `token` and `user`, written together
//! at login and removed together at logout. The pair is only usable
//! when both halves are present and the user record parses; anything
//! less is treated as "no session", never as an error.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::events::{dispatch, ClientEvent};
use crate::role::Role;
use crate::storage::{keys, KeyValueStorage};
use crate::ClientError;

/// The user record as persisted under the `user` key.
///
/// The raw `role` string is kept verbatim here; canonicalization
/// happens once, when the record is lifted into a [`UserRecord`].
/// Unknown fields in the stored JSON are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// A user record with its role already canonicalized.
///
/// `role` is `None` only for unrecognized raw values; a missing raw
/// role defaults to [`Role::Student`].
#[derive(Debug, Clone, PartialEq)]
pub struct UserRecord {
    pub role: Option<Role>,
    pub name: String,
    pub email: String,
}

impl UserRecord {
    /// Lifts a stored record into canonical form.
    pub fn from_stored(stored: StoredUser) -> Self {
        let role = match stored.role {
            Some(raw) => Role::canonicalize(&raw),
            None => Some(Role::Student),
        };

        Self {
            role,
            name: stored.name,
            email: stored.email,
        }
    }
}

/// An authenticated session: bearer token plus user record.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: UserRecord,
}

/// Reads and writes the session key pair through the storage port.
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn KeyValueStorage>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// Loads the active session.
    ///
    /// Returns `Ok(None)` when either key is absent or the user record
    /// fails to parse. A token without a user record (or vice versa)
    /// is an inconsistent pair and counts as no session.
    ///
    /// # Errors
    ///
    /// Returns an error only when the storage backend itself fails.
    pub async fn load(&self) -> Result<Option<Session>, ClientError> {
        let token = match self.storage.get(keys::TOKEN).await? {
            Some(token) if !token.is_empty() => token,
            _ => return Ok(None),
        };

        let raw_user = match self.storage.get(keys::USER).await? {
            Some(raw) => raw,
            None => return Ok(None),
        };

        let stored: StoredUser = match serde_json::from_str(&raw_user) {
            Ok(stored) => stored,
            Err(_) => return Ok(None),
        };

        Ok(Some(Session {
            token,
            user: UserRecord::from_stored(stored),
        }))
    }

    /// Persists a fresh session, overwriting any previous pair.
    pub async fn save(&self, token: &str, user: &StoredUser) -> Result<(), ClientError> {
        let encoded = serde_json::to_string(user)
            .map_err(|e| ClientError::Serialization(e.to_string()))?;

        self.storage.set(keys::TOKEN, token).await?;
        self.storage.set(keys::USER, &encoded).await?;

        Ok(())
    }

    /// Destroys the session by removing both keys.
    pub async fn clear(&self) -> Result<(), ClientError> {
        self.storage.remove(keys::TOKEN).await?;
        self.storage.remove(keys::USER).await?;

        dispatch(ClientEvent::SessionCleared { at: Utc::now() }).await;

        Ok(())
    }

    /// Returns the bearer token, if a consistent session exists.
    pub async fn token(&self) -> Result<Option<String>, ClientError> {
        Ok(self.load().await?.map(|session| session.token))
    }
}
