pub mod api;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod events;
pub mod guard;
pub mod role;
pub mod session;
pub mod storage;

pub use api::{ApiClient, ApiError};
pub use cart::{CartItem, CartSnapshot, CartStore};
pub use catalog::{CancelToken, CatalogStore, CategoryFilter, ResourceStatus, Selection};
pub use config::ClientConfig;
pub use events::register_event_listeners;
pub use guard::{AccessPolicy, Gate, GuardDecision, SessionGuard};
pub use role::{Destination, Role};
pub use session::{Session, SessionStore, StoredUser, UserRecord};
pub use storage::{FileStorage, InMemoryStorage, KeyValueStorage};

use std::fmt;

/// Errors surfaced by the storage port and the stores built on it.
///
/// Network failures are represented separately by [`ApiError`]; the
/// catalog stores convert both kinds into resource state rather than
/// letting them escape to embedders.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientError {
    Storage(String),
    Serialization(String),
    MissingToken,
    InvalidKey(String),
}

impl std::error::Error for ClientError {}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Storage(msg) => write!(f, "Storage error: {}", msg),
            ClientError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            ClientError::MissingToken => write!(f, "No session token in storage"),
            ClientError::InvalidKey(key) => write!(f, "Invalid storage key: {}", key),
        }
    }
}
