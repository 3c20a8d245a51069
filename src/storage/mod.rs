//! The key-value persistence port and its backends.
//!
//! Every durable piece of client state (session credentials, cart
//! contents, UI preferences) goes through [`KeyValueStorage`]. Stores
//! depend on the trait, never on a concrete backend, so embedders can
//! plug in whatever persistence the target platform offers.

mod file;
mod memory;

use async_trait::async_trait;
pub use file::FileStorage;
pub use memory::InMemoryStorage;

use crate::ClientError;

/// Well-known storage keys.
///
/// Key names are part of the persisted-state contract with existing
/// clients and must not be renamed.
pub mod keys {
    /// Bearer token of the active session.
    pub const TOKEN: &str = "token";
    /// JSON-encoded user record of the active session.
    pub const USER: &str = "user";
    /// JSON array of cart items.
    pub const CART_ITEMS: &str = "cartItems";
    /// Stringified running total of the cart.
    pub const CART_TOTAL: &str = "cartTotal";
    /// Preferred UI language.
    pub const LANGUAGE: &str = "language";
    /// Dashboard color scheme.
    pub const DASHBOARD_THEME: &str = "dashboard-theme";
}

/// String key-value persistence.
///
/// Storage is the only resource shared between independent store
/// instances. Writes are last-writer-wins; there is no cross-instance
/// change notification.
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    /// Returns the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, ClientError>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), ClientError>;

    /// Deletes `key`. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<(), ClientError>;
}
