//! Event system for client-state changes.
//!
//! Guard decisions, session teardown, cart mutations, and failed
//! fetches all fire a [`ClientEvent`]. If no listeners are registered,
//! dispatch is a no-op.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use skillmart::register_event_listeners;
//! use skillmart::events::listeners::LoggingListener;
//!
//! fn main() {
//!     // register listeners at startup
//!     register_event_listeners(|registry| {
//!         registry.listen(LoggingListener::new());
//!     });
//! }
//! ```
//!
//! # Custom Listeners
//!
//! Implement the [`Listener`] trait to create custom event handlers:
//!
//! ```rust,ignore
//! use skillmart::events::{ClientEvent, Listener};
//! use async_trait::async_trait;
//!
//! struct RedirectCounter;
//!
//! #[async_trait]
//! impl Listener for RedirectCounter {
//!     async fn handle(&self, event: &ClientEvent) {
//!         if let ClientEvent::SessionRedirected { .. } = event {
//!             // increment a counter
//!         }
//!     }
//! }
//! ```

mod registry;

pub mod listeners;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub use registry::{dispatch, register_event_listeners};

use crate::role::{Destination, Role};

/// Events emitted by the client-state stores.
#[derive(Debug, Clone)]
pub enum ClientEvent {
    // session gating
    SessionAuthorized {
        role: Option<Role>,
        at: DateTime<Utc>,
    },
    SessionRedirected {
        destination: Destination,
        at: DateTime<Utc>,
    },
    SessionCleared {
        at: DateTime<Utc>,
    },

    // cart
    CartHydrated {
        at: DateTime<Utc>,
    },
    CartItemAdded {
        item_id: String,
        at: DateTime<Utc>,
    },
    CartItemRemoved {
        item_id: String,
        at: DateTime<Utc>,
    },
    CartCleared {
        at: DateTime<Utc>,
    },

    // catalog
    FetchFailed {
        resource: String,
        message: String,
        at: DateTime<Utc>,
    },
}

impl ClientEvent {
    /// Returns a dot-separated event name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SessionAuthorized { .. } => "session.authorized",
            Self::SessionRedirected { .. } => "session.redirected",
            Self::SessionCleared { .. } => "session.cleared",
            Self::CartHydrated { .. } => "cart.hydrated",
            Self::CartItemAdded { .. } => "cart.item_added",
            Self::CartItemRemoved { .. } => "cart.item_removed",
            Self::CartCleared { .. } => "cart.cleared",
            Self::FetchFailed { .. } => "catalog.fetch_failed",
        }
    }

    /// Returns the timestamp when this event occurred.
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::SessionAuthorized { at, .. }
            | Self::SessionRedirected { at, .. }
            | Self::SessionCleared { at }
            | Self::CartHydrated { at }
            | Self::CartItemAdded { at, .. }
            | Self::CartItemRemoved { at, .. }
            | Self::CartCleared { at }
            | Self::FetchFailed { at, .. } => *at,
        }
    }
}

/// Trait for handling client events asynchronously.
#[async_trait]
pub trait Listener: Send + Sync + 'static {
    /// Handle a client event.
    ///
    /// Called for every dispatched event; match on the variant to
    /// handle specific ones.
    async fn handle(&self, event: &ClientEvent);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        let now = Utc::now();

        assert_eq!(
            ClientEvent::SessionAuthorized {
                role: Some(Role::Student),
                at: now
            }
            .name(),
            "session.authorized"
        );
        assert_eq!(
            ClientEvent::SessionRedirected {
                destination: Destination::Login,
                at: now
            }
            .name(),
            "session.redirected"
        );
        assert_eq!(
            ClientEvent::CartItemAdded {
                item_id: "c1".to_owned(),
                at: now
            }
            .name(),
            "cart.item_added"
        );
        assert_eq!(
            ClientEvent::FetchFailed {
                resource: "courses".to_owned(),
                message: "boom".to_owned(),
                at: now
            }
            .name(),
            "catalog.fetch_failed"
        );
    }

    #[test]
    fn test_event_timestamp() {
        let now = Utc::now();
        let event = ClientEvent::CartCleared { at: now };
        assert_eq!(event.timestamp(), now);
    }
}
