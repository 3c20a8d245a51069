//! Role-scoped access gating.
//!
//! Every protected area declares an [`AccessPolicy`] once; on
//! activation the [`SessionGuard`] evaluates the persisted session
//! against it and yields a [`GuardDecision`]. Denials are navigation,
//! never errors: a missing or broken session goes to login, a valid
//! session with the wrong role goes silently to that role's home.

use chrono::Utc;
use std::sync::Arc;

use crate::events::{dispatch, ClientEvent};
use crate::role::{Destination, Role};
use crate::session::{Session, SessionStore};
use crate::storage::KeyValueStorage;

/// Roles allowed into a protected area.
///
/// An empty policy admits any authenticated session. Entries are
/// canonical, so checks are always canonical-to-canonical.
#[derive(Debug, Clone, Default)]
pub struct AccessPolicy {
    required: Vec<Role>,
}

impl AccessPolicy {
    /// Policy that admits any authenticated session.
    pub fn any_authenticated() -> Self {
        Self::default()
    }

    /// Policy admitting exactly the given roles.
    pub fn require(roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            required: roles.into_iter().collect(),
        }
    }

    /// Builds a policy from raw role strings, canonicalizing each
    /// entry. Unrecognized strings are dropped: they could never match
    /// a canonical role anyway.
    pub fn from_raw<'a>(roles: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            required: roles.into_iter().filter_map(Role::canonicalize).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.required.is_empty()
    }

    pub fn allows(&self, role: Role) -> bool {
        self.required.contains(&role)
    }
}

/// Outcome of a guard evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum GuardDecision {
    /// Render protected content; the evaluated session is attached.
    Authorized(Session),
    /// Do not render; navigate to the destination instead.
    Redirect(Destination),
}

impl GuardDecision {
    pub fn is_authorized(&self) -> bool {
        matches!(self, Self::Authorized(_))
    }
}

/// Evaluates persisted credentials against an access policy.
#[derive(Clone)]
pub struct SessionGuard {
    sessions: SessionStore,
}

impl SessionGuard {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            sessions: SessionStore::new(storage),
        }
    }

    /// Evaluates the stored session against `policy`.
    ///
    /// Admins bypass role scoping entirely. Session state is never
    /// mutated; storage failures degrade to a login redirect rather
    /// than surfacing an error to the page layer.
    pub async fn evaluate(&self, policy: &AccessPolicy) -> GuardDecision {
        let session = match self.sessions.load().await {
            Ok(Some(session)) => session,
            Ok(None) | Err(_) => {
                return self.redirect(Destination::Login).await;
            }
        };

        if session.user.role == Some(Role::Admin) {
            return self.authorize(session).await;
        }

        if policy.is_empty() {
            return self.authorize(session).await;
        }

        match session.user.role {
            Some(role) if policy.allows(role) => self.authorize(session).await,
            other => self.redirect(Destination::fallback_for(other)).await,
        }
    }

    async fn authorize(&self, session: Session) -> GuardDecision {
        dispatch(ClientEvent::SessionAuthorized {
            role: session.user.role,
            at: Utc::now(),
        })
        .await;

        GuardDecision::Authorized(session)
    }

    async fn redirect(&self, destination: Destination) -> GuardDecision {
        dispatch(ClientEvent::SessionRedirected {
            destination,
            at: Utc::now(),
        })
        .await;

        GuardDecision::Redirect(destination)
    }
}

/// Render gate for protected content.
///
/// Starts closed and opens only when resolved with an authorized
/// decision, so protected content never flashes while the guard is
/// still evaluating.
#[derive(Debug, Default)]
pub struct Gate {
    authorized: bool,
}

impl Gate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a guard decision. The gate opens for `Authorized` and
    /// stays closed (or closes again) for any redirect.
    pub fn resolve(&mut self, decision: &GuardDecision) {
        self.authorized = decision.is_authorized();
    }

    pub fn is_open(&self) -> bool {
        self.authorized
    }
}
