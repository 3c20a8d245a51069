//! Async catalog state containers.
//!
//! Each product type (courses, websites, softwares, mentors,
//! categories) gets an independent [`CatalogStore`] following the same
//! fetch, normalize, cache, mutate pattern. Network failures never
//! escape a store: they are written into the resource's `error` slot
//! and the previous data is kept, so a failed refresh keeps showing
//! the last good list.
//!
//! Concurrent fetches against the same store are not deduplicated and
//! there is no implicit cancellation; whichever response resolves last
//! wins. Callers that want to drop a stale response can opt in with a
//! [`CancelToken`].

mod selection;
mod store;

pub use selection::{CategoryFilter, Selection};
pub use store::{CancelToken, CatalogStore, DetailState, Likeable, ListState};

/// Lifecycle of an async resource.
///
/// Re-enterable: a new fetch from `Succeeded` or `Failed` returns the
/// resource to `Loading`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResourceStatus {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}
