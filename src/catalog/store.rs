use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use chrono::Utc;
use serde::de::DeserializeOwned;

use super::ResourceStatus;
use crate::api::types::LikeUpdate;
use crate::api::ApiClient;
use crate::events::{dispatch, ClientEvent};

/// List slot of a catalog resource.
#[derive(Debug, Clone, PartialEq)]
pub struct ListState<T> {
    pub status: ResourceStatus,
    pub items: Vec<T>,
    pub error: Option<String>,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self {
            status: ResourceStatus::Idle,
            items: Vec::new(),
            error: None,
        }
    }
}

/// Single-item detail slot, independent of the list slot.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailState<T> {
    pub status: ResourceStatus,
    pub item: Option<T>,
    pub error: Option<String>,
}

impl<T> Default for DetailState<T> {
    fn default() -> Self {
        Self {
            status: ResourceStatus::Idle,
            item: None,
            error: None,
        }
    }
}

/// Opt-in cancellation for in-flight fetches.
///
/// Default behavior is last-resolved-wins with no cancellation; a
/// caller holding a token can mark a fetch stale so its result is
/// dropped instead of committed.
#[derive(Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Items whose detail slot supports server-confirmed like toggling.
pub trait Likeable {
    fn item_id(&self) -> &str;
    fn apply_like(&mut self, update: &LikeUpdate);
}

/// An independent async-resource container for one product type.
pub struct CatalogStore<T> {
    client: ApiClient,
    path: String,
    query: Vec<(String, String)>,
    bearer_detail: bool,
    list: RwLock<ListState<T>>,
    detail: RwLock<DetailState<T>>,
}

impl<T> CatalogStore<T>
where
    T: DeserializeOwned + Clone + Send + Sync,
{
    /// Store for the collection at `path` (e.g. `courses`).
    pub fn new(client: ApiClient, path: impl Into<String>) -> Self {
        Self {
            client,
            path: path.into(),
            query: Vec::new(),
            bearer_detail: false,
            list: RwLock::new(ListState::default()),
            detail: RwLock::new(DetailState::default()),
        }
    }

    /// Attaches fixed query parameters to every list fetch, e.g.
    /// `?type=course` on the categories collection.
    #[must_use]
    pub fn with_query(mut self, key: &str, value: &str) -> Self {
        self.query.push((key.to_owned(), value.to_owned()));
        self
    }

    /// Marks the detail endpoint as bearer-authenticated (course
    /// details require a session; website details do not).
    #[must_use]
    pub fn with_authenticated_detail(mut self) -> Self {
        self.bearer_detail = true;
        self
    }

    /// Fetches the collection and replaces the list wholesale.
    pub async fn fetch_list(&self) {
        self.fetch_list_cancellable(&CancelToken::new()).await;
    }

    /// Like [`fetch_list`](Self::fetch_list), but the result is
    /// discarded if `cancel` fires before the response resolves.
    pub async fn fetch_list_cancellable(&self, cancel: &CancelToken) {
        self.with_list(|list| {
            list.status = ResourceStatus::Loading;
            list.error = None;
        });

        let result = self.client.collection::<T>(&self.path, &self.query).await;

        if cancel.is_cancelled() {
            return;
        }

        match result {
            Ok(items) => self.with_list(|list| {
                list.items = items;
                list.status = ResourceStatus::Succeeded;
                list.error = None;
            }),
            Err(err) => {
                let message = err.to_string();
                // Prior items stay untouched so a failed refresh keeps
                // showing the last good list.
                self.with_list(|list| {
                    list.status = ResourceStatus::Failed;
                    list.error = Some(message.clone());
                });
                self.report_failure(message).await;
            }
        }
    }

    /// Fetches a single item into the detail slot.
    pub async fn fetch_by_id(&self, id: &str) {
        self.with_detail(|detail| {
            detail.status = ResourceStatus::Loading;
            detail.error = None;
        });

        match self.client.item::<T>(&self.path, id, self.bearer_detail).await {
            Ok(item) => self.with_detail(|detail| {
                detail.item = Some(item);
                detail.status = ResourceStatus::Succeeded;
                detail.error = None;
            }),
            Err(err) => {
                let message = err.to_string();
                self.with_detail(|detail| {
                    detail.status = ResourceStatus::Failed;
                    detail.error = Some(message.clone());
                });
                self.report_failure(message).await;
            }
        }
    }

    /// Current list slot.
    pub fn list(&self) -> ListState<T> {
        self.list
            .read()
            .map(|list| list.clone())
            .unwrap_or_default()
    }

    /// Current detail slot.
    pub fn detail(&self) -> DetailState<T> {
        self.detail
            .read()
            .map(|detail| detail.clone())
            .unwrap_or_default()
    }

    fn with_list(&self, f: impl FnOnce(&mut ListState<T>)) {
        if let Ok(mut list) = self.list.write() {
            f(&mut list);
        }
    }

    fn with_detail(&self, f: impl FnOnce(&mut DetailState<T>)) {
        if let Ok(mut detail) = self.detail.write() {
            f(&mut detail);
        }
    }

    async fn report_failure(&self, message: String) {
        dispatch(ClientEvent::FetchFailed {
            resource: self.path.clone(),
            message,
            at: Utc::now(),
        })
        .await;
    }
}

impl<T> CatalogStore<T>
where
    T: DeserializeOwned + Clone + Send + Sync + Likeable,
{
    /// Toggles the like flag of the item in the detail slot.
    ///
    /// Requires an active session: without a stored token the
    /// operation fails before any network call. There is no optimistic
    /// mutation; only the server-confirmed like state is committed, and
    /// only while the detail slot still holds the same item.
    pub async fn toggle_like(&self, id: &str) {
        let update = match self.client.toggle_like(&self.path, id).await {
            Ok(update) => update,
            Err(err) => {
                let message = err.to_string();
                self.with_detail(|detail| {
                    detail.error = Some(message.clone());
                });
                self.report_failure(message).await;
                return;
            }
        };

        self.with_detail(|detail| {
            if let Some(item) = detail.item.as_mut() {
                if item.item_id() == id {
                    item.apply_like(&update);
                    detail.error = None;
                }
            }
        });
    }
}
