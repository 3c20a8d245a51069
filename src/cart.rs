//! The cart store.
//!
//! The cart is guest-friendly and fully local: every mutation applies
//! in memory and rewrites both persisted keys (`cartItems`,
//! `cartTotal`) in the same call. The running total is maintained
//! incrementally and must always equal the sum of item prices; it is
//! never recomputed lazily at read time.
//!
//! Hydration is deferred and runs at most once per store lifetime. A
//! mutation that lands before a slow hydration completes can therefore
//! never be clobbered: once the store is marked hydrated, further
//! hydrate calls are no-ops.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};

use crate::events::{dispatch, ClientEvent};
use crate::storage::{keys, KeyValueStorage};
use crate::ClientError;

/// A purchasable product in the cart, unique by `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Point-in-time view of the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CartSnapshot {
    pub items: Vec<CartItem>,
    pub total_amount: f64,
    pub is_hydrated: bool,
}

#[derive(Default)]
struct CartState {
    items: Vec<CartItem>,
    total: f64,
    hydrated: bool,
}

/// Observable cart state backed by the storage port.
pub struct CartStore {
    storage: Arc<dyn KeyValueStorage>,
    state: RwLock<CartState>,
}

impl CartStore {
    /// Creates an empty, not-yet-hydrated cart store.
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            storage,
            state: RwLock::new(CartState::default()),
        }
    }

    /// Loads persisted cart contents into the store.
    ///
    /// Idempotent: after the first completion (successful or fallback)
    /// every further call is a no-op, regardless of interleaving with
    /// mutations. Any read or parse failure falls back to an empty
    /// cart instead of propagating; the store is marked hydrated
    /// either way.
    pub async fn hydrate(&self) -> Result<(), ClientError> {
        if self.read(|state| state.hydrated)? {
            return Ok(());
        }

        let items = self.storage.get(keys::CART_ITEMS).await.ok().flatten();
        let total = self.storage.get(keys::CART_TOTAL).await.ok().flatten();

        let parsed: Option<(Vec<CartItem>, f64)> = match (items, total) {
            (Some(items), Some(total)) => serde_json::from_str(&items)
                .ok()
                .zip(total.parse::<f64>().ok()),
            _ => None,
        };

        let mut state = self.write()?;
        if !state.hydrated {
            if let Some((items, total)) = parsed {
                state.items = items;
                state.total = total;
            }
            state.hydrated = true;
        }
        drop(state);

        dispatch(ClientEvent::CartHydrated { at: Utc::now() }).await;

        Ok(())
    }

    /// Adds an item and persists both keys.
    ///
    /// The cart is a set keyed by `id`: adding an id that is already
    /// present leaves items and total untouched.
    pub async fn add_item(&self, item: CartItem) -> Result<(), ClientError> {
        let changed = {
            let mut state = self.write()?;
            if state.items.iter().any(|existing| existing.id == item.id) {
                false
            } else {
                state.total += item.price;
                state.items.push(item.clone());
                true
            }
        };

        if !changed {
            return Ok(());
        }

        self.persist().await?;
        dispatch(ClientEvent::CartItemAdded {
            item_id: item.id,
            at: Utc::now(),
        })
        .await;

        Ok(())
    }

    /// Removes the item with `id` and persists both keys.
    ///
    /// Removing an absent id is a no-op.
    pub async fn remove_item(&self, id: &str) -> Result<(), ClientError> {
        let removed = {
            let mut state = self.write()?;
            match state.items.iter().position(|item| item.id == id) {
                Some(index) => {
                    let item = state.items.remove(index);
                    state.total -= item.price;
                    true
                }
                None => false,
            }
        };

        if !removed {
            return Ok(());
        }

        self.persist().await?;
        dispatch(ClientEvent::CartItemRemoved {
            item_id: id.to_owned(),
            at: Utc::now(),
        })
        .await;

        Ok(())
    }

    /// Empties the cart and deletes both persisted keys.
    pub async fn clear(&self) -> Result<(), ClientError> {
        {
            let mut state = self.write()?;
            state.items.clear();
            state.total = 0.0;
        }

        self.storage.remove(keys::CART_ITEMS).await?;
        self.storage.remove(keys::CART_TOTAL).await?;

        dispatch(ClientEvent::CartCleared { at: Utc::now() }).await;

        Ok(())
    }

    /// Current cart contents.
    pub fn snapshot(&self) -> Result<CartSnapshot, ClientError> {
        self.read(|state| CartSnapshot {
            items: state.items.clone(),
            total_amount: state.total,
            is_hydrated: state.hydrated,
        })
    }

    pub fn total_amount(&self) -> Result<f64, ClientError> {
        self.read(|state| state.total)
    }

    pub fn len(&self) -> Result<usize, ClientError> {
        self.read(|state| state.items.len())
    }

    pub fn is_empty(&self) -> Result<bool, ClientError> {
        Ok(self.len()? == 0)
    }

    /// Rewrites both persisted keys from current in-memory state.
    async fn persist(&self) -> Result<(), ClientError> {
        let (encoded_items, total) = self.read(|state| {
            (
                serde_json::to_string(&state.items),
                state.total,
            )
        })?;

        let encoded_items =
            encoded_items.map_err(|e| ClientError::Serialization(e.to_string()))?;

        self.storage.set(keys::CART_ITEMS, &encoded_items).await?;
        self.storage
            .set(keys::CART_TOTAL, &total.to_string())
            .await?;

        Ok(())
    }

    fn read<T>(&self, f: impl FnOnce(&CartState) -> T) -> Result<T, ClientError> {
        let state = self
            .state
            .read()
            .map_err(|_| ClientError::Storage("Lock poisoned".to_owned()))?;
        Ok(f(&state))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, CartState>, ClientError> {
        self.state
            .write()
            .map_err(|_| ClientError::Storage("Lock poisoned".to_owned()))
    }
}
