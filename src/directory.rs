//! Local view of the remote directory and the rules that keep it in step with the store.
//!
//! The store is the source of truth; `Directory` holds a cache of it. Two
//! reconciliation strategies are used:
//!
//! - **Full reconciliation** after `create` and `edit_save`: the list is replaced
//!   wholesale by a fresh fetch, picking up store-assigned ids, timestamps and ordering.
//! - **Optimistic patch** after `remove` and `set_verified`: once the store confirms
//!   the write, the local entry is dropped or its flag flipped in place, with no fetch.
//!
//! Every operation that talks to the store goes through one FIFO queue that also
//! carries the list generation, so a refresh queued behind a remove sees the remove.

use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;

use log::{error, info, warn};
use tokio::sync::{Mutex, RwLock};

use crate::error::DirectoryError;
use crate::filter::{filter_groups, CategoryFilter};
use crate::models::{Group, GroupFields, GroupId, GroupPatch};
use crate::store::GroupStore;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Runs a store operation, turning no answer within `timeout` into `Connectivity`.
pub(crate) async fn within<T>(
    timeout: Duration,
    operation: impl Future<Output = Result<T, DirectoryError>>,
) -> Result<T, DirectoryError> {
    tokio::time::timeout(timeout, operation).await.unwrap_or_else(|_| {
        Err(DirectoryError::Connectivity(format!(
            "no answer from the store within {timeout:?}"
        )))
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStatus {
    Loading,
    Ready,
    Failed(DirectoryError),
}

pub struct Directory<S> {
    store: Result<S, DirectoryError>,
    timeout: Duration,
    groups: RwLock<Vec<Group>>,
    status: RwLock<SyncStatus>,
    // single-flight queue; the value is the list generation
    queue: Mutex<u64>,
}

impl<S: GroupStore> Directory<S> {
    pub fn new(store: S) -> Self {
        Self::with_timeout(store, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(store: S, timeout: Duration) -> Self {
        Self {
            store: Ok(store),
            timeout,
            groups: RwLock::new(Vec::new()),
            status: RwLock::new(SyncStatus::Loading),
            queue: Mutex::new(0),
        }
    }

    /// Directory with no usable store. It stays `Failed(err)` and every operation
    /// returns `err` without retrying.
    pub fn unconfigured(err: DirectoryError) -> Self {
        error!("{}", err);
        Self {
            store: Err(err.clone()),
            timeout: DEFAULT_TIMEOUT,
            groups: RwLock::new(Vec::new()),
            status: RwLock::new(SyncStatus::Failed(err)),
            queue: Mutex::new(0),
        }
    }

    pub async fn groups(&self) -> Vec<Group> {
        self.groups.read().await.clone()
    }

    pub async fn status(&self) -> SyncStatus {
        self.status.read().await.clone()
    }

    /// Number of local list changes applied so far.
    pub async fn generation(&self) -> u64 {
        *self.queue.lock().await
    }

    pub async fn get(&self, id: &GroupId) -> Option<Group> {
        self.groups.read().await.iter().find(|g| &g.id == id).cloned()
    }

    /// Displayed subset for the given search text and category selector.
    pub async fn view(&self, search: &str, category: CategoryFilter) -> Vec<Group> {
        let groups = self.groups.read().await;
        filter_groups(&groups, search, category).into_iter().cloned().collect()
    }

    /// Replaces the local list with the store's. On failure the previous list is kept.
    pub async fn refresh(&self) -> Result<(), DirectoryError> {
        let mut generation = self.queue.lock().await;
        self.reconcile(&mut generation).await
    }

    /// Inserts a new group, then reconciles fully. The local list is untouched if
    /// the insert fails.
    pub async fn create(&self, fields: GroupFields) -> Result<Group, DirectoryError> {
        let mut generation = self.queue.lock().await;
        let store = self.store()?;

        let group = self.call(store.insert(&fields)).await.map_err(|e| {
            error!("Failed to create group {}: {}", fields.name, e);
            e
        })?;
        info!("Group {} created with ID: {}", group.name, group.id);

        if let Err(e) = self.reconcile(&mut generation).await {
            warn!("Group {} was stored but the refresh failed: {}", group.id, e);
        }
        Ok(group)
    }

    /// Writes the edited fields of `id`, then reconciles fully.
    pub async fn edit_save(&self, id: &GroupId, fields: GroupFields) -> Result<(), DirectoryError> {
        let mut generation = self.queue.lock().await;
        let store = self.store()?;

        self.call(store.update(id, &GroupPatch::from(fields)))
            .await
            .map_err(|e| {
                error!("Failed to save group {}: {}", id, e);
                e
            })?;
        info!("Group {} updated", id);

        if let Err(e) = self.reconcile(&mut generation).await {
            warn!("Group {} was saved but the refresh failed: {}", id, e);
        }
        Ok(())
    }

    /// Deletes `id` and drops it locally once the store confirms.
    pub async fn remove(&self, id: &GroupId) -> Result<(), DirectoryError> {
        let mut generation = self.queue.lock().await;
        let store = self.store()?;

        self.call(store.delete(id)).await.map_err(|e| {
            error!("Failed to delete group {}: {}", id, e);
            e
        })?;

        self.groups.write().await.retain(|g| &g.id != id);
        *generation += 1;
        info!("Group {} removed", id);
        Ok(())
    }

    /// Sets the verification flag of `id` and patches the local entry once the store confirms.
    pub async fn set_verified(&self, id: &GroupId, value: bool) -> Result<(), DirectoryError> {
        let mut generation = self.queue.lock().await;
        let store = self.store()?;

        self.call(store.update(id, &GroupPatch::verified(value)))
            .await
            .map_err(|e| {
                error!("Failed to set verification of group {}: {}", id, e);
                e
            })?;

        let mut groups = self.groups.write().await;
        match groups.iter_mut().find(|g| &g.id == id) {
            Some(group) => group.is_verified = value,
            // stored but not cached yet; the next refresh brings it in
            None => warn!("Group {} verified remotely but not in the local list", id),
        }
        *generation += 1;
        info!("Group {} verified: {}", id, value);
        Ok(())
    }

    fn store(&self) -> Result<&S, DirectoryError> {
        self.store.as_ref().map_err(Clone::clone)
    }

    async fn call<T>(
        &self,
        operation: impl Future<Output = Result<T, DirectoryError>>,
    ) -> Result<T, DirectoryError> {
        within(self.timeout, operation).await
    }

    async fn reconcile(&self, generation: &mut u64) -> Result<(), DirectoryError> {
        let store = self.store()?;
        *self.status.write().await = SyncStatus::Loading;

        let fetched = match self.call(store.fetch_all()).await.and_then(reject_duplicates) {
            Ok(groups) => groups,
            Err(e) => {
                error!("Failed to refresh groups: {}", e);
                *self.status.write().await = SyncStatus::Failed(e.clone());
                return Err(e);
            }
        };

        info!("Loaded {} groups", fetched.len());
        *self.groups.write().await = fetched;
        *self.status.write().await = SyncStatus::Ready;
        *generation += 1;
        Ok(())
    }
}

fn reject_duplicates(groups: Vec<Group>) -> Result<Vec<Group>, DirectoryError> {
    let duplicate = {
        let mut seen = HashSet::with_capacity(groups.len());
        groups.iter().find(|g| !seen.insert(&g.id)).map(|g| g.id.to_string())
    };
    match duplicate {
        Some(id) => Err(DirectoryError::DataIntegrity(format!("store returned group {id} twice"))),
        None => Ok(groups),
    }
}
