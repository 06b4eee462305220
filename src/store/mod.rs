//! Gateway to the remote persistent collection of groups.
//!
//! The store is authoritative; implementations own no directory state and never
//! retry on their own.

use async_trait::async_trait;

use crate::error::DirectoryError;
use crate::models::{Group, GroupFields, GroupId, GroupPatch};

pub mod memory;
pub mod sql;

pub use memory::MemoryStore;
pub use sql::SqlGroupStore;

#[async_trait]
pub trait GroupStore: Send + Sync {
    /// Every group, newest `created_at` first.
    async fn fetch_all(&self) -> Result<Vec<Group>, DirectoryError>;

    /// Persists a new group. The store assigns `id` and `created_at` and starts it unverified.
    async fn insert(&self, fields: &GroupFields) -> Result<Group, DirectoryError>;

    /// Writes the set fields of `patch`. A missing id is `DirectoryError::NotFound`.
    async fn update(&self, id: &GroupId, patch: &GroupPatch) -> Result<(), DirectoryError>;

    async fn delete(&self, id: &GroupId) -> Result<(), DirectoryError>;
}

#[async_trait]
impl<T: GroupStore + ?Sized> GroupStore for std::sync::Arc<T> {
    async fn fetch_all(&self) -> Result<Vec<Group>, DirectoryError> {
        (**self).fetch_all().await
    }

    async fn insert(&self, fields: &GroupFields) -> Result<Group, DirectoryError> {
        (**self).insert(fields).await
    }

    async fn update(&self, id: &GroupId, patch: &GroupPatch) -> Result<(), DirectoryError> {
        (**self).update(id, patch).await
    }

    async fn delete(&self, id: &GroupId) -> Result<(), DirectoryError> {
        (**self).delete(id).await
    }
}
