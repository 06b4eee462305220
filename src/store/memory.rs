use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use uuid::Uuid;

use super::GroupStore;
use crate::error::DirectoryError;
use crate::models::{Group, GroupFields, GroupId, GroupPatch};

/// In-process store with the same contract as the SQL one. Failures and latency
/// can be injected to exercise the directory's reconciliation paths.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    rows: Vec<Group>,
    clock: i64,
    offline: bool,
    // calls still to succeed, then the error to fail with
    next_failure: Option<(usize, DirectoryError)>,
    latency: Option<Duration>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store preloaded with `rows`, ids and timestamps kept as given.
    pub fn with_rows(rows: Vec<Group>) -> Self {
        let clock = rows.iter().map(|g| g.created_at).max().unwrap_or(0);
        Self {
            inner: Mutex::new(Inner {
                rows,
                clock,
                ..Default::default()
            }),
        }
    }

    /// While offline every call fails with `Connectivity`.
    pub fn set_offline(&self, offline: bool) {
        self.lock().offline = offline;
    }

    /// The next call, whatever it is, fails with `err`.
    pub fn fail_next(&self, err: DirectoryError) {
        self.fail_after(0, err);
    }

    /// Lets `successes` calls through, then fails the one after with `err`.
    pub fn fail_after(&self, successes: usize, err: DirectoryError) {
        self.lock().next_failure = Some((successes, err));
    }

    /// Stores `group` verbatim, id and timestamp included, with no validation.
    pub fn insert_row(&self, group: Group) {
        let mut inner = self.lock();
        inner.clock = inner.clock.max(group.created_at);
        inner.rows.push(group);
    }

    pub fn set_latency(&self, latency: Option<Duration>) {
        self.lock().latency = latency;
    }

    /// Rows as the store holds them, bypassing injected failures.
    pub fn rows(&self) -> Vec<Group> {
        self.lock().rows.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn enter(&self) -> Result<(), DirectoryError> {
        let latency = self.lock().latency;
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        let mut inner = self.lock();
        match inner.next_failure.take() {
            Some((0, err)) => return Err(err),
            Some((successes, err)) => inner.next_failure = Some((successes - 1, err)),
            None => {}
        }
        if inner.offline {
            return Err(DirectoryError::Connectivity("memory store is offline".into()));
        }
        Ok(())
    }
}

fn reject_blank(blank: Vec<&'static str>) -> Result<(), DirectoryError> {
    if blank.is_empty() {
        Ok(())
    } else {
        Err(DirectoryError::Validation(format!("empty {}", blank.join(", "))))
    }
}

#[async_trait]
impl GroupStore for MemoryStore {
    async fn fetch_all(&self) -> Result<Vec<Group>, DirectoryError> {
        self.enter().await?;
        let mut rows = self.lock().rows.clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn insert(&self, fields: &GroupFields) -> Result<Group, DirectoryError> {
        self.enter().await?;
        reject_blank(fields.blank_fields())?;

        let mut inner = self.lock();
        inner.clock += 1;
        let group = Group {
            id: GroupId(Uuid::new_v4().to_string()),
            name: fields.name.clone(),
            description: fields.description.clone(),
            link: fields.link.clone(),
            category: fields.category,
            members_count: fields.members_count,
            is_verified: false,
            created_at: inner.clock,
        };
        inner.rows.push(group.clone());
        debug!("memory store inserted {}", group.id);
        Ok(group)
    }

    async fn update(&self, id: &GroupId, patch: &GroupPatch) -> Result<(), DirectoryError> {
        self.enter().await?;
        let blank: Vec<&'static str> = [
            ("name", &patch.name),
            ("description", &patch.description),
            ("link", &patch.link),
        ]
        .into_iter()
        .filter(|(_, value)| value.as_deref().is_some_and(|v| v.trim().is_empty()))
        .map(|(field, _)| field)
        .collect();
        reject_blank(blank)?;

        let mut inner = self.lock();
        let group = inner
            .rows
            .iter_mut()
            .find(|g| &g.id == id)
            .ok_or_else(|| DirectoryError::NotFound(id.to_string()))?;
        group.apply(patch);
        Ok(())
    }

    async fn delete(&self, id: &GroupId) -> Result<(), DirectoryError> {
        self.enter().await?;
        let mut inner = self.lock();
        let before = inner.rows.len();
        inner.rows.retain(|g| &g.id != id);
        if inner.rows.len() == before {
            return Err(DirectoryError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    fn fields(name: &str) -> GroupFields {
        GroupFields {
            name: name.into(),
            description: "desc".into(),
            link: "https://chat.example/x".into(),
            category: Category::Fun,
            members_count: 3,
        }
    }

    #[tokio::test]
    async fn fetch_is_newest_first() {
        let store = MemoryStore::new();
        let first = store.insert(&fields("first")).await.unwrap();
        let second = store.insert(&fields("second")).await.unwrap();
        let all = store.fetch_all().await.unwrap();
        assert_eq!(all.iter().map(|g| &g.id).collect::<Vec<_>>(), vec![&second.id, &first.id]);
    }

    #[tokio::test]
    async fn blank_fields_are_rejected() {
        let store = MemoryStore::new();
        let err = store.insert(&fields("  ")).await.unwrap_err();
        assert!(matches!(err, DirectoryError::Validation(_)));
        assert!(store.rows().is_empty());
    }

    #[tokio::test]
    async fn missing_id_is_not_found() {
        let store = MemoryStore::new();
        let id = GroupId::from("nope");
        assert!(matches!(
            store.update(&id, &GroupPatch::verified(true)).await,
            Err(DirectoryError::NotFound(_))
        ));
        assert!(matches!(store.delete(&id).await, Err(DirectoryError::NotFound(_))));
    }

    #[tokio::test]
    async fn injected_failure_fires_once() {
        let store = MemoryStore::new();
        store.fail_next(DirectoryError::Connectivity("boom".into()));
        assert!(store.fetch_all().await.is_err());
        assert!(store.fetch_all().await.is_ok());
    }

    #[tokio::test]
    async fn delayed_failure_skips_earlier_calls() {
        let store = MemoryStore::new();
        store.fail_after(1, DirectoryError::Connectivity("boom".into()));
        assert!(store.insert(&fields("kept")).await.is_ok());
        assert!(store.fetch_all().await.is_err());
        assert_eq!(store.fetch_all().await.unwrap().len(), 1);
    }
}
