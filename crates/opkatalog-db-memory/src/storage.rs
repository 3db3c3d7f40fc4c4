//! Vector-backed implementation of the operation storage contract.

use std::cmp::Ordering;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use opkatalog_core::{OperationDraft, OperationRecord};
use opkatalog_storage::{OperationStorage, StorageError};

/// In-memory operation store.
///
/// Critical sections are short and never await, so a std mutex is
/// sufficient.
#[derive(Debug, Default)]
pub struct InMemoryOperationStore {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    next_id: i32,
    rows: Vec<StoredRow>,
}

#[derive(Debug, Clone)]
struct StoredRow {
    user_id: String,
    record: OperationRecord,
}

impl InMemoryOperationStore {
    /// Creates a new, empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner>, StorageError> {
        self.inner
            .lock()
            .map_err(|_| StorageError::operation("storage mutex poisoned"))
    }
}

impl Inner {
    fn insert(&mut self, user_id: &str, draft: &OperationDraft) -> i32 {
        self.next_id += 1;
        let now = Utc::now().naive_utc();
        self.rows.push(StoredRow {
            user_id: user_id.to_string(),
            record: OperationRecord::from_draft(self.next_id, draft, now, now),
        });
        self.next_id
    }
}

/// Sort comparator matching `ORDER BY date DESC, id DESC` under
/// PostgreSQL's native null ordering (nulls first when descending).
fn newest_first(a: &OperationRecord, b: &OperationRecord) -> Ordering {
    match (a.date, b.date) {
        (None, None) => b.id.cmp(&a.id),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(lhs), Some(rhs)) => rhs.cmp(&lhs).then(b.id.cmp(&a.id)),
    }
}

#[async_trait]
impl OperationStorage for InMemoryOperationStore {
    async fn ping(&self) -> Result<(), StorageError> {
        Ok(())
    }

    async fn list(&self, user_id: &str) -> Result<Vec<OperationRecord>, StorageError> {
        let inner = self.lock()?;
        let mut records: Vec<OperationRecord> = inner
            .rows
            .iter()
            .filter(|row| row.user_id == user_id)
            .map(|row| row.record.clone())
            .collect();
        records.sort_by(newest_first);
        Ok(records)
    }

    async fn create(&self, user_id: &str, draft: &OperationDraft) -> Result<i32, StorageError> {
        let mut inner = self.lock()?;
        Ok(inner.insert(user_id, draft))
    }

    async fn update(
        &self,
        id: i32,
        user_id: &str,
        draft: &OperationDraft,
    ) -> Result<u64, StorageError> {
        let mut inner = self.lock()?;
        let Some(row) = inner
            .rows
            .iter_mut()
            .find(|row| row.record.id == id && row.user_id == user_id)
        else {
            return Ok(0);
        };

        let created_at = row.record.created_at;
        let now = Utc::now().naive_utc();
        row.record = OperationRecord::from_draft(id, draft, now, now);
        // created_at is immutable once assigned; only updated_at moves.
        row.record.created_at = created_at;
        Ok(1)
    }

    async fn delete(&self, id: i32, user_id: &str) -> Result<(), StorageError> {
        let mut inner = self.lock()?;
        inner
            .rows
            .retain(|row| !(row.record.id == id && row.user_id == user_id));
        Ok(())
    }

    async fn bulk_import(
        &self,
        user_id: &str,
        drafts: &[OperationDraft],
    ) -> Result<usize, StorageError> {
        if drafts.is_empty() {
            return Err(StorageError::validation("No operations provided"));
        }
        let mut inner = self.lock()?;
        for draft in drafts {
            inner.insert(user_id, draft);
        }
        Ok(drafts.len())
    }

    async fn clear(&self, user_id: &str) -> Result<u64, StorageError> {
        let mut inner = self.lock()?;
        let before = inner.rows.len();
        inner.rows.retain(|row| row.user_id != user_id);
        Ok((before - inner.rows.len()) as u64)
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dated(date: &str) -> OperationDraft {
        OperationDraft {
            date: Some(date.parse().expect("date")),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_assigns_monotonic_ids() {
        let store = InMemoryOperationStore::new();
        let first = store.create("u1", &dated("2024-01-01")).await.expect("create");
        let second = store.create("u1", &dated("2024-01-02")).await.expect("create");
        assert!(second > first);
    }

    #[tokio::test]
    async fn test_list_orders_newest_first_with_nulls_first() {
        let store = InMemoryOperationStore::new();
        let older = store.create("u1", &dated("2024-01-01")).await.expect("create");
        let newer = store.create("u1", &dated("2024-03-01")).await.expect("create");
        let undated = store
            .create("u1", &OperationDraft::default())
            .await
            .expect("create");
        let tie = store.create("u1", &dated("2024-01-01")).await.expect("create");

        let ids: Vec<i32> = store
            .list("u1")
            .await
            .expect("list")
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![undated, newer, tie, older]);
    }

    #[tokio::test]
    async fn test_tenant_isolation() {
        let store = InMemoryOperationStore::new();
        let id = store.create("a", &dated("2024-01-01")).await.expect("create");

        assert!(store.list("b").await.expect("list").is_empty());
        assert_eq!(
            store.update(id, "b", &dated("2024-02-02")).await.expect("update"),
            0
        );
        store.delete(id, "b").await.expect("delete");
        assert_eq!(store.list("a").await.expect("list").len(), 1);
    }

    #[tokio::test]
    async fn test_update_preserves_created_at() {
        let store = InMemoryOperationStore::new();
        let id = store.create("u1", &dated("2024-01-01")).await.expect("create");
        let created_at = store.list("u1").await.expect("list")[0].created_at;

        assert_eq!(
            store.update(id, "u1", &dated("2024-02-02")).await.expect("update"),
            1
        );
        let record = &store.list("u1").await.expect("list")[0];
        assert_eq!(record.created_at, created_at);
        assert!(record.updated_at >= record.created_at);
        assert_eq!(record.date, Some("2024-02-02".parse().expect("date")));
    }

    #[tokio::test]
    async fn test_clear_counts_and_is_idempotent() {
        let store = InMemoryOperationStore::new();
        store.create("u1", &dated("2024-01-01")).await.expect("create");
        store.create("u1", &dated("2024-01-02")).await.expect("create");
        store.create("u2", &dated("2024-01-03")).await.expect("create");

        assert_eq!(store.clear("u1").await.expect("clear"), 2);
        assert_eq!(store.clear("u1").await.expect("clear again"), 0);
        assert_eq!(store.list("u2").await.expect("list").len(), 1);
    }

    #[tokio::test]
    async fn test_bulk_import_rejects_empty_batch() {
        let store = InMemoryOperationStore::new();
        let result = store.bulk_import("u1", &[]).await;
        assert!(matches!(result, Err(StorageError::Validation { .. })));
    }
}
