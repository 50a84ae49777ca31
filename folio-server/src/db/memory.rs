//! In-process contact store
//!
//! Same semantics as the Postgres repository: ids come from a counter that
//! never rewinds, lists are newest first, `updated_at` only moves forward.
//! Used by the test suites and for running the API without a database.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{Duration, Utc};

use crate::db::store::{ContactStore, DbError};
use crate::models::{Contact, ContactFilter, NewContact, Paginated, Pagination, StatusUpdate};

#[derive(Default)]
struct Inner {
    last_id: i64,
    rows: BTreeMap<i64, Contact>,
}

/// Contact store backed by a map behind a mutex
#[derive(Default)]
pub struct MemoryContactStore {
    inner: Mutex<Inner>,
}

impl MemoryContactStore {
    pub fn new() -> Self {
        Self::default()
    }

    // The lock is never held across an await and no method panics while
    // holding it, so a poisoned guard still has consistent data.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl ContactStore for MemoryContactStore {
    async fn insert(&self, contact: NewContact) -> Result<Contact, DbError> {
        let mut inner = self.lock();
        inner.last_id += 1;
        let now = Utc::now();
        let record = Contact {
            id: inner.last_id,
            name: contact.name,
            email: contact.email.into_string(),
            subject: contact.subject,
            message: contact.message,
            phone: contact.phone,
            is_read: false,
            is_replied: false,
            created_at: now,
            updated_at: now,
        };
        inner.rows.insert(record.id, record.clone());
        Ok(record)
    }

    async fn get(&self, id: i64) -> Result<Contact, DbError> {
        self.lock()
            .rows
            .get(&id)
            .cloned()
            .ok_or_else(|| DbError::contact_not_found(id))
    }

    async fn list(
        &self,
        filter: &ContactFilter,
        page: Pagination,
    ) -> Result<Paginated<Contact>, DbError> {
        let inner = self.lock();
        let mut matching: Vec<&Contact> =
            inner.rows.values().filter(|c| filter.matches(c)).collect();
        matching.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        let total = matching.len() as i64;
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(page.limit()).unwrap_or(0);
        let items = matching
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();

        Ok(Paginated::new(items, total, page))
    }

    async fn update_status(&self, id: i64, update: StatusUpdate) -> Result<Contact, DbError> {
        let mut inner = self.lock();
        let contact = inner
            .rows
            .get_mut(&id)
            .ok_or_else(|| DbError::contact_not_found(id))?;

        update.apply(contact);
        contact.updated_at = Utc::now().max(contact.updated_at + Duration::microseconds(1));
        Ok(contact.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), DbError> {
        self.lock()
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DbError::contact_not_found(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContactCreate, ContactPredicate};

    fn submission(name: &str) -> NewContact {
        NewContact::try_from(ContactCreate {
            name: name.into(),
            email: "visitor@example.com".into(),
            subject: None,
            message: "Hello".into(),
            phone: None,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn ids_are_never_reused() {
        let store = MemoryContactStore::new();
        let first = store.insert(submission("a")).await.unwrap();
        store.delete(first.id).await.unwrap();
        let second = store.insert(submission("b")).await.unwrap();

        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let store = MemoryContactStore::new();
        for name in ["a", "b", "c"] {
            store.insert(submission(name)).await.unwrap();
        }

        let page = store
            .list(&ContactFilter::all(), Pagination::default())
            .await
            .unwrap();
        let names: Vec<_> = page.items.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["c", "b", "a"]);
        assert_eq!(page.total, 3);
    }

    #[tokio::test]
    async fn list_applies_filter_before_counting() {
        let store = MemoryContactStore::new();
        let a = store.insert(submission("a")).await.unwrap();
        store.insert(submission("b")).await.unwrap();
        store
            .update_status(
                a.id,
                StatusUpdate {
                    is_read: Some(true),
                    is_replied: None,
                },
            )
            .await
            .unwrap();

        let filter = ContactFilter::all().and(ContactPredicate::IsRead(true));
        let page = store.list(&filter, Pagination::default()).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].id, a.id);
    }

    #[tokio::test]
    async fn missing_ids_are_not_found() {
        let store = MemoryContactStore::new();
        assert!(matches!(
            store.get(42).await,
            Err(DbError::NotFound { id: 42, .. })
        ));
        assert!(matches!(
            store.update_status(42, StatusUpdate::default()).await,
            Err(DbError::NotFound { id: 42, .. })
        ));
        assert!(matches!(
            store.delete(42).await,
            Err(DbError::NotFound { id: 42, .. })
        ));
    }
}
