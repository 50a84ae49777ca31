//! Storage seam for contacts
//!
//! The service only talks to `dyn ContactStore`; Postgres and in-memory
//! implementations live beside it.

use async_trait::async_trait;

use crate::models::{Contact, ContactFilter, NewContact, Paginated, Pagination, StatusUpdate};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: i64 },
}

impl DbError {
    pub(crate) fn contact_not_found(id: i64) -> Self {
        Self::NotFound {
            resource: "contact",
            id,
        }
    }
}

/// Contact persistence operations.
///
/// Each method is a single atomic operation against the backing store.
/// Missing ids come back as `DbError::NotFound`.
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// Insert a validated submission; the store assigns id and timestamps.
    async fn insert(&self, contact: NewContact) -> Result<Contact, DbError>;

    /// Fetch one contact.
    async fn get(&self, id: i64) -> Result<Contact, DbError>;

    /// Count matches and return one page, newest first.
    async fn list(
        &self,
        filter: &ContactFilter,
        page: Pagination,
    ) -> Result<Paginated<Contact>, DbError>;

    /// Apply supplied status fields and refresh `updated_at`.
    async fn update_status(&self, id: i64, update: StatusUpdate) -> Result<Contact, DbError>;

    /// Remove a contact permanently.
    async fn delete(&self, id: i64) -> Result<(), DbError>;
}
