//! Contacts resource service
//!
//! The five operations on contacts, independent of HTTP. Validation happens
//! here; persistence is delegated to a `ContactStore`.

use std::sync::Arc;

use crate::db::{ContactStore, DbError};
use crate::models::{
    Contact, ContactCreate, ContactUpdate, ListQuery, NewContact, Paginated, StatusUpdate,
    ValidationErrors,
};

/// Failure of a contact operation
#[derive(Debug, thiserror::Error)]
pub enum ContactError {
    /// Input was malformed or out of bounds
    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    /// No contact with this id
    #[error("Contact with id {id} not found")]
    NotFound { id: i64 },

    /// Backing store failed
    #[error("storage failure: {0}")]
    Storage(#[source] DbError),
}

impl From<DbError> for ContactError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound { id, .. } => Self::NotFound { id },
            other => Self::Storage(other),
        }
    }
}

/// Contacts resource service
#[derive(Clone)]
pub struct ContactService {
    store: Arc<dyn ContactStore>,
}

impl ContactService {
    pub fn new(store: Arc<dyn ContactStore>) -> Self {
        Self { store }
    }

    /// Validate and persist a form submission.
    #[tracing::instrument(name = "create_contact", skip_all)]
    pub async fn create(&self, form: ContactCreate) -> Result<Contact, ContactError> {
        let contact = NewContact::try_from(form).inspect_err(|e| {
            tracing::debug!(fields = ?e.fields(), "contact rejected");
        })?;
        let contact = self.store.insert(contact).await?;
        tracing::info!(contact_id = contact.id, "contact created");
        Ok(contact)
    }

    /// One page of contacts, newest first, with the filtered total.
    #[tracing::instrument(name = "list_contacts", skip(self))]
    pub async fn list(&self, query: ListQuery) -> Result<Paginated<Contact>, ContactError> {
        let (filter, page) = query.into_parts()?;
        let result = self.store.list(&filter, page).await?;
        tracing::debug!(total = result.total, returned = result.items.len(), "contacts listed");
        Ok(result)
    }

    #[tracing::instrument(name = "get_contact", skip(self))]
    pub async fn get(&self, id: i64) -> Result<Contact, ContactError> {
        Ok(self.store.get(id).await?)
    }

    /// Apply only the status fields the caller supplied.
    #[tracing::instrument(name = "update_contact", skip(self))]
    pub async fn update_status(
        &self,
        id: i64,
        payload: ContactUpdate,
    ) -> Result<Contact, ContactError> {
        let update = StatusUpdate::try_from(payload)?;
        let contact = self.store.update_status(id, update).await?;
        tracing::info!(
            contact_id = id,
            is_read = contact.is_read,
            is_replied = contact.is_replied,
            "contact status updated"
        );
        Ok(contact)
    }

    #[tracing::instrument(name = "delete_contact", skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), ContactError> {
        self.store.delete(id).await?;
        tracing::info!(contact_id = id, "contact deleted");
        Ok(())
    }
}
