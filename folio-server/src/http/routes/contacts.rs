//! Contact endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::http::error::ApiError;
use crate::http::extractors::{ContactId, ValidJson, ValidQuery};
use crate::http::server::AppState;
use crate::models::{Contact, ContactCreate, ContactUpdate, ListQuery, Paginated};

/// Contact response
#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
    pub phone: Option<String>,
    pub is_read: bool,
    pub is_replied: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Contact> for ContactResponse {
    fn from(c: Contact) -> Self {
        Self {
            id: c.id,
            name: c.name,
            email: c.email,
            subject: c.subject,
            message: c.message,
            phone: c.phone,
            is_read: c.is_read,
            is_replied: c.is_replied,
            created_at: c.created_at.to_rfc3339(),
            updated_at: c.updated_at.to_rfc3339(),
        }
    }
}

/// Paginated contact list
#[derive(Debug, Serialize)]
pub struct ContactList {
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub contacts: Vec<ContactResponse>,
}

impl From<Paginated<Contact>> for ContactList {
    fn from(p: Paginated<Contact>) -> Self {
        let p = p.map(ContactResponse::from);
        Self {
            total: p.total,
            page: p.page,
            page_size: p.page_size,
            contacts: p.items,
        }
    }
}

/// POST /contacts - submit a contact form
async fn create_contact(
    State(state): State<Arc<AppState>>,
    ValidJson(form): ValidJson<ContactCreate>,
) -> Result<(StatusCode, Json<ContactResponse>), ApiError> {
    let contact = state.service.create(form).await?;
    Ok((StatusCode::CREATED, Json(ContactResponse::from(contact))))
}

/// GET /contacts - list contacts with pagination and filters
async fn list_contacts(
    State(state): State<Arc<AppState>>,
    ValidQuery(query): ValidQuery<ListQuery>,
) -> Result<Json<ContactList>, ApiError> {
    let result = state.service.list(query).await?;
    Ok(Json(ContactList::from(result)))
}

/// GET /contacts/{id} - get a single contact
async fn get_contact(
    State(state): State<Arc<AppState>>,
    ContactId(id): ContactId,
) -> Result<Json<ContactResponse>, ApiError> {
    let contact = state.service.get(id).await?;
    Ok(Json(ContactResponse::from(contact)))
}

/// PATCH /contacts/{id} - mark as read / replied
async fn update_contact(
    State(state): State<Arc<AppState>>,
    ContactId(id): ContactId,
    ValidJson(payload): ValidJson<ContactUpdate>,
) -> Result<Json<ContactResponse>, ApiError> {
    let contact = state.service.update_status(id, payload).await?;
    Ok(Json(ContactResponse::from(contact)))
}

/// DELETE /contacts/{id} - remove a contact
async fn delete_contact(
    State(state): State<Arc<AppState>>,
    ContactId(id): ContactId,
) -> Result<StatusCode, ApiError> {
    state.service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Contact routes, with and without the trailing slash
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/contacts", get(list_contacts).post(create_contact))
        .route("/contacts/", get(list_contacts).post(create_contact))
        .route(
            "/contacts/{id}",
            get(get_contact).patch(update_contact).delete(delete_contact),
        )
}
