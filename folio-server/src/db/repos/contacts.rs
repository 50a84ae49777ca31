//! Contact repository (Postgres)
//!
//! Mutations are single conditional statements, so there is no window
//! between "does it exist" and "change it":
//! - update: UPDATE ... WHERE id = $1 RETURNING
//! - delete: DELETE ... WHERE id = $1, NotFound on zero rows
//! - list: count + page inside one REPEATABLE READ snapshot

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::db::store::{ContactStore, DbError};
use crate::models::{Contact, ContactFilter, NewContact, Paginated, Pagination, StatusUpdate};

/// Both list statements must see the same snapshot; READ COMMITTED
/// would take a fresh one per statement.
const LIST_SNAPSHOT: &str = "SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY";

const SELECT_CONTACTS: &str = "SELECT id, name, email, subject, message, phone, \
     is_read, is_replied, created_at, updated_at FROM contacts";

/// Render a filter as `WHERE TRUE AND col = $n ...`.
pub(crate) fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &ContactFilter) {
    builder.push(" WHERE TRUE");
    for predicate in filter.predicates() {
        builder
            .push(" AND ")
            .push(predicate.column())
            .push(" = ")
            .push_bind(predicate.value());
    }
}

/// Contact repository
#[derive(Clone)]
pub struct ContactRepo {
    pool: PgPool,
}

impl ContactRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContactStore for ContactRepo {
    async fn insert(&self, contact: NewContact) -> Result<Contact, DbError> {
        let contact: Contact = sqlx::query_as(
            r#"
            INSERT INTO contacts (name, email, subject, message, phone)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, subject, message, phone,
                      is_read, is_replied, created_at, updated_at
            "#,
        )
        .bind(&contact.name)
        .bind(contact.email.as_str())
        .bind(contact.subject.as_deref())
        .bind(&contact.message)
        .bind(contact.phone.as_deref())
        .fetch_one(&self.pool)
        .await?;

        Ok(contact)
    }

    async fn get(&self, id: i64) -> Result<Contact, DbError> {
        sqlx::query_as::<_, Contact>(
            r#"
            SELECT id, name, email, subject, message, phone,
                   is_read, is_replied, created_at, updated_at
            FROM contacts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::contact_not_found(id))
    }

    /// Total comes from a separate COUNT so it survives pages past the end
    /// (a window count would vanish with the rows).
    async fn list(
        &self,
        filter: &ContactFilter,
        page: Pagination,
    ) -> Result<Paginated<Contact>, DbError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(LIST_SNAPSHOT).execute(&mut *tx).await?;

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM contacts");
        push_filter(&mut count, filter);
        let total: i64 = count.build_query_scalar().fetch_one(&mut *tx).await?;

        let mut select = QueryBuilder::<Postgres>::new(SELECT_CONTACTS);
        push_filter(&mut select, filter);
        select
            .push(" ORDER BY created_at DESC, id DESC LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());
        let items: Vec<Contact> = select.build_query_as().fetch_all(&mut *tx).await?;

        tx.commit().await?;
        Ok(Paginated::new(items, total, page))
    }

    async fn update_status(&self, id: i64, update: StatusUpdate) -> Result<Contact, DbError> {
        // GREATEST keeps updated_at strictly increasing even within one clock tick
        sqlx::query_as::<_, Contact>(
            r#"
            UPDATE contacts
            SET is_read = COALESCE($2, is_read),
                is_replied = COALESCE($3, is_replied),
                updated_at = GREATEST(NOW(), updated_at + INTERVAL '1 microsecond')
            WHERE id = $1
            RETURNING id, name, email, subject, message, phone,
                      is_read, is_replied, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(update.is_read)
        .bind(update.is_replied)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::contact_not_found(id))
    }

    async fn delete(&self, id: i64) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM contacts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::contact_not_found(id));
        }
        Ok(())
    }
}
