//! List filters and query parameters
//!
//! A `ContactFilter` starts unconditional and ANDs in one predicate per
//! supplied query parameter. Stores decide how to evaluate it.

use serde::{de, Deserialize, Deserializer};

use super::pagination::DEFAULT_PAGE_SIZE;
use super::{Contact, Pagination, ValidationErrors};

/// Parse the boolean spellings accepted in query strings and env vars.
pub fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "yes" | "y" | "on" | "1" => Some(true),
        "false" | "f" | "no" | "n" | "off" | "0" => Some(false),
        _ => None,
    }
}

fn flexible_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|raw| {
            parse_bool(&raw)
                .ok_or_else(|| de::Error::custom(format!("`{}` is not a valid boolean", raw)))
        })
        .transpose()
}

/// Single condition on a contact column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactPredicate {
    IsRead(bool),
    IsReplied(bool),
}

impl ContactPredicate {
    /// Column the predicate constrains.
    pub fn column(&self) -> &'static str {
        match self {
            Self::IsRead(_) => "is_read",
            Self::IsReplied(_) => "is_replied",
        }
    }

    /// Value the column must equal.
    pub fn value(&self) -> bool {
        match *self {
            Self::IsRead(v) | Self::IsReplied(v) => v,
        }
    }

    pub fn matches(&self, contact: &Contact) -> bool {
        match *self {
            Self::IsRead(v) => contact.is_read == v,
            Self::IsReplied(v) => contact.is_replied == v,
        }
    }
}

/// Conjunction of predicates; empty means "every contact"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFilter {
    predicates: Vec<ContactPredicate>,
}

impl ContactFilter {
    /// Unconditional filter.
    pub fn all() -> Self {
        Self::default()
    }

    /// AND in a predicate.
    pub fn and(mut self, predicate: ContactPredicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// AND in a predicate only when a value was supplied.
    pub fn and_maybe(self, value: Option<bool>, predicate: fn(bool) -> ContactPredicate) -> Self {
        match value {
            Some(v) => self.and(predicate(v)),
            None => self,
        }
    }

    pub fn predicates(&self) -> &[ContactPredicate] {
        &self.predicates
    }

    pub fn matches(&self, contact: &Contact) -> bool {
        self.predicates.iter().all(|p| p.matches(contact))
    }
}

/// Query parameters for the list operation
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    #[serde(default, deserialize_with = "flexible_bool")]
    pub is_read: Option<bool>,
    #[serde(default, deserialize_with = "flexible_bool")]
    pub is_replied: Option<bool>,
}

impl ListQuery {
    /// Split into a filter and validated pagination.
    pub fn into_parts(self) -> Result<(ContactFilter, Pagination), ValidationErrors> {
        let page = Pagination::new(
            self.page.unwrap_or(1),
            self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        )?;
        let filter = ContactFilter::all()
            .and_maybe(self.is_read, ContactPredicate::IsRead)
            .and_maybe(self.is_replied, ContactPredicate::IsReplied);
        Ok((filter, page))
    }
}
