//! Contact record and its request payloads
//!
//! `ContactCreate` and `ContactUpdate` are the wire shapes; they are checked
//! into `NewContact` / `StatusUpdate` before anything reaches the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use sqlx::FromRow;

use super::{EmailAddress, ValidationError, ValidationErrors};

/// Maximum length for contact names
pub const MAX_NAME_LEN: usize = 255;

/// Maximum length for subjects
pub const MAX_SUBJECT_LEN: usize = 500;

/// Maximum length for phone numbers
pub const MAX_PHONE_LEN: usize = 50;

/// Contact record as persisted
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Contact {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
    pub phone: Option<String>,
    pub is_read: bool,
    pub is_replied: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Contact form submission, as received
#[derive(Debug, Clone, Deserialize)]
pub struct ContactCreate {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub subject: Option<String>,
    pub message: String,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Submission that passed validation and is ready to insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContact {
    pub name: String,
    pub email: EmailAddress,
    pub subject: Option<String>,
    pub message: String,
    pub phone: Option<String>,
}

/// Postgres text columns cannot store NUL.
const NUL_REASON: &str = "must not contain NUL characters";

fn check_text(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &str,
    required: bool,
    max: Option<usize>,
) {
    if required && value.is_empty() {
        errors.push(ValidationError::Empty { field });
        return;
    }
    if value.contains('\0') {
        errors.push(ValidationError::InvalidFormat {
            field,
            reason: NUL_REASON,
        });
        return;
    }
    if let Some(max) = max {
        if value.chars().count() > max {
            errors.push(ValidationError::TooLong { field, max });
        }
    }
}

impl TryFrom<ContactCreate> for NewContact {
    type Error = ValidationErrors;

    /// Check every field, reporting all violations at once.
    fn try_from(form: ContactCreate) -> Result<Self, Self::Error> {
        let mut errors = ValidationErrors::new();

        check_text(&mut errors, "name", &form.name, true, Some(MAX_NAME_LEN));
        let email = EmailAddress::new(&form.email).map_err(|e| errors.push(e)).ok();
        if let Some(subject) = &form.subject {
            check_text(&mut errors, "subject", subject, false, Some(MAX_SUBJECT_LEN));
        }
        check_text(&mut errors, "message", &form.message, true, None);
        if let Some(phone) = &form.phone {
            check_text(&mut errors, "phone", phone, false, Some(MAX_PHONE_LEN));
        }

        match email {
            Some(email) if errors.is_empty() => Ok(Self {
                name: form.name,
                email,
                subject: form.subject,
                message: form.message,
                phone: form.phone,
            }),
            _ => Err(errors),
        }
    }
}

/// Deserialize a field so that "absent" (outer `None`) and "explicit null"
/// (`Some(None)`) stay distinguishable.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Status update payload; every field optional
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactUpdate {
    #[serde(default, deserialize_with = "present")]
    pub is_read: Option<Option<bool>>,
    #[serde(default, deserialize_with = "present")]
    pub is_replied: Option<Option<bool>>,
}

/// Fields to apply in a status update; `None` leaves the column untouched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusUpdate {
    pub is_read: Option<bool>,
    pub is_replied: Option<bool>,
}

impl StatusUpdate {
    /// Apply the supplied fields to a record in place.
    pub fn apply(&self, contact: &mut Contact) {
        if let Some(is_read) = self.is_read {
            contact.is_read = is_read;
        }
        if let Some(is_replied) = self.is_replied {
            contact.is_replied = is_replied;
        }
    }
}

impl TryFrom<ContactUpdate> for StatusUpdate {
    type Error = ValidationErrors;

    fn try_from(payload: ContactUpdate) -> Result<Self, Self::Error> {
        let mut errors = ValidationErrors::new();
        let mut required = |field: &'static str, value: Option<Option<bool>>| match value {
            Some(None) => {
                errors.push(ValidationError::Null { field });
                None
            }
            other => other.flatten(),
        };

        let update = Self {
            is_read: required("is_read", payload.is_read),
            is_replied: required("is_replied", payload.is_replied),
        };
        errors.into_result(update)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> ContactCreate {
        ContactCreate {
            name: "Jane Doe".into(),
            email: "jane@example.com".into(),
            subject: Some("Hello".into()),
            message: "I'd like to talk about a project.".into(),
            phone: None,
        }
    }

    #[test]
    fn valid_form() {
        let contact = NewContact::try_from(form()).unwrap();
        assert_eq!(contact.email.as_str(), "jane@example.com");
        assert_eq!(contact.subject.as_deref(), Some("Hello"));
    }

    #[test]
    fn rejects_empty_name_and_message() {
        let mut f = form();
        f.name = String::new();
        f.message = String::new();

        let err = NewContact::try_from(f).unwrap_err();
        assert_eq!(err.fields(), vec!["name", "message"]);
    }

    #[test]
    fn rejects_bad_email() {
        let mut f = form();
        f.email = "not-an-email".into();

        let err = NewContact::try_from(f).unwrap_err();
        assert_eq!(err.fields(), vec!["email"]);
    }

    #[test]
    fn length_bounds_count_characters() {
        let mut f = form();
        f.name = "é".repeat(MAX_NAME_LEN);
        assert!(NewContact::try_from(f.clone()).is_ok());

        f.name.push('é');
        f.subject = Some("s".repeat(MAX_SUBJECT_LEN + 1));
        f.phone = Some("1".repeat(MAX_PHONE_LEN + 1));
        let err = NewContact::try_from(f).unwrap_err();
        assert_eq!(err.fields(), vec!["name", "subject", "phone"]);
    }

    #[test]
    fn rejects_nul_characters() {
        let mut f = form();
        f.name = "Jane\0Doe".into();
        f.subject = Some("\0".into());
        f.message = "hello\0".into();
        f.phone = Some("555\00100".into());

        let err = NewContact::try_from(f).unwrap_err();
        assert_eq!(err.fields(), vec!["name", "subject", "message", "phone"]);
        assert!(err.iter().all(|e| matches!(
            e,
            ValidationError::InvalidFormat {
                reason: NUL_REASON,
                ..
            }
        )));
    }

    #[test]
    fn optional_fields_may_be_empty() {
        let mut f = form();
        f.subject = Some(String::new());
        f.phone = Some(String::new());
        assert!(NewContact::try_from(f).is_ok());
    }

    #[test]
    fn update_tracks_presence() {
        let payload: ContactUpdate = serde_json::from_str(r#"{"is_read": false}"#).unwrap();
        assert_eq!(payload.is_read, Some(Some(false)));
        assert_eq!(payload.is_replied, None);

        let update = StatusUpdate::try_from(payload).unwrap();
        assert_eq!(
            update,
            StatusUpdate {
                is_read: Some(false),
                is_replied: None
            }
        );
    }

    #[test]
    fn update_rejects_null() {
        let payload: ContactUpdate = serde_json::from_str(r#"{"is_replied": null}"#).unwrap();
        let err = StatusUpdate::try_from(payload).unwrap_err();
        assert_eq!(err.fields(), vec!["is_replied"]);
    }

    #[test]
    fn apply_leaves_absent_fields() {
        let now = Utc::now();
        let mut contact = Contact {
            id: 1,
            name: "Jane".into(),
            email: "jane@example.com".into(),
            subject: None,
            message: "hi".into(),
            phone: None,
            is_read: false,
            is_replied: true,
            created_at: now,
            updated_at: now,
        };

        StatusUpdate {
            is_read: Some(true),
            is_replied: None,
        }
        .apply(&mut contact);

        assert!(contact.is_read);
        assert!(contact.is_replied);
    }
}
