//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationErrors, not panic.

pub mod validation;
pub mod email;
pub mod contact;
pub mod filter;
pub mod pagination;

pub use validation::{ValidationError, ValidationErrors};
pub use email::EmailAddress;
pub use contact::{Contact, ContactCreate, ContactUpdate, NewContact, StatusUpdate};
pub use filter::{parse_bool, ContactFilter, ContactPredicate, ListQuery};
pub use pagination::{Paginated, Pagination};
