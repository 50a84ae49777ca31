//! folio-server: contact form backend
//!
//! Validates and stores contact-form submissions in Postgres and exposes
//! them over a small JSON API for listing, status updates and deletion.

pub mod config;
pub mod db;
pub mod error;
pub mod http;
pub mod models;
pub mod service;

pub use config::Settings;
pub use error::{Error, Result};
pub use service::{ContactError, ContactService};
