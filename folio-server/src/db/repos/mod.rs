//! Repository implementations for database access

pub mod contacts;

pub use contacts::ContactRepo;
