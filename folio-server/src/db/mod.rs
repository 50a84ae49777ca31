//! Database layer - connection pool, storage trait and stores
//!
//! # Design Principles
//!
//! - Connection pool, no Arc<Mutex<Connection>>
//! - Conditional UPDATE/DELETE, no check-then-mutate
//! - Transactions for multi-statement reads

pub mod memory;
pub mod pool;
pub mod repos;
pub mod store;

pub use memory::MemoryContactStore;
pub use pool::{create_pool, create_pool_with_options, run_migrations, MIGRATOR};
pub use repos::ContactRepo;
pub use store::{ContactStore, DbError};
