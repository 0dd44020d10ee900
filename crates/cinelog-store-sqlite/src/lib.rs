//! SQLite backend for the Cinelog store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. [`SqliteStore::open_in_memory`] doubles
//! as the in-memory store used by tests.

mod encode;
mod queries;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
