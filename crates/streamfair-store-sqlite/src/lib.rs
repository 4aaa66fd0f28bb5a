//! SQLite backend for the Streamfair catalog.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Multi-statement writes go through
//! [`SqliteStore::execute`], which runs them inside one transaction.

mod accounts;
mod association;
mod credits;
mod encode;
mod health;
mod queries;
mod schema;
mod songs;
mod store;

pub mod error;

pub use association::Association;
pub use queries::Queries;
pub use store::SqliteStore;
pub use streamfair_core::{Error, Result};

#[cfg(test)]
mod tests;
