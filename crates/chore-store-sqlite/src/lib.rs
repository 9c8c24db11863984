//! SQLite executor for chore commands.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs off the async
//! runtime's threads. Unlike a pooled store, every executed command opens
//! its own connection and releases it before returning, on every path.

mod schema;
mod statement;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
