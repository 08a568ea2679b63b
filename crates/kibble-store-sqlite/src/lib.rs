//! SQLite backend for the Kibble feeding store.
//!
//! Feedings live in one append-only `feedings` table. All access goes through
//! [`tokio_rusqlite`], which runs rusqlite calls on a background thread so the
//! async runtime never blocks on disk.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
