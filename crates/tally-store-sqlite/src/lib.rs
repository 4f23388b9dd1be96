//! SQLite backend for the tally workforce store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated
//! thread without blocking the async runtime. That single worker thread is
//! also what makes every operation's check-then-act sequence serializable:
//! each one runs inside one transaction on the store's one connection.

mod encode;
mod schema;
mod store;

pub use store::SqliteStore;
