//! SQLite backend for the Siteline RFI store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated
//! thread without blocking the async runtime. The database is used as a
//! best-effort key-value blob store: one row per RFI, the whole entity as a
//! JSON body. No ACID guarantees beyond what a single upsert gives.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
