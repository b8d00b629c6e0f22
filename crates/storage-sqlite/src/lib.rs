//! SQLite persistence for Satchel offline sync.

mod kv;

pub use kv::SqliteKvStore;
