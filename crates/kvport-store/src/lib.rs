//! Host key-value storage for the kvport storage adapter.
//!
//! The adapter never talks to a storage medium directly. It consumes a flat,
//! string-keyed, string-valued store shaped like the browser `Storage`
//! facility: get, set, remove, clear. This crate defines that contract and
//! ships the hosts the adapter runs on outside a browser.
//!
//! # Storage Backends
//!
//! All backends implement the [`KeyValueStore`] trait:
//!
//! - [`InMemoryStore`] -- `HashMap`-based store for tests and embedding,
//!   optionally bounded by a byte quota
//! - [`FileStore`] -- one JSON file, rewritten atomically on every mutation
//!
//! # Design Rules
//!
//! 1. The store never interprets values -- they are opaque strings.
//! 2. Every single call is atomic; read-modify-write sequences are not.
//! 3. Capacity and I/O failures are propagated, never silently ignored.

pub mod error;
pub mod file;
pub mod memory;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use error::{StoreError, StoreResult};
pub use file::FileStore;
pub use memory::InMemoryStore;
pub use traits::KeyValueStore;
