//! Storage adapter for named-port applications.
//!
//! Exposes a synchronous string-keyed store to an application that talks in
//! port messages. Each inbound message performs one operation, and Get
//! answers on `storageGetItemResponse`:
//!
//! - `storageGetItem` / `storageSetItem` / `storageRemoveItem` /
//!   `storageClear` map straight onto the host store, with values kept as
//!   JSON text.
//! - `storagePushToSet` / `storageRemoveFromSet` treat a stored JSON array as
//!   a set whose membership is decided by canonical JSON encoding.
//!
//! ```
//! use std::sync::Arc;
//! use kvport_adapter::{register, Ports, StorageAdapter};
//! use kvport_store::InMemoryStore;
//! use serde_json::json;
//!
//! let (mut ports, mut responses) = Ports::channel();
//! register(&mut ports, Arc::new(StorageAdapter::new(InMemoryStore::new())));
//!
//! ports.dispatch("storagePushToSet", json!(["tags", "rust"])).unwrap();
//! ports.dispatch("storageGetItem", json!("tags")).unwrap();
//! assert_eq!(responses.try_recv().unwrap().payload, json!(["tags", ["rust"]]));
//! ```

pub mod adapter;
pub mod error;
pub mod hook;
pub mod ports;
pub mod set;

pub use adapter::StorageAdapter;
pub use error::{AdapterError, AdapterResult};
pub use hook::{DiagnosticHook, NoOpHook, TracingHook};
pub use ports::{register, PortHandler, Ports};
pub use set::canonical_json;
