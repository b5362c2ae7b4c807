//! Durable key-value storage
//!
//! - **kv**: the [`KeyValueStore`] medium trait with memory and file backends
//! - **loaded**: [`Loaded`] outcomes recording whether a read fell back to defaults
//! - **error**: Error types
//!
//! # Example
//!
//! ```rust
//! use inventomatic::storage::{KeyValueStore, MemoryStore};
//!
//! let store = MemoryStore::new();
//! store.set_item("system-preferences", "{}").unwrap();
//! assert_eq!(store.get_item("system-preferences").unwrap().as_deref(), Some("{}"));
//! ```

pub mod error;
pub mod kv;
pub mod loaded;

pub use error::{StorageError, StorageResult};
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use loaded::{FallbackReason, Loaded};
