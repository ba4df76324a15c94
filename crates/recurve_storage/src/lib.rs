//! # Recurve Storage
//!
//! A key/value facade over browser-style storage (`localStorage`,
//! `sessionStorage`, or anything with the same contract) that stores JSON
//! values and can put an in-memory cache in front of, or instead of, the
//! native backend.
//!
//! ## Design Principles
//!
//! - Native backends are plain string stores; the facade owns encoding
//! - Native support is probed with a real write, not assumed from presence
//! - The active layers are fixed at construction ([`LayerMode`])
//! - Failures while probing degrade; failures afterwards propagate
//!
//! ## Available Layers
//!
//! - [`NativeStorage`] - the backend contract, with [`InMemoryNative`] for tests
//! - [`Cache`] - the cache contract, with the unbounded [`MemoryCache`]
//!
//! ## Example
//!
//! ```rust
//! use recurve_storage::{InMemoryNative, Storage, StorageConfig};
//! use serde_json::json;
//!
//! let storage = Storage::new(
//!     StorageConfig::with_provider(InMemoryNative::new()).cache_if_unsupported(),
//! );
//!
//! storage.set("user", &json!({"name": "ada"})).unwrap();
//! assert_eq!(storage.get("user").unwrap(), Some(json!({"name": "ada"})));
//! assert_eq!(storage.get("missing").unwrap(), None);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod cache;
mod config;
mod error;
mod id;
mod memory;
mod probe;
mod storage;

pub use backend::NativeStorage;
pub use cache::{Cache, MemoryCache};
pub use config::{CacheFactory, StorageConfig};
pub use error::{StorageError, StorageResult};
pub use id::{probe_key, DEFAULT_PROBE_PREFIX};
pub use memory::InMemoryNative;
pub use probe::{probe_native_write, Supported, Unsupported};
pub use recurve_codec::Value;
pub use storage::{LayerMode, Storage};
