//! # Recurve Storage WASM
//!
//! Browser bindings for recurve storage.
//!
//! This crate provides:
//! - [`WebStorage`], a native backend over `window.localStorage` or
//!   `window.sessionStorage`
//! - The durable and session specializations: [`local_storage`] and
//!   [`session_storage`]
//! - Adapters for JS provider and cache objects
//! - JavaScript classes `Storage`, `LocalStorage` and `SessionStorage`
//!
//! ## Usage from Rust
//!
//! ```rust,ignore
//! use recurve_storage::StorageConfig;
//! use recurve_storage_wasm::{local_storage, WebStorage};
//!
//! // Cache only when localStorage refuses writes (private browsing).
//! let storage = local_storage(StorageConfig::<WebStorage>::new(None).cache_if_unsupported());
//! storage.set("theme", "dark")?;
//! ```
//!
//! ## Usage from JavaScript
//!
//! ```javascript
//! import init, { SessionStorage } from 'recurve_storage_wasm';
//!
//! await init();
//! const session = new SessionStorage();
//! session.set("draft", { body: "..." });
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod bindings;
mod error;
mod presets;
mod utils;

pub use backend::{CacheLayer, JsCache, JsProvider, Provider, StorageArea, WebStorage};
pub use bindings::*;
pub use error::*;
pub use presets::{local_storage, session_storage, LocalStorage, SessionStorage};

use wasm_bindgen::prelude::*;

/// Initialize the WASM module.
///
/// This sets up panic hooks for better error messages in the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    utils::set_panic_hook();
}
