//! # Recurve Testkit
//!
//! Test utilities for recurve storage.
//!
//! This crate provides:
//! - Native backend fixtures that count reads, refuse writes, or can be
//!   switched off mid-test
//! - The configuration matrix every behavioral test runs against
//! - Property-based generators for keys and stored values
//!
//! ## Usage
//!
//! ```rust
//! use recurve_testkit::prelude::*;
//!
//! for scenario in Scenario::ALL {
//!     let t = scenario.build();
//!     t.storage.set("a", &1).unwrap();
//!     assert_eq!(t.storage.get("a").unwrap(), Some(serde_json::json!(1)));
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
}

pub use fixtures::*;
pub use generators::*;
