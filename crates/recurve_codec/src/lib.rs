//! # Recurve Codec
//!
//! Transport encoding for values held by recurve storage.
//!
//! Native web storage only holds strings, so every value written through the
//! storage facade is converted to JSON text on the way in and parsed back on
//! the way out. Caches hold decoded [`Value`]s directly.
//!
//! ## Rules
//!
//! - Encoding an absent value yields no text at all, never `"undefined"`
//! - Decoding only parses text; values that are already decoded pass through
//! - Malformed text is an error here; the facade decides how to degrade
//!
//! ## Usage
//!
//! ```
//! use recurve_codec::{decode, encode, Value};
//! use serde_json::json;
//!
//! let value = json!({"b": "c"});
//! let text = encode(Some(&value)).unwrap().unwrap();
//! assert_eq!(text, r#"{"b":"c"}"#);
//!
//! let decoded = decode(Value::String(text)).unwrap();
//! assert_eq!(decoded, value);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod decoder;
mod encoder;
mod error;

pub use decoder::{decode, decode_or_raw, decode_text, from_value};
pub use encoder::{encode, to_value};
pub use error::{CodecError, CodecResult};
pub use serde_json::Value;
