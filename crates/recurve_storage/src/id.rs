//! Throwaway key generation for the support probe.

use uuid::Uuid;

/// Default prefix of the probe key.
pub const DEFAULT_PROBE_PREFIX: &str = "_recurve";

/// Builds a unique probe key: `prefix` followed by a random v4 UUID.
///
/// The UUID keeps the key from colliding with anything a caller stored.
#[must_use]
pub fn probe_key(prefix: &str) -> String {
    format!("{prefix}{}", Uuid::new_v4().hyphenated())
}
