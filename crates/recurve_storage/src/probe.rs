//! Native backend support detection.
//!
//! A backend can exist and still refuse every write (Safari private browsing
//! exposes `localStorage` but throws on `setItem`). Presence is therefore
//! not enough: the probe writes and removes a throwaway key and reports the
//! outcome as a value instead of an error.

use crate::backend::NativeStorage;
use crate::id::probe_key;

/// The backend accepted a scoped write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Supported;

/// The backend is missing or refused the probe write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unsupported {
    /// Why the backend was rejected.
    pub reason: String,
}

/// Writes then removes a unique key prefixed with `prefix`.
///
/// Any failure during either step yields [`Unsupported`]; nothing is
/// propagated to the caller.
pub fn probe_native_write<N: NativeStorage + ?Sized>(
    backend: &N,
    prefix: &str,
) -> Result<Supported, Unsupported> {
    let key = probe_key(prefix);
    backend
        .set_item(&key, "")
        .and_then(|()| backend.remove_item(&key))
        .map(|()| Supported)
        .map_err(|e| Unsupported {
            reason: e.to_string(),
        })
}

/// Probes an optional backend, keeping it only when it accepts writes.
pub(crate) fn retain_supported<N: NativeStorage>(
    provider: Option<N>,
    prefix: &str,
) -> Result<N, Unsupported> {
    let provider = provider.ok_or_else(|| Unsupported {
        reason: "no provider supplied".to_string(),
    })?;
    probe_native_write(&provider, prefix).map(|Supported| provider)
}
