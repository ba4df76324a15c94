//! Facade configuration.

use crate::cache::MemoryCache;
use crate::id::DEFAULT_PROBE_PREFIX;
use std::fmt;

/// Factory deciding the cache layer from the probe outcome.
///
/// Called once at construction with `true` if the native backend accepted
/// writes.
pub type CacheFactory<C> = Box<dyn FnOnce(bool) -> Option<C>>;

/// Configuration for constructing a [`crate::Storage`].
///
/// `N` is the native backend type and `C` the cache type.
pub struct StorageConfig<N, C = MemoryCache> {
    /// Candidate native backend. May be absent or refuse writes.
    pub provider: Option<N>,

    /// Factory for the cache layer.
    pub create_cache: Option<CacheFactory<C>>,

    /// Prefix of the throwaway key written by the support probe.
    pub probe_prefix: String,
}

impl<N> StorageConfig<N, MemoryCache> {
    /// Creates a configuration with the given candidate backend and no cache.
    #[must_use]
    pub fn new(provider: Option<N>) -> Self {
        Self {
            provider,
            create_cache: None,
            probe_prefix: DEFAULT_PROBE_PREFIX.to_string(),
        }
    }

    /// Creates a configuration for a backend that is known to exist.
    #[must_use]
    pub fn with_provider(provider: N) -> Self {
        Self::new(Some(provider))
    }

    /// Uses a [`MemoryCache`] only when the native backend is unsupported.
    #[must_use]
    pub fn cache_if_unsupported(self) -> Self {
        self.create_cache(|supported| (!supported).then(MemoryCache::new))
    }

    /// Uses a [`MemoryCache`] regardless of native support.
    #[must_use]
    pub fn always_cache(self) -> Self {
        self.create_cache(|_| Some(MemoryCache::new()))
    }
}

impl<N, C> StorageConfig<N, C> {
    /// Sets the cache factory, replacing any previous one.
    #[must_use]
    pub fn create_cache<C2, F>(self, factory: F) -> StorageConfig<N, C2>
    where
        F: FnOnce(bool) -> Option<C2> + 'static,
    {
        StorageConfig {
            provider: self.provider,
            create_cache: Some(Box::new(factory)),
            probe_prefix: self.probe_prefix,
        }
    }

    /// Sets the candidate native backend.
    #[must_use]
    pub fn provider(mut self, provider: N) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Sets the backend only if none was configured.
    #[must_use]
    pub fn or_provider(mut self, fallback: Option<N>) -> Self {
        if self.provider.is_none() {
            self.provider = fallback;
        }
        self
    }

    /// Sets the probe key prefix.
    #[must_use]
    pub fn probe_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.probe_prefix = prefix.into();
        self
    }
}

impl<N, C> fmt::Debug for StorageConfig<N, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageConfig")
            .field("provider", &self.provider.is_some())
            .field("create_cache", &self.create_cache.is_some())
            .field("probe_prefix", &self.probe_prefix)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryNative;

    #[test]
    fn default_config() {
        let config = StorageConfig::<InMemoryNative>::new(None);
        assert!(config.provider.is_none());
        assert!(config.create_cache.is_none());
        assert_eq!(config.probe_prefix, "_recurve");
    }

    #[test]
    fn builder_pattern() {
        let config = StorageConfig::new(None)
            .provider(InMemoryNative::new())
            .probe_prefix("_probe")
            .always_cache();

        assert!(config.provider.is_some());
        assert!(config.create_cache.is_some());
        assert_eq!(config.probe_prefix, "_probe");
    }

    #[test]
    fn or_provider_keeps_explicit_provider() {
        let explicit = InMemoryNative::with_entries([("explicit", "1")]);
        let config = StorageConfig::with_provider(explicit)
            .or_provider(Some(InMemoryNative::new()));

        assert_eq!(config.provider.unwrap().len(), 1);
    }

    #[test]
    fn or_provider_fills_missing_provider() {
        let config = StorageConfig::new(None).or_provider(Some(InMemoryNative::new()));
        assert!(config.provider.is_some());
    }

    #[test]
    fn cache_if_unsupported_factory() {
        let factory = StorageConfig::<InMemoryNative>::new(None)
            .cache_if_unsupported()
            .create_cache
            .unwrap();
        assert!(factory(false).is_some());

        let factory = StorageConfig::<InMemoryNative>::new(None)
            .cache_if_unsupported()
            .create_cache
            .unwrap();
        assert!(factory(true).is_none());
    }
}
