//! Native backend fixtures and the scenario matrix.

use recurve_storage::{
    InMemoryNative, LayerMode, MemoryCache, NativeStorage, Storage, StorageConfig, StorageError,
    StorageResult,
};
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// An in-memory native backend with switches for failure injection.
///
/// - `reads()` counts `get_item` calls, to observe whether a read reached it
/// - `disable()` makes every operation fail, as if storage went away
/// - [`InstrumentedNative::rejecting`] refuses writes from the start, like
///   Safari's private browsing mode
#[derive(Debug, Default)]
pub struct InstrumentedNative {
    inner: InMemoryNative,
    reads: AtomicUsize,
    disabled: AtomicBool,
    reject_writes: AtomicBool,
}

impl InstrumentedNative {
    /// Creates a working backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend that accepts reads but rejects every write.
    pub fn rejecting() -> Self {
        Self {
            reject_writes: AtomicBool::new(true),
            ..Self::default()
        }
    }

    /// Number of `get_item` calls so far.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Makes every subsequent operation fail.
    pub fn disable(&self) {
        self.disabled.store(true, Ordering::SeqCst);
    }

    /// Number of raw entries currently stored.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if no raw entries are stored.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    fn check_enabled(&self) -> StorageResult<()> {
        if self.disabled.load(Ordering::SeqCst) {
            return Err(StorageError::backend("native storage disabled"));
        }
        Ok(())
    }
}

impl NativeStorage for InstrumentedNative {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        self.check_enabled()?;
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        self.check_enabled()?;
        if self.reject_writes.load(Ordering::SeqCst) {
            return Err(StorageError::backend("QuotaExceededError: private browsing"));
        }
        self.inner.set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.check_enabled()?;
        self.inner.remove_item(key)
    }

    fn clear(&self) -> StorageResult<()> {
        self.check_enabled()?;
        self.inner.clear()
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        self.check_enabled()?;
        self.inner.keys()
    }
}

/// Facade type used by every scenario.
pub type ScenarioStorage = Storage<Rc<InstrumentedNative>, MemoryCache>;

/// One configuration of the facade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    /// Working native backend, no cache.
    Native,
    /// Working native backend with a cache in front.
    NativeWithCache,
    /// Native backend refuses writes; cache used as fallback.
    NativeUnsupported,
    /// No native backend supplied; cache used as fallback.
    NoProvider,
}

impl Scenario {
    /// Every scenario.
    pub const ALL: [Scenario; 4] = [
        Scenario::Native,
        Scenario::NativeWithCache,
        Scenario::NativeUnsupported,
        Scenario::NoProvider,
    ];

    /// The layer mode the facade should end up in.
    pub fn expected_mode(self) -> LayerMode {
        match self {
            Scenario::Native => LayerMode::NativeOnly,
            Scenario::NativeWithCache => LayerMode::Both,
            Scenario::NativeUnsupported | Scenario::NoProvider => LayerMode::CacheOnly,
        }
    }

    /// Builds a fresh facade for this scenario.
    pub fn build(self) -> TestStorage {
        let native = Rc::new(match self {
            Scenario::NativeUnsupported => InstrumentedNative::rejecting(),
            _ => InstrumentedNative::new(),
        });
        let provider = match self {
            Scenario::NoProvider => None,
            _ => Some(Rc::clone(&native)),
        };
        let with_cache = self == Scenario::NativeWithCache;

        let storage = Storage::new(
            StorageConfig::new(provider)
                .create_cache(move |supported| (!supported || with_cache).then(MemoryCache::new)),
        );

        TestStorage {
            storage,
            native,
            scenario: self,
        }
    }
}

/// A facade together with a handle to the backend it was offered.
pub struct TestStorage {
    /// The facade under test.
    pub storage: ScenarioStorage,
    /// The native backend offered at construction (possibly discarded).
    pub native: Rc<InstrumentedNative>,
    /// The scenario that built this.
    pub scenario: Scenario,
}

impl TestStorage {
    /// Returns `true` if the native backend is in use.
    pub fn native_active(&self) -> bool {
        self.storage.native().is_some()
    }

    /// Places raw text under `key` the way an outside writer would.
    ///
    /// With a native backend that is the raw string itself; without one the
    /// text goes through the facade.
    pub fn seed_raw(&self, key: &str, text: &str) {
        if self.native_active() {
            self.native
                .set_item(key, text)
                .expect("Failed to seed native storage");
        } else {
            self.storage.set(key, text).expect("Failed to seed storage");
        }
    }

    /// Collects every `(key, value)` pair visited by `for_each`.
    pub fn visited(&self) -> Vec<(String, serde_json::Value)> {
        let mut seen = Vec::new();
        self.storage
            .for_each(|value, key| seen.push((key.to_string(), value.clone())))
            .expect("for_each failed");
        seen.sort_by(|a, b| a.0.cmp(&b.0));
        seen
    }
}

impl std::ops::Deref for TestStorage {
    type Target = ScenarioStorage;

    fn deref(&self) -> &Self::Target {
        &self.storage
    }
}
