//! In-memory dataset cache for vertical profile data.
//!
//! Loading and sanitising the source spreadsheet is the only expensive
//! step of the pipeline, so the loaded [`Dataset`] is memoized per source
//! path and shared read-only behind an `Arc`.
//!
//! # Architecture
//!
//! - [`DatasetCache`] is a service object built once at startup and cloned
//!   (cheaply, via `Arc`) into every caller that needs the data.
//! - Each source path owns a slot guarded by its own `Mutex`. The first
//!   caller loads while holding the slot lock; concurrent callers for the
//!   same path block on that lock and then read the stored result, so a
//!   path is never loaded twice at once. Different paths load independently.
//! - There is no TTL. Entries live until [`DatasetCache::invalidate`] or
//!   [`DatasetCache::clear`].
//! - Failed loads are not cached; the next call retries.
//!
//! # Usage
//!
//! ```no_run
//! use vprof_core::LoadOptions;
//! use vprof_store::DatasetCache;
//!
//! let cache = DatasetCache::new(LoadOptions::default());
//! let dataset = cache.get_or_load("VerticalProfiles_with_thermocline_chloro.csv")?;
//! println!("{} samples", dataset.len());
//! # Ok::<(), vprof_core::DataLoadError>(())
//! ```

mod source;

pub use source::{DatasetSource, FileSource};

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use vprof_core::{DataLoadError, Dataset, LoadOptions};

type Slot = Arc<Mutex<Option<Arc<Dataset>>>>;

/// Process-wide dataset memo, keyed by source path.
///
/// Cloning shares the same underlying entries.
#[derive(Clone)]
pub struct DatasetCache {
    options: LoadOptions,
    source: Arc<dyn DatasetSource>,
    entries: Arc<Mutex<HashMap<PathBuf, Slot>>>,
}

/// Lock a mutex, recovering the data if another holder panicked.
///
/// Cached values are only ever replaced whole, so a poisoned lock still
/// guards a consistent value.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn cache_key(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

impl DatasetCache {
    /// Create an empty cache that reads files from disk.
    pub fn new(options: LoadOptions) -> Self {
        Self::with_source(options, Arc::new(FileSource))
    }

    /// Create an empty cache backed by a custom source.
    pub fn with_source(options: LoadOptions, source: Arc<dyn DatasetSource>) -> Self {
        Self {
            options,
            source,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    /// Return the cached dataset for `path`, loading it on first use.
    pub fn get_or_load(&self, path: impl AsRef<Path>) -> Result<Arc<Dataset>, DataLoadError> {
        let key = cache_key(path.as_ref());
        let slot = {
            let mut entries = lock(&self.entries);
            Arc::clone(entries.entry(key.clone()).or_default())
        };

        let mut cached = lock(&slot);
        if let Some(dataset) = cached.as_ref() {
            log::debug!("cache: hit for {}", key.display());
            return Ok(Arc::clone(dataset));
        }

        log::info!("cache: loading {}", key.display());
        match self.source.load(&key, &self.options) {
            Ok(dataset) => {
                let dataset = Arc::new(dataset);
                *cached = Some(Arc::clone(&dataset));
                // A failed load by an earlier holder may have detached this slot
                lock(&self.entries)
                    .entry(key)
                    .or_insert_with(|| Arc::clone(&slot));
                Ok(dataset)
            }
            Err(err) => {
                let mut entries = lock(&self.entries);
                if entries.get(&key).is_some_and(|s| Arc::ptr_eq(s, &slot)) {
                    entries.remove(&key);
                }
                log::warn!("cache: failed to load {}: {}", key.display(), err);
                Err(err)
            }
        }
    }

    /// Number of paths with an entry.
    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a loaded dataset is currently cached for `path`.
    pub fn is_cached(&self, path: impl AsRef<Path>) -> bool {
        let key = cache_key(path.as_ref());
        let slot = lock(&self.entries).get(&key).cloned();
        slot.is_some_and(|slot| {
            let cached = lock(&slot);
            cached.is_some()
        })
    }

    /// Drop the entry for `path`. Returns true if one existed.
    pub fn invalidate(&self, path: impl AsRef<Path>) -> bool {
        let key = cache_key(path.as_ref());
        let removed = lock(&self.entries).remove(&key).is_some();
        if removed {
            log::info!("cache: invalidated {}", key.display());
        }
        removed
    }

    /// Drop every entry.
    pub fn clear(&self) {
        let mut entries = lock(&self.entries);
        log::info!("cache: cleared {} entries", entries.len());
        entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    const CSV: &str = "\
StationNewName,Latitude,Longitude,WaterPeriod,DayPeriod,SheetID,Profondeur,Temp
A12,48.39,-4.49,LW,AM,1,0.5,12.3
A12,48.39,-4.49,LW,AM,1,1.0,12.1
";

    /// Serves `CSV` for any path and counts how often it is asked to.
    #[derive(Default)]
    struct CountingSource {
        loads: AtomicUsize,
    }

    impl DatasetSource for CountingSource {
        fn load(&self, _path: &Path, options: &LoadOptions) -> Result<Dataset, DataLoadError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(50));
            vprof_core::loader::load_str(CSV, options)
        }
    }

    #[test]
    fn cache_returns_same_instance() {
        let source = Arc::new(CountingSource::default());
        let cache = DatasetCache::with_source(LoadOptions::default(), source.clone());

        let first = cache.get_or_load("profiles.csv").unwrap();
        let second = cache.get_or_load("profiles.csv").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(source.loads.load(Ordering::SeqCst), 1);
        assert!(cache.is_cached("profiles.csv"));
    }

    #[test]
    fn concurrent_first_callers_load_once() {
        let source = Arc::new(CountingSource::default());
        let cache = DatasetCache::with_source(LoadOptions::default(), source.clone());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = cache.clone();
                thread::spawn(move || cache.get_or_load("profiles.csv").unwrap())
            })
            .collect();
        let results: Vec<Arc<Dataset>> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(source.loads.load(Ordering::SeqCst), 1);
        assert!(results.iter().all(|d| Arc::ptr_eq(d, &results[0])));
    }

    #[test]
    fn distinct_paths_are_cached_separately() {
        let source = Arc::new(CountingSource::default());
        let cache = DatasetCache::with_source(LoadOptions::default(), source.clone());

        cache.get_or_load("a.csv").unwrap();
        cache.get_or_load("b.csv").unwrap();
        assert_eq!(source.loads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn invalidate_forces_reload() {
        let source = Arc::new(CountingSource::default());
        let cache = DatasetCache::with_source(LoadOptions::default(), source.clone());

        let first = cache.get_or_load("profiles.csv").unwrap();
        assert!(cache.invalidate("profiles.csv"));
        assert!(!cache.invalidate("profiles.csv"));
        assert!(!cache.is_cached("profiles.csv"));

        let second = cache.get_or_load("profiles.csv").unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(source.loads.load(Ordering::SeqCst), 2);

        cache.clear();
        assert!(!cache.is_cached("profiles.csv"));
    }

    #[test]
    fn failed_load_is_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profiles.csv");
        let cache = DatasetCache::new(LoadOptions::default());

        assert!(matches!(
            cache.get_or_load(&path),
            Err(DataLoadError::Io { .. })
        ));
        assert!(!cache.is_cached(&path));
        assert!(cache.is_empty(), "failed load leaves no slot behind");

        std::fs::write(&path, CSV).unwrap();
        let dataset = cache.get_or_load(&path).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(cache.len(), 1);
    }

    /// Fails for every path.
    struct FailingSource;

    impl DatasetSource for FailingSource {
        fn load(&self, path: &Path, _options: &LoadOptions) -> Result<Dataset, DataLoadError> {
            Err(DataLoadError::Io {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
            })
        }
    }

    #[test]
    fn failed_loads_do_not_accumulate_entries() {
        let cache = DatasetCache::with_source(LoadOptions::default(), Arc::new(FailingSource));
        for name in ["a.csv", "b.csv", "c.csv", "a.csv"] {
            assert!(cache.get_or_load(name).is_err());
        }
        assert_eq!(cache.len(), 0);
        assert!(!cache.invalidate("a.csv"));
    }
}
