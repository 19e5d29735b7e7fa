use std::path::Path;
use vprof_core::{loader, DataLoadError, Dataset, LoadOptions};

/// Where the cache gets datasets from.
pub trait DatasetSource: Send + Sync {
    fn load(&self, path: &Path, options: &LoadOptions) -> Result<Dataset, DataLoadError>;
}

/// Reads CSV (or gzipped CSV) files from disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileSource;

impl DatasetSource for FileSource {
    fn load(&self, path: &Path, options: &LoadOptions) -> Result<Dataset, DataLoadError> {
        loader::load(path, options)
    }
}
