use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::data::bucket::random_buckets;
use crate::data::label::label_from_path;
use crate::error::{NetworkError, Result};
use crate::math::GaussianRng;

/// Regular files found below a directory, in sorted order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileList {
    paths: Vec<PathBuf>,
}

impl FileList {
    /// Recursively lists every regular file under `dir`, following symlinks.
    ///
    /// Each directory is entered once, keyed by its canonical path, so
    /// symlink cycles do not duplicate files.
    ///
    /// Entries that cannot be inspected are skipped with a warning; only a
    /// root that cannot be opened is an error.
    pub fn collect(dir: impl AsRef<Path>) -> Result<FileList> {
        let dir = dir.as_ref();
        let root = fs::read_dir(dir).map_err(|e| NetworkError::io(dir, e))?;

        let mut visited = HashSet::new();
        if let Ok(canonical) = fs::canonicalize(dir) {
            visited.insert(canonical);
        }

        let mut paths = Vec::new();
        let mut pending = vec![root];
        while let Some(entries) = pending.pop() {
            for entry in entries {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        warn!("Could not read directory entry: {e}. Skipping...");
                        continue;
                    }
                };
                let path = entry.path();
                // fs::metadata follows symlinks.
                let metadata = match fs::metadata(&path) {
                    Ok(metadata) => metadata,
                    Err(e) => {
                        warn!("Could not get file info for \"{}\": {e}. Skipping...", path.display());
                        continue;
                    }
                };
                if metadata.is_dir() {
                    match fs::canonicalize(&path) {
                        Ok(canonical) if !visited.insert(canonical.clone()) => {
                            warn!("Directory \"{}\" was already visited. Skipping...", path.display());
                            continue;
                        }
                        Ok(_) => {}
                        Err(e) => {
                            warn!("Could not resolve \"{}\": {e}. Skipping...", path.display());
                            continue;
                        }
                    }
                    match fs::read_dir(&path) {
                        Ok(sub) => pending.push(sub),
                        Err(e) => warn!("Could not open directory \"{}\": {e}", path.display()),
                    }
                } else if metadata.is_file() {
                    paths.push(path);
                }
            }
        }

        paths.sort();
        debug!("Found {} files under \"{}\"", paths.len(), dir.display());
        Ok(FileList { paths })
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Shuffled slices of at most `batch_size` files, drawn without
    /// replacement.
    pub fn random_buckets(&self, batch_size: usize, rng: &mut GaussianRng) -> Vec<Vec<&Path>> {
        random_buckets(self.paths.len(), batch_size, rng)
            .into_iter()
            .map(|bucket| bucket.into_iter().map(|i| self.paths[i].as_path()).collect())
            .collect()
    }

    /// The first `limit` paths with their labels, for quick inspection.
    pub fn preview(&self, limit: usize) -> Vec<(Option<usize>, &Path)> {
        self.paths
            .iter()
            .take(limit)
            .map(|p| (label_from_path(p).ok(), p.as_path()))
            .collect()
    }
}
