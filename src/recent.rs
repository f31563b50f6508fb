// ── Recent files ring ─────────────────────────────────────────────────────────
//
// Bounded most-recent-first list of file paths.  Stored inside
// `Preferences`; it has no persistence path of its own.  Only paths that are
// valid UTF-8 are kept, since the settings file is JSON.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Maximum number of entries kept in the ring.
pub const MAX_RECENT_FILES: usize = 5;

/// Most-recently-opened file paths, most recent first, no duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<PathBuf>", into = "Vec<PathBuf>")]
pub struct RecentFiles {
    paths: Vec<PathBuf>,
}

impl RecentFiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move `path` to the front, inserting it if absent, and drop the oldest
    /// entries beyond `MAX_RECENT_FILES`.  A path that is not valid UTF-8 is
    /// not recorded.
    pub fn record_opened(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        if path.to_str().is_none() {
            warn!(path = %path.display(), "not adding non-UTF-8 path to recent files");
            return;
        }
        self.paths.retain(|p| *p != path);
        self.paths.insert(0, path);
        self.paths.truncate(MAX_RECENT_FILES);
    }

    pub fn clear(&mut self) {
        self.paths.clear();
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Path> {
        self.paths.get(index).map(PathBuf::as_path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter().map(PathBuf::as_path)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.paths.iter().any(|p| p == path)
    }

    /// Menu labels: the bare file name of each entry, falling back to the
    /// full path when there is no file name component.
    pub fn labels(&self) -> Vec<String> {
        self.paths
            .iter()
            .map(|p| {
                p.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| p.display().to_string())
            })
            .collect()
    }
}

impl From<Vec<PathBuf>> for RecentFiles {
    /// Build a ring from a stored list.  The list is taken as already ordered
    /// most-recent-first; later duplicates and overflow are dropped.
    fn from(stored: Vec<PathBuf>) -> Self {
        let mut paths: Vec<PathBuf> = Vec::with_capacity(MAX_RECENT_FILES);
        for p in stored {
            if paths.len() == MAX_RECENT_FILES {
                break;
            }
            if p.to_str().is_some() && !paths.contains(&p) {
                paths.push(p);
            }
        }
        Self { paths }
    }
}

impl From<RecentFiles> for Vec<PathBuf> {
    fn from(ring: RecentFiles) -> Self {
        ring.paths
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
