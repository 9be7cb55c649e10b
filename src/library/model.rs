use std::path::{Path, PathBuf};

/// A playable file discovered in the granted directory.
///
/// `path` is the resolved absolute path and acts as the identifier; `name`
/// is the last path segment as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub path: PathBuf,
    pub name: String,
}

impl Track {
    /// Build a track whose display name is taken from `path` itself.
    pub fn from_path(path: PathBuf) -> Self {
        let name = display_name(&path);
        Self { path, name }
    }

    /// Build a track identified by `path` but named after `entry`, the
    /// path it was found under (they differ for symlinks).
    pub fn resolved(path: PathBuf, entry: &Path) -> Self {
        Self {
            name: display_name(entry),
            path,
        }
    }

    /// Stable identifier used for persistence and membership checks.
    pub fn id(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }

    /// True when `key` names this track, either by identifier or by the
    /// bare file name older state files stored.
    pub fn matches_key(&self, key: &str) -> bool {
        self.id() == key || self.name == key
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
