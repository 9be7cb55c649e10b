//! Directory grants: the capability to read one directory, and the
//! on-disk bookmark that lets a grant survive restarts.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::config::LibrarySettings;
use crate::error::{Error, Result};
use crate::store;

/// A revocable capability to read a single directory.
pub trait DirectoryCapability: fmt::Debug + Send + Sync {
    /// Where the capability points.
    fn location(&self) -> &Path;

    /// Check the directory can still be opened for reading.
    fn validate(&self) -> Result<()>;

    /// Enumerate the regular files directly inside the directory, in
    /// enumeration order.
    fn open(&self, settings: &LibrarySettings) -> Result<Vec<PathBuf>>;

    /// The persistable form of this capability.
    fn bookmark(&self) -> Bookmark {
        Bookmark {
            path: self.location().to_path_buf(),
        }
    }
}

/// A plain filesystem directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalDirectory {
    path: PathBuf,
}

impl LocalDirectory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

impl DirectoryCapability for LocalDirectory {
    fn location(&self) -> &Path {
        &self.path
    }

    fn validate(&self) -> Result<()> {
        let meta = fs::metadata(&self.path).map_err(|e| Error::access(&self.path, e))?;
        if !meta.is_dir() {
            return Err(Error::access(&self.path, "not a directory"));
        }
        fs::read_dir(&self.path).map_err(|e| Error::access(&self.path, e))?;
        Ok(())
    }

    fn open(&self, settings: &LibrarySettings) -> Result<Vec<PathBuf>> {
        let walker = WalkDir::new(&self.path)
            .follow_links(settings.follow_links)
            .min_depth(1)
            .max_depth(1);

        let mut files = Vec::new();
        for entry in walker
            .into_iter()
            .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        {
            let entry = match entry {
                Ok(entry) => entry,
                // The root itself failed: the grant is no longer usable.
                Err(err) if err.depth() == 0 => {
                    return Err(Error::access(&self.path, err));
                }
                Err(err) => {
                    debug!("skipping unreadable entry in {}: {}", self.path.display(), err);
                    continue;
                }
            };
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }
}

/// The persisted form of a grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub path: PathBuf,
}

impl Bookmark {
    pub fn resolve(&self) -> LocalDirectory {
        LocalDirectory::new(&self.path)
    }
}

/// Keeps exactly one bookmark on disk; saving replaces whatever was there.
#[derive(Debug, Clone)]
pub struct GrantStore {
    path: PathBuf,
}

impl GrantStore {
    pub const FILE_NAME: &'static str = "grant.toml";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(Self::FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self, bookmark: &Bookmark) -> Result<()> {
        let text = toml::to_string(bookmark).map_err(|e| Error::StateFormat {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;
        store::write_replace(&self.path, text.as_bytes())
    }

    /// Load the stored bookmark, if any. A bookmark that no longer resolves
    /// is still returned; validating it is the caller's job.
    pub fn load(&self) -> Result<Option<Bookmark>> {
        let Some(text) = store::read_optional(&self.path)? else {
            return Ok(None);
        };
        toml::from_str(&text)
            .map(Some)
            .map_err(|e| Error::StateFormat {
                path: self.path.clone(),
                reason: e.to_string(),
            })
    }
}
