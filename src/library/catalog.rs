//! The catalog: the granted directory and the tracks found in it.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use log::{info, warn};

use crate::config::LibrarySettings;
use crate::error::{Error, Result};

use super::grant::{DirectoryCapability, GrantStore};
use super::model::Track;
use super::scan::scan;

/// Owns the single active directory grant and the ordered track list
/// produced by the last successful scan.
#[derive(Debug)]
pub struct FileCatalog {
    settings: LibrarySettings,
    grant: Option<Arc<dyn DirectoryCapability>>,
    store: Option<GrantStore>,
    tracks: Vec<Track>,
}

impl FileCatalog {
    pub fn new(settings: LibrarySettings) -> Self {
        Self {
            settings,
            grant: None,
            store: None,
            tracks: Vec::new(),
        }
    }

    /// Persist grants through `store` from now on.
    pub fn with_store(mut self, store: GrantStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn grant_location(&self) -> Option<&Path> {
        self.grant.as_deref().map(|g| g.location())
    }

    /// Re-install the grant saved by an earlier run.
    ///
    /// Returns `Ok(false)` when nothing was saved. A stale grant is kept
    /// installed but reported as an access error, so a later rescan can
    /// succeed once the directory is back.
    pub fn restore_grant(&mut self) -> Result<bool> {
        let Some(store) = &self.store else {
            return Ok(false);
        };
        let Some(bookmark) = store.load()? else {
            return Ok(false);
        };

        let dir = bookmark.resolve();
        let validated = dir.validate();
        self.grant = Some(Arc::new(dir));
        validated.map(|()| true)
    }

    /// Replace the current grant with `dir` and scan it.
    ///
    /// On failure neither the previous grant nor the catalog change.
    pub fn grant(&mut self, dir: impl DirectoryCapability + 'static) -> Result<&[Track]> {
        let tracks = scan(&dir, &self.settings)?;
        self.install_grant(Arc::new(dir));
        self.tracks = tracks;
        Ok(&self.tracks)
    }

    /// Replace the current grant with `dir` and start scanning it in the
    /// background. Validation happens up front so an unreadable directory is
    /// rejected before anything is replaced.
    pub fn grant_in_background(
        &mut self,
        dir: impl DirectoryCapability + 'static,
    ) -> Result<PendingScan> {
        dir.validate()?;
        self.install_grant(Arc::new(dir));
        self.begin_rescan()
    }

    /// Rescan the granted directory synchronously.
    pub fn rescan(&mut self) -> Result<&[Track]> {
        let dir = self.grant.clone().ok_or(Error::NoGrant)?;
        let tracks = scan(dir.as_ref(), &self.settings)?;
        self.tracks = tracks;
        Ok(&self.tracks)
    }

    /// Start a rescan on a worker thread. Hand the outcome to
    /// [`FileCatalog::finish_rescan`] once [`PendingScan::poll`] yields it.
    pub fn begin_rescan(&self) -> Result<PendingScan> {
        let dir = self.grant.clone().ok_or(Error::NoGrant)?;
        let settings = self.settings.clone();
        let location = dir.location().to_path_buf();
        let (tx, rx) = mpsc::channel();

        thread::Builder::new()
            .name("tapedeck-scan".to_string())
            .spawn(move || {
                let _ = tx.send(scan(dir.as_ref(), &settings));
            })
            .map_err(|e| Error::access(&location, e))?;

        Ok(PendingScan { rx, location })
    }

    /// Install the outcome of a background scan. Errors leave the catalog
    /// exactly as it was.
    pub fn finish_rescan(&mut self, result: Result<Vec<Track>>) -> Result<&[Track]> {
        self.tracks = result?;
        Ok(&self.tracks)
    }

    /// Case-insensitive substring match on track names, in catalog order.
    /// An empty query returns the whole catalog.
    pub fn search(&self, query: &str) -> Vec<&Track> {
        if query.is_empty() {
            return self.tracks.iter().collect();
        }
        let needle = query.to_lowercase();
        self.tracks
            .iter()
            .filter(|t| t.name.to_lowercase().contains(&needle))
            .collect()
    }

    fn install_grant(&mut self, dir: Arc<dyn DirectoryCapability>) {
        if let Some(store) = &self.store {
            if let Err(e) = store.save(&dir.bookmark()) {
                warn!("grant for {} not persisted: {e}", dir.location().display());
            }
        }
        info!("granted {}", dir.location().display());
        self.grant = Some(dir);
    }
}

/// A scan running on a worker thread.
#[derive(Debug)]
pub struct PendingScan {
    rx: Receiver<Result<Vec<Track>>>,
    location: PathBuf,
}

impl PendingScan {
    /// Non-blocking check for completion.
    pub fn poll(&self) -> Option<Result<Vec<Track>>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(self.worker_gone())),
        }
    }

    /// Block until the scan completes.
    pub fn wait(self) -> Result<Vec<Track>> {
        self.rx.recv().unwrap_or_else(|_| Err(self.worker_gone()))
    }

    fn worker_gone(&self) -> Error {
        Error::access(&self.location, "scan worker exited without a result")
    }
}
