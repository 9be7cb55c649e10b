//! Persistence of the last-played track identifier.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::store;

/// Where the session keeps the last-played identifier between runs.
pub trait LastPlayedStore: Send {
    fn load(&self) -> Option<String>;
    fn save(&self, id: &str) -> Result<()>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedState {
    last_played: Option<String>,
}

/// TOML state file, e.g. `~/.local/state/tapedeck/state.toml`.
#[derive(Debug, Clone)]
pub struct StateFile {
    path: PathBuf,
}

impl StateFile {
    pub const FILE_NAME: &'static str = "state.toml";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(Self::FILE_NAME))
    }

    fn read(&self) -> Result<PersistedState> {
        let Some(text) = store::read_optional(&self.path)? else {
            return Ok(PersistedState::default());
        };
        toml::from_str(&text).map_err(|e| Error::StateFormat {
            path: self.path.clone(),
            reason: e.to_string(),
        })
    }
}

impl LastPlayedStore for StateFile {
    fn load(&self) -> Option<String> {
        match self.read() {
            Ok(state) => state.last_played,
            Err(e) => {
                log::warn!("ignoring session state: {e}");
                None
            }
        }
    }

    fn save(&self, id: &str) -> Result<()> {
        let state = PersistedState {
            last_played: Some(id.to_string()),
        };
        let text = toml::to_string(&state).map_err(|e| Error::StateFormat {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;
        store::write_replace(&self.path, text.as_bytes())
    }
}

/// Process-local store, used when no state directory is available.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    value: Arc<Mutex<Option<String>>>,
}

impl MemoryStore {
    pub fn with_value(id: &str) -> Self {
        Self {
            value: Arc::new(Mutex::new(Some(id.to_string()))),
        }
    }
}

impl LastPlayedStore for MemoryStore {
    fn load(&self) -> Option<String> {
        self.value.lock().ok().and_then(|v| v.clone())
    }

    fn save(&self, id: &str) -> Result<()> {
        if let Ok(mut v) = self.value.lock() {
            *v = Some(id.to_string());
        }
        Ok(())
    }
}
