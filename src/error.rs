//! Error taxonomy shared by the catalog, session and persistence layers.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by tapedeck operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The granted directory cannot be opened or read.
    #[error("cannot access {}: {reason}", path.display())]
    Access { path: PathBuf, reason: String },

    /// A scan was requested while no directory grant is active.
    #[error("no directory has been granted")]
    NoGrant,

    /// The referenced track is not part of the current catalog.
    #[error("track not in catalog: {0}")]
    NotFound(String),

    /// A transport action needs a current track and there is none.
    #[error("no active track")]
    NoActiveTrack,

    /// Tags could not be read; callers degrade to placeholder metadata.
    #[error("failed to read metadata from {}: {reason}", path.display())]
    Metadata { path: PathBuf, reason: String },

    /// Writing or reading a persisted file failed.
    #[error("failed to persist {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A persisted file exists but could not be decoded.
    #[error("invalid state file {}: {reason}", path.display())]
    StateFormat { path: PathBuf, reason: String },
}

impl Error {
    pub fn access(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Access {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// True for the errors a host should answer with a retry-grant prompt.
    pub fn needs_grant(&self) -> bool {
        matches!(self, Self::Access { .. } | Self::NoGrant)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
