//! Audio-related small types and handles.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug)]
pub enum AudioCmd {
    /// Replace the loaded file; start playing immediately when `autoplay`.
    Load { path: PathBuf, autoplay: bool },
    /// Resume the loaded file.
    Resume,
    /// Pause the loaded file.
    Pause,
    /// Unload the current file.
    Stop,
    /// Shut the audio thread down.
    Quit,
}

/// Runtime playback information shared with the UI.
#[derive(Debug, Clone, Default)]
pub struct PlaybackInfo {
    /// File currently loaded in the output.
    pub path: Option<PathBuf>,
    /// Elapsed playback time for the loaded file.
    pub elapsed: Duration,
    /// Whether audio is currently coming out.
    pub playing: bool,
    /// Set when the loaded file played to its end; cleared by the reader.
    pub finished: bool,
    /// Why the last load failed, if it did.
    pub error: Option<String>,
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;
