use std::path::PathBuf;
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use super::thread::spawn_audio_thread;
use super::types::{AudioCmd, PlaybackHandle, PlaybackInfo};

pub struct AudioPlayer {
    tx: Sender<AudioCmd>,
    playback: PlaybackHandle,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl AudioPlayer {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let playback: PlaybackHandle = Arc::new(Mutex::new(PlaybackInfo::default()));
        let join = spawn_audio_thread(rx, playback.clone());

        Self {
            tx,
            playback,
            join: Mutex::new(Some(join)),
        }
    }

    pub fn send(&self, cmd: AudioCmd) -> Result<(), mpsc::SendError<AudioCmd>> {
        self.tx.send(cmd)
    }

    /// Copy of the shared playback info.
    pub fn snapshot(&self) -> PlaybackInfo {
        self.playback
            .lock()
            .map(|info| info.clone())
            .unwrap_or_default()
    }

    /// Consume the end-of-track flag. Returns the path that played to its
    /// end, once per finished track.
    pub fn take_finished(&self) -> Option<PathBuf> {
        let mut info = self.playback.lock().ok()?;
        if std::mem::take(&mut info.finished) {
            info.path.clone()
        } else {
            None
        }
    }

    /// Consume the last load/output error, if any.
    pub fn take_error(&self) -> Option<String> {
        self.playback
            .lock()
            .ok()
            .and_then(|mut info| info.error.take())
    }

    /// Stop the audio thread and wait for it to exit.
    pub fn quit(&self) {
        let _ = self.send(AudioCmd::Quit);
        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

impl Default for AudioPlayer {
    fn default() -> Self {
        Self::new()
    }
}
