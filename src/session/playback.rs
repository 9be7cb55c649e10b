//! `PlaybackSession`: the single source of truth for what is playing.
//!
//! The session keeps its own copy of the catalog order, the current track
//! index and the playing flag. Every transition persists the last-played
//! identifier (for track changes), refreshes now-playing metadata and
//! emits a [`SessionEvent`] to subscribers.

use std::sync::mpsc::{self, Receiver, Sender};

use log::{debug, warn};

use crate::error::{Error, Result};
use crate::library::Track;
use crate::now_playing::{Metadata, NowPlayingPublisher};

use super::model::{PlaybackState, SessionEvent};
use super::store::LastPlayedStore;

pub struct PlaybackSession {
    tracks: Vec<Track>,
    current: Option<usize>,
    playing: bool,
    last_played: Option<String>,
    now_playing: Option<Metadata>,
    store: Box<dyn LastPlayedStore>,
    publisher: Box<dyn NowPlayingPublisher>,
    subscribers: Vec<Sender<SessionEvent>>,
}

impl std::fmt::Debug for PlaybackSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackSession")
            .field("tracks", &self.tracks.len())
            .field("current", &self.current)
            .field("playing", &self.playing)
            .field("last_played", &self.last_played)
            .finish_non_exhaustive()
    }
}

impl PlaybackSession {
    /// Create a stopped session with an empty catalog. The last-played
    /// identifier is read from `store` right away.
    pub fn new(store: Box<dyn LastPlayedStore>, publisher: Box<dyn NowPlayingPublisher>) -> Self {
        let last_played = store.load();
        Self {
            tracks: Vec::new(),
            current: None,
            playing: false,
            last_played,
            now_playing: None,
            store,
            publisher,
            subscribers: Vec::new(),
        }
    }

    /// Receive every event emitted from now on.
    pub fn subscribe(&mut self) -> Receiver<SessionEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.current.and_then(|i| self.tracks.get(i))
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn state(&self) -> PlaybackState {
        match (self.current, self.playing) {
            (None, _) => PlaybackState::Stopped,
            (Some(_), false) => PlaybackState::Paused,
            (Some(_), true) => PlaybackState::Playing,
        }
    }

    /// Metadata published for the current track.
    pub fn now_playing(&self) -> Option<&Metadata> {
        self.now_playing.as_ref()
    }

    pub fn last_played(&self) -> Option<&str> {
        self.last_played.as_deref()
    }

    /// Make `track` current and start playing it.
    pub fn select_and_play(&mut self, track: &Track) -> Result<()> {
        let index = self
            .tracks
            .iter()
            .position(|t| t.path == track.path)
            .ok_or_else(|| Error::NotFound(track.path.display().to_string()))?;
        self.start(index);
        Ok(())
    }

    /// Resume the current track. Playing already is a no-op.
    pub fn play(&mut self) -> Result<()> {
        if self.current.is_none() {
            return Err(Error::NoActiveTrack);
        }
        if !self.playing {
            self.playing = true;
            debug!("session: resumed");
            self.emit(SessionEvent::Resumed);
        }
        Ok(())
    }

    /// Pause playback. A no-op when paused or stopped.
    pub fn pause(&mut self) {
        if self.playing {
            self.playing = false;
            debug!("session: paused");
            self.emit(SessionEvent::Paused);
        }
        self.check_invariants();
    }

    /// Play when paused, pause when playing.
    pub fn toggle(&mut self) -> Result<()> {
        if self.playing {
            self.pause();
            Ok(())
        } else {
            self.play()
        }
    }

    /// Advance to the following track, wrapping from last to first.
    pub fn next(&mut self) -> Result<()> {
        let index = self.current.ok_or(Error::NoActiveTrack)?;
        self.start((index + 1) % self.tracks.len());
        Ok(())
    }

    /// Step back to the preceding track, wrapping from first to last.
    pub fn previous(&mut self) -> Result<()> {
        let index = self.current.ok_or(Error::NoActiveTrack)?;
        let len = self.tracks.len();
        self.start((index + len - 1) % len);
        Ok(())
    }

    /// Install `catalog` and make the last-played track current, paused.
    /// When the stored identifier no longer resolves the session stays stopped.
    pub fn restore_last_played(&mut self, catalog: &[Track]) -> Option<&Track> {
        let was_active = self.current.is_some();
        self.tracks = catalog.to_vec();
        self.current = None;
        self.playing = false;
        self.now_playing = None;

        let found = self
            .last_played
            .as_deref()
            .and_then(|key| self.find_by_key(key));

        match found {
            Some(index) => {
                debug!("session: restored {}", self.tracks[index].name);
                self.current = Some(index);
                self.refresh_now_playing(index, false);
            }
            None if was_active => self.emit(SessionEvent::Stopped),
            None => {}
        }
        self.check_invariants();
        self.current_track()
    }

    /// Install a rescanned catalog. The current track keeps playing if it is
    /// still present; if it disappeared the session stops.
    pub fn catalog_changed(&mut self, catalog: &[Track]) {
        let current_path = self.current_track().map(|t| t.path.clone());
        self.tracks = catalog.to_vec();

        let Some(path) = current_path else {
            return;
        };
        match self.tracks.iter().position(|t| t.path == path) {
            Some(index) => self.current = Some(index),
            None => {
                debug!("session: {} vanished, stopping", path.display());
                self.current = None;
                self.playing = false;
                self.now_playing = None;
                self.emit(SessionEvent::Stopped);
            }
        }
        self.check_invariants();
    }

    fn find_by_key(&self, key: &str) -> Option<usize> {
        self.tracks
            .iter()
            .position(|t| t.id() == key)
            .or_else(|| self.tracks.iter().position(|t| t.matches_key(key)))
    }

    fn start(&mut self, index: usize) {
        self.current = Some(index);
        self.playing = true;
        self.remember(index);
        debug!("session: playing {}", self.tracks[index].name);
        self.refresh_now_playing(index, true);
        self.check_invariants();
    }

    fn remember(&mut self, index: usize) {
        let id = self.tracks[index].id();
        if let Err(e) = self.store.save(&id) {
            warn!("last played track not saved: {e}");
        }
        self.last_played = Some(id);
    }

    fn refresh_now_playing(&mut self, index: usize, autoplay: bool) {
        let track = self.tracks[index].clone();
        let metadata = self.publisher.publish(&track);
        self.now_playing = Some(metadata.clone());
        self.emit(SessionEvent::TrackChanged {
            index,
            track,
            metadata,
            autoplay,
        });
    }

    fn emit(&mut self, event: SessionEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    fn check_invariants(&self) {
        debug_assert!(!self.playing || self.current.is_some());
        debug_assert!(self.current.is_none_or(|i| i < self.tracks.len()));
    }
}
