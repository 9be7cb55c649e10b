//! Session model types: `PlaybackState` and the events a session emits.

use crate::library::Track;
use crate::now_playing::Metadata;

/// The playback state of the session.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    /// No current track.
    #[default]
    Stopped,
    /// A current track is set but not playing.
    Paused,
    /// The current track is playing.
    Playing,
}

/// Emitted by the session after every transition.
#[derive(Clone, Debug)]
pub enum SessionEvent {
    /// The current track changed. `autoplay` is false for a restored track.
    TrackChanged {
        index: usize,
        track: Track,
        metadata: Metadata,
        autoplay: bool,
    },
    /// Playback of the current track resumed.
    Resumed,
    /// Playback of the current track paused.
    Paused,
    /// The session no longer has a current track.
    Stopped,
}
