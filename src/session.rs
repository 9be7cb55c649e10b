//! Playback session: the current track, transport actions and the
//! persisted last-played identifier.

mod model;
mod playback;
mod store;

use std::sync::{Arc, Mutex, MutexGuard};

pub use model::*;
pub use playback::PlaybackSession;
pub use store::{LastPlayedStore, MemoryStore, StateFile};

/// The session shared between the UI loop and the remote-control service.
/// All mutations go through this one lock.
pub type SharedSession = Arc<Mutex<PlaybackSession>>;

pub fn shared(session: PlaybackSession) -> SharedSession {
    Arc::new(Mutex::new(session))
}

/// Lock the shared session. A panic while holding the lock does not leave
/// the session unusable; the state is taken over as is.
pub fn lock(session: &SharedSession) -> MutexGuard<'_, PlaybackSession> {
    session
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}
