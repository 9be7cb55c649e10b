use std::time::Duration;

use crate::audio::PlaybackInfo;
use crate::now_playing::{Metadata, NowPlayingInfo, NowPlayingSurface};
use crate::session::{self, PlaybackSession, SharedSession};

/// Elapsed time of the session's current track according to the audio
/// output. Stale values from a previously loaded file read as zero.
pub fn elapsed_for(session: &PlaybackSession, audio: &PlaybackInfo) -> Duration {
    match (session.current_track(), audio.path.as_deref()) {
        (Some(track), Some(loaded)) if track.path == loaded => audio.elapsed,
        _ => Duration::ZERO,
    }
}

pub fn now_playing_info(session: &PlaybackSession, audio: &PlaybackInfo) -> Option<NowPlayingInfo> {
    let index = session.current_index()?;
    let track = session.current_track()?.clone();
    let metadata = session
        .now_playing()
        .cloned()
        .unwrap_or_else(|| Metadata::placeholder(&track));
    Some(NowPlayingInfo {
        index,
        elapsed: elapsed_for(session, audio),
        state: session.state(),
        track,
        metadata,
    })
}

/// Push the session's now-playing state to `surface`.
pub fn update_now_playing(surface: &dyn NowPlayingSurface, shared: &SharedSession, audio: &PlaybackInfo) {
    let info = now_playing_info(&session::lock(shared), audio);
    match info {
        Some(info) => surface.show(&info),
        None => surface.clear(),
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::path::PathBuf;

    use super::*;
    use crate::library::Track;
    use crate::now_playing::TagPublisher;
    use crate::session::{MemoryStore, PlaybackState};

    #[derive(Default)]
    struct Recorder {
        shown: RefCell<Vec<NowPlayingInfo>>,
        cleared: RefCell<usize>,
    }

    impl NowPlayingSurface for Recorder {
        fn show(&self, info: &NowPlayingInfo) {
            self.shown.borrow_mut().push(info.clone());
        }

        fn clear(&self) {
            *self.cleared.borrow_mut() += 1;
        }
    }

    fn shared(names: &[&str]) -> SharedSession {
        let mut s = PlaybackSession::new(Box::new(MemoryStore::default()), Box::new(TagPublisher));
        let tracks: Vec<Track> = names
            .iter()
            .map(|n| Track::from_path(PathBuf::from("/music").join(n)))
            .collect();
        s.restore_last_played(&tracks);
        session::shared(s)
    }

    #[test]
    fn clears_surface_without_a_track() {
        let recorder = Recorder::default();
        update_now_playing(&recorder, &shared(&["a.mp3"]), &PlaybackInfo::default());
        assert_eq!(*recorder.cleared.borrow(), 1);
        assert!(recorder.shown.borrow().is_empty());
    }

    #[test]
    fn shows_current_track_with_matching_elapsed() {
        let shared = shared(&["a.mp3", "b.mp3"]);
        let b = session::lock(&shared).tracks()[1].clone();
        session::lock(&shared).select_and_play(&b).unwrap();

        let recorder = Recorder::default();
        let audio = PlaybackInfo {
            path: Some(b.path.clone()),
            elapsed: Duration::from_secs(4),
            playing: true,
            ..PlaybackInfo::default()
        };
        update_now_playing(&recorder, &shared, &audio);

        let shown = recorder.shown.borrow();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].index, 1);
        assert_eq!(shown[0].track, b);
        assert_eq!(shown[0].metadata.title, "b.mp3");
        assert_eq!(shown[0].elapsed, Duration::from_secs(4));
        assert_eq!(shown[0].state, PlaybackState::Playing);
    }

    #[test]
    fn stale_audio_position_reads_as_zero() {
        let shared = shared(&["a.mp3", "b.mp3"]);
        let a = session::lock(&shared).tracks()[0].clone();
        session::lock(&shared).select_and_play(&a).unwrap();

        let audio = PlaybackInfo {
            path: Some(PathBuf::from("/music/b.mp3")),
            elapsed: Duration::from_secs(90),
            ..PlaybackInfo::default()
        };
        assert_eq!(elapsed_for(&session::lock(&shared), &audio), Duration::ZERO);
    }
}
