use super::*;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use crate::library::Track;
use crate::now_playing::{Metadata, TagPublisher};
use crate::session::{MemoryStore, PlaybackSession};

fn t(name: &str) -> Track {
    Track::from_path(PathBuf::from("/tmp/music").join(name))
}

fn info(index: usize, state: PlaybackState) -> NowPlayingInfo {
    let track = t("test.mp3");
    NowPlayingInfo {
        index,
        metadata: Metadata {
            title: "Test Title".to_string(),
            artist: "Test Artist".to_string(),
            artwork: None,
            duration: Some(Duration::from_micros(1_234_567)),
        },
        track,
        elapsed: Duration::from_secs(3),
        state,
    }
}

fn handle(art_dir: Option<PathBuf>) -> (MprisHandle, Arc<Mutex<SharedState>>, Receiver<()>) {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (notify_tx, notify_rx) = mpsc::channel::<()>();
    let handle = MprisHandle {
        state: state.clone(),
        notify: notify_tx,
        art_dir,
    };
    (handle, state, notify_rx)
}

fn shared_session(names: &[&str]) -> SharedSession {
    let mut session = PlaybackSession::new(
        Box::new(MemoryStore::default()),
        Box::new(TagPublisher),
    );
    let tracks: Vec<Track> = names.iter().map(|n| t(n)).collect();
    session.restore_last_played(&tracks);
    session::shared(session)
}

fn player(session: SharedSession, state: Arc<Mutex<SharedState>>) -> PlayerIface {
    PlayerIface { session, state }
}

#[test]
fn show_fills_and_clear_resets_shared_state() {
    let (handle, state, notify_rx) = handle(None);

    handle.show(&info(7, PlaybackState::Playing));
    {
        let s = state.lock().unwrap();
        assert_eq!(s.title.as_deref(), Some("Test Title"));
        assert_eq!(s.artist, vec!["Test Artist".to_string()]);
        assert!(s.url.as_deref().unwrap().contains("/tmp/music/test.mp3"));
        assert_eq!(s.length_micros, Some(1_234_567));
        assert_eq!(s.position_micros, 3_000_000);
        assert_eq!(
            s.track_id.as_ref().map(|p| p.as_str()),
            Some("/org/mpris/MediaPlayer2/track/7")
        );
        assert_eq!(s.playback, PlaybackState::Playing);
    }
    assert!(notify_rx.try_recv().is_ok());

    handle.clear();
    {
        let s = state.lock().unwrap();
        assert_eq!(s.title, None);
        assert!(s.artist.is_empty());
        assert_eq!(s.url, None);
        assert_eq!(s.length_micros, None);
        assert!(s.track_id.is_none());
        assert_eq!(s.playback, PlaybackState::Stopped);
    }
    assert!(notify_rx.try_recv().is_ok());
}

#[test]
fn blank_artist_is_omitted() {
    let (handle, state, _rx) = handle(None);
    let mut now = info(0, PlaybackState::Paused);
    now.metadata.artist = "  ".to_string();
    handle.show(&now);
    assert!(state.lock().unwrap().artist.is_empty());
}

#[test]
fn set_position_does_not_notify() {
    let (handle, state, notify_rx) = handle(None);
    handle.set_position(Duration::from_millis(1500));
    assert_eq!(state.lock().unwrap().position_micros, 1_500_000);
    assert!(notify_rx.try_recv().is_err());
}

#[test]
fn artwork_is_exported_once_per_track() {
    let dir = tempfile::tempdir().unwrap();
    let (handle, state, _rx) = handle(Some(dir.path().to_path_buf()));

    let mut now = info(0, PlaybackState::Playing);
    now.metadata.artwork = Some(Artwork {
        mime: "image/png".to_string(),
        data: vec![1, 2, 3],
    });
    handle.show(&now);

    let exported = dir.path().join("artwork.png");
    assert_eq!(std::fs::read(&exported).unwrap(), vec![1, 2, 3]);
    let url = state.lock().unwrap().art_url.clone().unwrap();
    assert!(url.starts_with("file://"));
    assert!(url.ends_with("artwork.png"));

    std::fs::remove_file(&exported).unwrap();
    now.state = PlaybackState::Paused;
    handle.show(&now);
    assert!(!exported.exists());
    assert_eq!(state.lock().unwrap().art_url.as_deref(), Some(url.as_str()));
}

#[test]
fn playback_status_maps_states_to_mpris_strings() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let iface = player(shared_session(&[]), state.clone());

    assert_eq!(iface.playback_status(), "Stopped");
    state.lock().unwrap().playback = PlaybackState::Playing;
    assert_eq!(iface.playback_status(), "Playing");
    state.lock().unwrap().playback = PlaybackState::Paused;
    assert_eq!(iface.playback_status(), "Paused");
}

#[test]
fn metadata_contains_expected_keys() {
    let (handle, state, _rx) = handle(None);
    handle.show(&info(2, PlaybackState::Playing));
    let iface = player(shared_session(&[]), state);

    let map = iface.metadata();
    for key in [
        "mpris:trackid",
        "xesam:title",
        "xesam:artist",
        "xesam:url",
        "mpris:length",
    ] {
        assert!(map.contains_key(key), "missing {key}");
    }
    assert!(!map.contains_key("mpris:artUrl"));

    let title: String = map["xesam:title"].try_clone().unwrap().try_into().unwrap();
    assert_eq!(title, "Test Title");
    let length: i64 = map["mpris:length"].try_clone().unwrap().try_into().unwrap();
    assert_eq!(length, 1_234_567);
}

#[test]
fn metadata_is_empty_when_nothing_is_loaded() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let iface = player(shared_session(&[]), state);
    assert!(iface.metadata().is_empty());
}

#[test]
fn commands_without_a_track_fail() {
    let session = shared_session(&["a.mp3", "b.mp3"]);
    let iface = player(session.clone(), Arc::default());

    assert!(!iface.can_play());
    assert!(!iface.can_go_next());
    assert!(matches!(iface.play(), Err(fdo::Error::Failed(_))));
    assert!(matches!(iface.next(), Err(fdo::Error::Failed(_))));
    assert!(matches!(iface.previous(), Err(fdo::Error::Failed(_))));
    assert!(matches!(iface.pause(), Err(fdo::Error::Failed(_))));
    assert!(matches!(iface.play_pause(), Err(fdo::Error::Failed(_))));
    assert_eq!(session::lock(&session).state(), PlaybackState::Stopped);
}

#[test]
fn commands_drive_the_shared_session() {
    let session = shared_session(&["a.mp3", "b.mp3"]);
    let first = session::lock(&session).tracks()[0].clone();
    session::lock(&session).select_and_play(&first).unwrap();
    let iface = player(session.clone(), Arc::default());

    assert!(iface.can_pause());
    assert!(!iface.can_play());
    assert!(matches!(iface.play(), Err(fdo::Error::Failed(_))));

    iface.next().unwrap();
    assert_eq!(session::lock(&session).current_index(), Some(1));
    iface.next().unwrap();
    assert_eq!(session::lock(&session).current_index(), Some(0));
    iface.previous().unwrap();
    assert_eq!(session::lock(&session).current_index(), Some(1));

    iface.pause().unwrap();
    assert_eq!(session::lock(&session).state(), PlaybackState::Paused);
    assert!(iface.can_play());

    iface.play_pause().unwrap();
    assert!(session::lock(&session).is_playing());

    iface.stop();
    assert_eq!(session::lock(&session).state(), PlaybackState::Paused);
}

#[test]
fn quit_is_forwarded_to_the_runtime() {
    let (tx, rx) = mpsc::channel::<ControlCmd>();
    let root = RootIface { tx };
    root.quit();
    assert!(matches!(rx.try_recv(), Ok(ControlCmd::Quit)));
    assert!(root.can_quit());
    assert!(!root.can_raise());
}
