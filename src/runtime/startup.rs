use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;

use log::{info, warn};

use crate::app::App;
use crate::config::Settings;
use crate::error::Result;
use crate::library::{FileCatalog, GrantStore, LocalDirectory, PendingScan};
use crate::now_playing::TagPublisher;
use crate::session::{
    self, LastPlayedStore, MemoryStore, PlaybackSession, SessionEvent, SharedSession, StateFile,
};

/// The core objects the event loop drives.
pub struct Deck {
    pub catalog: FileCatalog,
    pub session: SharedSession,
    pub events: Receiver<SessionEvent>,
    pub pending: Option<PendingScan>,
    /// The first successful scan restores the last-played track; later ones
    /// only update the session's catalog.
    pub needs_restore: bool,
}

/// Build catalog and session, and start scanning whichever directory is
/// available: `cli_dir` replaces the persisted grant, otherwise the
/// persisted grant is restored. Without either the grant prompt opens.
pub fn build(
    settings: &Settings,
    state_dir: Option<&Path>,
    cli_dir: Option<PathBuf>,
    app: &mut App,
) -> Deck {
    let mut catalog = FileCatalog::new(settings.library.clone());
    let store: Box<dyn LastPlayedStore> = match state_dir {
        Some(dir) => {
            catalog = catalog.with_store(GrantStore::in_dir(dir));
            Box::new(StateFile::in_dir(dir))
        }
        None => {
            warn!("no state directory; grant and last played track are not kept");
            Box::new(MemoryStore::default())
        }
    };

    let mut session = PlaybackSession::new(store, Box::new(TagPublisher));
    let events = session.subscribe();

    let pending = match open_library(&mut catalog, cli_dir) {
        Ok(Some(pending)) => Some(pending),
        Ok(None) => {
            info!("no music folder granted yet");
            app.open_grant_prompt(None);
            None
        }
        Err(e) => {
            warn!("library unavailable: {e}");
            app.report(&e);
            None
        }
    };
    app.scanning = pending.is_some();

    Deck {
        catalog,
        session: session::shared(session),
        events,
        pending,
        needs_restore: true,
    }
}

fn open_library(catalog: &mut FileCatalog, cli_dir: Option<PathBuf>) -> Result<Option<PendingScan>> {
    if let Some(dir) = cli_dir {
        return catalog.grant_in_background(LocalDirectory::new(dir)).map(Some);
    }
    if catalog.restore_grant()? {
        return catalog.begin_rescan().map(Some);
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    // Empty ID3v2.4 tag followed by an MPEG-1 layer III frame header.
    const MP3: &[u8] = b"ID3\x04\x00\x00\x00\x00\x00\x00\xFF\xFB\x90\x64";

    fn settings() -> Settings {
        Settings::default()
    }

    #[test]
    fn first_run_opens_the_grant_prompt() {
        let state = tempfile::tempdir().unwrap();
        let mut app = App::new();
        let deck = build(&settings(), Some(state.path()), None, &mut app);

        assert!(deck.pending.is_none());
        assert!(!app.scanning);
        assert_eq!(app.mode, crate::app::InputMode::Grant);
    }

    #[test]
    fn cli_dir_is_scanned_and_persisted() {
        let state = tempfile::tempdir().unwrap();
        let music = tempfile::tempdir().unwrap();
        fs::write(music.path().join("a.mp3"), MP3).unwrap();

        let mut app = App::new();
        let mut deck = build(
            &settings(),
            Some(state.path()),
            Some(music.path().to_path_buf()),
            &mut app,
        );
        assert!(app.scanning);

        let tracks = deck.pending.take().unwrap().wait().unwrap();
        assert_eq!(tracks.len(), 1);
        assert!(state.path().join(GrantStore::FILE_NAME).exists());

        // A second start without arguments picks the grant up again.
        let mut app = App::new();
        let deck = build(&settings(), Some(state.path()), None, &mut app);
        assert!(deck.pending.is_some());
        assert_eq!(app.mode, crate::app::InputMode::Browse);
    }

    #[test]
    fn unreadable_cli_dir_is_reported() {
        let state = tempfile::tempdir().unwrap();
        let mut app = App::new();
        let deck = build(
            &settings(),
            Some(state.path()),
            Some(state.path().join("missing")),
            &mut app,
        );
        assert!(deck.pending.is_none());
        assert!(app.message().unwrap().contains("press o"));
    }
}
