use std::error::Error;
use std::path::Path;
use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::{debug, info, warn};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{App, InputMode};
use crate::audio::{AudioCmd, AudioPlayer, PlaybackInfo};
use crate::config::{PlaybackSettings, Settings};
use crate::library::{LocalDirectory, Track};
use crate::mpris::{ControlCmd, MprisHandle};
use crate::runtime::mpris_sync::{elapsed_for, update_now_playing};
use crate::runtime::startup::Deck;
use crate::session::{self, PlaybackSession, SessionEvent};
use crate::ui;

/// Main terminal event loop.
///
/// Every entry point (keys, MPRIS commands, end of track, scan completion)
/// goes through the shared session lock; session events are then fanned
/// out to the audio thread and the now-playing surface. Returns when a quit
/// is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &Settings,
    app: &mut App,
    deck: &mut Deck,
    audio: &AudioPlayer,
    mpris: &MprisHandle,
    control_rx: &mpsc::Receiver<ControlCmd>,
) -> Result<(), Box<dyn Error>> {
    loop {
        poll_scan(settings, app, deck);

        if let Some(ended) = audio.take_finished() {
            let mut session = session::lock(&deck.session);
            if let Err(e) = track_finished(&settings.playback, &mut session, &ended) {
                app.report(&e);
            }
        }
        if let Some(err) = audio.take_error() {
            app.notify(err);
        }

        let playback = audio.snapshot();
        forward_session_events(app, deck, audio, mpris, &playback);
        mpris.set_position(elapsed_for(&session::lock(&deck.session), &playback));

        draw(terminal, settings, app, deck, &playback)?;

        while let Ok(cmd) = control_rx.try_recv() {
            match cmd {
                ControlCmd::Quit => {
                    info!("quit requested over MPRIS");
                    return Ok(());
                }
            }
        }

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if handle_key_event(key, app, deck) {
                        return Ok(());
                    }
                }
                // Coming back to the terminal counts as foregrounding the app.
                Event::FocusGained if deck.catalog.grant_location().is_some() => {
                    start_scan(app, deck);
                }
                _ => {}
            }
        }
    }
}

fn draw(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &Settings,
    app: &App,
    deck: &Deck,
    playback: &PlaybackInfo,
) -> Result<(), Box<dyn Error>> {
    let visible = deck.catalog.search(app.query.trim());
    let session = session::lock(&deck.session);
    let view = ui::View {
        app,
        visible: &visible,
        current: session.current_track(),
        state: session.state(),
        metadata: session.now_playing(),
        elapsed: elapsed_for(&session, playback),
        dir: deck.catalog.grant_location(),
    };
    terminal.draw(|f| ui::draw(f, &view, &settings.ui))?;
    Ok(())
}

/// Install a finished background scan into catalog and session.
fn poll_scan(settings: &Settings, app: &mut App, deck: &mut Deck) {
    let Some(result) = deck.pending.as_ref().and_then(|p| p.poll()) else {
        return;
    };
    deck.pending = None;
    app.scanning = false;

    match deck.catalog.finish_rescan(result) {
        Ok(tracks) => {
            let mut session = session::lock(&deck.session);
            if deck.needs_restore {
                deck.needs_restore = false;
                let restored = session.restore_last_played(tracks).is_some();
                if restored && settings.playback.autoplay_on_restore {
                    let _ = session.play();
                }
            } else {
                session.catalog_changed(tracks);
            }
            app.notify(format!("{} tracks", tracks.len()));
        }
        Err(e) => {
            warn!("scan failed: {e}");
            app.report(&e);
        }
    }
}

/// React to the audio output reaching the end of `ended`. A flag left over
/// from a track the session already moved away from is ignored.
fn track_finished(
    settings: &PlaybackSettings,
    session: &mut PlaybackSession,
    ended: &Path,
) -> crate::error::Result<()> {
    let still_current = session.current_track().is_some_and(|t| t.path == ended);
    if !still_current || !session.is_playing() {
        debug!("ignoring end of {}", ended.display());
        return Ok(());
    }
    if settings.advance_on_end {
        debug!("end of track, advancing");
        session.next()
    } else {
        session.pause();
        Ok(())
    }
}

/// Drive the audio output and the now-playing surface from session events.
fn forward_session_events(
    app: &mut App,
    deck: &Deck,
    audio: &AudioPlayer,
    mpris: &MprisHandle,
    playback: &PlaybackInfo,
) {
    let mut changed = false;
    while let Ok(event) = deck.events.try_recv() {
        changed = true;
        let cmd = match event {
            SessionEvent::TrackChanged {
                track, autoplay, ..
            } => {
                app.select(&track);
                AudioCmd::Load {
                    path: track.path,
                    autoplay,
                }
            }
            SessionEvent::Resumed => AudioCmd::Resume,
            SessionEvent::Paused => AudioCmd::Pause,
            SessionEvent::Stopped => AudioCmd::Stop,
        };
        let _ = audio.send(cmd);
    }
    if changed {
        update_now_playing(mpris, &deck.session, playback);
    }
}

fn visible_tracks<'a>(app: &App, deck: &'a Deck) -> Vec<&'a Track> {
    deck.catalog.search(app.query.trim())
}

fn move_cursor(app: &mut App, deck: &Deck, down: bool) {
    let visible = visible_tracks(app, deck);
    if down {
        app.next(&visible);
    } else {
        app.prev(&visible);
    }
}

fn start_scan(app: &mut App, deck: &mut Deck) {
    if deck.pending.is_some() {
        return;
    }
    match deck.catalog.begin_rescan() {
        Ok(pending) => {
            deck.pending = Some(pending);
            app.scanning = true;
            app.clear_message();
        }
        Err(e) => app.report(&e),
    }
}

fn submit_grant(app: &mut App, deck: &mut Deck) {
    let Some(path) = app.take_grant_input() else {
        return;
    };
    match deck
        .catalog
        .grant_in_background(LocalDirectory::new(path.clone()))
    {
        Ok(pending) => {
            deck.pending = Some(pending);
            app.scanning = true;
            app.clear_message();
        }
        Err(e) => {
            app.report(&e);
            app.open_grant_prompt(Some(&path));
        }
    }
}

/// Handle one key press. Returns true when the user asked to quit.
fn handle_key_event(key: KeyEvent, app: &mut App, deck: &mut Deck) -> bool {
    match app.mode {
        InputMode::Search => {
            handle_search_key(key, app, deck);
            false
        }
        InputMode::Grant => {
            handle_grant_key(key, app, deck);
            false
        }
        InputMode::Browse => handle_browse_key(key, app, deck),
    }
}

fn handle_search_key(key: KeyEvent, app: &mut App, deck: &Deck) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => app.clear_search(),
        KeyCode::Enter => app.exit_search(),
        KeyCode::Backspace => app.pop_query_char(),
        KeyCode::Down => move_cursor(app, deck, true),
        KeyCode::Up => move_cursor(app, deck, false),
        KeyCode::Char('n') | KeyCode::Char('j') if ctrl => move_cursor(app, deck, true),
        KeyCode::Char('p') | KeyCode::Char('k') if ctrl => move_cursor(app, deck, false),
        KeyCode::Char(c) if !c.is_control() => app.push_query_char(c),
        _ => {}
    }
}

fn handle_grant_key(key: KeyEvent, app: &mut App, deck: &mut Deck) {
    match key.code {
        KeyCode::Esc => app.close_grant_prompt(),
        KeyCode::Enter => submit_grant(app, deck),
        KeyCode::Backspace => app.pop_grant_char(),
        KeyCode::Char(c) if !c.is_control() => app.push_grant_char(c),
        _ => {}
    }
}

fn handle_browse_key(key: KeyEvent, app: &mut App, deck: &mut Deck) -> bool {
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('j') | KeyCode::Down => move_cursor(app, deck, true),
        KeyCode::Char('k') | KeyCode::Up => move_cursor(app, deck, false),
        KeyCode::Enter => {
            let selected = app.selected_track(&visible_tracks(app, deck)).cloned();
            if let Some(track) = selected {
                if let Err(e) = session::lock(&deck.session).select_and_play(&track) {
                    app.report(&e);
                }
            }
        }
        KeyCode::Char(' ') | KeyCode::Char('p') => {
            if let Err(e) = session::lock(&deck.session).toggle() {
                app.report(&e);
            }
        }
        KeyCode::Char('l') => {
            if let Err(e) = session::lock(&deck.session).next() {
                app.report(&e);
            }
        }
        KeyCode::Char('h') => {
            if let Err(e) = session::lock(&deck.session).previous() {
                app.report(&e);
            }
        }
        KeyCode::Char('/') => app.enter_search(),
        KeyCode::Char('K') => app.toggle_metadata_window(),
        KeyCode::Char('o') => app.open_grant_prompt(deck.catalog.grant_location()),
        KeyCode::Char('R') => start_scan(app, deck),
        KeyCode::Esc => app.clear_message(),
        _ => {}
    }
    false
}
