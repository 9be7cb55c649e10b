use std::env;
use std::path::PathBuf;
use std::sync::mpsc;

use crossterm::event::{DisableFocusChange, EnableFocusChange};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use log::{info, warn};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::audio::AudioPlayer;
use crate::mpris::{self, ControlCmd};

mod event_loop;
mod logging;
mod mpris_sync;
mod settings;
mod startup;

/// Wire everything up, run the TUI until quit, then restore the terminal.
///
/// Usage: `tapedeck [DIR]`. A directory argument replaces the persisted
/// grant.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, settings_warning) = settings::load_settings();
    let state_dir = settings.state_dir();
    logging::init(&settings.log, state_dir.as_deref());
    info!("tapedeck {} starting", env!("CARGO_PKG_VERSION"));
    if let Some(msg) = settings_warning {
        warn!("{msg}");
    }

    let cli_dir = env::args_os().nth(1).map(PathBuf::from);
    let mut app = App::new();
    let mut deck = startup::build(&settings, state_dir.as_deref(), cli_dir, &mut app);

    let audio = AudioPlayer::new();
    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = mpris::spawn_mpris(deck.session.clone(), control_tx, state_dir);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableFocusChange)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(
        &mut terminal,
        &settings,
        &mut app,
        &mut deck,
        &audio,
        &mpris,
        &control_rx,
    );

    audio.quit();
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableFocusChange, LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    info!("tapedeck exiting");

    run_result
}
