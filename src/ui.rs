//! Terminal rendering with `ratatui`.
//!
//! Layout: header, status box, track list (or the grant prompt), controls.
//! A metadata popup can overlay the list.

use std::path::Path;
use std::time::Duration;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Padding, Paragraph, Wrap},
};

use crate::app::{App, InputMode};
use crate::config::UiSettings;
use crate::library::Track;
use crate::now_playing::Metadata;
use crate::session::PlaybackState;

const BROWSE_CONTROLS: &[(&str, &str)] = &[
    ("j/k", "up/down"),
    ("enter", "play selected song"),
    ("space/p", "play/pause"),
    ("h/l", "prev/next song"),
    ("/", "search"),
    ("K", "metadata"),
    ("o", "choose folder"),
    ("R", "rescan"),
    ("q", "quit"),
];

const SEARCH_CONTROLS: &[(&str, &str)] = &[("enter", "keep results"), ("esc", "clear search")];

const GRANT_CONTROLS: &[(&str, &str)] = &[("enter", "use this folder"), ("esc", "cancel")];

/// Everything one frame shows, gathered by the runtime under the session lock.
pub struct View<'a> {
    pub app: &'a App,
    pub visible: &'a [&'a Track],
    pub current: Option<&'a Track>,
    pub state: PlaybackState,
    pub metadata: Option<&'a Metadata>,
    pub elapsed: Duration,
    pub dir: Option<&'a Path>,
}

fn controls_text(mode: InputMode) -> String {
    let keys = match mode {
        InputMode::Browse => BROWSE_CONTROLS,
        InputMode::Search => SEARCH_CONTROLS,
        InputMode::Grant => GRANT_CONTROLS,
    };
    keys.iter()
        .map(|(k, v)| format!("[{k}] {v}"))
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Format a `Duration` as `MM:SS`.
fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Round partial seconds up, e.g. `3:05 (185s)`.
fn format_duration_mmss_ceil(d: Option<Duration>) -> String {
    let Some(d) = d else {
        return "-".to_string();
    };

    let mut total_secs = d.as_secs();
    if d.subsec_nanos() > 0 {
        total_secs = total_secs.saturating_add(1);
    }
    format!("{}:{:02} ({}s)", total_secs / 60, total_secs % 60, total_secs)
}

fn state_label(state: PlaybackState) -> &'static str {
    match state {
        PlaybackState::Stopped => "Stopped",
        PlaybackState::Paused => "Paused",
        PlaybackState::Playing => "Playing",
    }
}

fn song_text(track: &Track, metadata: Option<&Metadata>) -> String {
    match metadata {
        Some(m) if !m.artist.trim().is_empty() => format!("{} - {}", m.artist, m.title),
        Some(m) => m.title.clone(),
        None => track.name.clone(),
    }
}

fn status_text(view: &View<'_>) -> String {
    let mut parts = vec![format!(" {}", state_label(view.state))];

    if let Some(track) = view.current {
        let song = song_text(track, view.metadata);
        let time = match view.metadata.and_then(|m| m.duration) {
            Some(total) => format!("{} / {}", format_mmss(view.elapsed), format_mmss(total)),
            None => format_mmss(view.elapsed),
        };
        parts.push(format!("Song: {song} [{time}]"));
    }

    let q = view.app.query.trim();
    if view.app.mode == InputMode::Search || !q.is_empty() {
        parts.push(format!("SEARCH: {q}").trim_end().to_string());
    }

    if view.app.scanning {
        parts.push("Scanning...".to_string());
    }

    match view.dir {
        Some(dir) => parts.push(format!("Dir: {}", dir.display())),
        None => parts.push("No folder chosen".to_string()),
    }

    if let Some(msg) = view.app.message() {
        parts.push(msg.to_string());
    }

    parts.join(" • ")
}

fn metadata_text(view: &View<'_>, ui: &UiSettings) -> String {
    let (Some(track), Some(m)) = (view.current, view.metadata) else {
        return "Nothing playing".to_string();
    };
    let artist = if m.artist.trim().is_empty() {
        "-"
    } else {
        m.artist.as_str()
    };
    let artwork = m
        .artwork
        .as_ref()
        .map(|a| format!("{} ({} bytes)", a.mime, a.data.len()))
        .unwrap_or_else(|| "-".to_string());

    let mut text = format!(
        "Title: {}\nArtist: {}\nDuration: {}\nArtwork: {}",
        m.title,
        artist,
        format_duration_mmss_ceil(m.duration),
        artwork
    );
    if ui.show_path_in_metadata {
        text.push_str(&format!("\nPath: {}", track.path.display()));
    }
    text
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn left_pad() -> Padding {
    Padding {
        left: 1,
        right: 0,
        top: 0,
        bottom: 0,
    }
}

fn draw_tracks(frame: &mut Frame, view: &View<'_>, area: Rect) {
    // Keep the cursor centred and only build items for the visible window.
    let total = view.visible.len();
    let list_height = area.height.saturating_sub(2) as usize;
    let sel_pos = view.app.selected_index(view.visible).unwrap_or(0);
    let (start, end, selected_in_window) = if total <= list_height || list_height == 0 {
        (0, total, sel_pos)
    } else {
        let half = list_height / 2;
        let mut start = sel_pos.saturating_sub(half);
        if start + list_height > total {
            start = total - list_height;
        }
        (start, start + list_height, sel_pos - start)
    };

    let current = view.current.map(|t| t.path.as_path());
    let items: Vec<ListItem> = view.visible[start..end]
        .iter()
        .map(|t| {
            if Some(t.path.as_path()) == current {
                ListItem::new(format!("♪ {}", t.name)).bold()
            } else {
                ListItem::new(format!("  {}", t.name))
            }
        })
        .collect();

    let title = if total == 0 && view.dir.is_some() {
        " tracks (no MP3 files found) "
    } else {
        " tracks "
    };
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if total > 0 {
        state.select(Some(selected_in_window));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_grant_prompt(frame: &mut Frame, view: &View<'_>, area: Rect) {
    let popup = centered_rect_sized(72, 7, area);
    frame.render_widget(Clear, popup);
    let text = format!(
        "Type the folder tapedeck may read music from:\n\n> {}_",
        view.app.grant_input
    );
    let prompt = Paragraph::new(text)
        .block(
            Block::default()
                .padding(left_pad())
                .borders(Borders::ALL)
                .title(" choose music folder "),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(prompt, popup);
}

/// Render the whole UI into `frame`.
pub fn draw(frame: &mut Frame, view: &View<'_>, ui: &UiSettings) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let header = Paragraph::new(ui.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" tapedeck ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    let status = Paragraph::new(status_text(view))
        .block(Block::bordered().padding(left_pad()).title(" status "))
        .wrap(Wrap { trim: true });
    frame.render_widget(status, chunks[1]);

    draw_tracks(frame, view, chunks[2]);

    if view.app.metadata_window {
        let popup = centered_rect_sized(72, 9, chunks[2]);
        frame.render_widget(Clear, popup);
        let meta = Paragraph::new(metadata_text(view, ui))
            .block(
                Block::default()
                    .padding(left_pad())
                    .borders(Borders::ALL)
                    .title(" now playing (K closes) "),
            )
            .wrap(Wrap { trim: true });
        frame.render_widget(meta, popup);
    }

    if view.app.mode == InputMode::Grant {
        draw_grant_prompt(frame, view, chunks[2]);
    }

    let footer = Paragraph::new(controls_text(view.app.mode))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(left_pad()),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[3]);
}
