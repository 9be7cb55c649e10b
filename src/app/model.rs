//! UI model: cursor, input modes and the status line.
//!
//! Tracks themselves live in the catalog and the session; `App` only keeps
//! what the terminal front end needs between frames. The cursor is stored
//! as a track identifier so it survives rescans and search edits.

use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::library::Track;

/// What keystrokes currently edit.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum InputMode {
    #[default]
    Browse,
    Search,
    Grant,
}

#[derive(Debug, Default)]
pub struct App {
    pub mode: InputMode,
    pub query: String,
    pub grant_input: String,
    pub metadata_window: bool,
    pub scanning: bool,
    selected: Option<PathBuf>,
    message: Option<String>,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    /// Position of the cursor within `visible`. Falls back to the first row
    /// when the selected track is not shown.
    pub fn selected_index(&self, visible: &[&Track]) -> Option<usize> {
        if visible.is_empty() {
            return None;
        }
        let pos = self
            .selected
            .as_deref()
            .and_then(|sel| visible.iter().position(|t| t.path == sel));
        Some(pos.unwrap_or(0))
    }

    pub fn selected_track<'a>(&self, visible: &[&'a Track]) -> Option<&'a Track> {
        self.selected_index(visible).map(|i| visible[i])
    }

    pub fn select(&mut self, track: &Track) {
        self.selected = Some(track.path.clone());
    }

    /// Move the cursor down, wrapping to the top.
    pub fn next(&mut self, visible: &[&Track]) {
        if let Some(i) = self.selected_index(visible) {
            self.select(visible[(i + 1) % visible.len()]);
        }
    }

    /// Move the cursor up, wrapping to the bottom.
    pub fn prev(&mut self, visible: &[&Track]) {
        if let Some(i) = self.selected_index(visible) {
            let len = visible.len();
            self.select(visible[(i + len - 1) % len]);
        }
    }

    pub fn toggle_metadata_window(&mut self) {
        self.metadata_window = !self.metadata_window;
    }

    pub fn enter_search(&mut self) {
        self.mode = InputMode::Search;
    }

    /// Leave search input; the query stays applied.
    pub fn exit_search(&mut self) {
        self.mode = InputMode::Browse;
    }

    pub fn clear_search(&mut self) {
        self.query.clear();
        self.mode = InputMode::Browse;
    }

    pub fn push_query_char(&mut self, c: char) {
        self.query.push(c);
    }

    pub fn pop_query_char(&mut self) {
        self.query.pop();
    }

    /// Open the directory prompt, prefilled with the current grant.
    pub fn open_grant_prompt(&mut self, current: Option<&Path>) {
        self.grant_input = current
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        self.mode = InputMode::Grant;
    }

    pub fn close_grant_prompt(&mut self) {
        self.grant_input.clear();
        self.mode = InputMode::Browse;
    }

    pub fn push_grant_char(&mut self, c: char) {
        self.grant_input.push(c);
    }

    pub fn pop_grant_char(&mut self) {
        self.grant_input.pop();
    }

    /// Consume the typed directory. Returns `None` for blank input and keeps
    /// the prompt open in that case.
    pub fn take_grant_input(&mut self) -> Option<PathBuf> {
        let typed = self.grant_input.trim();
        if typed.is_empty() {
            return None;
        }
        let path = expand_home(typed);
        self.close_grant_prompt();
        Some(path)
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn notify(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
    }

    /// Put an error on the status line. Access problems also point at the
    /// grant prompt.
    pub fn report(&mut self, err: &Error) {
        let msg = if err.needs_grant() {
            format!("{err} (press o to choose a music folder)")
        } else {
            err.to_string()
        };
        self.message = Some(msg);
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }
}

fn expand_home(typed: &str) -> PathBuf {
    match typed.strip_prefix("~/") {
        Some(rest) => match std::env::var_os("HOME") {
            Some(home) => PathBuf::from(home).join(rest),
            None => PathBuf::from(typed),
        },
        None => PathBuf::from(typed),
    }
}
