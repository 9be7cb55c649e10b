use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/tapedeck/config.toml` or `~/.config/tapedeck/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `TAPEDECK__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub library: LibrarySettings,
    pub playback: PlaybackSettings,
    pub state: StateSettings,
    pub ui: UiSettings,
    pub log: LogSettings,
}

/// Smallest usable `library.sniff_bytes`: one whole frame header.
pub const MIN_SNIFF_BYTES: usize = 4;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Whether to follow symlinks inside the granted directory.
    pub follow_links: bool,
    /// Whether to include hidden files (dotfiles).
    pub include_hidden: bool,
    /// Sort the catalog case-insensitively by file name.
    /// When false the directory enumeration order is kept.
    pub sort_by_name: bool,
    /// How far past the start of a file (or past its ID3v2 tag) an MPEG
    /// frame sync is searched for. At least `MIN_SNIFF_BYTES`.
    pub sniff_bytes: usize,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            follow_links: true,
            include_hidden: false,
            sort_by_name: false,
            sniff_bytes: 4096,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Move on to the next track when the current one ends.
    pub advance_on_end: bool,
    /// Start playing the restored last-played track right after startup.
    pub autoplay_on_restore: bool,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            advance_on_end: true,
            autoplay_on_restore: false,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StateSettings {
    /// Directory holding the grant bookmark, session state, artwork and log.
    /// Defaults to `$XDG_STATE_HOME/tapedeck` or `~/.local/state/tapedeck`.
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
    /// Whether the metadata overlay shows the track's full path.
    pub show_path_in_metadata: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ one folder, every song ~ ".to_string(),
            show_path_in_metadata: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// `env_logger` filter used when `RUST_LOG` is not set.
    pub level: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
