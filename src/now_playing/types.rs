use std::time::Duration;

use crate::library::Track;
use crate::session::PlaybackState;

/// Embedded cover art.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artwork {
    pub mime: String,
    pub data: Vec<u8>,
}

impl Artwork {
    /// File extension matching `mime`, for exporting the image.
    pub fn extension(&self) -> &'static str {
        match self.mime.as_str() {
            "image/png" => "png",
            "image/jpeg" | "image/jpg" => "jpg",
            "image/gif" => "gif",
            "image/bmp" => "bmp",
            "image/tiff" => "tiff",
            _ => "img",
        }
    }
}

/// Display metadata for a track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub title: String,
    pub artist: String,
    pub artwork: Option<Artwork>,
    pub duration: Option<Duration>,
}

impl Metadata {
    /// What is shown when a track carries no usable tags.
    pub fn placeholder(track: &Track) -> Self {
        Self {
            title: track.name.clone(),
            artist: String::new(),
            artwork: None,
            duration: None,
        }
    }
}

/// Derives display metadata for a track. Implementations never fail:
/// unreadable tags degrade to [`Metadata::placeholder`].
pub trait NowPlayingPublisher: Send {
    fn publish(&self, track: &Track) -> Metadata;
}

/// Everything an OS now-playing surface displays.
#[derive(Debug, Clone)]
pub struct NowPlayingInfo {
    pub index: usize,
    pub track: Track,
    pub metadata: Metadata,
    pub elapsed: Duration,
    pub state: PlaybackState,
}

/// A write-only, OS-level now-playing display (lock screen, MPRIS, ...).
pub trait NowPlayingSurface {
    fn show(&self, info: &NowPlayingInfo);
    fn clear(&self);
}
