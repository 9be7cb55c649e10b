use lofty::picture::{Picture, PictureType};
use lofty::prelude::*;
use log::warn;

use crate::error::{Error, Result};
use crate::library::Track;

use super::types::{Artwork, Metadata, NowPlayingPublisher};

/// Reads title, artist, cover art and duration from the file's tags.
#[derive(Debug, Default, Clone, Copy)]
pub struct TagPublisher;

impl TagPublisher {
    /// Read tags, failing with [`Error::Metadata`] when the file cannot be parsed.
    pub fn read(&self, track: &Track) -> Result<Metadata> {
        let tagged = lofty::read_from_path(&track.path).map_err(|e| Error::Metadata {
            path: track.path.clone(),
            reason: e.to_string(),
        })?;

        let mut meta = Metadata::placeholder(track);
        let duration = tagged.properties().duration();
        if !duration.is_zero() {
            meta.duration = Some(duration);
        }

        if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
            if let Some(title) = non_blank(tag.title().as_deref()) {
                meta.title = title;
            }
            if let Some(artist) = non_blank(tag.artist().as_deref()) {
                meta.artist = artist;
            }
            meta.artwork = pick_artwork(tag.pictures());
        }

        Ok(meta)
    }
}

impl NowPlayingPublisher for TagPublisher {
    fn publish(&self, track: &Track) -> Metadata {
        self.read(track).unwrap_or_else(|e| {
            warn!("{e}; using placeholder metadata");
            Metadata::placeholder(track)
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Prefer the front cover, otherwise take whatever picture comes first.
fn pick_artwork(pictures: &[Picture]) -> Option<Artwork> {
    pictures
        .iter()
        .find(|p| p.pic_type() == PictureType::CoverFront)
        .or_else(|| pictures.first())
        .map(|p| Artwork {
            mime: p
                .mime_type()
                .map(|m| m.as_str().to_string())
                .unwrap_or_else(|| "application/octet-stream".to_string()),
            data: p.data().to_vec(),
        })
}
