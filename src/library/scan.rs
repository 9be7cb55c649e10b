use std::collections::HashSet;
use std::fs;

use log::{debug, info};

use crate::config::LibrarySettings;
use crate::error::Result;

use super::grant::DirectoryCapability;
use super::model::Track;
use super::sniff::is_mp3;

/// Enumerate `dir` and keep the MP3 files, deduplicated by resolved path.
///
/// Order is enumeration order unless `settings.sort_by_name` asks for a
/// stable, case-insensitive sort by file name.
pub fn scan(dir: &dyn DirectoryCapability, settings: &LibrarySettings) -> Result<Vec<Track>> {
    dir.validate()?;
    let entries = dir.open(settings)?;

    let mut seen = HashSet::new();
    let mut tracks: Vec<Track> = Vec::new();
    for entry in entries {
        if !is_mp3(&entry, settings.sniff_bytes) {
            continue;
        }
        let resolved = fs::canonicalize(&entry).unwrap_or_else(|_| entry.clone());
        if !seen.insert(resolved.clone()) {
            debug!("{} duplicates an earlier entry", entry.display());
            continue;
        }
        tracks.push(Track::resolved(resolved, &entry));
    }

    if settings.sort_by_name {
        tracks.sort_by_cached_key(|t| t.name.to_lowercase());
    }

    info!(
        "scanned {}: {} track(s)",
        dir.location().display(),
        tracks.len()
    );
    Ok(tracks)
}
