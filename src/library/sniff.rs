//! Content-type detection for MPEG audio.
//!
//! Files are classified by what lofty's probe finds in them, never by
//! extension. A leading ID3v2 tag is skipped and the stream behind it
//! decides, so ID3-tagged FLAC or AAC files are not taken for MP3.

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use log::debug;
use lofty::config::ParseOptions;
use lofty::file::FileType;
use lofty::probe::Probe;

/// Report whether `path` holds MPEG audio. `junk_window` bounds how far
/// past the start (or past an ID3v2 tag) a frame sync is searched for.
/// Unreadable files are not tracks.
pub fn is_mp3(path: &Path, junk_window: usize) -> bool {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            debug!("cannot open {}: {e}", path.display());
            return false;
        }
    };
    is_mpeg_stream(BufReader::new(file), junk_window)
}

/// Classify an in-memory byte buffer the same way `is_mp3` classifies files.
#[cfg(test)]
pub fn looks_like_mp3(bytes: &[u8], junk_window: usize) -> bool {
    is_mpeg_stream(std::io::Cursor::new(bytes), junk_window)
}

fn is_mpeg_stream<R: Read + Seek>(reader: R, junk_window: usize) -> bool {
    let options = ParseOptions::new().max_junk_bytes(junk_window);
    match Probe::new(reader).options(options).guess_file_type() {
        Ok(probe) => matches!(probe.file_type(), Some(FileType::Mpeg)),
        Err(e) => {
            debug!("content probe failed: {e}");
            false
        }
    }
}
