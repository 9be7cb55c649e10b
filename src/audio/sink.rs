//! Opening a file into a paused `rodio` sink.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rodio::{Decoder, OutputStream, Sink};

/// Create a paused `Sink` for the file at `path`.
pub(super) fn open_sink(stream: &OutputStream, path: &Path) -> Result<Sink, String> {
    let file = File::open(path).map_err(|e| format!("failed to open {}: {e}", path.display()))?;
    let source = Decoder::new(BufReader::new(file))
        .map_err(|e| format!("failed to decode {}: {e}", path.display()))?;

    let sink = Sink::connect_new(stream.mixer());
    sink.append(source);
    sink.pause();
    Ok(sink)
}
