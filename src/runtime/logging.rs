use std::fs::{self, File};
use std::path::Path;

use env_logger::{Builder, Env, Target};

use crate::config::LogSettings;

pub const LOG_FILE: &str = "tapedeck.log";

/// Send log records to `<state_dir>/tapedeck.log`.
///
/// The terminal belongs to the TUI, so without a state directory (or when
/// the file cannot be created) logging stays off. `RUST_LOG` wins over the
/// configured level.
pub fn init(settings: &LogSettings, state_dir: Option<&Path>) {
    let Some(file) = state_dir.and_then(open_log) else {
        return;
    };

    let _ = Builder::from_env(Env::default().default_filter_or(settings.level.as_str()))
        .format_timestamp_millis()
        .target(Target::Pipe(Box::new(file)))
        .try_init();
}

fn open_log(dir: &Path) -> Option<File> {
    fs::create_dir_all(dir).ok()?;
    File::create(dir.join(LOG_FILE)).ok()
}
