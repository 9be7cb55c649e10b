use std::{env, path::PathBuf};

use super::schema::{MIN_SNIFF_BYTES, Settings};

/// Configuration loading helpers.
///
/// `Settings::load` reads an optional config file, then lets environment
/// variables (prefix `TAPEDECK__`) override it; struct defaults fill the rest.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("TAPEDECK")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if self.library.sniff_bytes < MIN_SNIFF_BYTES {
            return Err(format!(
                "library.sniff_bytes must be >= {MIN_SNIFF_BYTES}"
            ));
        }
        Ok(())
    }

    /// Directory used for the grant bookmark, session state and log file.
    pub fn state_dir(&self) -> Option<PathBuf> {
        self.state.dir.clone().or_else(default_state_dir)
    }
}

/// Resolve the config path from `TAPEDECK_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("TAPEDECK_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/tapedeck/config.toml`
/// or `~/.config/tapedeck/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    xdg_dir("XDG_CONFIG_HOME", ".config").map(|d| d.join("tapedeck").join("config.toml"))
}

/// `$XDG_STATE_HOME/tapedeck`, falling back to `~/.local/state/tapedeck`.
pub fn default_state_dir() -> Option<PathBuf> {
    xdg_dir("XDG_STATE_HOME", ".local/state").map(|d| d.join("tapedeck"))
}

fn xdg_dir(var: &str, home_relative: &str) -> Option<PathBuf> {
    if let Some(xdg) = env::var_os(var).filter(|v| !v.is_empty()) {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(home_relative))
    }
}
