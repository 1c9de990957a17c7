//! Where settings files live.
//!
//! # Lookup Order
//!
//! 1. An explicit path given by the caller (`--config` on the command line)
//! 2. `tactus.toml` in the current directory
//! 3. `config.toml` in the user config directory:
//!    `~/.config/tactus/` (Linux), `~/Library/Application Support/tactus/`
//!    (macOS), `%APPDATA%\tactus\` (Windows)

use std::path::{Path, PathBuf};

/// Application name used for directory paths.
const APP_NAME: &str = "tactus";

/// File name inside the user config directory.
const CONFIG_FILE_NAME: &str = "config.toml";

/// File name looked for in the current directory.
pub const LOCAL_CONFIG_FILE: &str = "tactus.toml";

/// Returns the user-specific configuration directory.
///
/// Returns a fallback path if the config directory cannot be determined.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Path of the user settings file (which may not exist).
pub fn user_config_path() -> PathBuf {
    user_config_dir().join(CONFIG_FILE_NAME)
}

/// First existing settings file in `dir` or the user config directory.
pub fn find_config_file_in(dir: &Path) -> Option<PathBuf> {
    let local = dir.join(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }
    let user = user_config_path();
    user.is_file().then_some(user)
}

/// First existing settings file in the lookup order (current directory,
/// then user config directory).
pub fn find_config_file() -> Option<PathBuf> {
    find_config_file_in(Path::new("."))
}
