// Platform paths
// Resolves per-OS config and data directories via `dirs`, falling back to the
// working directory when the platform reports none.

use std::path::PathBuf;

/// Directory name used under the platform config/data roots.
pub const APP_DIR_NAME: &str = "quran-bookmarks";

/// Returns the configuration directory.
///
/// - **Linux**: `$XDG_CONFIG_HOME/quran-bookmarks` or `~/.config/quran-bookmarks`
/// - **macOS**: `~/Library/Application Support/quran-bookmarks`
/// - **Windows**: `%APPDATA%/quran-bookmarks`
pub fn get_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

/// Returns the data directory holding the bookmark database.
///
/// - **Linux**: `$XDG_DATA_HOME/quran-bookmarks` or `~/.local/share/quran-bookmarks`
/// - **macOS**: `~/Library/Application Support/quran-bookmarks`
/// - **Windows**: `%APPDATA%/quran-bookmarks`
pub fn get_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}
