//! Cross-platform path resolution for pkgguard's own files.

use std::path::PathBuf;

const APP_DIR: &str = "pkgguard";

/// Returns the directory for cached datasets.
///
/// Platform-specific locations:
/// - Linux: `~/.cache/pkgguard/`
/// - macOS: `~/Library/Caches/pkgguard/`
/// - Windows: `%LOCALAPPDATA%\pkgguard\`
pub fn cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR)
}

/// Returns the directory holding `config.toml`.
///
/// Falls back to the working directory when no config directory is known.
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}
