// SPDX-License-Identifier: MPL-2.0
//! Application directory resolution.
//!
//! # Resolution Order
//!
//! 1. **Explicit override**: argument to [`get_app_config_dir_with_override`]
//!    (tests, `--config-dir`)
//! 2. **Environment variable**: `GALLERY_LENS_CONFIG_DIR`
//! 3. **Platform default**: via the `dirs` crate, with the app name appended

use std::path::PathBuf;

/// Application name used for directory naming.
const APP_NAME: &str = "GalleryLens";

/// Environment variable to override the config directory.
pub const ENV_CONFIG_DIR: &str = "GALLERY_LENS_CONFIG_DIR";

/// Returns the application config directory.
///
/// - Linux: `~/.config/GalleryLens/`
/// - macOS: `~/Library/Application Support/GalleryLens/`
/// - Windows: `C:\Users\<User>\AppData\Roaming\GalleryLens\`
///
/// Returns `None` if no platform config directory exists.
pub fn get_app_config_dir() -> Option<PathBuf> {
    get_app_config_dir_with_override(None)
}

/// Returns the application config directory, preferring `override_path`.
pub fn get_app_config_dir_with_override(override_path: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(path) = override_path {
        return Some(path);
    }

    if let Ok(env_path) = std::env::var(ENV_CONFIG_DIR) {
        if !env_path.is_empty() {
            return Some(PathBuf::from(env_path));
        }
    }

    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path
    })
}
