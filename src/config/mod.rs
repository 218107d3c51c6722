// SPDX-License-Identifier: MPL-2.0
//! Loading and saving gallery settings from a `settings.toml` file.
//!
//! # Configuration Sections
//!
//! - `[gallery]` - Page size and the number of pages fetched on mount
//! - `[diagnostics]` - Whether activity is recorded, and how much of it
//!
//! # Path Resolution
//!
//! 1. Use `load_from_path()`/`save_to_path()` with an explicit path
//! 2. Set the `GALLERY_LENS_CONFIG_DIR` environment variable
//! 3. Falls back to the platform config directory
//!
//! # Examples
//!
//! ```no_run
//! use gallery_lens::config;
//!
//! let (mut config, _warning) = config::load();
//! config.gallery.page_size = Some(48);
//! config::save(&config).expect("Failed to save config");
//! ```

pub mod defaults;

pub use defaults::*;

use crate::domain::diagnostics::BufferCapacity;
use crate::domain::gallery::PageSize;
use crate::error::{Error, Result};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "settings.toml";

/// Warning key returned by [`load`] when the file exists but cannot be read.
pub const LOAD_ERROR_WARNING: &str = "config-load-error";

// =============================================================================
// Section Structs
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GalleryConfig {
    /// Items requested per producer call. Clamped on use.
    #[serde(default = "default_page_size", skip_serializing_if = "Option::is_none")]
    pub page_size: Option<usize>,

    /// Pages fetched concurrently on mount.
    #[serde(
        default = "default_initial_pages",
        skip_serializing_if = "Option::is_none"
    )]
    pub initial_pages: Option<usize>,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            initial_pages: default_initial_pages(),
        }
    }
}

impl GalleryConfig {
    /// Page size, clamped to the valid range.
    #[must_use]
    pub fn page_size(&self) -> PageSize {
        PageSize::new(self.page_size.unwrap_or(DEFAULT_PAGE_SIZE))
    }

    /// Pages fetched on mount, at least one and at most [`MAX_INITIAL_PAGES`].
    #[must_use]
    pub fn initial_pages(&self) -> usize {
        self.initial_pages
            .unwrap_or(DEFAULT_INITIAL_PAGES)
            .clamp(1, MAX_INITIAL_PAGES)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiagnosticsConfig {
    #[serde(default = "default_diagnostics_enabled")]
    pub enabled: bool,

    /// Events retained before the oldest are dropped. Clamped on use.
    #[serde(
        default = "default_buffer_capacity",
        skip_serializing_if = "Option::is_none"
    )]
    pub buffer_capacity: Option<usize>,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            enabled: DEFAULT_DIAGNOSTICS_ENABLED,
            buffer_capacity: default_buffer_capacity(),
        }
    }
}

impl DiagnosticsConfig {
    #[must_use]
    pub fn buffer_capacity(&self) -> BufferCapacity {
        BufferCapacity::new(self.buffer_capacity.unwrap_or(DEFAULT_BUFFER_CAPACITY))
    }
}

// =============================================================================
// Main Config Struct (Sectioned)
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Config {
    #[serde(default)]
    pub gallery: GalleryConfig,

    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
}

// =============================================================================
// Default Value Functions
// =============================================================================

fn default_page_size() -> Option<usize> {
    Some(DEFAULT_PAGE_SIZE)
}

fn default_initial_pages() -> Option<usize> {
    Some(DEFAULT_INITIAL_PAGES)
}

fn default_diagnostics_enabled() -> bool {
    DEFAULT_DIAGNOSTICS_ENABLED
}

fn default_buffer_capacity() -> Option<usize> {
    Some(DEFAULT_BUFFER_CAPACITY)
}

// =============================================================================
// Config Path Resolution
// =============================================================================

fn get_config_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    paths::get_app_config_dir_with_override(base_dir).map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

// =============================================================================
// Load Functions
// =============================================================================

/// Loads the configuration from the default path.
///
/// Returns defaults with a warning key if the file exists but cannot be
/// parsed. A missing file is not an error.
pub fn load() -> (Config, Option<String>) {
    load_with_override(None)
}

/// Loads the configuration from a custom directory.
pub fn load_with_override(base_dir: Option<PathBuf>) -> (Config, Option<String>) {
    let Some(path) = get_config_path_with_override(base_dir) else {
        return (Config::default(), None);
    };
    if !path.exists() {
        return (Config::default(), None);
    }
    match load_from_path(&path) {
        Ok(config) => (config, None),
        Err(_) => (Config::default(), Some(LOAD_ERROR_WARNING.to_string())),
    }
}

/// Loads configuration from a specific path.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

// =============================================================================
// Save Functions
// =============================================================================

/// Saves the configuration to the default path.
pub fn save(config: &Config) -> Result<()> {
    save_with_override(config, None)
}

/// Saves the configuration to a custom directory.
pub fn save_with_override(config: &Config, base_dir: Option<PathBuf>) -> Result<()> {
    if let Some(path) = get_config_path_with_override(base_dir) {
        return save_to_path(config, &path);
    }
    Ok(())
}

/// Saves configuration to a specific path, creating parent directories.
pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config).map_err(Error::from)?;
    fs::write(path, content)?;
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
