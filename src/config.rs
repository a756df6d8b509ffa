/// User settings loaded from `<config_dir>/media-browser/config.toml`
///
/// Every field has a default, so a missing file or a partial file is fine.
/// A file that cannot be parsed is reported and the defaults are used.
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{BrowserError, Result};
use crate::media::metadata::TagReader;
use crate::state::gallery::DEFAULT_ITEMS_PER_PAGE;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Gallery page size at startup
    pub items_per_page: usize,
    /// Choices offered by the page-size picker
    pub page_sizes: Vec<usize>,
    /// Program used to read video tags
    pub exiftool: PathBuf,
    /// Upper bound for one video tag read, in seconds
    pub metadata_timeout_secs: u64,
    /// Descend into symlinked directories while scanning
    pub follow_links: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
            page_sizes: vec![4, 9, 16, 25],
            exiftool: PathBuf::from("exiftool"),
            metadata_timeout_secs: 10,
            follow_links: true,
        }
    }
}

impl Settings {
    /// Default location of the settings file
    /// - Linux: ~/.config/media-browser/config.toml
    /// - macOS: ~/Library/Application Support/media-browser/config.toml
    /// - Windows: %APPDATA%\media-browser\config.toml
    pub fn default_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir().or_else(dirs::home_dir)?;
        path.push("media-browser");
        path.push("config.toml");
        Some(path)
    }

    /// Load settings, falling back to defaults on any problem
    pub fn load() -> Self {
        let Some(path) = Self::default_path() else {
            log::warn!("No config directory, using default settings");
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(settings) => {
                log::info!("Settings loaded from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("{e}; using default settings");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| BrowserError::io(path, e))?;
        let settings: Settings = toml::from_str(&text).map_err(|e| BrowserError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(settings.sanitized())
    }

    fn sanitized(mut self) -> Self {
        if self.items_per_page == 0 {
            self.items_per_page = DEFAULT_ITEMS_PER_PAGE;
        }
        self.page_sizes.retain(|&size| size > 0);
        if !self.page_sizes.contains(&self.items_per_page) {
            self.page_sizes.push(self.items_per_page);
            self.page_sizes.sort_unstable();
        }
        self
    }

    /// Metadata reader configured from these settings
    pub fn tag_reader(&self) -> TagReader {
        TagReader {
            exiftool: self.exiftool.clone(),
            timeout: Duration::from_secs(self.metadata_timeout_secs.max(1)),
        }
    }
}
