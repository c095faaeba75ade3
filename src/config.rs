//! Application configuration.
//!
//! Handles loading configuration from environment variables and .env files.

use dotenv::dotenv;
use std::env;
use std::path::PathBuf;

use crate::constants::{presenter, storage};
use crate::error::{Error, Result};
use crate::services::location::default_location_path;
use crate::services::presenter::DisplaySize;

/// Configuration for the application.
#[derive(Debug, Clone)]
pub struct Config {
    /// The application name
    app_name: String,
    /// The application version
    app_version: String,
    /// Dataset JSON file
    pub data_path: PathBuf,
    /// Last viewed location file, `None` disables persistence
    pub location_path: Option<PathBuf>,
    /// Presenter snapshot file, `None` disables the feed
    pub presenter_feed_path: Option<PathBuf>,
    /// Initial presenter display size
    pub presenter_size: DisplaySize,
    /// Log file for the terminal UI
    pub log_path: Option<PathBuf>,
}

impl Config {
    /// Get the application name.
    #[must_use]
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Get the application version.
    #[must_use]
    pub fn app_version(&self) -> &str {
        &self.app_version
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: env!("CARGO_PKG_NAME").to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            data_path: PathBuf::from(storage::DEFAULT_DATASET),
            location_path: None,
            presenter_feed_path: None,
            presenter_size: DisplaySize::default(),
            log_path: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn load() -> Result<Self> {
        // Try to load .env file if present
        dotenv().ok();

        let mut config = Self::default();

        config.data_path = env::var("BIBLE_DATA_PATH")
            .ok()
            .map(|path| expand_path(&path))
            .or_else(detect_data_path)
            .unwrap_or_else(|| PathBuf::from(storage::DEFAULT_DATASET));

        config.location_path = env::var("LOCATION_PATH")
            .ok()
            .map(|path| expand_path(&path))
            .or_else(default_location_path);

        config.presenter_feed_path = env::var("PRESENTER_FEED_PATH")
            .ok()
            .filter(|path| !path.trim().is_empty())
            .map(|path| expand_path(&path));

        if let Ok(size) = env::var("PRESENTER_SIZE") {
            config.presenter_size = parse_presenter_size(&size)?;
        }

        config.log_path = env::var("LOG_PATH")
            .ok()
            .map(|path| expand_path(&path))
            .or_else(|| app_data_dir().map(|d| d.join(storage::LOG_FILE)));

        Ok(config)
    }

    /// Override the dataset path (command-line flags win over the environment).
    #[must_use]
    pub fn with_data_path(mut self, path: PathBuf) -> Self {
        self.data_path = path;
        self
    }
}

/// Application directory under the platform data directory.
pub fn app_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join(storage::APP_DIR))
}

fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path.trim()).to_string())
}

fn parse_presenter_size(value: &str) -> Result<DisplaySize> {
    let px: u16 = value.trim().trim_end_matches("px").parse().map_err(|_| {
        Error::config(
            format!("PRESENTER_SIZE {value:?} is not a number"),
            "Use a whole number of pixels, e.g. PRESENTER_SIZE=70",
        )
    })?;
    if !(presenter::MIN_SIZE_PX..=presenter::MAX_SIZE_PX).contains(&px) {
        tracing::warn!(
            "PRESENTER_SIZE {px} outside {}..={}; clamping",
            presenter::MIN_SIZE_PX,
            presenter::MAX_SIZE_PX
        );
    }
    Ok(DisplaySize::new(px))
}

/// Attempt to find the dataset in the usual places
fn detect_data_path() -> Option<PathBuf> {
    let mut candidates = vec![
        PathBuf::from(storage::DEFAULT_DATASET),
        PathBuf::from("data").join(storage::DEFAULT_DATASET),
    ];
    if let Some(dir) = app_data_dir() {
        candidates.push(dir.join(storage::DEFAULT_DATASET));
    }

    candidates.into_iter().find(|p| p.is_file())
}
