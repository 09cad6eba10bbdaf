//! Configuration for the bridge.
//!
//! This module defines the configuration structures used to parameterize a controller:
//! 1. **Defaults:** Baseline values when a field is omitted.
//! 2. **General:** Logging verbosity.
//! 3. **Firmware:** Location of the guest firmware image and whether to watch it for changes.
//!
//! Configuration is supplied as JSON or built with `Config::default()`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::controller::ImageWatch;

/// Default configuration constants.
mod defaults {
    /// Trace-level logging is off unless requested.
    pub const TRACE: bool = false;

    /// A configured firmware image is watched for changes by default.
    pub const WATCH: bool = true;
}

/// Failure to load a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config '{path}': {source}")]
    Read {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid configuration JSON.
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Root configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Firmware image settings.
    #[serde(default)]
    pub firmware: FirmwareConfig,
}

impl Config {
    /// Parses configuration from a JSON string.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads and parses a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Builds the firmware watch a controller should be injected with.
    ///
    /// The watch observes nothing when watching is disabled or no image is configured.
    pub fn image_watch(&self) -> ImageWatch {
        match (&self.firmware.image, self.firmware.watch) {
            (Some(path), true) => ImageWatch::new(path),
            _ => ImageWatch::disabled(),
        }
    }
}

/// General settings.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    /// Raise the default log level to `trace`.
    #[serde(default = "GeneralConfig::default_trace")]
    pub trace: bool,
}

impl GeneralConfig {
    const fn default_trace() -> bool {
        defaults::TRACE
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            trace: defaults::TRACE,
        }
    }
}

/// Guest firmware image settings.
#[derive(Debug, Clone, Deserialize)]
pub struct FirmwareConfig {
    /// Path of the firmware image the guest boots from.
    #[serde(default)]
    pub image: Option<PathBuf>,

    /// Force a reboot when the image's modification time changes during a step.
    #[serde(default = "FirmwareConfig::default_watch")]
    pub watch: bool,
}

impl FirmwareConfig {
    const fn default_watch() -> bool {
        defaults::WATCH
    }
}

impl Default for FirmwareConfig {
    fn default() -> Self {
        Self {
            image: None,
            watch: defaults::WATCH,
        }
    }
}
