//! Configuration file support for bilcube.
//!
//! A decode config records everything a BIL file does not describe about
//! itself (extents, sample encoding) plus decoder behavior, so a dataset can
//! be decoded repeatedly without restating its dimensions.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::decoder::DecodeOptions;
use crate::error::Result;
use crate::layout::Layout;
use crate::sample::{ByteOrder, SampleFormat};

/// Verbosity of the command-line tool, stored lowercase in config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    /// Includes per-file open and seek details
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(format!(
                "Invalid log level: {s}. Valid levels are: error, warn, info, debug, trace"
            )),
        }
    }
}

/// Decode config format written by this build.
///
/// Version 1 introduced the file; 0 never existed and marks a hand-edited or
/// zeroed file. Files newer than this build may describe encodings it cannot
/// decode, so both ends of the range are rejected.
pub const CONFIG_VERSION: u32 = 1;

/// Oldest decode config format this build still reads.
pub const MIN_CONFIG_VERSION: u32 = 1;

/// Decode settings for one BIL dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodeConfig {
    /// Version of the configuration file format
    pub version: u32,

    /// Number of lines
    pub rows: i64,

    /// Samples per band in each line
    pub cols: i64,

    /// Number of spectral bands
    pub bands: i64,

    /// Stored sample type
    #[serde(default)]
    pub sample_format: SampleFormat,

    /// Stored byte order
    #[serde(default)]
    pub byte_order: ByteOrder,

    /// Check file length before decoding
    #[serde(default = "default_eager_size_check")]
    pub eager_size_check: bool,

    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,
}

fn default_eager_size_check() -> bool {
    DecodeOptions::default().eager_size_check
}

impl DecodeConfig {
    /// Create a configuration for the given extents with default encoding.
    pub fn new(rows: i64, cols: i64, bands: i64) -> Self {
        Self {
            version: CONFIG_VERSION,
            rows,
            cols,
            bands,
            sample_format: SampleFormat::default(),
            byte_order: ByteOrder::default(),
            eager_size_check: default_eager_size_check(),
            log_level: LogLevel::default(),
        }
    }

    /// Validate the extents and build a [`Layout`].
    pub fn layout(&self) -> Result<Layout> {
        Layout::with_format(
            self.rows,
            self.cols,
            self.bands,
            self.sample_format,
            self.byte_order,
        )
    }

    /// Decoder options described by this config.
    pub fn options(&self) -> DecodeOptions {
        DecodeOptions {
            eager_size_check: self.eager_size_check,
        }
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a configuration from JSON, checking its format version.
    ///
    /// Failures surface as [`DecodeError::Config`](crate::DecodeError::Config).
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(ConfigError::from)?;

        if !(MIN_CONFIG_VERSION..=CONFIG_VERSION).contains(&config.version) {
            return Err(ConfigError::UnsupportedVersion {
                file_version: config.version,
                oldest: MIN_CONFIG_VERSION,
                newest: CONFIG_VERSION,
            }
            .into());
        }

        Ok(config)
    }

    /// Load a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(ConfigError::from)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded decode config v{} from {:?}", config.version, path);
        Ok(config)
    }

    /// Save the configuration, creating parent directories if needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(ConfigError::from)?;
        }

        let json = self.to_json().map_err(ConfigError::from)?;
        std::fs::write(path, json).map_err(ConfigError::from)?;
        log::info!("Saved decode config to {:?}", path);
        Ok(())
    }
}

/// Reasons a decode config file cannot be read or written.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("malformed decode config: {0}")]
    Json(#[from] serde_json::Error),

    /// The file's `version` lies outside what this build reads
    #[error("decode config version {file_version} is not supported (expected {oldest}..={newest})")]
    UnsupportedVersion {
        /// Version recorded in the file
        file_version: u32,
        /// Oldest readable version
        oldest: u32,
        /// Newest readable version
        newest: u32,
    },

    #[error("decode config I/O error: {0}")]
    Io(#[from] std::io::Error),
}
