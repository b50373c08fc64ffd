//! Configuration file loading with precedence handling.

use crate::index::DEFAULT_CHUNK_SIZE;
use crate::model::encoding::TextEncoding;
use crate::progress::default_progress_dir;
use crate::view_state::{LineHeight, DEFAULT_SCROLL_DEBOUNCE};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "TXTVIEW_CONFIG";

/// Environment variable overriding the configured encoding.
pub const ENCODING_ENV_VAR: &str = "TXTVIEW_ENCODING";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read config file (file may not exist or have permission issues).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    /// A setting parsed but its value is unusable.
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue {
        /// Setting name.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/txtview/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Encoding label used when detection is off or inconclusive (e.g. "gbk").
    #[serde(default)]
    pub encoding: Option<String>,

    /// Sniff the first bytes of each file to pick the encoding.
    #[serde(default)]
    pub auto_detect_encoding: Option<bool>,

    /// Bytes read per indexing chunk.
    #[serde(default)]
    pub chunk_size: Option<u64>,

    /// Lines loaded above and below the visible area.
    #[serde(default)]
    pub buffer_lines: Option<usize>,

    /// Delay before a scroll burst is rendered.
    #[serde(default)]
    pub scroll_debounce_ms: Option<u64>,

    /// Rows per text line.
    #[serde(default)]
    pub line_height: Option<u32>,

    /// Jump to the saved position when a file is reopened.
    #[serde(default)]
    pub restore_position: Option<bool>,

    /// Show the line-number gutter.
    #[serde(default)]
    pub show_line_numbers: Option<bool>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,

    /// Directory holding saved reading positions.
    #[serde(default)]
    pub progress_dir: Option<PathBuf>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Fallback or forced encoding.
    pub encoding: TextEncoding,
    /// Detect the encoding from the file's first bytes.
    pub auto_detect_encoding: bool,
    /// Indexing chunk size in bytes (at least 1).
    pub chunk_size: u64,
    /// Buffer lines around the viewport.
    pub buffer_lines: usize,
    /// Scroll debounce delay.
    pub scroll_debounce: Duration,
    /// Line height estimate.
    pub line_height: LineHeight,
    /// Restore saved reading position on open.
    pub restore_position: bool,
    /// Show line numbers.
    pub show_line_numbers: bool,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
    /// Directory for reading progress.
    pub progress_dir: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            encoding: TextEncoding::utf8(),
            auto_detect_encoding: true,
            chunk_size: DEFAULT_CHUNK_SIZE,
            buffer_lines: 500,
            scroll_debounce: DEFAULT_SCROLL_DEBOUNCE,
            line_height: LineHeight::ONE,
            restore_position: true,
            show_line_numbers: true,
            log_file_path: default_log_path(),
            progress_dir: default_progress_dir(),
        }
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/txtview/txtview.log` on Linux,
/// or appropriate platform path on other systems.
///
/// If state directory cannot be determined, falls back to current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("txtview").join("txtview.log")
    } else {
        PathBuf::from("txtview.log")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
/// Returns `Err` if file exists but cannot be read or parsed.
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    // Missing file is not an error - use defaults
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/txtview/config.toml` on Linux, appropriate path on other platforms.
/// Returns `None` if home directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("txtview").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `TXTVIEW_CONFIG` environment variable
/// 3. Default path `~/.config/txtview/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

fn parse_encoding(label: &str) -> Result<TextEncoding, ConfigError> {
    TextEncoding::from_label(label).map_err(|e| ConfigError::InvalidValue {
        field: "encoding",
        reason: e.to_string(),
    })
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
///
/// # Errors
///
/// `ConfigError::InvalidValue` for an unknown encoding label, a zero chunk
/// size or a zero line height.
pub fn merge_config(config_file: Option<ConfigFile>) -> Result<ResolvedConfig, ConfigError> {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return Ok(defaults);
    };

    let encoding = match config.encoding.as_deref() {
        Some(label) => parse_encoding(label)?,
        None => defaults.encoding,
    };

    let chunk_size = match config.chunk_size {
        Some(0) => {
            return Err(ConfigError::InvalidValue {
                field: "chunk_size",
                reason: "must be at least 1 byte".to_string(),
            })
        }
        Some(size) => size,
        None => defaults.chunk_size,
    };

    let line_height = match config.line_height {
        Some(rows) => LineHeight::new(rows).map_err(|e| ConfigError::InvalidValue {
            field: "line_height",
            reason: e.to_string(),
        })?,
        None => defaults.line_height,
    };

    Ok(ResolvedConfig {
        encoding,
        auto_detect_encoding: config
            .auto_detect_encoding
            .unwrap_or(defaults.auto_detect_encoding),
        chunk_size,
        buffer_lines: config.buffer_lines.unwrap_or(defaults.buffer_lines),
        scroll_debounce: config
            .scroll_debounce_ms
            .map(Duration::from_millis)
            .unwrap_or(defaults.scroll_debounce),
        line_height,
        restore_position: config.restore_position.unwrap_or(defaults.restore_position),
        show_line_numbers: config
            .show_line_numbers
            .unwrap_or(defaults.show_line_numbers),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
        progress_dir: config.progress_dir.unwrap_or(defaults.progress_dir),
    })
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `TXTVIEW_ENCODING`: Override the encoding
///
/// # Errors
///
/// `ConfigError::InvalidValue` if the variable holds an unknown label.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> Result<ResolvedConfig, ConfigError> {
    if let Ok(label) = std::env::var(ENCODING_ENV_VAR) {
        config.encoding = parse_encoding(&label)?;
    }

    Ok(config)
}

/// Apply CLI argument overrides to resolved config.
///
/// CLI args have the highest precedence and override all other sources.
/// Only applies overrides for flags that were explicitly set by the user.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
///
/// An explicit `--encoding` also turns detection off.
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    encoding_override: Option<TextEncoding>,
    chunk_size_override: Option<u64>,
    no_restore: bool,
) -> ResolvedConfig {
    if let Some(encoding) = encoding_override {
        config.encoding = encoding;
        config.auto_detect_encoding = false;
    }

    if let Some(chunk_size) = chunk_size_override {
        config.chunk_size = chunk_size;
    }

    if no_restore {
        config.restore_position = false;
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
