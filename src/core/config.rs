//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.navstack/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{LevelFilter, debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct NavstackConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub settings: SettingsConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Tab shown when neither a deep link nor a persisted selection says otherwise.
    pub default_tab: Option<String>,
    pub log_level: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SettingsConfig {
    /// Where the selected tab is persisted. Relative paths are under `~/.navstack/`.
    pub path: Option<String>,
    /// Keep persisted values in memory only.
    pub ephemeral: Option<bool>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_TAB: &str = "device";
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Debug;
pub const TAB_ENV: &str = "NAVSTACK_DEFAULT_TAB";
pub const SETTINGS_FILE_ENV: &str = "NAVSTACK_SETTINGS_FILE";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub default_tab: String,
    pub log_level: LevelFilter,
    /// `None` means settings are not written to disk.
    pub settings_path: Option<PathBuf>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".navstack"))
}

/// Returns the path to `~/.navstack/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load config from `~/.navstack/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `NavstackConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<NavstackConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(NavstackConfig::default());
        }
    };
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<NavstackConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(NavstackConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: NavstackConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

fn generate_default_config(path: &Path) {
    let default_content = r#"# Navstack Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# default_tab = "device"             # "archive", "device" or "hub"; or NAVSTACK_DEFAULT_TAB
# log_level = "debug"                # "error", "warn", "info", "debug", "trace", "off"

# [settings]
# path = "settings.json"             # Relative to ~/.navstack/; or NAVSTACK_SETTINGS_FILE
# ephemeral = false                  # true keeps the selected tab in memory only
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
///
/// `cli_tab` is the `--tab` flag (None = not specified).
pub fn resolve(config: &NavstackConfig, cli_tab: Option<&str>) -> ResolvedConfig {
    resolve_with(config, cli_tab, |key| std::env::var(key).ok())
}

fn resolve_with(
    config: &NavstackConfig,
    cli_tab: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Tab: CLI → env → config → default
    let default_tab = cli_tab
        .map(|s| s.to_string())
        .or_else(|| env(TAB_ENV))
        .or_else(|| config.general.default_tab.clone())
        .unwrap_or_else(|| DEFAULT_TAB.to_string());

    let log_level = match config.general.log_level.as_deref() {
        Some(level) => level.parse().unwrap_or_else(|_| {
            warn!("Unknown log level {:?}, using {}", level, DEFAULT_LOG_LEVEL);
            DEFAULT_LOG_LEVEL
        }),
        None => DEFAULT_LOG_LEVEL,
    };

    // Settings file: env → config → default; ephemeral wins over all
    let settings_path = if config.settings.ephemeral.unwrap_or(false) {
        None
    } else {
        env(SETTINGS_FILE_ENV)
            .map(PathBuf::from)
            .or_else(|| config.settings.path.as_ref().map(|p| settings_file(p)))
            .or_else(|| config_dir().map(|d| d.join("settings.json")))
    };

    ResolvedConfig {
        default_tab,
        log_level,
        settings_path,
    }
}

fn settings_file(path: &str) -> PathBuf {
    let candidate = PathBuf::from(path);
    if candidate.is_absolute() {
        return candidate;
    }
    match config_dir() {
        Some(dir) => dir.join(candidate),
        None => candidate,
    }
}
