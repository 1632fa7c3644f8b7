//! TOML-based daemon configuration.
//!
//! Reads `BridgeConfig` from the platform-appropriate config file:
//! - Linux:    `~/.config/keybridge/config.toml`
//! - macOS:    `~/Library/Application Support/KeyBridge/config.toml`
//! - Windows:  `%APPDATA%\KeyBridge\config.toml`
//!
//! Every field carries a serde default, so a missing file or a partial file
//! both yield a working configuration.  Command-line flags and environment
//! variables (see `main.rs`) override whatever the file provides.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configured layout swap key is not a valid scan code.
    #[error("invalid layout swap key '{0}': expected a scan code like \"0x30\"")]
    InvalidSwapKey(String),
}

// ── Config schema ─────────────────────────────────────────────────────────────

/// Daemon configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BridgeConfig {
    /// Layout active at startup.  Must be listed in `available`.
    #[serde(default = "default_mapping")]
    pub default_mapping: String,
    /// Layout rotation order for the swap key.
    #[serde(default = "default_available")]
    pub available: Vec<String>,
    /// Scan code of the reserved layout-swap key, e.g. `"0x30"`.
    #[serde(default = "default_swap_key")]
    pub layout_swap_key: String,
    /// Directory holding `<name>.json` layout resources.
    #[serde(default = "default_mapping_directory")]
    pub mapping_directory: PathBuf,
    /// Indicator brightness, 0 (off) to 10 (full).
    #[serde(default = "default_brightness")]
    pub brightness: u8,
    /// Interrupt read timeout per poll, in milliseconds.
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl BridgeConfig {
    /// Parses the configured swap key into a scan code.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSwapKey`] when the string is neither a
    /// `0x`-prefixed hex value nor a decimal value that fits in a byte.
    pub fn swap_code(&self) -> Result<u8, ConfigError> {
        parse_key_code(&self.layout_swap_key)
            .ok_or_else(|| ConfigError::InvalidSwapKey(self.layout_swap_key.clone()))
    }

    /// The brightness scaled to the unit range the indicator expects.
    pub fn brightness_level(&self) -> f32 {
        f32::from(self.brightness.min(10)) / 10.0
    }

    /// The per-poll interrupt read timeout.
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }
}

/// Parses a scan code string: `"0x30"` style hex or plain decimal.
pub fn parse_key_code(s: &str) -> Option<u8> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u8::from_str_radix(hex, 16).ok()
    } else {
        s.parse().ok()
    }
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_mapping() -> String {
    "passthrough".to_string()
}
fn default_available() -> Vec<String> {
    vec!["passthrough".to_string(), "f_keys".to_string()]
}
fn default_swap_key() -> String {
    "0x30".to_string()
}
fn default_mapping_directory() -> PathBuf {
    PathBuf::from("keymaps")
}
fn default_brightness() -> u8 {
    5
}
fn default_read_timeout_ms() -> u64 {
    50
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            default_mapping: default_mapping(),
            available: default_available(),
            layout_swap_key: default_swap_key(),
            mapping_directory: default_mapping_directory(),
            brightness: default_brightness(),
            read_timeout_ms: default_read_timeout_ms(),
            log_level: default_log_level(),
        }
    }
}

// ── Config loading ────────────────────────────────────────────────────────────

/// Determines the platform-appropriate directory for the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when the platform config base
/// directory cannot be determined from the environment.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)
}

/// Resolves the full path to the config file.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}

/// Loads the configuration.
///
/// With an explicit `path` the file must exist.  Without one, the platform
/// default location is tried and a missing file yields the defaults, so the
/// daemon runs out of the box.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors and
/// [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config(path: Option<&Path>) -> Result<BridgeConfig, ConfigError> {
    let (path, missing_ok) = match path {
        Some(p) => (p.to_path_buf(), false),
        None => (config_file_path()?, true),
    };

    match std::fs::read_to_string(&path) {
        Ok(content) => {
            let cfg: BridgeConfig = toml::from_str(&content)?;
            Ok(cfg)
        }
        Err(e) if missing_ok && e.kind() == std::io::ErrorKind::NotFound => {
            Ok(BridgeConfig::default())
        }
        Err(e) => Err(ConfigError::Io { path, source: e }),
    }
}

/// Resolves the platform config base directory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("KeyBridge"))
    }

    #[cfg(target_os = "linux")]
    {
        // XDG_CONFIG_HOME or ~/.config
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("keybridge"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME")
            .map(|h| PathBuf::from(h).join("Library").join("Application Support").join("KeyBridge"))
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        // Arrange / Act
        let cfg = BridgeConfig::default();

        // Assert
        assert_eq!(cfg.default_mapping, "passthrough");
        assert_eq!(cfg.available, vec!["passthrough", "f_keys"]);
        assert_eq!(cfg.layout_swap_key, "0x30");
        assert_eq!(cfg.mapping_directory, PathBuf::from("keymaps"));
        assert_eq!(cfg.brightness, 5);
        assert_eq!(cfg.log_level, "info");
    }

    #[test]
    fn test_swap_code_parses_hex_and_decimal() {
        let mut cfg = BridgeConfig::default();
        assert_eq!(cfg.swap_code().unwrap(), 0x30);

        cfg.layout_swap_key = "72".to_string();
        assert_eq!(cfg.swap_code().unwrap(), 72);

        cfg.layout_swap_key = "0X4A".to_string();
        assert_eq!(cfg.swap_code().unwrap(), 0x4A);
    }

    #[test]
    fn test_swap_code_rejects_garbage() {
        let mut cfg = BridgeConfig::default();
        for bad in ["", "0x", "0xZZ", "banana", "0x123"] {
            cfg.layout_swap_key = bad.to_string();
            assert!(
                matches!(cfg.swap_code(), Err(ConfigError::InvalidSwapKey(_))),
                "'{bad}' should be rejected"
            );
        }
    }

    #[test]
    fn test_brightness_level_scales_and_clamps() {
        let mut cfg = BridgeConfig::default();
        cfg.brightness = 0;
        assert_eq!(cfg.brightness_level(), 0.0);
        cfg.brightness = 10;
        assert_eq!(cfg.brightness_level(), 1.0);
        cfg.brightness = 200;
        assert_eq!(cfg.brightness_level(), 1.0, "out-of-range values clamp to full");
    }

    #[test]
    fn test_read_timeout_converts_milliseconds() {
        let mut cfg = BridgeConfig::default();
        cfg.read_timeout_ms = 250;
        assert_eq!(cfg.read_timeout(), Duration::from_millis(250));
    }

    #[test]
    fn test_deserialize_empty_toml_uses_defaults() {
        let cfg: BridgeConfig = toml::from_str("").expect("empty TOML deserializes");
        assert_eq!(cfg, BridgeConfig::default());
    }

    #[test]
    fn test_deserialize_partial_toml_overrides_defaults() {
        // Arrange
        let toml_str = r#"
default_mapping = "gaming"
available = ["gaming", "passthrough"]
brightness = 8
"#;

        // Act
        let cfg: BridgeConfig = toml::from_str(toml_str).expect("deserialize partial");

        // Assert
        assert_eq!(cfg.default_mapping, "gaming");
        assert_eq!(cfg.brightness, 8);
        // Unspecified fields keep their defaults
        assert_eq!(cfg.layout_swap_key, "0x30");
        assert_eq!(cfg.read_timeout_ms, 50);
    }

    #[test]
    fn test_deserialize_invalid_toml_is_an_error() {
        let result: Result<BridgeConfig, toml::de::Error> = toml::from_str("[[[ not toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_config_round_trips_through_toml() {
        let mut cfg = BridgeConfig::default();
        cfg.default_mapping = "dvorak".to_string();
        cfg.read_timeout_ms = 100;

        let toml_str = toml::to_string_pretty(&cfg).expect("serialize");
        let restored: BridgeConfig = toml::from_str(&toml_str).expect("deserialize");

        assert_eq!(cfg, restored);
    }

    #[test]
    fn test_load_config_with_explicit_missing_path_is_an_error() {
        let result = load_config(Some(Path::new("/nonexistent/keybridge/config.toml")));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_parse_key_code_handles_both_radixes() {
        assert_eq!(parse_key_code("0x30"), Some(0x30));
        assert_eq!(parse_key_code("48"), Some(48));
        assert_eq!(parse_key_code("0xFF"), Some(0xFF));
        assert_eq!(parse_key_code("256"), None);
        assert_eq!(parse_key_code("nope"), None);
    }
}
