//! JSON layout resource loading.
//!
//! A layout lives at `<mapping_directory>/<name>.json`:
//!
//! ```json
//! {
//!     "keymaps": [
//!         { "0x04": "B", "0x05": "A" }
//!     ],
//!     "led_color": "cyan"
//! }
//! ```
//!
//! Keys are scan codes (`"0x04"` hex or decimal strings), values are the
//! symbolic key names from [`OutputKey::from_name`], and `led_color` is a
//! named color or a 6-hex-digit RGB string.  Malformed entries are skipped
//! with a warning so one typo never takes the whole layout down; only an
//! unreadable or structurally invalid file fails the load.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::Deserialize;
use tracing::warn;

use keybridge_core::{Layout, OutputKey, Rgb};

use crate::application::layout_manager::{LayoutStore, StoreError};
use super::config::parse_key_code;

/// On-disk shape of a layout resource.
#[derive(Debug, Deserialize)]
struct LayoutFile {
    #[serde(default)]
    keymaps: Vec<HashMap<String, String>>,
    #[serde(default)]
    led_color: Option<String>,
}

/// A [`LayoutStore`] over a directory of `<name>.json` files.
pub struct JsonLayoutStore {
    dir: PathBuf,
}

impl JsonLayoutStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn build_mapping(name: &str, file: &LayoutFile) -> HashMap<u8, OutputKey> {
        let mut mapping = HashMap::new();
        for table in &file.keymaps {
            for (code_str, key_name) in table {
                let Some(code) = parse_key_code(code_str) else {
                    warn!(layout = name, entry = %code_str, "invalid scan code in layout, skipping");
                    continue;
                };
                let Some(key) = OutputKey::from_name(key_name) else {
                    warn!(layout = name, entry = %key_name, "unknown key name in layout, skipping");
                    continue;
                };
                mapping.insert(code, key);
            }
        }
        mapping
    }

    fn indicator_color(name: &str, file: &LayoutFile) -> Rgb {
        match &file.led_color {
            None => Rgb::RED,
            Some(color_str) => Rgb::parse(color_str).unwrap_or_else(|| {
                warn!(layout = name, color = %color_str, "invalid led_color, using red");
                Rgb::RED
            }),
        }
    }
}

impl LayoutStore for JsonLayoutStore {
    fn load(&self, name: &str) -> Result<Layout, StoreError> {
        let path = self.dir.join(format!("{name}.json"));
        let content = std::fs::read_to_string(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StoreError::NotFound(name.to_string())
            } else {
                StoreError::Io {
                    name: name.to_string(),
                    source: e,
                }
            }
        })?;
        let file: LayoutFile = serde_json::from_str(&content).map_err(|e| StoreError::Parse {
            name: name.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Layout {
            name: name.to_string(),
            mapping: Self::build_mapping(name, &file),
            indicator_color: Self::indicator_color(name, &file),
        })
    }
}
