//! Layout domain entity.
//!
//! A layout is a named mapping from input scan codes to output key
//! identifiers, plus the indicator color shown while the layout is active.
//! Layouts are loaded fully before use, immutable afterwards, and replaced
//! wholesale on a layout switch — never patched incrementally.  Scan codes
//! absent from the mapping pass through unchanged.

use std::collections::HashMap;

use crate::keycode::OutputKey;

/// An RGB indicator color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Default indicator color when a layout does not specify one.
    pub const RED: Rgb = Rgb { r: 255, g: 0, b: 0 };

    /// Named colors accepted in layout resources.
    const NAMED: &'static [(&'static str, Rgb)] = &[
        ("red", Rgb { r: 255, g: 0, b: 0 }),
        ("green", Rgb { r: 0, g: 255, b: 0 }),
        ("blue", Rgb { r: 0, g: 0, b: 255 }),
        ("white", Rgb { r: 128, g: 128, b: 128 }),
        ("black", Rgb { r: 0, g: 0, b: 0 }),
        ("yellow", Rgb { r: 255, g: 255, b: 0 }),
        ("cyan", Rgb { r: 0, g: 255, b: 255 }),
        ("magenta", Rgb { r: 255, g: 0, b: 255 }),
        ("orange", Rgb { r: 255, g: 165, b: 0 }),
        ("purple", Rgb { r: 128, g: 0, b: 128 }),
    ];

    /// Parses a color string from a layout resource.
    ///
    /// Accepts a named color (case-insensitive) or a 6-hex-digit RGB string
    /// such as `"00FF00"`.  Returns `None` for anything else.
    pub fn parse(s: &str) -> Option<Rgb> {
        let lower = s.to_ascii_lowercase();
        if let Some(&(_, rgb)) = Rgb::NAMED.iter().find(|(name, _)| *name == lower) {
            return Some(rgb);
        }
        if s.len() == 6 {
            let value = u32::from_str_radix(s, 16).ok()?;
            return Some(Rgb {
                r: ((value >> 16) & 0xFF) as u8,
                g: ((value >> 8) & 0xFF) as u8,
                b: (value & 0xFF) as u8,
            });
        }
        None
    }
}

/// A named, swappable remap table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// The layout's resource name.
    pub name: String,
    /// Remapped scan codes.  Codes not present pass through unchanged.
    pub mapping: HashMap<u8, OutputKey>,
    /// Indicator color shown while this layout is active.
    pub indicator_color: Rgb,
}

impl Layout {
    /// A layout that remaps nothing.
    ///
    /// Also the engine's in-memory fallback before the first successful
    /// resource load.
    pub fn passthrough(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mapping: HashMap::new(),
            indicator_color: Rgb::RED,
        }
    }

    /// Resolves a scan code through this layout.
    ///
    /// Mapped codes yield their remapped key; unmapped codes pass through
    /// as themselves (which may be [`OutputKey::Unknown`] for codes with no
    /// assigned usage — callers skip emission for those).
    pub fn resolve(&self, code: u8) -> OutputKey {
        self.mapping
            .get(&code)
            .copied()
            .unwrap_or_else(|| OutputKey::from_scan_code(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_parse_named_colors() {
        assert_eq!(Rgb::parse("red"), Some(Rgb { r: 255, g: 0, b: 0 }));
        assert_eq!(Rgb::parse("blue"), Some(Rgb { r: 0, g: 0, b: 255 }));
        assert_eq!(Rgb::parse("orange"), Some(Rgb { r: 255, g: 165, b: 0 }));
    }

    #[test]
    fn test_rgb_parse_is_case_insensitive_for_names() {
        assert_eq!(Rgb::parse("RED"), Rgb::parse("red"));
        assert_eq!(Rgb::parse("Cyan"), Rgb::parse("cyan"));
    }

    #[test]
    fn test_rgb_parse_hex_strings() {
        assert_eq!(Rgb::parse("00FF00"), Some(Rgb { r: 0, g: 255, b: 0 }));
        assert_eq!(Rgb::parse("123456"), Some(Rgb { r: 0x12, g: 0x34, b: 0x56 }));
    }

    #[test]
    fn test_rgb_parse_rejects_malformed_input() {
        assert_eq!(Rgb::parse("not-a-color"), None);
        assert_eq!(Rgb::parse("FFF"), None, "3-digit hex is not accepted");
        assert_eq!(Rgb::parse("GGGGGG"), None);
        assert_eq!(Rgb::parse(""), None);
    }

    #[test]
    fn test_passthrough_layout_resolves_codes_to_themselves() {
        let layout = Layout::passthrough("identity");
        assert_eq!(layout.resolve(0x04), OutputKey::KeyA);
        assert_eq!(layout.resolve(0x2C), OutputKey::Space);
    }

    #[test]
    fn test_passthrough_layout_defaults_to_red() {
        assert_eq!(Layout::passthrough("x").indicator_color, Rgb::RED);
    }

    #[test]
    fn test_resolve_prefers_explicit_mapping() {
        let mut layout = Layout::passthrough("swap-a-b");
        layout.mapping.insert(0x04, OutputKey::KeyB);

        assert_eq!(layout.resolve(0x04), OutputKey::KeyB);
        // Unmapped neighbours still pass through.
        assert_eq!(layout.resolve(0x05), OutputKey::KeyB);
    }

    #[test]
    fn test_resolve_unassigned_code_yields_unknown() {
        let layout = Layout::passthrough("identity");
        assert_eq!(layout.resolve(0x32), OutputKey::Unknown);
    }
}
