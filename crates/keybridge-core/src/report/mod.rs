//! USB HID boot-protocol keyboard report decoding.
//!
//! Every boot-protocol keyboard sends the same fixed 8-byte input report:
//!
//! ```text
//! Byte 0: Modifier bitmask
//!         Bit 0 = Left Ctrl,  Bit 1 = Left Shift,
//!         Bit 2 = Left Alt,   Bit 3 = Left GUI,
//!         Bit 4 = Right Ctrl, Bit 5 = Right Shift,
//!         Bit 6 = Right Alt,  Bit 7 = Right GUI
//! Byte 1: Reserved (0x00)
//! Byte 2–7: Up to 6 concurrently pressed scan codes
//! ```
//!
//! A slot value of 0 means "no key"; 1 is the error-rollover code the
//! keyboard reports when more than 6 keys are held.  Neither is ever treated
//! as a press, so an all-zero report simply decodes to an empty state —
//! there are no error outcomes here.

use std::collections::BTreeSet;

use crate::diff::KeyState;

/// Length of a boot-protocol keyboard input report in bytes.
pub const REPORT_LEN: usize = 8;

/// The eight canonical modifier keys, one per bit of the report's modifier
/// bitmask.
///
/// Declaration order matches bit order, which is also the order modifier
/// edges are emitted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Modifier {
    ControlLeft,
    ShiftLeft,
    AltLeft,
    MetaLeft,
    ControlRight,
    ShiftRight,
    AltRight,
    MetaRight,
}

impl Modifier {
    /// All modifiers in bitmask bit order.
    pub const ALL: [Modifier; 8] = [
        Modifier::ControlLeft,
        Modifier::ShiftLeft,
        Modifier::AltLeft,
        Modifier::MetaLeft,
        Modifier::ControlRight,
        Modifier::ShiftRight,
        Modifier::AltRight,
        Modifier::MetaRight,
    ];

    /// Returns this modifier's bit in the report bitmask.
    pub fn bit(self) -> u8 {
        match self {
            Modifier::ControlLeft => 0x01,
            Modifier::ShiftLeft => 0x02,
            Modifier::AltLeft => 0x04,
            Modifier::MetaLeft => 0x08,
            Modifier::ControlRight => 0x10,
            Modifier::ShiftRight => 0x20,
            Modifier::AltRight => 0x40,
            Modifier::MetaRight => 0x80,
        }
    }

    /// Expands a modifier bitmask into the set modifiers, in bit order.
    pub fn from_mask(mask: u8) -> Vec<Modifier> {
        Modifier::ALL
            .into_iter()
            .filter(|m| mask & m.bit() != 0)
            .collect()
    }

    /// The output key identifier this modifier is emitted as.
    pub fn output_key(self) -> crate::keycode::OutputKey {
        use crate::keycode::OutputKey;
        match self {
            Modifier::ControlLeft => OutputKey::ControlLeft,
            Modifier::ShiftLeft => OutputKey::ShiftLeft,
            Modifier::AltLeft => OutputKey::AltLeft,
            Modifier::MetaLeft => OutputKey::MetaLeft,
            Modifier::ControlRight => OutputKey::ControlRight,
            Modifier::ShiftRight => OutputKey::ShiftRight,
            Modifier::AltRight => OutputKey::AltRight,
            Modifier::MetaRight => OutputKey::MetaRight,
        }
    }
}

/// One raw 8-byte boot-protocol keyboard report.
///
/// Produced once per poll by the transport and owned transiently by the
/// remap engine for the duration of one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootReport {
    /// Modifier bitmask (byte 0).
    pub modifier_mask: u8,
    /// The six scan-code slots (bytes 2–7).
    pub scan_codes: [u8; 6],
}

impl BootReport {
    /// Parses a raw report buffer.
    ///
    /// Returns `None` if the buffer holds fewer than [`REPORT_LEN`] bytes.
    /// Byte 1 is reserved and ignored.
    pub fn from_bytes(buf: &[u8]) -> Option<Self> {
        if buf.len() < REPORT_LEN {
            return None;
        }
        Some(Self {
            modifier_mask: buf[0],
            scan_codes: [buf[2], buf[3], buf[4], buf[5], buf[6], buf[7]],
        })
    }

    /// Decodes this report into a [`KeyState`].
    ///
    /// A slot counts as pressed only when its value is greater than 1;
    /// 0 is "no key" and 1 is error rollover.
    pub fn decode(&self) -> KeyState {
        let pressed: BTreeSet<u8> = self
            .scan_codes
            .iter()
            .copied()
            .filter(|&code| code > 1)
            .collect();
        KeyState {
            modifier_mask: self.modifier_mask,
            pressed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keycode::OutputKey;

    #[test]
    fn test_from_bytes_splits_mask_and_scan_codes() {
        // Arrange
        let raw = [0x02, 0x00, 0x04, 0x05, 0x00, 0x00, 0x00, 0x00];

        // Act
        let report = BootReport::from_bytes(&raw).expect("8 bytes should parse");

        // Assert
        assert_eq!(report.modifier_mask, 0x02);
        assert_eq!(report.scan_codes, [0x04, 0x05, 0x00, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn test_from_bytes_rejects_short_buffers() {
        assert!(BootReport::from_bytes(&[0x00; 7]).is_none());
        assert!(BootReport::from_bytes(&[]).is_none());
    }

    #[test]
    fn test_from_bytes_accepts_longer_buffers() {
        // Some transports hand back a larger buffer than the report needs.
        let raw = [0x00, 0x00, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF];
        let report = BootReport::from_bytes(&raw).expect("should parse prefix");
        assert_eq!(report.scan_codes[0], 0x04);
    }

    #[test]
    fn test_decode_extracts_pressed_codes_above_one() {
        // Arrange: slot values 0 and 1 must never count as pressed
        let report = BootReport {
            modifier_mask: 0,
            scan_codes: [0x00, 0x01, 0x04, 0x2C, 0x00, 0x01],
        };

        // Act
        let state = report.decode();

        // Assert
        assert_eq!(state.pressed.len(), 2);
        assert!(state.pressed.contains(&0x04));
        assert!(state.pressed.contains(&0x2C));
    }

    #[test]
    fn test_decode_all_zero_report_yields_empty_state() {
        let report = BootReport { modifier_mask: 0, scan_codes: [0; 6] };
        let state = report.decode();
        assert_eq!(state.modifier_mask, 0);
        assert!(state.pressed.is_empty());
    }

    #[test]
    fn test_decode_deduplicates_repeated_slots() {
        let report = BootReport {
            modifier_mask: 0,
            scan_codes: [0x04, 0x04, 0x04, 0x00, 0x00, 0x00],
        };
        assert_eq!(report.decode().pressed.len(), 1);
    }

    #[test]
    fn test_modifier_from_mask_expands_single_bits() {
        assert_eq!(Modifier::from_mask(0x01), vec![Modifier::ControlLeft]);
        assert_eq!(Modifier::from_mask(0x02), vec![Modifier::ShiftLeft]);
        assert_eq!(Modifier::from_mask(0x80), vec![Modifier::MetaRight]);
    }

    #[test]
    fn test_modifier_from_mask_expands_combined_masks_in_bit_order() {
        let mods = Modifier::from_mask(0x22); // left shift + right shift
        assert_eq!(mods, vec![Modifier::ShiftLeft, Modifier::ShiftRight]);
    }

    #[test]
    fn test_modifier_from_mask_full_mask_yields_all_eight() {
        assert_eq!(Modifier::from_mask(0xFF), Modifier::ALL.to_vec());
    }

    #[test]
    fn test_modifier_from_mask_zero_yields_none() {
        assert!(Modifier::from_mask(0x00).is_empty());
    }

    #[test]
    fn test_modifier_output_keys_match_hid_usages() {
        assert_eq!(Modifier::ControlLeft.output_key(), OutputKey::ControlLeft);
        assert_eq!(Modifier::ShiftLeft.output_key(), OutputKey::ShiftLeft);
        assert_eq!(Modifier::MetaRight.output_key(), OutputKey::MetaRight);
    }

    #[test]
    fn test_modifier_bits_are_distinct_and_cover_the_byte() {
        let combined = Modifier::ALL.iter().fold(0u8, |acc, m| {
            assert_eq!(acc & m.bit(), 0, "{m:?} bit overlaps another modifier");
            acc | m.bit()
        });
        assert_eq!(combined, 0xFF);
    }
}
