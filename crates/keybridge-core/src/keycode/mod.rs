//! Output key identifiers (USB HID Usage IDs, page 0x07).
//!
//! [`OutputKey`] is the fixed enumeration of keys the output sink can press
//! and release.  The numeric value of each variant is its HID Usage ID on the
//! keyboard/keypad page, which is also what the physical keyboard reports in
//! its scan-code slots — so an unmapped scan code "passes through" simply by
//! resolving it with [`OutputKey::from_scan_code`].
//!
//! Layout resource files refer to keys by symbolic name (`"A"`, `"F1"`,
//! `"LEFT_SHIFT"`, …).  [`OutputKey::from_name`] is the explicit,
//! exhaustive name table used at load time; an unknown name is a recoverable
//! per-entry error for the loader, never a crash.
//!
//! Reference: USB HID Usage Tables 1.3, Section 10 (Keyboard/Keypad page 0x07).

/// Output key identifier for the virtual keyboard (HID Usage ID, page 0x07).
///
/// [`OutputKey::Unknown`] is the sentinel for scan codes with no assigned
/// usage; the remap engine never forwards it to the output sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum OutputKey {
    // Letters (HID 0x04–0x1D)
    KeyA = 0x04,
    KeyB = 0x05,
    KeyC = 0x06,
    KeyD = 0x07,
    KeyE = 0x08,
    KeyF = 0x09,
    KeyG = 0x0A,
    KeyH = 0x0B,
    KeyI = 0x0C,
    KeyJ = 0x0D,
    KeyK = 0x0E,
    KeyL = 0x0F,
    KeyM = 0x10,
    KeyN = 0x11,
    KeyO = 0x12,
    KeyP = 0x13,
    KeyQ = 0x14,
    KeyR = 0x15,
    KeyS = 0x16,
    KeyT = 0x17,
    KeyU = 0x18,
    KeyV = 0x19,
    KeyW = 0x1A,
    KeyX = 0x1B,
    KeyY = 0x1C,
    KeyZ = 0x1D,

    // Digits (HID 0x1E–0x27)
    Digit1 = 0x1E,
    Digit2 = 0x1F,
    Digit3 = 0x20,
    Digit4 = 0x21,
    Digit5 = 0x22,
    Digit6 = 0x23,
    Digit7 = 0x24,
    Digit8 = 0x25,
    Digit9 = 0x26,
    Digit0 = 0x27,

    // Control keys (HID 0x28–0x38)
    Enter = 0x28,
    Escape = 0x29,
    Backspace = 0x2A,
    Tab = 0x2B,
    Space = 0x2C,
    Minus = 0x2D,
    Equal = 0x2E,
    BracketLeft = 0x2F,
    BracketRight = 0x30,
    Backslash = 0x31,
    Semicolon = 0x33,
    Quote = 0x34,
    Backquote = 0x35,
    Comma = 0x36,
    Period = 0x37,
    Slash = 0x38,

    // Lock keys
    CapsLock = 0x39,

    // Function keys (HID 0x3A–0x45)
    F1 = 0x3A,
    F2 = 0x3B,
    F3 = 0x3C,
    F4 = 0x3D,
    F5 = 0x3E,
    F6 = 0x3F,
    F7 = 0x40,
    F8 = 0x41,
    F9 = 0x42,
    F10 = 0x43,
    F11 = 0x44,
    F12 = 0x45,

    // Navigation cluster (HID 0x46–0x52)
    PrintScreen = 0x46,
    ScrollLock = 0x47,
    Pause = 0x48,
    Insert = 0x49,
    Home = 0x4A,
    PageUp = 0x4B,
    Delete = 0x4C,
    End = 0x4D,
    PageDown = 0x4E,
    ArrowRight = 0x4F,
    ArrowLeft = 0x50,
    ArrowDown = 0x51,
    ArrowUp = 0x52,

    // Numpad (HID 0x53–0x63)
    NumLock = 0x53,
    NumpadDivide = 0x54,
    NumpadMultiply = 0x55,
    NumpadSubtract = 0x56,
    NumpadAdd = 0x57,
    NumpadEnter = 0x58,
    Numpad1 = 0x59,
    Numpad2 = 0x5A,
    Numpad3 = 0x5B,
    Numpad4 = 0x5C,
    Numpad5 = 0x5D,
    Numpad6 = 0x5E,
    Numpad7 = 0x5F,
    Numpad8 = 0x60,
    Numpad9 = 0x61,
    Numpad0 = 0x62,
    NumpadDecimal = 0x63,

    // Application key (HID 0x65)
    ContextMenu = 0x65,

    // Modifier keys (HID 0xE0–0xE7)
    ControlLeft = 0xE0,
    ShiftLeft = 0xE1,
    AltLeft = 0xE2,
    MetaLeft = 0xE3,
    ControlRight = 0xE4,
    ShiftRight = 0xE5,
    AltRight = 0xE6,
    MetaRight = 0xE7,

    /// Sentinel for scan codes with no assigned usage.
    Unknown = 0x00,
}

impl OutputKey {
    /// Every assigned key, in HID usage order.  Used by output sinks that
    /// must declare their supported key set up front (e.g. uinput).
    pub const ALL: &'static [OutputKey] = &[
        OutputKey::KeyA, OutputKey::KeyB, OutputKey::KeyC, OutputKey::KeyD,
        OutputKey::KeyE, OutputKey::KeyF, OutputKey::KeyG, OutputKey::KeyH,
        OutputKey::KeyI, OutputKey::KeyJ, OutputKey::KeyK, OutputKey::KeyL,
        OutputKey::KeyM, OutputKey::KeyN, OutputKey::KeyO, OutputKey::KeyP,
        OutputKey::KeyQ, OutputKey::KeyR, OutputKey::KeyS, OutputKey::KeyT,
        OutputKey::KeyU, OutputKey::KeyV, OutputKey::KeyW, OutputKey::KeyX,
        OutputKey::KeyY, OutputKey::KeyZ,
        OutputKey::Digit1, OutputKey::Digit2, OutputKey::Digit3, OutputKey::Digit4,
        OutputKey::Digit5, OutputKey::Digit6, OutputKey::Digit7, OutputKey::Digit8,
        OutputKey::Digit9, OutputKey::Digit0,
        OutputKey::Enter, OutputKey::Escape, OutputKey::Backspace, OutputKey::Tab,
        OutputKey::Space, OutputKey::Minus, OutputKey::Equal, OutputKey::BracketLeft,
        OutputKey::BracketRight, OutputKey::Backslash, OutputKey::Semicolon,
        OutputKey::Quote, OutputKey::Backquote, OutputKey::Comma, OutputKey::Period,
        OutputKey::Slash, OutputKey::CapsLock,
        OutputKey::F1, OutputKey::F2, OutputKey::F3, OutputKey::F4, OutputKey::F5,
        OutputKey::F6, OutputKey::F7, OutputKey::F8, OutputKey::F9, OutputKey::F10,
        OutputKey::F11, OutputKey::F12,
        OutputKey::PrintScreen, OutputKey::ScrollLock, OutputKey::Pause,
        OutputKey::Insert, OutputKey::Home, OutputKey::PageUp, OutputKey::Delete,
        OutputKey::End, OutputKey::PageDown,
        OutputKey::ArrowRight, OutputKey::ArrowLeft, OutputKey::ArrowDown, OutputKey::ArrowUp,
        OutputKey::NumLock, OutputKey::NumpadDivide, OutputKey::NumpadMultiply,
        OutputKey::NumpadSubtract, OutputKey::NumpadAdd, OutputKey::NumpadEnter,
        OutputKey::Numpad1, OutputKey::Numpad2, OutputKey::Numpad3, OutputKey::Numpad4,
        OutputKey::Numpad5, OutputKey::Numpad6, OutputKey::Numpad7, OutputKey::Numpad8,
        OutputKey::Numpad9, OutputKey::Numpad0, OutputKey::NumpadDecimal,
        OutputKey::ContextMenu,
        OutputKey::ControlLeft, OutputKey::ShiftLeft, OutputKey::AltLeft,
        OutputKey::MetaLeft, OutputKey::ControlRight, OutputKey::ShiftRight,
        OutputKey::AltRight, OutputKey::MetaRight,
    ];

    /// Resolves a raw scan code to an [`OutputKey`].
    ///
    /// Returns [`OutputKey::Unknown`] for unassigned values (including the
    /// reserved codes 0x00–0x03).
    pub fn from_scan_code(code: u8) -> Self {
        match code {
            0x04 => OutputKey::KeyA,
            0x05 => OutputKey::KeyB,
            0x06 => OutputKey::KeyC,
            0x07 => OutputKey::KeyD,
            0x08 => OutputKey::KeyE,
            0x09 => OutputKey::KeyF,
            0x0A => OutputKey::KeyG,
            0x0B => OutputKey::KeyH,
            0x0C => OutputKey::KeyI,
            0x0D => OutputKey::KeyJ,
            0x0E => OutputKey::KeyK,
            0x0F => OutputKey::KeyL,
            0x10 => OutputKey::KeyM,
            0x11 => OutputKey::KeyN,
            0x12 => OutputKey::KeyO,
            0x13 => OutputKey::KeyP,
            0x14 => OutputKey::KeyQ,
            0x15 => OutputKey::KeyR,
            0x16 => OutputKey::KeyS,
            0x17 => OutputKey::KeyT,
            0x18 => OutputKey::KeyU,
            0x19 => OutputKey::KeyV,
            0x1A => OutputKey::KeyW,
            0x1B => OutputKey::KeyX,
            0x1C => OutputKey::KeyY,
            0x1D => OutputKey::KeyZ,
            0x1E => OutputKey::Digit1,
            0x1F => OutputKey::Digit2,
            0x20 => OutputKey::Digit3,
            0x21 => OutputKey::Digit4,
            0x22 => OutputKey::Digit5,
            0x23 => OutputKey::Digit6,
            0x24 => OutputKey::Digit7,
            0x25 => OutputKey::Digit8,
            0x26 => OutputKey::Digit9,
            0x27 => OutputKey::Digit0,
            0x28 => OutputKey::Enter,
            0x29 => OutputKey::Escape,
            0x2A => OutputKey::Backspace,
            0x2B => OutputKey::Tab,
            0x2C => OutputKey::Space,
            0x2D => OutputKey::Minus,
            0x2E => OutputKey::Equal,
            0x2F => OutputKey::BracketLeft,
            0x30 => OutputKey::BracketRight,
            0x31 => OutputKey::Backslash,
            0x33 => OutputKey::Semicolon,
            0x34 => OutputKey::Quote,
            0x35 => OutputKey::Backquote,
            0x36 => OutputKey::Comma,
            0x37 => OutputKey::Period,
            0x38 => OutputKey::Slash,
            0x39 => OutputKey::CapsLock,
            0x3A => OutputKey::F1,
            0x3B => OutputKey::F2,
            0x3C => OutputKey::F3,
            0x3D => OutputKey::F4,
            0x3E => OutputKey::F5,
            0x3F => OutputKey::F6,
            0x40 => OutputKey::F7,
            0x41 => OutputKey::F8,
            0x42 => OutputKey::F9,
            0x43 => OutputKey::F10,
            0x44 => OutputKey::F11,
            0x45 => OutputKey::F12,
            0x46 => OutputKey::PrintScreen,
            0x47 => OutputKey::ScrollLock,
            0x48 => OutputKey::Pause,
            0x49 => OutputKey::Insert,
            0x4A => OutputKey::Home,
            0x4B => OutputKey::PageUp,
            0x4C => OutputKey::Delete,
            0x4D => OutputKey::End,
            0x4E => OutputKey::PageDown,
            0x4F => OutputKey::ArrowRight,
            0x50 => OutputKey::ArrowLeft,
            0x51 => OutputKey::ArrowDown,
            0x52 => OutputKey::ArrowUp,
            0x53 => OutputKey::NumLock,
            0x54 => OutputKey::NumpadDivide,
            0x55 => OutputKey::NumpadMultiply,
            0x56 => OutputKey::NumpadSubtract,
            0x57 => OutputKey::NumpadAdd,
            0x58 => OutputKey::NumpadEnter,
            0x59 => OutputKey::Numpad1,
            0x5A => OutputKey::Numpad2,
            0x5B => OutputKey::Numpad3,
            0x5C => OutputKey::Numpad4,
            0x5D => OutputKey::Numpad5,
            0x5E => OutputKey::Numpad6,
            0x5F => OutputKey::Numpad7,
            0x60 => OutputKey::Numpad8,
            0x61 => OutputKey::Numpad9,
            0x62 => OutputKey::Numpad0,
            0x63 => OutputKey::NumpadDecimal,
            0x65 => OutputKey::ContextMenu,
            0xE0 => OutputKey::ControlLeft,
            0xE1 => OutputKey::ShiftLeft,
            0xE2 => OutputKey::AltLeft,
            0xE3 => OutputKey::MetaLeft,
            0xE4 => OutputKey::ControlRight,
            0xE5 => OutputKey::ShiftRight,
            0xE6 => OutputKey::AltRight,
            0xE7 => OutputKey::MetaRight,
            _ => OutputKey::Unknown,
        }
    }

    /// Returns the raw HID usage value for this key.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Returns `true` if this is a modifier key.
    pub fn is_modifier(self) -> bool {
        matches!(
            self,
            OutputKey::ControlLeft
                | OutputKey::ControlRight
                | OutputKey::ShiftLeft
                | OutputKey::ShiftRight
                | OutputKey::AltLeft
                | OutputKey::AltRight
                | OutputKey::MetaLeft
                | OutputKey::MetaRight
        )
    }

    /// Resolves a symbolic key name from a layout resource file.
    ///
    /// Names follow the convention used by the layout files themselves:
    /// upper-snake-case, letters as bare letters, digits spelled out
    /// (`"ONE"` … `"ZERO"`).  Returns `None` for unknown names; the layout
    /// loader treats that as a recoverable per-entry error.
    pub fn from_name(name: &str) -> Option<Self> {
        let key = match name {
            "A" => OutputKey::KeyA,
            "B" => OutputKey::KeyB,
            "C" => OutputKey::KeyC,
            "D" => OutputKey::KeyD,
            "E" => OutputKey::KeyE,
            "F" => OutputKey::KeyF,
            "G" => OutputKey::KeyG,
            "H" => OutputKey::KeyH,
            "I" => OutputKey::KeyI,
            "J" => OutputKey::KeyJ,
            "K" => OutputKey::KeyK,
            "L" => OutputKey::KeyL,
            "M" => OutputKey::KeyM,
            "N" => OutputKey::KeyN,
            "O" => OutputKey::KeyO,
            "P" => OutputKey::KeyP,
            "Q" => OutputKey::KeyQ,
            "R" => OutputKey::KeyR,
            "S" => OutputKey::KeyS,
            "T" => OutputKey::KeyT,
            "U" => OutputKey::KeyU,
            "V" => OutputKey::KeyV,
            "W" => OutputKey::KeyW,
            "X" => OutputKey::KeyX,
            "Y" => OutputKey::KeyY,
            "Z" => OutputKey::KeyZ,
            "ONE" => OutputKey::Digit1,
            "TWO" => OutputKey::Digit2,
            "THREE" => OutputKey::Digit3,
            "FOUR" => OutputKey::Digit4,
            "FIVE" => OutputKey::Digit5,
            "SIX" => OutputKey::Digit6,
            "SEVEN" => OutputKey::Digit7,
            "EIGHT" => OutputKey::Digit8,
            "NINE" => OutputKey::Digit9,
            "ZERO" => OutputKey::Digit0,
            "ENTER" | "RETURN" => OutputKey::Enter,
            "ESCAPE" => OutputKey::Escape,
            "BACKSPACE" => OutputKey::Backspace,
            "TAB" => OutputKey::Tab,
            "SPACE" | "SPACEBAR" => OutputKey::Space,
            "MINUS" => OutputKey::Minus,
            "EQUALS" => OutputKey::Equal,
            "LEFT_BRACKET" => OutputKey::BracketLeft,
            "RIGHT_BRACKET" => OutputKey::BracketRight,
            "BACKSLASH" => OutputKey::Backslash,
            "SEMICOLON" => OutputKey::Semicolon,
            "QUOTE" => OutputKey::Quote,
            "GRAVE_ACCENT" => OutputKey::Backquote,
            "COMMA" => OutputKey::Comma,
            "PERIOD" => OutputKey::Period,
            "FORWARD_SLASH" => OutputKey::Slash,
            "CAPS_LOCK" => OutputKey::CapsLock,
            "F1" => OutputKey::F1,
            "F2" => OutputKey::F2,
            "F3" => OutputKey::F3,
            "F4" => OutputKey::F4,
            "F5" => OutputKey::F5,
            "F6" => OutputKey::F6,
            "F7" => OutputKey::F7,
            "F8" => OutputKey::F8,
            "F9" => OutputKey::F9,
            "F10" => OutputKey::F10,
            "F11" => OutputKey::F11,
            "F12" => OutputKey::F12,
            "PRINT_SCREEN" => OutputKey::PrintScreen,
            "SCROLL_LOCK" => OutputKey::ScrollLock,
            "PAUSE" => OutputKey::Pause,
            "INSERT" => OutputKey::Insert,
            "HOME" => OutputKey::Home,
            "PAGE_UP" => OutputKey::PageUp,
            "DELETE" => OutputKey::Delete,
            "END" => OutputKey::End,
            "PAGE_DOWN" => OutputKey::PageDown,
            "RIGHT_ARROW" => OutputKey::ArrowRight,
            "LEFT_ARROW" => OutputKey::ArrowLeft,
            "DOWN_ARROW" => OutputKey::ArrowDown,
            "UP_ARROW" => OutputKey::ArrowUp,
            "KEYPAD_NUMLOCK" => OutputKey::NumLock,
            "KEYPAD_FORWARD_SLASH" => OutputKey::NumpadDivide,
            "KEYPAD_ASTERISK" => OutputKey::NumpadMultiply,
            "KEYPAD_MINUS" => OutputKey::NumpadSubtract,
            "KEYPAD_PLUS" => OutputKey::NumpadAdd,
            "KEYPAD_ENTER" => OutputKey::NumpadEnter,
            "KEYPAD_ONE" => OutputKey::Numpad1,
            "KEYPAD_TWO" => OutputKey::Numpad2,
            "KEYPAD_THREE" => OutputKey::Numpad3,
            "KEYPAD_FOUR" => OutputKey::Numpad4,
            "KEYPAD_FIVE" => OutputKey::Numpad5,
            "KEYPAD_SIX" => OutputKey::Numpad6,
            "KEYPAD_SEVEN" => OutputKey::Numpad7,
            "KEYPAD_EIGHT" => OutputKey::Numpad8,
            "KEYPAD_NINE" => OutputKey::Numpad9,
            "KEYPAD_ZERO" => OutputKey::Numpad0,
            "KEYPAD_PERIOD" => OutputKey::NumpadDecimal,
            "APPLICATION" => OutputKey::ContextMenu,
            "LEFT_CONTROL" => OutputKey::ControlLeft,
            "LEFT_SHIFT" => OutputKey::ShiftLeft,
            "LEFT_ALT" => OutputKey::AltLeft,
            "LEFT_GUI" => OutputKey::MetaLeft,
            "RIGHT_CONTROL" => OutputKey::ControlRight,
            "RIGHT_SHIFT" => OutputKey::ShiftRight,
            "RIGHT_ALT" => OutputKey::AltRight,
            "RIGHT_GUI" => OutputKey::MetaRight,
            _ => return None,
        };
        Some(key)
    }
}
