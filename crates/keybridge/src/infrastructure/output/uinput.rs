//! Virtual keyboard output over Linux uinput, via `evdev`.
//!
//! The sink creates one virtual keyboard device at startup, declaring every
//! key it can ever emit, and then writes plain key press/release events to
//! it.  The kernel delivers them to the session exactly as if they came
//! from real hardware.
//!
//! The sink tracks which keys it currently holds so `release_all` can clean
//! up after a keyboard unplug or daemon shutdown without relying on the
//! vanished device for release edges.

use std::collections::BTreeSet;
use std::sync::Mutex;

use evdev::uinput::{VirtualDevice, VirtualDeviceBuilder};
use evdev::{AttributeSet, EventType, InputEvent, Key};
use tracing::info;

use keybridge_core::OutputKey;

use crate::application::remap_engine::{OutputSink, SinkError};

const DEVICE_NAME: &str = "keybridge virtual keyboard";

/// Maps an output key to its Linux input event code.
///
/// Returns `None` only for [`OutputKey::Unknown`], which the engine never
/// forwards.
fn evdev_key(key: OutputKey) -> Option<Key> {
    let mapped = match key {
        OutputKey::KeyA => Key::KEY_A,
        OutputKey::KeyB => Key::KEY_B,
        OutputKey::KeyC => Key::KEY_C,
        OutputKey::KeyD => Key::KEY_D,
        OutputKey::KeyE => Key::KEY_E,
        OutputKey::KeyF => Key::KEY_F,
        OutputKey::KeyG => Key::KEY_G,
        OutputKey::KeyH => Key::KEY_H,
        OutputKey::KeyI => Key::KEY_I,
        OutputKey::KeyJ => Key::KEY_J,
        OutputKey::KeyK => Key::KEY_K,
        OutputKey::KeyL => Key::KEY_L,
        OutputKey::KeyM => Key::KEY_M,
        OutputKey::KeyN => Key::KEY_N,
        OutputKey::KeyO => Key::KEY_O,
        OutputKey::KeyP => Key::KEY_P,
        OutputKey::KeyQ => Key::KEY_Q,
        OutputKey::KeyR => Key::KEY_R,
        OutputKey::KeyS => Key::KEY_S,
        OutputKey::KeyT => Key::KEY_T,
        OutputKey::KeyU => Key::KEY_U,
        OutputKey::KeyV => Key::KEY_V,
        OutputKey::KeyW => Key::KEY_W,
        OutputKey::KeyX => Key::KEY_X,
        OutputKey::KeyY => Key::KEY_Y,
        OutputKey::KeyZ => Key::KEY_Z,
        OutputKey::Digit1 => Key::KEY_1,
        OutputKey::Digit2 => Key::KEY_2,
        OutputKey::Digit3 => Key::KEY_3,
        OutputKey::Digit4 => Key::KEY_4,
        OutputKey::Digit5 => Key::KEY_5,
        OutputKey::Digit6 => Key::KEY_6,
        OutputKey::Digit7 => Key::KEY_7,
        OutputKey::Digit8 => Key::KEY_8,
        OutputKey::Digit9 => Key::KEY_9,
        OutputKey::Digit0 => Key::KEY_0,
        OutputKey::Enter => Key::KEY_ENTER,
        OutputKey::Escape => Key::KEY_ESC,
        OutputKey::Backspace => Key::KEY_BACKSPACE,
        OutputKey::Tab => Key::KEY_TAB,
        OutputKey::Space => Key::KEY_SPACE,
        OutputKey::Minus => Key::KEY_MINUS,
        OutputKey::Equal => Key::KEY_EQUAL,
        OutputKey::BracketLeft => Key::KEY_LEFTBRACE,
        OutputKey::BracketRight => Key::KEY_RIGHTBRACE,
        OutputKey::Backslash => Key::KEY_BACKSLASH,
        OutputKey::Semicolon => Key::KEY_SEMICOLON,
        OutputKey::Quote => Key::KEY_APOSTROPHE,
        OutputKey::Backquote => Key::KEY_GRAVE,
        OutputKey::Comma => Key::KEY_COMMA,
        OutputKey::Period => Key::KEY_DOT,
        OutputKey::Slash => Key::KEY_SLASH,
        OutputKey::CapsLock => Key::KEY_CAPSLOCK,
        OutputKey::F1 => Key::KEY_F1,
        OutputKey::F2 => Key::KEY_F2,
        OutputKey::F3 => Key::KEY_F3,
        OutputKey::F4 => Key::KEY_F4,
        OutputKey::F5 => Key::KEY_F5,
        OutputKey::F6 => Key::KEY_F6,
        OutputKey::F7 => Key::KEY_F7,
        OutputKey::F8 => Key::KEY_F8,
        OutputKey::F9 => Key::KEY_F9,
        OutputKey::F10 => Key::KEY_F10,
        OutputKey::F11 => Key::KEY_F11,
        OutputKey::F12 => Key::KEY_F12,
        OutputKey::PrintScreen => Key::KEY_SYSRQ,
        OutputKey::ScrollLock => Key::KEY_SCROLLLOCK,
        OutputKey::Pause => Key::KEY_PAUSE,
        OutputKey::Insert => Key::KEY_INSERT,
        OutputKey::Home => Key::KEY_HOME,
        OutputKey::PageUp => Key::KEY_PAGEUP,
        OutputKey::Delete => Key::KEY_DELETE,
        OutputKey::End => Key::KEY_END,
        OutputKey::PageDown => Key::KEY_PAGEDOWN,
        OutputKey::ArrowRight => Key::KEY_RIGHT,
        OutputKey::ArrowLeft => Key::KEY_LEFT,
        OutputKey::ArrowDown => Key::KEY_DOWN,
        OutputKey::ArrowUp => Key::KEY_UP,
        OutputKey::NumLock => Key::KEY_NUMLOCK,
        OutputKey::NumpadDivide => Key::KEY_KPSLASH,
        OutputKey::NumpadMultiply => Key::KEY_KPASTERISK,
        OutputKey::NumpadSubtract => Key::KEY_KPMINUS,
        OutputKey::NumpadAdd => Key::KEY_KPPLUS,
        OutputKey::NumpadEnter => Key::KEY_KPENTER,
        OutputKey::Numpad1 => Key::KEY_KP1,
        OutputKey::Numpad2 => Key::KEY_KP2,
        OutputKey::Numpad3 => Key::KEY_KP3,
        OutputKey::Numpad4 => Key::KEY_KP4,
        OutputKey::Numpad5 => Key::KEY_KP5,
        OutputKey::Numpad6 => Key::KEY_KP6,
        OutputKey::Numpad7 => Key::KEY_KP7,
        OutputKey::Numpad8 => Key::KEY_KP8,
        OutputKey::Numpad9 => Key::KEY_KP9,
        OutputKey::Numpad0 => Key::KEY_KP0,
        OutputKey::NumpadDecimal => Key::KEY_KPDOT,
        OutputKey::ContextMenu => Key::KEY_COMPOSE,
        OutputKey::ControlLeft => Key::KEY_LEFTCTRL,
        OutputKey::ShiftLeft => Key::KEY_LEFTSHIFT,
        OutputKey::AltLeft => Key::KEY_LEFTALT,
        OutputKey::MetaLeft => Key::KEY_LEFTMETA,
        OutputKey::ControlRight => Key::KEY_RIGHTCTRL,
        OutputKey::ShiftRight => Key::KEY_RIGHTSHIFT,
        OutputKey::AltRight => Key::KEY_RIGHTALT,
        OutputKey::MetaRight => Key::KEY_RIGHTMETA,
        OutputKey::Unknown => return None,
    };
    Some(mapped)
}

struct Inner {
    device: VirtualDevice,
    /// Event codes of keys currently held down by the sink.
    held: BTreeSet<u16>,
}

/// An [`OutputSink`] backed by a uinput virtual keyboard.
pub struct UinputSink {
    inner: Mutex<Inner>,
}

impl UinputSink {
    /// Creates the virtual keyboard device.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::Device`] when `/dev/uinput` is unavailable,
    /// typically because the daemon lacks permission to open it.
    pub fn new() -> Result<Self, SinkError> {
        let mut keys = AttributeSet::<Key>::new();
        for &key in OutputKey::ALL {
            if let Some(mapped) = evdev_key(key) {
                keys.insert(mapped);
            }
        }

        let device = VirtualDeviceBuilder::new()
            .and_then(|b| b.name(DEVICE_NAME).with_keys(&keys))
            .and_then(|b| b.build())
            .map_err(|e| SinkError::Device(e.to_string()))?;
        info!(name = DEVICE_NAME, "virtual keyboard created");

        Ok(Self {
            inner: Mutex::new(Inner {
                device,
                held: BTreeSet::new(),
            }),
        })
    }

    fn emit(&self, key: OutputKey, value: i32) -> Result<(), SinkError> {
        let Some(mapped) = evdev_key(key) else {
            return Ok(());
        };
        let mut inner = self.inner.lock().unwrap();
        inner
            .device
            .emit(&[InputEvent::new(EventType::KEY, mapped.code(), value)])
            .map_err(|e| SinkError::Device(e.to_string()))?;
        if value == 1 {
            inner.held.insert(mapped.code());
        } else {
            inner.held.remove(&mapped.code());
        }
        Ok(())
    }
}

impl OutputSink for UinputSink {
    fn press(&self, key: OutputKey) -> Result<(), SinkError> {
        self.emit(key, 1)
    }

    fn release(&self, key: OutputKey) -> Result<(), SinkError> {
        self.emit(key, 0)
    }

    fn release_all(&self) -> Result<(), SinkError> {
        let mut inner = self.inner.lock().unwrap();
        let held: Vec<u16> = inner.held.iter().copied().collect();
        for code in held {
            inner
                .device
                .emit(&[InputEvent::new(EventType::KEY, code, 0)])
                .map_err(|e| SinkError::Device(e.to_string()))?;
            inner.held.remove(&code);
        }
        Ok(())
    }
}
