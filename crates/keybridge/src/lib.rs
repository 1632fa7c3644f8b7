//! keybridge — a USB HID key-remapping bridge daemon.
//!
//! The daemon sits between a physical USB keyboard and the host's input
//! stack.  It claims the keyboard's boot-protocol interface, polls its
//! 8-byte input reports, diffs each frame against the previous one, remaps
//! the resulting press/release edges through the active layout, and emits
//! the remapped keys on a virtual keyboard device.  A reserved swap key
//! cycles through the configured layouts at runtime without restarting.
//!
//! # Architecture
//!
//! The crate follows the same hexagonal split as its sibling:
//!
//! - [`application`] — use cases (`RemapEngine`, `LayoutManager`,
//!   `ConnectionSupervisor`) plus the collaborator traits they depend on
//!   (`InputTransport`, `OutputSink`, `LayoutStore`, `Indicator`).
//! - [`infrastructure`] — concrete adapters: rusb transport, evdev/uinput
//!   output sink, JSON layout store, TOML configuration, and recording
//!   mocks for every trait.
//!
//! Pure decoding and diffing logic lives in the `keybridge-core` crate.

pub mod application;
pub mod infrastructure;
