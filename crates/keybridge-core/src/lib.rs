//! # keybridge-core
//!
//! Shared library for the keybridge key-remapping daemon: boot-protocol
//! report decoding, key-state edge detection, and the layout domain types.
//!
//! This crate has zero dependencies on OS APIs, USB libraries, or the
//! filesystem.  Everything here is pure data and pure functions, which is
//! what makes the remap core testable without hardware.
//!
//! # Architecture overview
//!
//! keybridge sits between a physical USB keyboard and the host OS:
//!
//! ```text
//! physical keyboard ──USB──▶ keybridge ──uinput──▶ host OS
//! ```
//!
//! Each polling cycle the daemon reads one 8-byte boot-protocol report,
//! diffs it against the previous frame's state, remaps the edges through the
//! active layout, and forwards press/release events to a virtual keyboard.
//! This crate provides the pieces that cycle is built from:
//!
//! - **`report`** – [`BootReport`]: the fixed 8-byte USB HID boot keyboard
//!   report (1 modifier byte, 1 reserved byte, 6 scan-code slots) and the
//!   [`Modifier`] enumeration expanded from the modifier bitmask.
//!
//! - **`diff`** – [`KeyState`] (what was held in the last committed frame)
//!   and the pure [`diff`](diff::diff) function that turns two states into
//!   press/release edges.
//!
//! - **`keycode`** – [`OutputKey`]: the fixed enumeration of output key
//!   identifiers, with the explicit name table used when parsing layout
//!   resources.
//!
//! - **`domain`** – [`Layout`]: a named, swappable scan-code→key mapping
//!   plus its indicator color.

pub mod diff;
pub mod domain;
pub mod keycode;
pub mod report;

pub use diff::{diff, FrameEdges, KeyState};
pub use domain::layout::{Layout, Rgb};
pub use keycode::OutputKey;
pub use report::{BootReport, Modifier, REPORT_LEN};
