//! Input transport adapters: where raw keyboard reports come from.

pub mod mock;
pub mod usb;
