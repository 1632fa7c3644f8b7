//! Domain entities for the remap core.
//!
//! Currently the only entity is the [`layout::Layout`]: the named,
//! swappable scan-code→key mapping the remap engine resolves through.

pub mod layout;
