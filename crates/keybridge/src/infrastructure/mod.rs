//! Infrastructure layer: concrete adapters behind the application traits.
//!
//! Each submodule pairs a real adapter with a recording mock so the use
//! cases can be tested without USB hardware or a uinput device node.

pub mod indicator;
pub mod output;
pub mod storage;
pub mod transport;
