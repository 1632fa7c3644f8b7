//! Output sink adapters: the virtual keyboard the remapped keys land on.

pub mod mock;
#[cfg(target_os = "linux")]
pub mod uinput;
