//! Application layer: the daemon's use cases and the traits they depend on.
//!
//! Each use case owns injectable collaborator references, so every module
//! here is testable against the recording mocks in
//! [`crate::infrastructure`] without touching USB or uinput.

pub mod connection;
pub mod layout_manager;
pub mod remap_engine;

pub use connection::{
    ConnectionSupervisor, DeviceInfo, DeviceLink, DeviceSession, InputTransport, TransportError,
};
pub use layout_manager::{Indicator, KeyAction, LayoutError, LayoutManager, LayoutStore, StoreError};
pub use remap_engine::{OutputSink, RemapEngine, SinkError};
