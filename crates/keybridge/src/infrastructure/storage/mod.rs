//! Persistence adapters: daemon configuration and layout resources.

pub mod config;
pub mod layout_store;
pub mod mock;
