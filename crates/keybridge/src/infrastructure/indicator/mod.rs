//! Indicator adapters: where layout feedback goes.
//!
//! The reference hardware drives an RGB status light; on a plain host there
//! is nothing to light up, so the default adapter reports state changes
//! through the log instead.

pub mod mock;

use tracing::info;

use keybridge_core::Rgb;

use crate::application::layout_manager::Indicator;

/// An [`Indicator`] that logs fills and ignores brightness changes.
///
/// Brightness flickers fire on every keypress; logging each one would
/// drown the log, so only the per-layout color fill is reported.
#[derive(Debug, Default)]
pub struct TracingIndicator;

impl Indicator for TracingIndicator {
    fn set_brightness(&self, _level: f32) {}

    fn fill(&self, color: Rgb) {
        info!(
            color = format_args!("#{:02x}{:02x}{:02x}", color.r, color.g, color.b),
            "indicator color changed"
        );
    }
}
